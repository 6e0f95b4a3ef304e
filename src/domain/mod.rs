pub mod errors;
pub mod models;

pub use errors::GatewayError;
pub use models::*;
