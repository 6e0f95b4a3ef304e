pub mod gateway_service;
pub mod in_flight;

pub use gateway_service::ContractGateway;
pub use in_flight::*;
