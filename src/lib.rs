pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod utils;


// Main exports for external use
pub use application::services::ContractGateway;
pub use domain::{Action, GatewayError, NewTournament, Role, StatusCode, Tournament, TxOutcome, User};
pub use infrastructure::contracts::{GatewayConfig, TournamentEvent, TournamentLedger};
pub use infrastructure::{NodeWallet, Wallet};
