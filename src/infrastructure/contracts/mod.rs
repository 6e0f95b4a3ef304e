// Tournament contract integration
// Everything that knows about the contract's ABI, address and events lives here

pub mod abis;
pub mod client;
pub mod config;
pub mod events;
pub mod ledger;
pub mod types;

pub use client::TournamentContractClient;
pub use config::GatewayConfig;
pub use events::TournamentEvent;
pub use ledger::TournamentLedger;
pub use types::*;
