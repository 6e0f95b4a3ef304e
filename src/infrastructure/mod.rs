pub mod contracts;
pub mod wallet;

pub use wallet::{NodeLedger, NodeWallet, Wallet};
