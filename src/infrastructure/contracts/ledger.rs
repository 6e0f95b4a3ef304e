use async_trait::async_trait;
use ethers::types::{Address, U256};

use crate::domain::{GatewayError, NewTournament, Role, StatusCode, Tournament, TxOutcome, User};

/// A tournament contract bound to a signer.
///
/// Each method is exactly one remote call. State-changing methods resolve once
/// the transaction is mined and report the decoded events; view methods
/// re-query the node every time.
#[async_trait]
pub trait TournamentLedger: Send + Sync {
    /// Address of the deployed contract.
    fn address(&self) -> Address;

    /// Account that signs the transactions.
    fn caller(&self) -> Address;

    async fn assign_organizer_role(&self, account: Address) -> Result<TxOutcome, GatewayError>;

    async fn create_user(&self, email: &str) -> Result<TxOutcome, GatewayError>;

    async fn get_user(&self, account: Address) -> Result<User, GatewayError>;

    async fn create_tournament(&self, params: &NewTournament) -> Result<TxOutcome, GatewayError>;

    async fn get_tournament(&self, id: U256) -> Result<Tournament, GatewayError>;

    async fn join_tournament(&self, id: U256, participant: Address) -> Result<TxOutcome, GatewayError>;

    async fn start_tournament(&self, id: U256) -> Result<TxOutcome, GatewayError>;

    async fn complete_tournament(&self, id: U256, winners: &[Address]) -> Result<TxOutcome, GatewayError>;

    /// `value` is attached to the call, in the smallest currency unit.
    async fn donate_to_tournament(&self, id: U256, value: U256) -> Result<TxOutcome, GatewayError>;

    async fn get_tournament_balance(&self, id: U256) -> Result<U256, GatewayError>;

    async fn send_payments_to_winners(&self, id: U256) -> Result<TxOutcome, GatewayError>;

    async fn change_tournament_status(&self, id: U256, status: StatusCode) -> Result<TxOutcome, GatewayError>;

    /// The contract's `bytes32` identifier for `role`.
    async fn role_id(&self, role: Role) -> Result<[u8; 32], GatewayError>;

    async fn has_role(&self, role_id: [u8; 32], account: Address) -> Result<bool, GatewayError>;

    async fn is_participant(&self, id: U256, account: Address) -> Result<bool, GatewayError>;

    async fn tournament_organizer(&self, id: U256) -> Result<Address, GatewayError>;

    async fn tournament_count(&self) -> Result<U256, GatewayError>;

    async fn user_count(&self) -> Result<U256, GatewayError>;

    async fn contract_balance(&self) -> Result<U256, GatewayError>;
}
