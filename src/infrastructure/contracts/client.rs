use std::sync::Arc;

use async_trait::async_trait;
use ethers::{
    abi::Detokenize,
    contract::{Contract, ContractCall},
    providers::Middleware,
    types::{Address, U256, U64},
};
use tracing::debug;

use crate::domain::errors::classify_provider_error;
use crate::domain::{
    GatewayError, NewTournament, Role, StatusCode, Tournament, TournamentTuple, TxOutcome, User, UserTuple,
};
use crate::infrastructure::contracts::events::TournamentEvent;
use crate::infrastructure::contracts::ledger::TournamentLedger;
use crate::infrastructure::contracts::types::ContractBinding;

/// Tournament contract client backed by an ethers `Contract`.
///
/// `M` is normally a `SignerMiddleware`, so every state-changing call is
/// signed by the connected wallet.
#[derive(Clone)]
pub struct TournamentContractClient<M> {
    contract: Contract<M>,
    caller: Address,
}

impl<M: Middleware + 'static> TournamentContractClient<M> {
    pub fn new(binding: &ContractBinding, caller: Address, client: Arc<M>) -> Self {
        let contract = Contract::new(binding.address, binding.abi.clone(), client);
        Self { contract, caller }
    }

    /// Send a transaction and wait for it to be mined.
    async fn submit<D: Detokenize + Send>(&self, call: ContractCall<M, D>) -> Result<TxOutcome, GatewayError> {
        let pending_tx = call.send().await.map_err(GatewayError::from_contract_error)?;
        debug!(tx = ?pending_tx.tx_hash(), "transaction submitted");

        let receipt = pending_tx
            .await
            .map_err(|e| classify_provider_error(&e))?
            .ok_or_else(|| GatewayError::NetworkError("Transaction dropped before it was mined".to_string()))?;

        if receipt.status == Some(U64::zero()) {
            return Err(GatewayError::Reverted(format!(
                "Transaction {:?} reverted",
                receipt.transaction_hash
            )));
        }

        let events = TournamentEvent::decode_all(self.contract.address(), &receipt.logs);
        debug!(
            tx = ?receipt.transaction_hash,
            events = ?events.iter().map(TournamentEvent::name).collect::<Vec<_>>(),
            "transaction mined"
        );

        Ok(TxOutcome {
            transaction_hash: receipt.transaction_hash,
            block_number: receipt.block_number.unwrap_or_default().as_u64(),
            events,
        })
    }

    /// Run a view call against the latest block.
    async fn view<D: Detokenize + Send>(&self, call: ContractCall<M, D>) -> Result<D, GatewayError> {
        call.call().await.map_err(GatewayError::from_contract_error)
    }
}

#[async_trait]
impl<M: Middleware + 'static> TournamentLedger for TournamentContractClient<M> {
    fn address(&self) -> Address {
        self.contract.address()
    }

    fn caller(&self) -> Address {
        self.caller
    }

    async fn assign_organizer_role(&self, account: Address) -> Result<TxOutcome, GatewayError> {
        let call = self.contract.method::<_, Address>("assignOrganizerRoleToUser", account)?;
        self.submit(call).await
    }

    async fn create_user(&self, email: &str) -> Result<TxOutcome, GatewayError> {
        let call = self.contract.method::<_, UserTuple>("createUser", email.to_string())?;
        self.submit(call).await
    }

    async fn get_user(&self, account: Address) -> Result<User, GatewayError> {
        let call = self.contract.method::<_, UserTuple>("getUser", account)?;
        self.view(call).await.map(User::from)
    }

    async fn create_tournament(&self, params: &NewTournament) -> Result<TxOutcome, GatewayError> {
        let call = self.contract.method::<_, TournamentTuple>(
            "createTournament",
            (
                params.name.clone(),
                params.entry_fee,
                params.prize,
                params.max_participant_count,
                params.prize_distribution.clone(),
            ),
        )?;
        self.submit(call).await
    }

    async fn get_tournament(&self, id: U256) -> Result<Tournament, GatewayError> {
        let call = self.contract.method::<_, TournamentTuple>("getTournament", id)?;
        self.view(call).await.map(Tournament::from)
    }

    async fn join_tournament(&self, id: U256, participant: Address) -> Result<TxOutcome, GatewayError> {
        let call = self
            .contract
            .method::<_, (U256, Address)>("joinTournament", (id, participant))?;
        self.submit(call).await
    }

    async fn start_tournament(&self, id: U256) -> Result<TxOutcome, GatewayError> {
        let call = self.contract.method::<_, ()>("startTournament", id)?;
        self.submit(call).await
    }

    async fn complete_tournament(&self, id: U256, winners: &[Address]) -> Result<TxOutcome, GatewayError> {
        let call = self
            .contract
            .method::<_, ()>("completeTournament", (id, winners.to_vec()))?;
        self.submit(call).await
    }

    async fn donate_to_tournament(&self, id: U256, value: U256) -> Result<TxOutcome, GatewayError> {
        let call = self
            .contract
            .method::<_, (U256, Address, U256)>("donateToTournament", id)?
            .value(value);
        self.submit(call).await
    }

    async fn get_tournament_balance(&self, id: U256) -> Result<U256, GatewayError> {
        let call = self.contract.method::<_, U256>("getTournamentBalance", id)?;
        self.view(call).await
    }

    async fn send_payments_to_winners(&self, id: U256) -> Result<TxOutcome, GatewayError> {
        let call = self
            .contract
            .method::<_, (U256, U256)>("sendPaymentsToWinners", id)?;
        self.submit(call).await
    }

    async fn change_tournament_status(&self, id: U256, status: StatusCode) -> Result<TxOutcome, GatewayError> {
        let call = self
            .contract
            .method::<_, (U256, u8)>("changeStatusOfTournament", (id, status.0))?;
        self.submit(call).await
    }

    async fn role_id(&self, role: Role) -> Result<[u8; 32], GatewayError> {
        let call = self.contract.method::<_, [u8; 32]>(role.getter(), ())?;
        self.view(call).await
    }

    async fn has_role(&self, role_id: [u8; 32], account: Address) -> Result<bool, GatewayError> {
        let call = self.contract.method::<_, bool>("hasRole", (role_id, account))?;
        self.view(call).await
    }

    async fn is_participant(&self, id: U256, account: Address) -> Result<bool, GatewayError> {
        let call = self
            .contract
            .method::<_, bool>("tournamentParticipants", (id, account))?;
        self.view(call).await
    }

    async fn tournament_organizer(&self, id: U256) -> Result<Address, GatewayError> {
        let call = self.contract.method::<_, Address>("tournamentOrganizers", id)?;
        self.view(call).await
    }

    async fn tournament_count(&self) -> Result<U256, GatewayError> {
        let call = self.contract.method::<_, U256>("tournamentCount", ())?;
        self.view(call).await
    }

    async fn user_count(&self) -> Result<U256, GatewayError> {
        let call = self.contract.method::<_, U256>("userCount", ())?;
        self.view(call).await
    }

    async fn contract_balance(&self) -> Result<U256, GatewayError> {
        let call = self.contract.method::<_, U256>("getBalanceContract", ())?;
        self.view(call).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::contracts::abis;
    use std::time::Duration;

    use ethers::contract::EthEvent;
    use ethers::providers::{MockProvider, Provider};
    use ethers::types::{Bytes, Log, Transaction, TransactionReceipt, H256, U64};

    use crate::infrastructure::contracts::events::CreateTournamentEvent;

    fn client() -> (TournamentContractClient<Provider<MockProvider>>, MockProvider) {
        let (provider, mock) = Provider::mocked();
        // poll the pending transaction without the default multi-second delay
        let provider = provider.interval(Duration::from_millis(1));
        let binding = ContractBinding {
            address: Address::from_low_u64_be(0xc0ffee),
            abi: abis::load_tournament_abi().unwrap(),
        };
        let client = TournamentContractClient::new(&binding, Address::from_low_u64_be(1), Arc::new(provider));
        (client, mock)
    }

    #[tokio::test]
    async fn test_view_decodes_balance() {
        let (client, mock) = client();
        let balance = U256::from(12u64) * U256::exp10(18);
        let encoded = ethers::abi::encode(&[ethers::abi::Token::Uint(balance)]);
        mock.push::<Bytes, _>(Bytes::from(encoded)).unwrap();

        assert_eq!(client.get_tournament_balance(U256::one()).await.unwrap(), balance);
    }

    #[tokio::test]
    async fn test_view_decodes_user_tuple() {
        let (client, mock) = client();
        let encoded = ethers::abi::encode(&[ethers::abi::Token::Tuple(vec![
            ethers::abi::Token::Uint(U256::from(4u64)),
            ethers::abi::Token::String("player@example.com".to_string()),
            ethers::abi::Token::Bool(true),
            ethers::abi::Token::Uint(U256::from(1_700_000_000u64)),
        ])]);
        mock.push::<Bytes, _>(Bytes::from(encoded)).unwrap();

        let user = client.get_user(Address::from_low_u64_be(2)).await.unwrap();
        assert_eq!(user.id, U256::from(4u64));
        assert_eq!(user.email, "player@example.com");
        assert!(user.is_organizer);
    }

    #[tokio::test]
    async fn test_undecodable_response_is_an_abi_error() {
        let (client, mock) = client();
        mock.push::<Bytes, _>(Bytes::from(vec![0u8; 3])).unwrap();

        let err = client.tournament_count().await.unwrap_err();
        assert!(matches!(err, GatewayError::Abi(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_transport_failure_is_a_network_error() {
        // nothing queued: the mock provider fails the request
        let (client, _mock) = client();
        let err = client.user_count().await.unwrap_err();
        assert!(matches!(err, GatewayError::NetworkError(_)), "got {:?}", err);
    }

    // ============ TRANSACTIONS ============

    /// A `startTournament` call with gas and fees preset, so sending it only
    /// issues `eth_sendTransaction` before polling for the receipt.
    fn start_call(client: &TournamentContractClient<Provider<MockProvider>>) -> ContractCall<Provider<MockProvider>, ()> {
        client
            .contract
            .method::<_, ()>("startTournament", U256::one())
            .unwrap()
            .from(client.caller)
            .gas(300_000u64)
            .gas_price(1_000_000_000u64)
    }

    fn mined_tx(hash: H256) -> Transaction {
        Transaction {
            hash,
            block_number: Some(U64::from(7u64)),
            ..Default::default()
        }
    }

    fn receipt(hash: H256, status: u64, logs: Vec<Log>) -> TransactionReceipt {
        TransactionReceipt {
            transaction_hash: hash,
            block_number: Some(U64::from(7u64)),
            status: Some(U64::from(status)),
            logs,
            ..Default::default()
        }
    }

    /// Queue the responses for send → getTransactionByHash → getTransactionReceipt.
    /// The mock answers from the back of its queue, so they go in reverse.
    fn queue_mined(mock: &MockProvider, hash: H256, receipt: TransactionReceipt) {
        mock.push::<TransactionReceipt, _>(receipt).unwrap();
        mock.push::<Transaction, _>(mined_tx(hash)).unwrap();
        mock.push::<H256, _>(hash).unwrap();
    }

    #[tokio::test]
    async fn test_submit_decodes_receipt_events() {
        let (client, mock) = client();
        let hash = H256::from_low_u64_be(0xabc);
        let created = Log {
            address: client.address(),
            topics: vec![CreateTournamentEvent::signature()],
            data: ethers::abi::encode(&[
                ethers::abi::Token::Uint(U256::from(3u64)),
                ethers::abi::Token::Address(client.caller()),
            ])
            .into(),
            ..Default::default()
        };
        let foreign = Log {
            address: Address::from_low_u64_be(0xbad),
            ..created.clone()
        };
        queue_mined(&mock, hash, receipt(hash, 1, vec![foreign, created]));

        let outcome = client.submit(start_call(&client)).await.unwrap();
        assert_eq!(outcome.transaction_hash, hash);
        assert_eq!(outcome.block_number, 7);
        assert_eq!(outcome.events.len(), 1);
        assert_eq!(outcome.created_tournament_id(), Some(U256::from(3u64)));
    }

    #[tokio::test]
    async fn test_failed_receipt_is_reverted() {
        let (client, mock) = client();
        let hash = H256::from_low_u64_be(0xdead);
        queue_mined(&mock, hash, receipt(hash, 0, vec![]));

        let err = client.submit(start_call(&client)).await.unwrap_err();
        assert!(err.is_revert(), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_dropped_transaction_is_a_network_error() {
        let (client, mock) = client();
        let hash = H256::from_low_u64_be(0xd0);
        // the transaction lookup keeps answering null until the poller gives up
        for _ in 0..4 {
            mock.push::<Option<Transaction>, _>(None).unwrap();
        }
        mock.push::<H256, _>(hash).unwrap();

        let err = client.submit(start_call(&client)).await.unwrap_err();
        assert!(matches!(err, GatewayError::NetworkError(_)), "got {:?}", err);
    }
}
