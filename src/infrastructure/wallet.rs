use std::sync::Arc;

use async_trait::async_trait;
use ethers::{
    middleware::SignerMiddleware,
    providers::{Http, Middleware, Provider},
    signers::{LocalWallet, Signer},
    types::Address,
};
use tracing::{debug, info};

use crate::domain::errors::classify_provider_error;
use crate::domain::GatewayError;
use crate::infrastructure::contracts::client::TournamentContractClient;
use crate::infrastructure::contracts::config::GatewayConfig;
use crate::infrastructure::contracts::ledger::TournamentLedger;
use crate::infrastructure::contracts::types::ContractBinding;

/// The wallet boundary: account access plus a signer to bind contracts with.
#[async_trait]
pub trait Wallet: Send + Sync {
    type Ledger: TournamentLedger + 'static;

    /// Ask for account access. The first account is the active one.
    ///
    /// A declined prompt is reported as `UserRejected`.
    async fn request_accounts(&self) -> Result<Vec<Address>, GatewayError>;

    /// Build a contract handle whose transactions are signed as `account`.
    async fn bind(&self, account: Address, binding: &ContractBinding) -> Result<Self::Ledger, GatewayError>;
}

pub type NodeLedger = TournamentContractClient<SignerMiddleware<Provider<Http>, LocalWallet>>;

/// A JSON-RPC node paired with a local signing key.
#[derive(Debug, Clone)]
pub struct NodeWallet {
    provider: Provider<Http>,
    signer: LocalWallet,
    chain_id: u64,
}

impl NodeWallet {
    pub fn new(provider: Provider<Http>, signer: LocalWallet, chain_id: u64) -> Self {
        Self {
            provider,
            signer: signer.with_chain_id(chain_id),
            chain_id,
        }
    }

    /// Look for a usable wallet in the configuration.
    ///
    /// `Ok(None)` means there is no signing key, i.e. no wallet at all.
    pub fn detect(config: &GatewayConfig) -> Result<Option<Self>, GatewayError> {
        let Some(private_key) = config.private_key.as_deref() else {
            debug!("no signing key configured");
            return Ok(None);
        };

        let provider = Provider::<Http>::try_from(config.network.rpc_url.as_str())
            .map_err(|e| GatewayError::Config(format!("Invalid RPC_URL {}: {}", config.network.rpc_url, e)))?;

        let signer = private_key
            .trim()
            .parse::<LocalWallet>()
            .map_err(|e| GatewayError::Config(format!("Invalid private key: {}", e)))?;

        Ok(Some(Self::new(provider, signer, config.network.chain_id)))
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }
}

#[async_trait]
impl Wallet for NodeWallet {
    type Ledger = NodeLedger;

    async fn request_accounts(&self) -> Result<Vec<Address>, GatewayError> {
        let chain_id = self
            .provider
            .get_chainid()
            .await
            .map_err(|e| classify_provider_error(&e))?
            .as_u64();

        if chain_id != self.chain_id {
            return Err(GatewayError::WrongNetwork {
                expected: self.chain_id,
                actual: chain_id,
            });
        }

        info!(chain_id, account = ?self.signer.address(), "wallet connected");
        Ok(vec![self.signer.address()])
    }

    async fn bind(&self, account: Address, binding: &ContractBinding) -> Result<Self::Ledger, GatewayError> {
        if account != self.signer.address() {
            return Err(GatewayError::InvalidAddress(format!(
                "{:?} is not controlled by this wallet",
                account
            )));
        }

        let client = SignerMiddleware::new(self.provider.clone(), self.signer.clone());
        Ok(TournamentContractClient::new(binding, account, Arc::new(client)))
    }
}
