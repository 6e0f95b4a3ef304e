use std::path::PathBuf;

use ethers::types::Address;

use crate::domain::GatewayError;
use crate::infrastructure::contracts::abis;
use crate::infrastructure::contracts::types::{ContractBinding, NativeCurrency, NetworkConfig};

pub const ANVIL_CHAIN_ID: u64 = 31337;

/// Anvil account #0. Only ever used against the local development chain.
const ANVIL_DEFAULT_PRIVATE_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// First contract deployed by Anvil account #0.
const ANVIL_DEFAULT_CONTRACT_ADDRESS: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

const DEFAULT_RPC_URL: &str = "http://localhost:8545";

/// Everything the gateway needs to reach the deployed contract.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub network: NetworkConfig,
    pub contract_address: Address,
    pub abi_path: Option<PathBuf>,
    pub private_key: Option<String>,
}

impl GatewayConfig {
    /// Load the configuration from environment variables.
    ///
    /// Call `dotenvy::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self, GatewayError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load the configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, GatewayError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let network = get_network_config(&lookup)?;
        let contract_address = get_contract_address(&lookup, network.chain_id)?;
        let private_key = get_private_key(&lookup, network.chain_id);
        let abi_path = lookup("TOURNAMENT_ABI_PATH").map(PathBuf::from);

        Ok(Self {
            network,
            contract_address,
            abi_path,
            private_key,
        })
    }

    /// Local Anvil node with the default deployment.
    pub fn anvil() -> Result<Self, GatewayError> {
        Self::from_lookup(|_| None)
    }

    /// Resolve the contract address and ABI the gateway binds against.
    pub fn binding(&self) -> Result<ContractBinding, GatewayError> {
        let abi = match &self.abi_path {
            Some(path) => abis::load_abi_from_path(path)?,
            None => abis::load_tournament_abi()?,
        };

        Ok(ContractBinding {
            address: self.contract_address,
            abi,
        })
    }
}

fn get_network_config<F>(lookup: &F) -> Result<NetworkConfig, GatewayError>
where
    F: Fn(&str) -> Option<String>,
{
    let chain_id = match lookup("CHAIN_ID") {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|e| GatewayError::Config(format!("Invalid CHAIN_ID {:?}: {}", raw, e)))?,
        None => ANVIL_CHAIN_ID,
    };

    let name = if chain_id == ANVIL_CHAIN_ID {
        "Anvil Local".to_string()
    } else {
        format!("Chain {}", chain_id)
    };

    Ok(NetworkConfig {
        chain_id,
        name,
        rpc_url: lookup("RPC_URL").unwrap_or_else(|| DEFAULT_RPC_URL.to_string()),
        native_currency: NativeCurrency {
            name: "Ether".to_string(),
            symbol: "ETH".to_string(),
            decimals: 18,
        },
    })
}

fn get_contract_address<F>(lookup: &F, chain_id: u64) -> Result<Address, GatewayError>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = match lookup("TOURNAMENT_CONTRACT_ADDRESS") {
        Some(address) => address,
        None if chain_id == ANVIL_CHAIN_ID => ANVIL_DEFAULT_CONTRACT_ADDRESS.to_string(),
        None => {
            return Err(GatewayError::Config(format!(
                "TOURNAMENT_CONTRACT_ADDRESS not set. Required for chain ID: {}",
                chain_id
            )))
        }
    };

    raw.trim()
        .parse::<Address>()
        .map_err(|e| GatewayError::InvalidAddress(format!("{}: {}", raw, e)))
}

/// The signer key, if one is available.
///
/// A missing key is not a configuration error: it means no wallet is present,
/// which the gateway reports when a connection is attempted.
fn get_private_key<F>(lookup: &F, chain_id: u64) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup("PRIVATE_KEY") {
        Some(key) => Some(key),
        None if chain_id == ANVIL_CHAIN_ID => Some(ANVIL_DEFAULT_PRIVATE_KEY.to_string()),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<GatewayConfig, GatewayError> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        GatewayConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_anvil_defaults() {
        let config = GatewayConfig::anvil().unwrap();
        assert_eq!(config.network.chain_id, ANVIL_CHAIN_ID);
        assert_eq!(config.network.rpc_url, DEFAULT_RPC_URL);
        assert_eq!(config.network.native_currency.decimals, 18);
        assert_eq!(config.contract_address, ANVIL_DEFAULT_CONTRACT_ADDRESS.parse::<Address>().unwrap());
        assert_eq!(config.private_key.as_deref(), Some(ANVIL_DEFAULT_PRIVATE_KEY));
        assert!(config.abi_path.is_none());
    }

    #[test]
    fn test_remote_chain_requires_contract_address() {
        let err = config_from(&[("CHAIN_ID", "11155111")]).unwrap_err();
        assert!(matches!(err, GatewayError::Config(_)));
    }

    #[test]
    fn test_remote_chain_without_key_has_no_wallet() {
        let config = config_from(&[
            ("CHAIN_ID", "11155111"),
            ("RPC_URL", "https://rpc.sepolia.org"),
            ("TOURNAMENT_CONTRACT_ADDRESS", "0x90F79bf6EB2c4f870365E785982E1f101E93b906"),
        ])
        .unwrap();

        assert_eq!(config.network.chain_id, 11155111);
        assert_eq!(config.network.rpc_url, "https://rpc.sepolia.org");
        assert!(config.private_key.is_none());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(matches!(config_from(&[("CHAIN_ID", "mainnet")]), Err(GatewayError::Config(_))));
        assert!(matches!(
            config_from(&[("TOURNAMENT_CONTRACT_ADDRESS", "0x1234")]),
            Err(GatewayError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_binding_uses_embedded_abi() {
        let binding = GatewayConfig::anvil().unwrap().binding().unwrap();
        assert!(binding.abi.function("sendPaymentsToWinners").is_ok());
    }
}
