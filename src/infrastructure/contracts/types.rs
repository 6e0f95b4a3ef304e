use ethers::abi::Abi;
use ethers::types::Address;

// ============ CONTRACT CONFIGURATION TYPES ============

/// Network configuration
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    pub chain_id: u64,
    pub name: String,
    pub rpc_url: String,
    pub native_currency: NativeCurrency,
}

/// Native currency information
#[derive(Debug, Clone)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u32,
}

/// The fixed address and interface the gateway binds against.
#[derive(Debug, Clone)]
pub struct ContractBinding {
    pub address: Address,
    pub abi: Abi,
}
