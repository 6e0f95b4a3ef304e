use std::fs;
use std::path::Path;

use ethers::abi::Abi;

use crate::domain::GatewayError;

const TOURNAMENT_CONTRACT_ABI: &str = include_str!("../../../../abis/tournament_contract_abi.json");

/// The tournament contract ABI compiled into the crate.
pub fn load_tournament_abi() -> Result<Abi, GatewayError> {
    parse_abi(TOURNAMENT_CONTRACT_ABI, "embedded tournament ABI")
}

/// Load an ABI from a JSON file, e.g. after a redeploy with a changed interface.
pub fn load_abi_from_path(path: impl AsRef<Path>) -> Result<Abi, GatewayError> {
    let path = path.as_ref();
    let abi_content = fs::read_to_string(path)
        .map_err(|e| GatewayError::Config(format!("Failed to read ABI file {}: {}", path.display(), e)))?;

    parse_abi(&abi_content, &path.display().to_string())
}

fn parse_abi(content: &str, source: &str) -> Result<Abi, GatewayError> {
    serde_json::from_str(content).map_err(|e| GatewayError::Config(format!("Failed to parse {}: {}", source, e)))
}
