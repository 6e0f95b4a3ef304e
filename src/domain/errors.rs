use ethers::contract::{ContractError, EthError};
use ethers::providers::{JsonRpcError, Middleware, MiddlewareError, ProviderError};
use ethers::types::H256;
use thiserror::Error;

use crate::domain::models::Action;

/// JSON-RPC code a wallet returns when the user declines a prompt (EIP-1193).
pub const USER_REJECTED_CODE: i64 = 4001;

/// JSON-RPC code nodes use for `execution reverted`.
pub const EXECUTION_REVERTED_CODE: i64 = 3;

/// Gateway errors.
///
/// Every failure of a gateway operation is classified into one of these and
/// forwarded to the caller as-is. Nothing is retried.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("No wallet available")]
    WalletUnavailable,

    #[error("User rejected the request")]
    UserRejected,

    #[error("Wallet not connected")]
    NotConnected,

    #[error("Contract not bound")]
    NotBound,

    #[error("Reverted: {0}")]
    Reverted(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Wrong network: expected chain {expected}, connected to {actual}")]
    WrongNetwork { expected: u64, actual: u64 },

    #[error("ABI error: {0}")]
    Abi(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0} is already in flight")]
    Busy(Action),

    /// The transaction was mined but the record it created could not be read back.
    #[error("{action} mined in {transaction_hash:?}, reading the result back failed: {source}")]
    ReadBack {
        action: Action,
        transaction_hash: H256,
        source: Box<GatewayError>,
    },
}

impl GatewayError {
    /// Classify an error raised by an ethers contract call.
    pub fn from_contract_error<M: Middleware>(err: ContractError<M>) -> Self {
        if let Some(reason) = err.decode_revert::<String>() {
            return GatewayError::Reverted(reason);
        }

        match err {
            ContractError::Revert(data) => GatewayError::Reverted(format!("execution reverted ({})", data)),
            ContractError::AbiError(e) => GatewayError::Abi(e.to_string()),
            ContractError::DecodingError(e) => GatewayError::Abi(e.to_string()),
            ContractError::DetokenizationError(e) => GatewayError::Abi(e.to_string()),
            ContractError::MiddlewareError { e } => match e.as_error_response() {
                Some(response) => classify_rpc_response(response),
                None => GatewayError::NetworkError(e.to_string()),
            },
            ContractError::ProviderError { e } => classify_provider_error(&e),
            other => GatewayError::NetworkError(other.to_string()),
        }
    }

    /// Whether the remote contract rejected the call.
    pub fn is_revert(&self) -> bool {
        matches!(self, GatewayError::Reverted(_))
    }
}

/// Classify an error raised by the JSON-RPC provider itself.
pub fn classify_provider_error(err: &ProviderError) -> GatewayError {
    match err.as_error_response() {
        Some(response) => classify_rpc_response(response),
        None => GatewayError::NetworkError(err.to_string()),
    }
}

/// Classify a JSON-RPC error response returned by the node or the wallet.
pub fn classify_rpc_response(response: &JsonRpcError) -> GatewayError {
    if response.code == USER_REJECTED_CODE {
        return GatewayError::UserRejected;
    }

    if let Some(data) = response.as_revert_data() {
        if let Some(reason) = String::decode_with_selector(&data) {
            return GatewayError::Reverted(reason);
        }
    }

    if response.code == EXECUTION_REVERTED_CODE || response.message.contains("revert") {
        return GatewayError::Reverted(response.message.clone());
    }

    GatewayError::NetworkError(response.to_string())
}

impl From<ethers::abi::Error> for GatewayError {
    fn from(err: ethers::abi::Error) -> Self {
        GatewayError::Abi(err.to_string())
    }
}

impl From<ethers::contract::AbiError> for GatewayError {
    fn from(err: ethers::contract::AbiError) -> Self {
        GatewayError::Abi(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::abi::{encode, Token};
    use serde_json::json;

    fn rpc_error(code: i64, message: &str, data: Option<serde_json::Value>) -> JsonRpcError {
        JsonRpcError {
            code,
            message: message.to_string(),
            data,
        }
    }

    #[test]
    fn test_user_rejection_is_classified() {
        let err = classify_rpc_response(&rpc_error(4001, "User rejected the request.", None));
        assert!(matches!(err, GatewayError::UserRejected));
    }

    #[test]
    fn test_revert_reason_is_decoded_from_data() {
        // Error(string) selector followed by the ABI encoded reason
        let mut payload = vec![0x08, 0xc3, 0x79, 0xa0];
        payload.extend(encode(&[Token::String("Tournament is full".to_string())]));
        let data = format!("0x{}", ethers::utils::hex::encode(&payload));

        let err = classify_rpc_response(&rpc_error(3, "execution reverted: Tournament is full", Some(json!(data))));
        match err {
            GatewayError::Reverted(reason) => assert_eq!(reason, "Tournament is full"),
            other => panic!("unexpected classification: {:?}", other),
        }
    }

    #[test]
    fn test_revert_message_is_passed_through() {
        let err = classify_rpc_response(&rpc_error(-32000, "execution reverted", None));
        match err {
            GatewayError::Reverted(reason) => assert_eq!(reason, "execution reverted"),
            other => panic!("unexpected classification: {:?}", other),
        }
    }

    #[test]
    fn test_other_rpc_errors_are_network_errors() {
        let err = classify_rpc_response(&rpc_error(-32603, "internal error", None));
        assert!(matches!(err, GatewayError::NetworkError(_)));

        let err = classify_provider_error(&ProviderError::CustomError("connection refused".to_string()));
        match err {
            GatewayError::NetworkError(message) => assert!(message.contains("connection refused")),
            other => panic!("unexpected classification: {:?}", other),
        }
    }
}
