use ethers::types::U256;
use ethers::utils::format_units;

use crate::domain::GatewayError;

/// Decimals of the native currency on every EVM chain we talk to.
pub const ETHER_DECIMALS: u32 = 18;

/// Convert a decimal display string (e.g. `"0.5"`) into the smallest integer unit.
///
/// The conversion is exact: inputs with more fractional digits than
/// `decimals` are rejected instead of rounded.
pub fn parse_amount(amount: &str, decimals: u32) -> Result<U256, GatewayError> {
    let amount = amount.trim();
    if !amount.chars().any(|c| c.is_ascii_digit()) {
        return Err(GatewayError::InvalidAmount(format!("{:?} has no digits", amount)));
    }
    if !amount.chars().all(|c| c.is_ascii_digit() || c == '.') || amount.matches('.').count() > 1 {
        return Err(GatewayError::InvalidAmount(format!("{:?} is not a non-negative decimal", amount)));
    }

    let (whole, fraction) = amount.split_once('.').unwrap_or((amount, ""));
    if fraction.len() > decimals as usize {
        return Err(GatewayError::InvalidAmount(format!(
            "{:?} has more than {} fractional digits",
            amount, decimals
        )));
    }

    let too_large = || GatewayError::InvalidAmount(format!("{:?} does not fit in 256 bits", amount));

    let scale = U256::from(10u64)
        .checked_pow(U256::from(decimals))
        .ok_or_else(too_large)?;
    let whole = parse_digits(whole).ok_or_else(too_large)?;
    let fraction = parse_digits(&format!("{:0<width$}", fraction, width = decimals as usize)).ok_or_else(too_large)?;

    whole
        .checked_mul(scale)
        .and_then(|units| units.checked_add(fraction))
        .ok_or_else(too_large)
}

/// Parse a run of ASCII digits; empty is zero, `None` on overflow.
fn parse_digits(digits: &str) -> Option<U256> {
    if digits.is_empty() {
        return Some(U256::zero());
    }
    U256::from_dec_str(digits).ok()
}

/// Convert an amount in the smallest integer unit into a decimal display string.
///
/// Trailing fractional zeros are dropped, so `parse_amount` and `format_amount`
/// round-trip canonical decimals to the same text.
pub fn format_amount(amount: U256, decimals: u32) -> Result<String, GatewayError> {
    let formatted = format_units(amount, decimals).map_err(|e| GatewayError::InvalidAmount(e.to_string()))?;

    if !formatted.contains('.') {
        return Ok(formatted);
    }
    Ok(formatted.trim_end_matches('0').trim_end_matches('.').to_string())
}

pub fn parse_ether(amount: &str) -> Result<U256, GatewayError> {
    parse_amount(amount, ETHER_DECIMALS)
}

pub fn format_ether(amount: U256) -> Result<String, GatewayError> {
    format_amount(amount, ETHER_DECIMALS)
}
