//! Conversion between human-readable token amounts and integer base units
//!
//! All scaling is exact: amounts never pass through floating point.
//!
//! ```rust
//! use warp_bridge::{from_base_units, to_base_units};
//! use alloy_primitives::U256;
//!
//! let base = to_base_units("1.5", 6).unwrap();
//! assert_eq!(base, U256::from(1_500_000u64));
//! assert_eq!(from_base_units(base, 6).unwrap(), "1.5");
//! ```

use alloy_primitives::utils::{format_units, parse_units};
use alloy_primitives::U256;

use crate::error::{BridgeError, Result};

/// Decimals of every chain's native currency.
pub const NATIVE_DECIMALS: u8 = 18;

/// Unit in which a caller expresses a transfer amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AmountUnit {
    /// Decimal string scaled by the token's on-chain `decimals()`, e.g. `"1.5"`
    #[default]
    Human,
    /// Integer count of the token's smallest unit, e.g. `"1500000"`
    Base,
}

/// Scales a decimal numeral by `10^decimals`.
///
/// # Errors
///
/// Returns [`BridgeError::Conversion`] if `amount` is not a plain non-negative
/// decimal numeral, or has a non-zero digit beyond `decimals` fractional places.
pub fn to_base_units(amount: &str, decimals: u8) -> Result<U256> {
    let amount = amount.trim();
    let (integer, fraction) = split_numeral(amount)?;
    // Trailing zeros carry no value, "1.0000000" is exact at 6 decimals
    let fraction = fraction.trim_end_matches('0');

    if fraction.len() > decimals as usize {
        return Err(BridgeError::Conversion(format!(
            "'{amount}' has {} fractional digits but the token only has {decimals} decimals",
            fraction.len()
        )));
    }

    let normalized = match (integer.is_empty(), fraction.is_empty()) {
        (true, true) => "0".to_string(),
        (true, false) => format!("0.{fraction}"),
        (false, true) => integer.to_string(),
        (false, false) => format!("{integer}.{fraction}"),
    };

    parse_units(&normalized, decimals)
        .map(|parsed| parsed.get_absolute())
        .map_err(|e| BridgeError::Conversion(format!("'{amount}': {e}")))
}

/// Parses an amount that is already expressed in base units.
pub fn parse_base_units(amount: &str) -> Result<U256> {
    let amount = amount.trim();
    if amount.is_empty() || !amount.bytes().all(|b| b.is_ascii_digit()) {
        return Err(BridgeError::Conversion(format!(
            "'{amount}' is not an integer amount of base units"
        )));
    }

    U256::from_str_radix(amount, 10).map_err(|e| BridgeError::Conversion(format!("'{amount}': {e}")))
}

/// Formats a base-unit amount as a decimal string, keeping every significant digit.
///
/// Trailing zeros of the fractional part are dropped, so `1_000_000` with six
/// decimals formats as `"1"`.
pub fn from_base_units(amount: U256, decimals: u8) -> Result<String> {
    let formatted =
        format_units(amount, decimals).map_err(|e| BridgeError::Conversion(e.to_string()))?;

    if !formatted.contains('.') {
        return Ok(formatted);
    }

    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    Ok(trimmed.to_string())
}

/// Converts a caller-supplied amount to base units.
///
/// `decimals` is only consulted for [`AmountUnit::Human`], so callers can defer
/// the on-chain lookup until they know it is needed.
pub async fn amount_in_base_units<F, Fut>(amount: &str, unit: AmountUnit, decimals: F) -> Result<U256>
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = Result<u8>>,
{
    match unit {
        AmountUnit::Base => parse_base_units(amount),
        AmountUnit::Human => to_base_units(amount, decimals().await?),
    }
}

fn split_numeral(amount: &str) -> Result<(&str, &str)> {
    let (integer, fraction) = amount.split_once('.').unwrap_or((amount, ""));

    let digits_only = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (integer.is_empty() && fraction.is_empty()) || !digits_only(integer) || !digits_only(fraction)
    {
        return Err(BridgeError::Conversion(format!(
            "'{amount}' is not a valid decimal numeral"
        )));
    }

    Ok((integer, fraction))
}
