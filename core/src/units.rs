//! Currency units
//!
//! Token and native amounts are unsigned integers counted in the smallest
//! unit; one whole coin ("ether") is 10^18 units.

use crate::error::UnitsError;

/// Smallest-unit token or currency amount
pub type Amount = u128;

/// Signed calculator operand and result
pub type Operand = i128;

/// Decimal places of a whole coin
pub const DECIMALS: u8 = 18;

/// Units per whole coin (10^18)
pub const WEI_PER_ETHER: Amount = 1_000_000_000_000_000_000;

/// `whole` coins expressed in smallest units.
pub const fn ether(whole: u128) -> Amount {
    whole * WEI_PER_ETHER
}

/// Parse a decimal coin amount ("1", "0.25", "20.000001") into smallest units.
pub fn parse_ether(input: &str) -> Result<Amount, UnitsError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(UnitsError::Empty);
    }

    let (whole, fraction) = match input.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (input, ""),
    };

    if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return Err(UnitsError::InvalidDigit(input.to_string()));
    }
    if !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return Err(UnitsError::InvalidDigit(input.to_string()));
    }
    if fraction.len() > DECIMALS as usize {
        return Err(UnitsError::TooManyDecimals(fraction.len()));
    }

    let whole: u128 = whole
        .parse()
        .map_err(|_| UnitsError::Overflow(input.to_string()))?;
    let padded = format!("{:0<width$}", fraction, width = DECIMALS as usize);
    let fraction: u128 = padded
        .parse()
        .map_err(|_| UnitsError::InvalidDigit(input.to_string()))?;

    whole
        .checked_mul(WEI_PER_ETHER)
        .and_then(|units| units.checked_add(fraction))
        .ok_or_else(|| UnitsError::Overflow(input.to_string()))
}

/// Render smallest units as a decimal coin amount without trailing zeros.
pub fn format_ether(amount: Amount) -> String {
    let whole = amount / WEI_PER_ETHER;
    let fraction = amount % WEI_PER_ETHER;
    if fraction == 0 {
        return whole.to_string();
    }

    let digits = format!("{:018}", fraction);
    format!("{}.{}", whole, digits.trim_end_matches('0'))
}
