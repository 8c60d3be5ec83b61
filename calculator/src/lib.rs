//! COINLAB Calculator
//!
//! A token-gated calculator: every arithmetic operation costs a fixed fee in
//! tokens, paid from the caller to the calculator's owner through the
//! caller's allowance.
//!
//! Callers must `approve` the calculator for at least the fee before using it.

pub mod contract;
pub mod error;
pub mod operation;

pub use contract::{CalculationRecord, Calculator, CalculatorEvent, CalculatorReceipt};
pub use error::{CalculatorError, Result};
pub use operation::Operation;

/// Fee charged per operation unless configured otherwise (1 token)
pub const DEFAULT_FEE: coinlab_core::Amount = coinlab_core::WEI_PER_ETHER;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_fee_is_one_token() {
        assert_eq!(DEFAULT_FEE, coinlab_core::ether(1));
    }
}
