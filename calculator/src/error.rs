//! Calculator error types
//!
//! The messages are the revert reasons callers see.

use coinlab_core::{Address, LedgerError, LedgerEvent};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalculatorError {
    #[error("Calculator: you need to approve this smart contract for at least 1 token before using it")]
    InsufficientApproval,

    #[error("Calculator: you do not have enough token to use this function")]
    InsufficientBalance,

    #[error("Calculator: can not divide by zero")]
    DivideByZero,

    #[error("Calculator: can not modulus by zero")]
    ModuloByZero,

    #[error("Calculator: arithmetic overflow")]
    ArithmeticOverflow,

    #[error("Calculator: bound to token {expected}, called with {actual}")]
    WrongLedger { expected: Address, actual: Address },

    /// The fee was paid before `error` occurred; `ledger_events` records that payment.
    #[error("{error}")]
    Charged {
        error: Box<CalculatorError>,
        ledger_events: Vec<LedgerEvent>,
    },

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl CalculatorError {
    /// The underlying failure, looking through [`CalculatorError::Charged`].
    pub fn reason(&self) -> &CalculatorError {
        match self {
            CalculatorError::Charged { error, .. } => error.reason(),
            other => other,
        }
    }

    /// Ledger events committed by the failed call (the fee, if it was paid).
    pub fn ledger_events(&self) -> &[LedgerEvent] {
        match self {
            CalculatorError::Charged { ledger_events, .. } => ledger_events,
            _ => &[],
        }
    }
}

pub type Result<T> = std::result::Result<T, CalculatorError>;
