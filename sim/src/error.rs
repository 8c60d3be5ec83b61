//! Simulation error types

use coinlab_calculator::CalculatorError;
use coinlab_core::{CallError, ConfigError, LedgerError};
use coinlab_ico::IcoError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("No calculator deployed")]
    NoCalculator,

    #[error("No sale deployed")]
    NoSale,

    #[error(transparent)]
    Calculator(#[from] CalculatorError),

    #[error(transparent)]
    Ico(#[from] IcoError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl CallError for SimError {
    /// Only a calculator call that failed after taking its fee leaves changes behind.
    fn committed(&self) -> bool {
        matches!(self, SimError::Calculator(CalculatorError::Charged { .. }))
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
