//! ICO error types

use coinlab_core::{Address, LedgerError};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IcoError {
    #[error("ICO: cannot buy after end of ico")]
    SaleClosed,

    #[error("ICO: owner cannot buy his token")]
    OwnerCannotBuy,

    #[error("ICO: offer less than amount sent")]
    OfferExceeded,

    #[error("ICO: reserved too owner of erc20")]
    NotSaleOwner,

    #[error("ICO: cannot {action} before end of ico")]
    SaleStillOpen { action: &'static str },

    #[error("ICO: nothing to claim")]
    NothingToClaim,

    #[error("ICO: nothing to withdraw")]
    NothingToWithdraw,

    #[error("ICO: price must be positive")]
    InvalidPrice,

    #[error("ICO: amount overflow")]
    Overflow,

    #[error("ICO: sale of {expected}, called with {actual}")]
    WrongLedger { expected: Address, actual: Address },

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

pub type Result<T> = std::result::Result<T, IcoError>;
