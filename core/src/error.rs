//! Core error types

use thiserror::Error;

use crate::units::Amount;

/// Token ledger and native balance errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("ERC20: transfer amount exceeds balance (required {required}, available {available})")]
    InsufficientBalance { required: Amount, available: Amount },

    #[error("ERC20: insufficient allowance (required {required}, available {available})")]
    InsufficientAllowance { required: Amount, available: Amount },

    #[error("ERC20: decreased allowance below zero")]
    AllowanceUnderflow,

    #[error("ERC20: transfer to the zero address")]
    ZeroAddress,

    #[error("Balance overflow")]
    Overflow,

    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: Amount, available: Amount },
}

pub type Result<T> = std::result::Result<T, LedgerError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("Invalid hex in address: {0}")]
    InvalidHex(String),

    #[error("Invalid address length: expected 20 bytes, got {0}")]
    InvalidLength(usize),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnitsError {
    #[error("Empty amount")]
    Empty,

    #[error("Invalid digit in amount: {0}")]
    InvalidDigit(String),

    #[error("Too many decimals: at most 18 allowed, got {0}")]
    TooManyDecimals(usize),

    #[error("Amount overflow: {0}")]
    Overflow(String),
}

/// Deployment configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid amount for {field}: {source}")]
    InvalidAmount {
        field: &'static str,
        #[source]
        source: UnitsError,
    },

    #[error("Invalid address for {field}: {source}")]
    InvalidAddress {
        field: &'static str,
        #[source]
        source: AddressError,
    },

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}
