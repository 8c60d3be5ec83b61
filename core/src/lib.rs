//! COINLAB Core Library
//!
//! Shared building blocks for the in-memory contract simulation:
//! - Account addresses and currency units
//! - The ERC20-style token ledger and native-currency balances
//! - Clocks used to gate time-bound contracts
//! - A serial executor that applies one call at a time
//! - Deployment configuration

pub mod address;
pub mod chain;
pub mod clock;
pub mod config;
pub mod error;
pub mod ledger;
pub mod native;
pub mod receipt;
pub mod units;

pub use address::Address;
pub use chain::{CallError, Chain};
pub use clock::{Clock, ManualClock, SystemClock, Timestamp};
pub use config::{AccountConfig, CalculatorConfig, DeploymentConfig, SaleConfig, TokenConfig};
pub use error::{AddressError, ConfigError, LedgerError, Result, UnitsError};
pub use ledger::{Ledger, LedgerEvent, Token};
pub use native::NativeBalances;
pub use receipt::Receipt;
pub use units::{ether, format_ether, parse_ether, Amount, Operand, DECIMALS, WEI_PER_ETHER};
