//! COINLAB ICO
//!
//! Fixed-price token sale with a deadline:
//! - Buyers pay native currency while the sale is open
//! - Tokens come out of the token owner's allowance to the sale
//! - Locked sales hold the tokens until the buyer claims them after the end
//! - The sale owner withdraws the collected payment after the end

pub mod error;
pub mod sale;

pub use error::{IcoError, Result};
pub use sale::{Ico, IcoEvent, IcoReceipt, Phase, SaleParams};
