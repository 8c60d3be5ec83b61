//! Native currency balances
//!
//! The chain's own coin, used to pay for sale purchases. Unlike the token
//! ledger there are no allowances: only the holder can move its funds.

use std::collections::HashMap;
use tracing::debug;

use crate::address::Address;
use crate::error::{LedgerError, Result};
use crate::units::Amount;

#[derive(Debug, Clone, Default)]
pub struct NativeBalances {
    balances: HashMap<Address, Amount>,
}

impl NativeBalances {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_of(&self, account: &Address) -> Amount {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Sum of every account's balance
    pub fn total(&self) -> Amount {
        self.balances.values().sum()
    }

    /// Fund an account out of thin air (genesis allocation, faucet).
    pub fn credit(&mut self, account: Address, amount: Amount) -> Result<()> {
        let balance = self
            .balance_of(&account)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        self.balances.insert(account, balance);
        Ok(())
    }

    /// Validate a transfer without applying it.
    pub fn check_transfer(&self, from: &Address, to: &Address, amount: Amount) -> Result<()> {
        let available = self.balance_of(from);
        if available < amount {
            return Err(LedgerError::InsufficientFunds {
                required: amount,
                available,
            });
        }
        if from != to {
            self.balance_of(to)
                .checked_add(amount)
                .ok_or(LedgerError::Overflow)?;
        }
        Ok(())
    }

    pub fn transfer(&mut self, from: Address, to: Address, amount: Amount) -> Result<()> {
        self.check_transfer(&from, &to, amount)?;
        if from != to {
            let from_balance = self.balance_of(&from) - amount;
            let to_balance = self.balance_of(&to) + amount;
            self.balances.insert(from, from_balance);
            self.balances.insert(to, to_balance);
        }

        debug!(from = %from, to = %to, amount, "native transfer");
        Ok(())
    }
}
