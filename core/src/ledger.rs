//! ERC20-style token ledger
//!
//! The [`Ledger`] trait is the only surface contracts use to move tokens.
//! [`Token`] is the in-memory implementation: balances, allowances and the
//! `Transfer`/`Approval` events every mutation emits.
//!
//! Every mutating method validates its preconditions before touching state,
//! so a rejected call leaves the ledger exactly as it was.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::address::Address;
use crate::error::{LedgerError, Result};
use crate::units::{Amount, DECIMALS};

/// Event emitted by the token ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum LedgerEvent {
    Transfer {
        from: Address,
        to: Address,
        value: Amount,
    },
    Approval {
        owner: Address,
        spender: Address,
        value: Amount,
    },
}

/// Balance/allowance store used by the contracts
pub trait Ledger {
    /// Address the ledger contract lives at
    fn address(&self) -> Address;

    fn total_supply(&self) -> Amount;

    fn balance_of(&self, account: &Address) -> Amount;

    fn allowance(&self, owner: &Address, spender: &Address) -> Amount;

    /// Move `amount` from `from` to `to`, `from` being the caller.
    fn transfer(&mut self, from: Address, to: Address, amount: Amount) -> Result<()>;

    /// Move `amount` from `from` to `to` on behalf of `spender`, spending its allowance.
    fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<()>;

    /// Set the allowance `owner` grants `spender`.
    fn approve(&mut self, owner: Address, spender: Address, amount: Amount) -> Result<()>;

    /// Events emitted since the previous drain, oldest first.
    fn drain_events(&mut self) -> Vec<LedgerEvent>;
}

/// In-memory ERC20 token
#[derive(Debug, Clone)]
pub struct Token {
    address: Address,
    name: String,
    symbol: String,
    total_supply: Amount,
    balances: HashMap<Address, Amount>,
    allowances: HashMap<(Address, Address), Amount>,
    events: Vec<LedgerEvent>,
}

impl Token {
    /// Deploy a token at `address`, minting `initial_supply` to `holder`.
    pub fn new(
        address: Address,
        name: impl Into<String>,
        symbol: impl Into<String>,
        holder: Address,
        initial_supply: Amount,
    ) -> Self {
        let mut token = Self {
            address,
            name: name.into(),
            symbol: symbol.into(),
            total_supply: initial_supply,
            balances: HashMap::new(),
            allowances: HashMap::new(),
            events: Vec::new(),
        };

        if initial_supply > 0 {
            token.balances.insert(holder, initial_supply);
        }
        token.events.push(LedgerEvent::Transfer {
            from: Address::ZERO,
            to: holder,
            value: initial_supply,
        });

        debug!(token = %address, holder = %holder, supply = initial_supply, "token deployed");
        token
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn decimals(&self) -> u8 {
        DECIMALS
    }

    /// Raise the allowance `owner` grants `spender` by `added`.
    pub fn increase_allowance(
        &mut self,
        owner: Address,
        spender: Address,
        added: Amount,
    ) -> Result<()> {
        let current = self.allowance(&owner, &spender);
        let updated = current.checked_add(added).ok_or(LedgerError::Overflow)?;
        self.approve(owner, spender, updated)
    }

    /// Lower the allowance `owner` grants `spender` by `subtracted`.
    pub fn decrease_allowance(
        &mut self,
        owner: Address,
        spender: Address,
        subtracted: Amount,
    ) -> Result<()> {
        let current = self.allowance(&owner, &spender);
        let updated = current
            .checked_sub(subtracted)
            .ok_or(LedgerError::AllowanceUnderflow)?;
        self.approve(owner, spender, updated)
    }

    fn check_transfer(&self, from: &Address, to: &Address, amount: Amount) -> Result<()> {
        if to.is_zero() {
            return Err(LedgerError::ZeroAddress);
        }

        let available = self.balance_of(from);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
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

    // Callers run check_transfer first.
    fn apply_transfer(&mut self, from: Address, to: Address, amount: Amount) {
        if from != to {
            let from_balance = self.balance_of(&from) - amount;
            let to_balance = self.balance_of(&to) + amount;
            self.balances.insert(from, from_balance);
            self.balances.insert(to, to_balance);
        }

        self.events.push(LedgerEvent::Transfer {
            from,
            to,
            value: amount,
        });
    }

    fn set_allowance(&mut self, owner: Address, spender: Address, amount: Amount) {
        self.allowances.insert((owner, spender), amount);
        self.events.push(LedgerEvent::Approval {
            owner,
            spender,
            value: amount,
        });
    }
}

impl Ledger for Token {
    fn address(&self) -> Address {
        self.address
    }

    fn total_supply(&self) -> Amount {
        self.total_supply
    }

    fn balance_of(&self, account: &Address) -> Amount {
        self.balances.get(account).copied().unwrap_or(0)
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or(0)
    }

    fn transfer(&mut self, from: Address, to: Address, amount: Amount) -> Result<()> {
        self.check_transfer(&from, &to, amount)?;
        self.apply_transfer(from, to, amount);

        debug!(from = %from, to = %to, amount, "transfer");
        Ok(())
    }

    fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<()> {
        let allowance = self.allowance(&from, &spender);
        if allowance < amount {
            return Err(LedgerError::InsufficientAllowance {
                required: amount,
                available: allowance,
            });
        }
        self.check_transfer(&from, &to, amount)?;

        self.apply_transfer(from, to, amount);
        // u128::MAX is an unlimited approval and is never spent down.
        if allowance != Amount::MAX {
            self.set_allowance(from, spender, allowance - amount);
        }

        debug!(spender = %spender, from = %from, to = %to, amount, "transfer_from");
        Ok(())
    }

    fn approve(&mut self, owner: Address, spender: Address, amount: Amount) -> Result<()> {
        if spender.is_zero() {
            return Err(LedgerError::ZeroAddress);
        }
        self.set_allowance(owner, spender, amount);

        debug!(owner = %owner, spender = %spender, amount, "approve");
        Ok(())
    }

    fn drain_events(&mut self) -> Vec<LedgerEvent> {
        std::mem::take(&mut self.events)
    }
}
