//! Sale contract
//!
//! The sale never holds an inventory counter of its own: what is left to sell
//! is whatever allowance the token owner still grants the sale on the ledger.
//! Every purchase spends that allowance through `transfer_from`.
//!
//! Open/closed is derived from the caller-supplied time on every call; there
//! is no transition event.

use coinlab_core::{Address, Amount, Ledger, NativeBalances, Receipt, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::error::{IcoError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Accepting purchases
    Open,
    /// Past the end time: withdraw and claim only
    Closed,
}

/// Construction parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleParams {
    /// Ledger of the token being sold
    pub erc20: Address,
    /// Token cap, mirrored by the owner's approval
    pub offer: Amount,
    /// Payment units per token unit
    pub price: Amount,
    pub duration_secs: u64,
    /// Hold bought tokens in the sale until claimed
    pub locked: bool,
    /// Seller of the tokens; the deployer when unset
    #[serde(default)]
    pub token_owner: Option<Address>,
}

impl SaleParams {
    pub fn new(erc20: Address, offer: Amount, price: Amount, duration_secs: u64, locked: bool) -> Self {
        Self {
            erc20,
            offer,
            price,
            duration_secs,
            locked,
            token_owner: None,
        }
    }

    pub fn with_token_owner(mut self, token_owner: Address) -> Self {
        self.token_owner = Some(token_owner);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum IcoEvent {
    Bought { buyer: Address, amount: Amount },
    Withdrew { owner: Address, amount: Amount },
    Claimed { buyer: Address, amount: Amount },
}

/// Receipt of a sale call; the output is the token (buy, claim) or payment (withdraw) amount.
pub type IcoReceipt = Receipt<Amount, IcoEvent>;

#[derive(Debug, Clone)]
pub struct Ico {
    address: Address,
    erc20: Address,
    erc20_owner: Address,
    owner: Address,
    offer: Amount,
    price: Amount,
    end_time: Timestamp,
    locked: bool,
    collected: Amount,
    escrow: HashMap<Address, Amount>,
}

impl Ico {
    /// Deploy at `address` by `deployer` at time `now`.
    ///
    /// The token owner still has to approve the sale for the offer before
    /// anything can be bought.
    pub fn deploy(address: Address, deployer: Address, params: SaleParams, now: Timestamp) -> Result<Self> {
        if params.price == 0 {
            return Err(IcoError::InvalidPrice);
        }
        let end_time = now
            .checked_add(params.duration_secs)
            .ok_or(IcoError::Overflow)?;
        let erc20_owner = params.token_owner.unwrap_or(deployer);

        info!(
            sale = %address,
            erc20 = %params.erc20,
            owner = %deployer,
            offer = params.offer,
            price = params.price,
            end_time,
            locked = params.locked,
            "sale deployed"
        );

        Ok(Self {
            address,
            erc20: params.erc20,
            erc20_owner,
            owner: deployer,
            offer: params.offer,
            price: params.price,
            end_time,
            locked: params.locked,
            collected: 0,
            escrow: HashMap::new(),
        })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn erc20(&self) -> Address {
        self.erc20
    }

    /// Account whose tokens are sold
    pub fn erc20_owner(&self) -> Address {
        self.erc20_owner
    }

    /// Deployer, the only account allowed to withdraw
    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn offer(&self) -> Amount {
        self.offer
    }

    pub fn price(&self) -> Amount {
        self.price
    }

    pub fn end_time(&self) -> Timestamp {
        self.end_time
    }

    pub fn locked(&self) -> bool {
        self.locked
    }

    /// Payment collected and not yet withdrawn
    pub fn balance(&self) -> Amount {
        self.collected
    }

    /// Tokens `buyer` can claim once the sale has ended
    pub fn escrowed(&self, buyer: &Address) -> Amount {
        self.escrow.get(buyer).copied().unwrap_or(0)
    }

    pub fn total_escrowed(&self) -> Amount {
        self.escrow.values().sum()
    }

    pub fn phase(&self, now: Timestamp) -> Phase {
        if now < self.end_time {
            Phase::Open
        } else {
            Phase::Closed
        }
    }

    /// Tokens a payment buys, rounded down
    pub fn token_amount(&self, payment: Amount) -> Amount {
        payment / self.price
    }

    /// Tokens still for sale: the owner's remaining allowance to the sale
    pub fn remaining_offer<L: Ledger>(&self, ledger: &L) -> Amount {
        ledger.allowance(&self.erc20_owner, &self.address)
    }

    /// Pay `payment` native units for `payment / price` tokens.
    pub fn buy<L: Ledger>(
        &mut self,
        ledger: &mut L,
        native: &mut NativeBalances,
        buyer: Address,
        payment: Amount,
        now: Timestamp,
    ) -> Result<IcoReceipt> {
        self.try_buy(ledger, native, buyer, payment, now)
            .inspect_err(|e| warn!(sale = %self.address, buyer = %buyer, payment, error = %e, "buy rejected"))
    }

    fn try_buy<L: Ledger>(
        &mut self,
        ledger: &mut L,
        native: &mut NativeBalances,
        buyer: Address,
        payment: Amount,
        now: Timestamp,
    ) -> Result<IcoReceipt> {
        self.check_ledger(ledger)?;

        if self.phase(now) == Phase::Closed {
            return Err(IcoError::SaleClosed);
        }
        if buyer == self.erc20_owner {
            return Err(IcoError::OwnerCannotBuy);
        }

        let tokens = self.token_amount(payment);
        if tokens > self.remaining_offer(ledger) {
            return Err(IcoError::OfferExceeded);
        }

        let collected = self
            .collected
            .checked_add(payment)
            .ok_or(IcoError::Overflow)?;
        let escrowed = if self.locked {
            Some(
                self.escrowed(&buyer)
                    .checked_add(tokens)
                    .ok_or(IcoError::Overflow)?,
            )
        } else {
            None
        };
        native.check_transfer(&buyer, &self.address, payment)?;

        // The ledger call is the first mutation; everything after it is pre-checked.
        let destination = if self.locked { self.address } else { buyer };
        ledger.transfer_from(self.address, self.erc20_owner, destination, tokens)?;
        native.transfer(buyer, self.address, payment)?;

        self.collected = collected;
        if let Some(escrowed) = escrowed {
            self.escrow.insert(buyer, escrowed);
        }

        debug!(sale = %self.address, buyer = %buyer, payment, tokens, "bought");
        Ok(Receipt::new(
            tokens,
            vec![IcoEvent::Bought {
                buyer,
                amount: payment,
            }],
            ledger.drain_events(),
        ))
    }

    /// Send the whole collected payment to the sale owner.
    pub fn withdraw(
        &mut self,
        native: &mut NativeBalances,
        caller: Address,
        now: Timestamp,
    ) -> Result<IcoReceipt> {
        self.try_withdraw(native, caller, now)
            .inspect_err(|e| warn!(sale = %self.address, caller = %caller, error = %e, "withdraw rejected"))
    }

    fn try_withdraw(
        &mut self,
        native: &mut NativeBalances,
        caller: Address,
        now: Timestamp,
    ) -> Result<IcoReceipt> {
        if caller != self.owner {
            return Err(IcoError::NotSaleOwner);
        }
        if self.phase(now) == Phase::Open {
            return Err(IcoError::SaleStillOpen { action: "withdraw" });
        }
        if self.collected == 0 {
            return Err(IcoError::NothingToWithdraw);
        }

        let amount = self.collected;
        native.transfer(self.address, caller, amount)?;
        self.collected = 0;

        info!(sale = %self.address, owner = %caller, amount, "withdrew");
        Ok(Receipt::new(
            amount,
            vec![IcoEvent::Withdrew {
                owner: caller,
                amount,
            }],
            Vec::new(),
        ))
    }

    /// Release the caller's escrowed tokens.
    pub fn claim<L: Ledger>(
        &mut self,
        ledger: &mut L,
        caller: Address,
        now: Timestamp,
    ) -> Result<IcoReceipt> {
        self.try_claim(ledger, caller, now)
            .inspect_err(|e| warn!(sale = %self.address, caller = %caller, error = %e, "claim rejected"))
    }

    fn try_claim<L: Ledger>(
        &mut self,
        ledger: &mut L,
        caller: Address,
        now: Timestamp,
    ) -> Result<IcoReceipt> {
        self.check_ledger(ledger)?;
        if self.phase(now) == Phase::Open {
            return Err(IcoError::SaleStillOpen { action: "claim" });
        }

        let amount = self.escrowed(&caller);
        if amount == 0 {
            return Err(IcoError::NothingToClaim);
        }

        ledger.transfer(self.address, caller, amount)?;
        self.escrow.remove(&caller);

        debug!(sale = %self.address, buyer = %caller, amount, "claimed");
        Ok(Receipt::new(
            amount,
            vec![IcoEvent::Claimed {
                buyer: caller,
                amount,
            }],
            ledger.drain_events(),
        ))
    }

    fn check_ledger<L: Ledger>(&self, ledger: &L) -> Result<()> {
        if ledger.address() != self.erc20 {
            return Err(IcoError::WrongLedger {
                expected: self.erc20,
                actual: ledger.address(),
            });
        }
        Ok(())
    }
}
