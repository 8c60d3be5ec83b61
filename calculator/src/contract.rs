//! Calculator contract

use coinlab_core::{Address, Amount, Ledger, Operand, Receipt};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{CalculatorError, Result};
use crate::operation::Operation;
use crate::DEFAULT_FEE;

/// Emitted once per successful operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationRecord {
    pub operation: Operation,
    pub caller: Address,
    pub a: Operand,
    pub b: Operand,
    pub result: Operand,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum CalculatorEvent {
    Calculated(CalculationRecord),
}

pub type CalculatorReceipt = Receipt<Operand, CalculatorEvent>;

/// Fee-gated calculator.
///
/// Holds no mutable state: the only thing a call changes is the token ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calculator {
    address: Address,
    token: Address,
    owner: Address,
    price: Amount,
}

impl Calculator {
    /// Deploy at `address`, charging [`DEFAULT_FEE`] of `token` per call to `owner`.
    pub fn deploy(address: Address, token: Address, owner: Address) -> Self {
        Self::with_fee(address, token, owner, DEFAULT_FEE)
    }

    pub fn with_fee(address: Address, token: Address, owner: Address, fee: Amount) -> Self {
        debug!(calculator = %address, token = %token, owner = %owner, fee, "calculator deployed");
        Self {
            address,
            token,
            owner,
            price: fee,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Ledger the fee is paid in
    pub fn token(&self) -> Address {
        self.token
    }

    /// Beneficiary of every fee
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Fee per operation
    pub fn price(&self) -> Amount {
        self.price
    }

    /// Charge the fee, then compute `a <op> b`.
    ///
    /// Approval and balance are checked before anything moves. Once the fee
    /// has been paid it stays paid, even if the arithmetic then fails; that
    /// failure comes back as [`CalculatorError::Charged`] carrying the fee's
    /// ledger events.
    pub fn perform<L: Ledger>(
        &self,
        ledger: &mut L,
        caller: Address,
        operation: Operation,
        a: Operand,
        b: Operand,
    ) -> Result<CalculatorReceipt> {
        if ledger.address() != self.token {
            return Err(CalculatorError::WrongLedger {
                expected: self.token,
                actual: ledger.address(),
            });
        }

        if let Err(e) = self.charge(ledger, caller) {
            warn!(caller = %caller, op = %operation, error = %e, "fee not paid");
            return Err(e);
        }

        let result = match operation.apply(a, b) {
            Ok(result) => result,
            Err(e) => {
                warn!(caller = %caller, op = %operation, a, b, error = %e, "operation failed after fee");
                return Err(CalculatorError::Charged {
                    error: Box::new(e),
                    ledger_events: ledger.drain_events(),
                });
            }
        };

        let record = CalculationRecord {
            operation,
            caller,
            a,
            b,
            result,
        };
        debug!(caller = %caller, op = %operation, a, b, result, "calculated");

        Ok(Receipt::new(
            result,
            vec![CalculatorEvent::Calculated(record)],
            ledger.drain_events(),
        ))
    }

    pub fn add<L: Ledger>(
        &self,
        ledger: &mut L,
        caller: Address,
        a: Operand,
        b: Operand,
    ) -> Result<CalculatorReceipt> {
        self.perform(ledger, caller, Operation::Addition, a, b)
    }

    pub fn sub<L: Ledger>(
        &self,
        ledger: &mut L,
        caller: Address,
        a: Operand,
        b: Operand,
    ) -> Result<CalculatorReceipt> {
        self.perform(ledger, caller, Operation::Subtraction, a, b)
    }

    pub fn mul<L: Ledger>(
        &self,
        ledger: &mut L,
        caller: Address,
        a: Operand,
        b: Operand,
    ) -> Result<CalculatorReceipt> {
        self.perform(ledger, caller, Operation::Multiplication, a, b)
    }

    pub fn div<L: Ledger>(
        &self,
        ledger: &mut L,
        caller: Address,
        a: Operand,
        b: Operand,
    ) -> Result<CalculatorReceipt> {
        self.perform(ledger, caller, Operation::Division, a, b)
    }

    pub fn modulo<L: Ledger>(
        &self,
        ledger: &mut L,
        caller: Address,
        a: Operand,
        b: Operand,
    ) -> Result<CalculatorReceipt> {
        self.perform(ledger, caller, Operation::Modulus, a, b)
    }

    fn charge<L: Ledger>(&self, ledger: &mut L, caller: Address) -> Result<()> {
        if ledger.allowance(&caller, &self.address) < self.price {
            return Err(CalculatorError::InsufficientApproval);
        }
        if ledger.balance_of(&caller) < self.price {
            return Err(CalculatorError::InsufficientBalance);
        }

        ledger.transfer_from(self.address, caller, self.owner, self.price)?;
        Ok(())
    }
}
