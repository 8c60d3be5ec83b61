//! Arithmetic operations
//!
//! Integer semantics follow a checked signed VM: division truncates toward
//! zero, the remainder takes the sign of the dividend, and any result that
//! does not fit the operand type is an error rather than a wrap.

use coinlab_core::Operand;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CalculatorError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    Addition,
    Subtraction,
    Multiplication,
    Division,
    Modulus,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Operation::Addition,
        Operation::Subtraction,
        Operation::Multiplication,
        Operation::Division,
        Operation::Modulus,
    ];

    /// Name carried by the `Calculated` event
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Addition => "Addition",
            Operation::Subtraction => "Subtraction",
            Operation::Multiplication => "Multiplication",
            Operation::Division => "Division",
            Operation::Modulus => "Modulus",
        }
    }

    pub fn apply(&self, a: Operand, b: Operand) -> Result<Operand> {
        match self {
            Operation::Addition => a.checked_add(b).ok_or(CalculatorError::ArithmeticOverflow),
            Operation::Subtraction => a.checked_sub(b).ok_or(CalculatorError::ArithmeticOverflow),
            Operation::Multiplication => {
                a.checked_mul(b).ok_or(CalculatorError::ArithmeticOverflow)
            }
            Operation::Division => {
                if b == 0 {
                    return Err(CalculatorError::DivideByZero);
                }
                // Only MIN / -1 overflows here.
                a.checked_div(b).ok_or(CalculatorError::ArithmeticOverflow)
            }
            Operation::Modulus => {
                if b == 0 {
                    return Err(CalculatorError::ModuloByZero);
                }
                // MIN % -1 is 0, not an overflow.
                Ok(a.wrapping_rem(b))
            }
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = String;

    /// Accepts the event name or the short call name (`add`, `sub`, `mul`, `div`, `mod`).
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "addition" | "add" => Ok(Operation::Addition),
            "subtraction" | "sub" => Ok(Operation::Subtraction),
            "multiplication" | "mul" => Ok(Operation::Multiplication),
            "division" | "div" => Ok(Operation::Division),
            "modulus" | "mod" => Ok(Operation::Modulus),
            other => Err(format!("Unknown operation: {}", other)),
        }
    }
}
