//! Call receipts

use serde::{Deserialize, Serialize};

use crate::ledger::LedgerEvent;

/// Outcome of a successful contract call: its return value plus every event
/// the contract and the token ledger emitted during the call, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt<T, E> {
    pub output: T,
    pub events: Vec<E>,
    pub ledger_events: Vec<LedgerEvent>,
}

impl<T, E> Receipt<T, E> {
    pub fn new(output: T, events: Vec<E>, ledger_events: Vec<LedgerEvent>) -> Self {
        Self {
            output,
            events,
            ledger_events,
        }
    }

    /// Whether the ledger emitted `event` during the call.
    pub fn has_ledger_event(&self, event: &LedgerEvent) -> bool {
        self.ledger_events.contains(event)
    }
}

impl<T, E: PartialEq> Receipt<T, E> {
    /// Whether the contract emitted `event` during the call.
    pub fn has_event(&self, event: &E) -> bool {
        self.events.contains(event)
    }
}
