//! Serial call executor
//!
//! Wraps the whole world state behind a single async mutex. Each call runs to
//! completion (all of its mutations and emitted events) before the next one
//! is admitted, so concurrent submitters are applied one after another.
//!
//! A failed call is either *rejected* (nothing changed) or *charged*: it
//! committed part of its effects before failing, as a calculator fee does.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::LedgerError;

/// Error returned by a call run through [`Chain::execute`]
pub trait CallError: fmt::Display {
    /// Whether the call committed state changes before failing.
    fn committed(&self) -> bool {
        false
    }
}

impl CallError for LedgerError {}

#[derive(Debug)]
pub struct Chain<S> {
    state: Arc<Mutex<S>>,
    applied: Arc<AtomicU64>,
    rejected: Arc<AtomicU64>,
    charged: Arc<AtomicU64>,
}

impl<S> Clone for Chain<S> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            applied: Arc::clone(&self.applied),
            rejected: Arc::clone(&self.rejected),
            charged: Arc::clone(&self.charged),
        }
    }
}

impl<S> Chain<S> {
    pub fn new(state: S) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
            applied: Arc::new(AtomicU64::new(0)),
            rejected: Arc::new(AtomicU64::new(0)),
            charged: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Run `call` with exclusive access to the state.
    ///
    /// `call` is synchronous: it cannot yield while it holds the state.
    pub async fn execute<R, E, F>(&self, name: &str, call: F) -> Result<R, E>
    where
        F: FnOnce(&mut S) -> Result<R, E>,
        E: CallError,
    {
        let mut state = self.state.lock().await;
        match call(&mut *state) {
            Ok(output) => {
                let seq = self.applied.fetch_add(1, Ordering::SeqCst) + 1;
                debug!(call = name, seq, "call applied");
                Ok(output)
            }
            Err(e) if e.committed() => {
                self.charged.fetch_add(1, Ordering::SeqCst);
                warn!(call = name, error = %e, "call failed after committing changes");
                Err(e)
            }
            Err(e) => {
                self.rejected.fetch_add(1, Ordering::SeqCst);
                warn!(call = name, error = %e, "call rejected");
                Err(e)
            }
        }
    }

    /// Read-only access to the state.
    pub async fn view<R, F>(&self, read: F) -> R
    where
        F: FnOnce(&S) -> R,
    {
        let state = self.state.lock().await;
        read(&*state)
    }

    /// Number of calls that succeeded
    pub fn applied(&self) -> u64 {
        self.applied.load(Ordering::SeqCst)
    }

    /// Number of calls that failed without changing anything
    pub fn rejected(&self) -> u64 {
        self.rejected.load(Ordering::SeqCst)
    }

    /// Number of calls that failed after committing some changes
    pub fn charged(&self) -> u64 {
        self.charged.load(Ordering::SeqCst)
    }
}
