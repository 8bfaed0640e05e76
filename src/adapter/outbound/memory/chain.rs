//! All-or-nothing execution over the in-memory collaborators.

use std::sync::Arc;

use alloy_primitives::Address;
use tracing::debug;

use super::ledger::{InMemoryLedger, LedgerSnapshot};
use super::registry::AdapterRegistry;
use super::token::{InMemoryTokens, TokenSnapshot};
use crate::application::orchestration::PositionOrchestrator;
use crate::error::Result;

/// Token book, lending ledger and adapter registry sharing one unit of
/// execution.
///
/// [`atomic`](Self::atomic) plays the role of a transaction: a failing call
/// leaves balances and positions exactly as they were before it started.
pub struct InMemoryChain {
    tokens: Arc<InMemoryTokens>,
    ledger: Arc<InMemoryLedger>,
    adapters: Arc<AdapterRegistry>,
}

/// Joint copy of the token book and the ledger.
#[derive(Debug, Clone)]
pub struct ChainSnapshot {
    tokens: TokenSnapshot,
    ledger: LedgerSnapshot,
}

impl InMemoryChain {
    /// Empty chain with the lending ledger deployed at `ledger`.
    #[must_use]
    pub fn new(ledger: Address) -> Self {
        let tokens = Arc::new(InMemoryTokens::new());
        let ledger = Arc::new(InMemoryLedger::new(ledger, tokens.clone()));
        Self {
            tokens,
            ledger,
            adapters: Arc::new(AdapterRegistry::new()),
        }
    }

    #[must_use]
    pub fn tokens(&self) -> &Arc<InMemoryTokens> {
        &self.tokens
    }

    #[must_use]
    pub fn ledger(&self) -> &Arc<InMemoryLedger> {
        &self.ledger
    }

    #[must_use]
    pub fn adapters(&self) -> &Arc<AdapterRegistry> {
        &self.adapters
    }

    /// Orchestrator deployed at `address` against this chain's collaborators.
    #[must_use]
    pub fn orchestrator(&self, address: Address) -> PositionOrchestrator {
        PositionOrchestrator::new(
            address,
            self.ledger.clone(),
            self.tokens.clone(),
            self.adapters.clone(),
        )
    }

    #[must_use]
    pub fn snapshot(&self) -> ChainSnapshot {
        ChainSnapshot {
            tokens: self.tokens.snapshot(),
            ledger: self.ledger.snapshot(),
        }
    }

    pub fn restore(&self, snapshot: ChainSnapshot) {
        self.tokens.restore(snapshot.tokens);
        self.ledger.restore(snapshot.ledger);
    }

    /// Run `f`, undoing every state change it made if it fails.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `f`.
    pub fn atomic<T>(&self, f: impl FnOnce() -> Result<T>) -> Result<T> {
        let snapshot = self.snapshot();
        f().inspect_err(|e| {
            debug!(error = %e, "Reverting unit of execution");
            self.restore(snapshot);
        })
    }
}
