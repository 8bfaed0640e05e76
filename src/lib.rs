//! Leverage orchestrator - callback-driven leveraged positions on a lending ledger.
//!
//! An account opens, partially closes or migrates a leveraged position in a
//! single ledger call. The orchestrator hands the ledger an encoded
//! continuation, the ledger calls back synchronously in the middle of the
//! operation, and the orchestrator finishes the work (borrow, swap, withdraw,
//! re-supply) before the ledger settles.
//!
//! # Architecture
//!
//! - **`domain`** - Market descriptors, positions and continuation payloads
//! - **`port`** - Traits for the ledger, asset transfers, swap adapters and
//!   the callbacks the ledger invokes
//! - **`application::orchestration`** - `PositionOrchestrator`, the sender
//!   slot guarding reentrancy, callback dispatch and balance sweeps
//! - **`adapter`** - The `leverctl` CLI and in-memory collaborators
//! - **`infrastructure`** - Configuration and logging
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use alloy_primitives::Address;
//! use leverage_orchestrator::adapter::outbound::memory::InMemoryChain;
//!
//! let chain = InMemoryChain::new(Address::repeat_byte(0xbb));
//! let orchestrator = Arc::new(chain.orchestrator(Address::repeat_byte(0x0c)));
//! assert!(orchestrator.sender().current().is_none());
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
