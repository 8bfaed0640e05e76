//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports define the seams between the orchestrator and the systems it drives
//! or is driven by. Every port is synchronous: a ledger callback re-enters the
//! orchestrator on the same call stack, so nothing here may suspend.
//!
//! # Architecture
//!
//! ```text
//!                    ┌─────────────────────────┐
//!       callbacks    │      Application        │
//!     ──────────────►│  PositionOrchestrator   ├──────────────┐
//!     │              │                         │              │
//!     │              └─────────────────────────┘              │
//!     │                         │                             │
//!     │                         ▼                             ▼
//! ┌─────────┐            ┌─────────────┐              ┌───────────┐
//! │ Lending │◄───────────│   Token     │              │   Swap    │
//! │ Ledger  │            │   Ledger    │              │  Adapter  │
//! └─────────┘            └─────────────┘              └───────────┘
//! ```
//!
//! # Available Ports
//!
//! - [`inbound::LedgerCallbacks`] - Re-entry surface the ledger invokes mid-operation
//! - [`outbound::LendingLedger`] - Collateral, borrow, withdraw and repay operations
//! - [`outbound::TokenLedger`] - Balances, transfers and additive allowances
//! - [`outbound::SwapAdapter`], [`outbound::AdapterResolver`] - Untrusted swap execution

pub mod inbound;
pub mod outbound;
