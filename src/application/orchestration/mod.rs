//! Leverage orchestration.
//!
//! Drives a lending ledger through open, close and market-switch flows, each
//! completed inside the ledger's own synchronous callback.
//!
//! # Architecture
//!
//! A top-level call moves through these states; any failure aborts the whole
//! unit of execution and the sender slot is released on the way out:
//!
//! ```text
//! Idle ─► Entered ─► LedgerCallPending ─► CallbackExecuting{Open|Close|Switch}
//!                                                    │
//!  Idle ◄── Swept ◄── LedgerCallResuming ◄───────────┘
//! ```
//!
//! # Modules
//!
//! - [`orchestrator`]: Entry points (`open_leverage`, `close_leverage`, `switch_market`)
//! - [`context`]: Sender slot and its scoped guard
//! - [`policy`]: Swap adapter admission
//! - `dispatch`: Ledger callback authentication, decoding and routing
//! - `flow`: Open, close and switch sub-flows
//! - [`sweep`]: Residual balance return

pub mod context;
mod dispatch;
mod flow;
pub mod orchestrator;
pub mod policy;
pub mod sweep;

pub use context::{ActiveCall, CallbackKind, SenderContext, SenderGuard};
pub use orchestrator::PositionOrchestrator;
pub use policy::AdapterPolicy;
pub use sweep::Swept;
