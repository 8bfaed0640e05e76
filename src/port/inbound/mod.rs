//! Inbound (driving) ports implemented by the application.
//!
//! # Modules
//!
//! - [`callback`]: Callbacks a lending ledger invokes while one of its
//!   operations is still in progress

pub mod callback;

pub use callback::LedgerCallbacks;
