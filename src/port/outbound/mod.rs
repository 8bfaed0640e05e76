//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the external collaborators of a leverage flow:
//! the lending ledger, the asset transfer primitive and swap adapters.

pub mod ledger;
pub mod swap;
pub mod token;

pub use ledger::{Caller, LendingLedger};
pub use swap::{AdapterResolver, SwapAdapter};
pub use token::TokenLedger;
