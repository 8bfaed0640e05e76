//! Swap adapter port.
//!
//! A swap adapter is arbitrary caller-named code. The orchestrator hands it an
//! allowance and an opaque instruction and assumes nothing about its honesty;
//! the only guarantee relied on is that a failure aborts the whole flow.

use std::sync::Arc;

use alloy_primitives::Address;

use crate::error::Result;

/// Executable swap venue.
pub trait SwapAdapter: Send + Sync {
    /// Run `instruction` on behalf of `caller`.
    ///
    /// # Errors
    ///
    /// Any error aborts the enclosing unit of execution.
    fn execute(&self, caller: Address, instruction: &[u8]) -> Result<()>;
}

/// Resolves an adapter address to something executable.
pub trait AdapterResolver: Send + Sync {
    /// The adapter deployed at `address`, if any.
    fn resolve(&self, address: Address) -> Option<Arc<dyn SwapAdapter>>;
}
