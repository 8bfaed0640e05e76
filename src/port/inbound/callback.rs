//! Ledger callback port.

use alloy_primitives::{Address, U256};

use crate::error::Result;

/// Callbacks a lending ledger invokes synchronously before finishing an
/// operation whose caller attached a non-empty continuation.
///
/// The ledger passes its own address as `caller`; implementations must reject
/// any other caller, since anyone can invoke these methods directly.
///
/// `caller` is self-declared, so matching it against the ledger address only
/// filters honest mistakes. Implementations must also admit a callback only
/// while they have a ledger call of their own outstanding, once per call.
/// [`PositionOrchestrator`](crate::application::orchestration::PositionOrchestrator)
/// does this through its [`SenderContext`](crate::application::orchestration::SenderContext).
///
/// # Errors
///
/// An error aborts the ledger operation that issued the callback, and with it
/// the whole unit of execution.
pub trait LedgerCallbacks: Send + Sync {
    /// Invoked after collateral is credited and before it is pulled from the
    /// caller. `assets` is the amount the ledger is about to transfer in.
    fn on_supply_collateral(&self, caller: Address, assets: U256, data: &[u8]) -> Result<()>;

    /// Invoked after debt is reduced and before the repayment is pulled from
    /// the caller. `assets` is the amount the ledger is about to transfer in.
    fn on_repay(&self, caller: Address, assets: U256, data: &[u8]) -> Result<()>;
}
