//! Lending ledger port.
//!
//! Defines the operations the orchestrator composes into leverage flows. The
//! ledger owns all position accounting and risk checks. Undoing the partial
//! effects of a failed operation is left to the host's unit of execution.

use std::fmt;

use alloy_primitives::{Address, U256};

use crate::domain::{MarketDescriptor, MarketId, Position};
use crate::error::Result;
use crate::port::inbound::LedgerCallbacks;

/// Identity of whoever is calling into the ledger.
///
/// Plain accounts carry only an address. Contracts that want to be called
/// back (the orchestrator) also expose their [`LedgerCallbacks`].
#[derive(Clone, Copy)]
pub struct Caller<'a> {
    address: Address,
    callbacks: Option<&'a dyn LedgerCallbacks>,
}

impl<'a> Caller<'a> {
    /// A caller that cannot receive callbacks.
    #[must_use]
    pub const fn account(address: Address) -> Self {
        Self {
            address,
            callbacks: None,
        }
    }

    /// A caller the ledger may re-enter through `callbacks`.
    #[must_use]
    pub fn contract(address: Address, callbacks: &'a dyn LedgerCallbacks) -> Self {
        Self {
            address,
            callbacks: Some(callbacks),
        }
    }

    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    #[must_use]
    pub fn callbacks(&self) -> Option<&'a dyn LedgerCallbacks> {
        self.callbacks
    }
}

impl fmt::Debug for Caller<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Caller")
            .field("address", &self.address)
            .field("callbacks", &self.callbacks.is_some())
            .finish()
    }
}

/// Port for a callback-capable lending ledger.
///
/// # Callbacks
///
/// [`supply_collateral`](Self::supply_collateral) and [`repay`](Self::repay)
/// must invoke the caller's callback before pulling funds whenever `data` is
/// non-empty, and must do so synchronously on the same call stack.
///
/// # Errors
///
/// Every mutating method returns the ledger's own failure, or passes through
/// a failure raised by the callback or the token primitive.
pub trait LendingLedger: Send + Sync {
    /// Address the ledger acts under, and signs callbacks with.
    fn address(&self) -> Address;

    /// Current position of `account` in `market`.
    fn position(&self, market: MarketId, account: Address) -> Position;

    /// Credit `assets` of collateral to `on_behalf`, then pull them from the caller.
    fn supply_collateral(
        &self,
        caller: Caller<'_>,
        market: &MarketDescriptor,
        assets: U256,
        on_behalf: Address,
        data: &[u8],
    ) -> Result<()>;

    /// Withdraw collateral of `on_behalf` to `receiver`. Requires authorization.
    fn withdraw_collateral(
        &self,
        caller: Address,
        market: &MarketDescriptor,
        assets: U256,
        on_behalf: Address,
        receiver: Address,
    ) -> Result<()>;

    /// Borrow by assets or by shares (exactly one nonzero) against the
    /// position of `on_behalf`. Returns `(assets, shares)` borrowed.
    fn borrow(
        &self,
        caller: Address,
        market: &MarketDescriptor,
        assets: U256,
        shares: U256,
        on_behalf: Address,
        receiver: Address,
    ) -> Result<(U256, U256)>;

    /// Repay by assets or by shares (exactly one nonzero) for `on_behalf`.
    /// Returns `(assets, shares)` repaid.
    fn repay(
        &self,
        caller: Caller<'_>,
        market: &MarketDescriptor,
        assets: U256,
        shares: U256,
        on_behalf: Address,
        data: &[u8],
    ) -> Result<(U256, U256)>;
}
