//! Initiator tracking for the in-flight top-level call.
//!
//! Callbacks arrive from the ledger, not from the account that started the
//! flow, so the orchestrator records the initiator when an entry point begins
//! and reads it back from inside the callback.
//!
//! The slot also remembers which market the entry point targeted and which
//! callback, if any, the orchestrator is waiting on. A callback is accepted
//! only while the orchestrator itself has a ledger call outstanding that
//! carries a continuation, and only once per such call.

use std::fmt;

use alloy_primitives::Address;
use parking_lot::Mutex;

use crate::domain::MarketId;
use crate::error::OrchestratorError;

/// The two ledger callbacks an entry point can hand a continuation to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackKind {
    SupplyCollateral,
    Repay,
}

impl fmt::Display for CallbackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SupplyCollateral => f.write_str("supply-collateral"),
            Self::Repay => f.write_str("repay"),
        }
    }
}

/// The top-level call currently holding the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveCall {
    pub initiator: Address,
    /// Market the entry point was invoked on.
    pub market: MarketId,
}

#[derive(Debug, Default)]
struct Slot {
    call: Option<ActiveCall>,
    awaiting: Option<CallbackKind>,
}

/// Single-slot record of who started the current top-level call.
///
/// Occupied for exactly the lifetime of a [`SenderGuard`]. A second
/// [`begin`](Self::begin) while the slot is held fails, which is what blocks
/// a reentrant top-level call; nested ledger callbacks only
/// [`accept`](Self::accept) against the slot and are unaffected.
#[derive(Debug, Default)]
pub struct SenderContext {
    slot: Mutex<Slot>,
}

impl SenderContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the slot for `account` acting on `market`.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestratorError::ReentrancyViolation`] if the slot is
    /// already held.
    pub fn begin(
        &self,
        account: Address,
        market: MarketId,
    ) -> Result<SenderGuard<'_>, OrchestratorError> {
        let mut slot = self.slot.lock();
        if let Some(active) = slot.call {
            return Err(OrchestratorError::ReentrancyViolation {
                active: active.initiator,
            });
        }
        slot.call = Some(ActiveCall {
            initiator: account,
            market,
        });
        slot.awaiting = None;
        Ok(SenderGuard { context: self })
    }

    /// Clear the slot unconditionally.
    pub fn end(&self) {
        *self.slot.lock() = Slot::default();
    }

    /// The initiator of the in-flight call, if one is running.
    #[must_use]
    pub fn current(&self) -> Option<Address> {
        self.active().map(|call| call.initiator)
    }

    /// The in-flight call, if one is running.
    #[must_use]
    pub fn active(&self) -> Option<ActiveCall> {
        self.slot.lock().call
    }

    /// Consume the pending `kind` callback and return the call it belongs to.
    ///
    /// # Errors
    ///
    /// [`OrchestratorError::NoActiveInitiator`] if no call is in flight,
    /// [`OrchestratorError::UnexpectedCallback`] if the in-flight call is not
    /// waiting on a `kind` callback (never armed, or already delivered).
    pub fn accept(&self, kind: CallbackKind) -> Result<ActiveCall, OrchestratorError> {
        let mut slot = self.slot.lock();
        let call = slot.call.ok_or(OrchestratorError::NoActiveInitiator)?;
        if slot.awaiting != Some(kind) {
            return Err(OrchestratorError::UnexpectedCallback { kind });
        }
        slot.awaiting = None;
        Ok(call)
    }
}

/// Holds the sender slot; dropping it releases the slot on every exit path.
#[derive(Debug)]
#[must_use = "the sender slot is released as soon as the guard is dropped"]
pub struct SenderGuard<'a> {
    context: &'a SenderContext,
}

impl SenderGuard<'_> {
    /// The account this guard was acquired for.
    #[must_use]
    pub fn initiator(&self) -> Option<Address> {
        self.context.current()
    }

    /// Admit exactly one `kind` callback, for the ledger call about to be made.
    pub fn await_callback(&self, kind: CallbackKind) {
        self.context.slot.lock().awaiting = Some(kind);
    }

    /// Stop admitting callbacks once the ledger call has returned.
    pub fn settle(&self) {
        self.context.slot.lock().awaiting = None;
    }
}

impl Drop for SenderGuard<'_> {
    fn drop(&mut self) {
        self.context.end();
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::B256;

    use super::*;

    fn market() -> MarketId {
        MarketId::new(B256::repeat_byte(0x4d))
    }

    #[test]
    fn slot_is_empty_until_begin() {
        let context = SenderContext::new();
        assert_eq!(context.current(), None);
        assert_eq!(context.active(), None);
    }

    #[test]
    fn guard_holds_and_releases_the_slot() {
        let context = SenderContext::new();
        let alice = Address::repeat_byte(0xA1);

        {
            let guard = context.begin(alice, market()).unwrap();
            assert_eq!(context.current(), Some(alice));
            assert_eq!(guard.initiator(), Some(alice));
            assert_eq!(context.active().map(|call| call.market), Some(market()));
        }

        assert_eq!(context.current(), None);
    }

    #[test]
    fn second_begin_is_a_reentrancy_violation() {
        let context = SenderContext::new();
        let alice = Address::repeat_byte(0xA1);
        let bob = Address::repeat_byte(0xB0);

        let _guard = context.begin(alice, market()).unwrap();
        assert_eq!(
            context.begin(bob, market()).unwrap_err(),
            OrchestratorError::ReentrancyViolation { active: alice }
        );
        // The rejected attempt must not disturb the holder.
        assert_eq!(context.current(), Some(alice));
    }

    #[test]
    fn slot_is_released_when_the_call_fails() {
        fn failing_call(context: &SenderContext, account: Address) -> Result<(), OrchestratorError> {
            let _guard = context.begin(account, market())?;
            Err(OrchestratorError::NoActiveInitiator)
        }

        let context = SenderContext::new();
        let alice = Address::repeat_byte(0xA1);

        assert!(failing_call(&context, alice).is_err());
        assert_eq!(context.current(), None);
        assert!(context.begin(alice, market()).is_ok());
    }

    #[test]
    fn end_clears_unconditionally() {
        let context = SenderContext::new();
        let guard = context.begin(Address::repeat_byte(0xA1), market()).unwrap();
        context.end();
        assert_eq!(context.current(), None);
        drop(guard);
        assert_eq!(context.current(), None);
    }

    #[test]
    fn accept_requires_an_armed_callback() {
        let context = SenderContext::new();
        assert_eq!(
            context.accept(CallbackKind::Repay),
            Err(OrchestratorError::NoActiveInitiator)
        );

        let alice = Address::repeat_byte(0xA1);
        let guard = context.begin(alice, market()).unwrap();
        assert_eq!(
            context.accept(CallbackKind::Repay),
            Err(OrchestratorError::UnexpectedCallback {
                kind: CallbackKind::Repay
            })
        );

        guard.await_callback(CallbackKind::SupplyCollateral);
        assert_eq!(
            context.accept(CallbackKind::Repay),
            Err(OrchestratorError::UnexpectedCallback {
                kind: CallbackKind::Repay
            })
        );
        assert_eq!(
            context.accept(CallbackKind::SupplyCollateral).map(|c| c.initiator),
            Ok(alice)
        );
    }

    #[test]
    fn armed_callback_is_delivered_once() {
        let context = SenderContext::new();
        let guard = context.begin(Address::repeat_byte(0xA1), market()).unwrap();
        guard.await_callback(CallbackKind::Repay);

        assert!(context.accept(CallbackKind::Repay).is_ok());
        assert_eq!(
            context.accept(CallbackKind::Repay),
            Err(OrchestratorError::UnexpectedCallback {
                kind: CallbackKind::Repay
            })
        );

        guard.await_callback(CallbackKind::Repay);
        guard.settle();
        assert!(context.accept(CallbackKind::Repay).is_err());
    }
}
