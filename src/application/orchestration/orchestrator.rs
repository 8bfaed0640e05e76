//! Top-level leverage entry points.

use std::sync::Arc;

use alloy_primitives::{Address, U256};
use tracing::info;

use super::context::{CallbackKind, SenderContext};
use super::policy::AdapterPolicy;
use super::sweep::Swept;
use crate::domain::{continuation, MarketDescriptor, CLOSE_DISCRIMINATOR};
use crate::domain::{RepayContinuation, SwitchContinuation};
use crate::error::{OrchestratorError, Result};
use crate::port::outbound::{AdapterResolver, Caller, LendingLedger, TokenLedger};

/// Opens, closes and migrates leveraged positions in one ledger call each.
///
/// Every entry point claims the [`SenderContext`], hands control to the
/// ledger with a continuation, and lets the ledger's synchronous callback
/// (see [`LedgerCallbacks`](crate::port::inbound::LedgerCallbacks)) finish the
/// flow. Once the ledger returns, any loan or collateral asset left on the
/// orchestrator is swept back to the initiator.
///
/// Initiators must have authorized the orchestrator on the ledger beforehand,
/// and granted it a collateral allowance if their continuation tops up.
pub struct PositionOrchestrator {
    address: Address,
    pub(super) ledger: Arc<dyn LendingLedger>,
    pub(super) tokens: Arc<dyn TokenLedger>,
    pub(super) adapters: Arc<dyn AdapterResolver>,
    pub(super) policy: AdapterPolicy,
    pub(super) sender: SenderContext,
}

impl PositionOrchestrator {
    /// Create an orchestrator acting as `address`, admitting any swap adapter.
    pub fn new(
        address: Address,
        ledger: Arc<dyn LendingLedger>,
        tokens: Arc<dyn TokenLedger>,
        adapters: Arc<dyn AdapterResolver>,
    ) -> Self {
        Self {
            address,
            ledger,
            tokens,
            adapters,
            policy: AdapterPolicy::Any,
            sender: SenderContext::new(),
        }
    }

    /// Restrict which swap adapters continuations may name.
    #[must_use]
    pub fn with_policy(mut self, policy: AdapterPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    #[must_use]
    pub fn policy(&self) -> &AdapterPolicy {
        &self.policy
    }

    /// Sender slot, for observing whether a call is in flight.
    #[must_use]
    pub fn sender(&self) -> &SenderContext {
        &self.sender
    }

    /// Grow the initiator's collateral in `market` to `total_collateral`.
    ///
    /// `continuation` is an encoded [`OpenContinuation`](crate::domain::OpenContinuation).
    /// The amounts are not checked here: borrow, swap proceeds and top-up
    /// must add up to `total_collateral`, or the ledger fails the transfer-in.
    ///
    /// # Errors
    ///
    /// [`OrchestratorError::ReentrancyViolation`] if a call is already in
    /// flight; otherwise any failure raised along the callback chain.
    pub fn open_leverage(
        &self,
        initiator: Address,
        market: &MarketDescriptor,
        total_collateral: U256,
        continuation: &[u8],
    ) -> Result<Swept> {
        let guard = self.sender.begin(initiator, market.id())?;
        info!(
            initiator = %initiator,
            market = %market.id(),
            total_collateral = %total_collateral,
            "Opening leverage"
        );

        guard.await_callback(CallbackKind::SupplyCollateral);
        self.ledger.supply_collateral(
            Caller::contract(self.address, self),
            market,
            total_collateral,
            initiator,
            continuation,
        )?;
        guard.settle();

        self.sweep(initiator, market)
    }

    /// Repay `repay_amount` of the initiator's debt, funded by selling collateral.
    ///
    /// `continuation` is an encoded [`CloseContinuation`](crate::domain::CloseContinuation);
    /// it is tagged as a close before being handed to the ledger.
    ///
    /// # Errors
    ///
    /// [`OrchestratorError::ReentrancyViolation`] if a call is already in
    /// flight; otherwise any failure raised along the callback chain.
    pub fn close_leverage(
        &self,
        initiator: Address,
        market: &MarketDescriptor,
        repay_amount: U256,
        continuation: &[u8],
    ) -> Result<Swept> {
        let guard = self.sender.begin(initiator, market.id())?;
        info!(
            initiator = %initiator,
            market = %market.id(),
            repay_amount = %repay_amount,
            "Closing leverage"
        );

        let data = continuation::wrap(CLOSE_DISCRIMINATOR, continuation.to_vec());
        guard.await_callback(CallbackKind::Repay);
        self.ledger.repay(
            Caller::contract(self.address, self),
            market,
            repay_amount,
            U256::ZERO,
            initiator,
            &data,
        )?;
        guard.settle();

        self.sweep(initiator, market)
    }

    /// Move the initiator's entire position from `prev_market` to `new_market`.
    ///
    /// Both markets must trade the same loan and collateral assets; no swap
    /// takes place.
    ///
    /// # Errors
    ///
    /// [`OrchestratorError::ReentrancyViolation`] if a call is already in
    /// flight, [`OrchestratorError::IncompatibleMarkets`] if the assets
    /// differ; otherwise any failure raised along the callback chain.
    pub fn switch_market(
        &self,
        initiator: Address,
        prev_market: &MarketDescriptor,
        new_market: &MarketDescriptor,
    ) -> Result<Swept> {
        let guard = self.sender.begin(initiator, prev_market.id())?;
        if !prev_market.shares_assets_with(new_market) {
            return Err(OrchestratorError::IncompatibleMarkets {
                prev: prev_market.id(),
                new: new_market.id(),
            }
            .into());
        }

        let borrow_shares = self
            .ledger
            .position(prev_market.id(), initiator)
            .borrow_shares;
        info!(
            initiator = %initiator,
            prev_market = %prev_market.id(),
            new_market = %new_market.id(),
            borrow_shares = %borrow_shares,
            "Switching market"
        );

        let data = RepayContinuation::MarketSwitch(SwitchContinuation {
            prev_market: *prev_market,
            new_market: *new_market,
        })
        .encode();
        guard.await_callback(CallbackKind::Repay);
        self.ledger.repay(
            Caller::contract(self.address, self),
            prev_market,
            U256::ZERO,
            borrow_shares,
            initiator,
            &data,
        )?;
        guard.settle();

        self.sweep(initiator, prev_market)
    }
}
