//! Sub-flows run from inside a ledger callback.
//!
//! Each flow leaves the orchestrator holding exactly what the ledger is about
//! to pull (plus any swap surplus, which the sweep returns afterwards) and
//! grants the ledger an allowance over the posted amount.

use alloy_primitives::{Address, Bytes, U256};
use tracing::debug;

use super::orchestrator::PositionOrchestrator;
use crate::domain::{CloseContinuation, OpenContinuation, SwitchContinuation};
use crate::error::{Result, SwapError};
use crate::port::outbound::Caller;

impl PositionOrchestrator {
    /// Borrow, swap the loan asset into collateral, top up, approve the ledger.
    pub(super) fn open_flow(
        &self,
        initiator: Address,
        posted: U256,
        continuation: &OpenContinuation,
    ) -> Result<()> {
        let market = &continuation.market;

        self.ledger.borrow(
            self.address(),
            market,
            continuation.borrow_amount,
            U256::ZERO,
            initiator,
            self.address(),
        )?;

        self.swap(
            market.loan_token,
            continuation.borrow_amount,
            continuation.swap_adapter,
            &continuation.swap_instruction,
        )?;

        if !continuation.top_up_amount.is_zero() {
            self.tokens.transfer_from(
                market.collateral_token,
                self.address(),
                initiator,
                self.address(),
                continuation.top_up_amount,
            )?;
        }

        self.tokens.increase_allowance(
            market.collateral_token,
            self.address(),
            self.ledger.address(),
            posted,
        )
    }

    /// Withdraw collateral, swap it into the loan asset, approve the ledger.
    pub(super) fn close_flow(
        &self,
        initiator: Address,
        posted: U256,
        continuation: &CloseContinuation,
    ) -> Result<()> {
        let market = &continuation.market;

        self.ledger.withdraw_collateral(
            self.address(),
            market,
            continuation.withdraw_amount,
            initiator,
            self.address(),
        )?;

        self.swap(
            market.collateral_token,
            continuation.withdraw_amount,
            continuation.swap_adapter,
            &continuation.swap_instruction,
        )?;

        self.tokens.increase_allowance(
            market.loan_token,
            self.address(),
            self.ledger.address(),
            posted,
        )
    }

    /// Carry all collateral over to the new market and re-borrow the repaid
    /// debt there, then approve the ledger to settle the old market.
    pub(super) fn switch_flow(
        &self,
        initiator: Address,
        posted: U256,
        continuation: &SwitchContinuation,
    ) -> Result<()> {
        let prev = &continuation.prev_market;
        let new = &continuation.new_market;
        let collateral = self.ledger.position(prev.id(), initiator).collateral;

        self.ledger
            .withdraw_collateral(self.address(), prev, collateral, initiator, self.address())?;

        self.tokens.increase_allowance(
            new.collateral_token,
            self.address(),
            self.ledger.address(),
            collateral,
        )?;
        self.ledger.supply_collateral(
            Caller::contract(self.address(), self),
            new,
            collateral,
            initiator,
            &[],
        )?;

        self.ledger
            .borrow(self.address(), new, posted, U256::ZERO, initiator, self.address())?;

        debug!(
            initiator = %initiator,
            collateral = %collateral,
            debt = %posted,
            "Position carried to new market"
        );

        self.tokens.increase_allowance(
            prev.loan_token,
            self.address(),
            self.ledger.address(),
            posted,
        )
    }

    /// Hand `amount_in` of `token_in` to an untrusted adapter and run it.
    fn swap(
        &self,
        token_in: Address,
        amount_in: U256,
        adapter: Address,
        instruction: &Bytes,
    ) -> Result<()> {
        self.policy.check(self.ledger.address(), adapter)?;
        let venue = self
            .adapters
            .resolve(adapter)
            .ok_or(SwapError::UnknownAdapter(adapter))?;

        self.tokens
            .increase_allowance(token_in, self.address(), adapter, amount_in)?;
        debug!(adapter = %adapter, token_in = %token_in, amount_in = %amount_in, "Invoking swap adapter");

        venue.execute(self.address(), instruction)
    }
}
