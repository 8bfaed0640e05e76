//! A deployed leverage setup on in-memory collaborators.
//!
//! Two markets over the same asset pair, a lender providing liquidity to
//! both, a fixed-rate router and an initiator holding 10,000 collateral that
//! has authorized the orchestrator and approved it for top-ups.

use std::sync::Arc;

use alloy_primitives::{Address, Bytes, U256};

use super::domain::{
    market, par_price, units, COLLATERAL, INITIATOR, LEDGER, LENDER, LOAN, ORACLE, ORCHESTRATOR,
    ROUTER,
};
use crate::adapter::outbound::memory::shares::to_assets_up;
use crate::adapter::outbound::memory::{encode_order, FixedRateSwapAdapter, InMemoryChain};
use crate::application::orchestration::{AdapterPolicy, PositionOrchestrator, Swept};
use crate::domain::{CloseContinuation, MarketDescriptor, OpenContinuation, Position};
use crate::error::Result;
use crate::port::outbound::{LendingLedger, SwapAdapter, TokenLedger};

/// Liquidity supplied to each market.
pub const MARKET_LIQUIDITY: u64 = 100_000;

/// Collateral the initiator starts with.
pub const INITIAL_COLLATERAL: u64 = 10_000;

pub struct World {
    pub chain: InMemoryChain,
    pub orchestrator: Arc<PositionOrchestrator>,
    /// 86% LLTV.
    pub origin: MarketDescriptor,
    /// 91.5% LLTV, same assets as `origin`.
    pub target: MarketDescriptor,
}

impl World {
    /// Deploy with any swap adapter admitted.
    pub fn new() -> Self {
        Self::with_policy(AdapterPolicy::Any)
    }

    pub fn with_policy(policy: AdapterPolicy) -> Self {
        Self::deploy(policy).expect("world deployment")
    }

    fn deploy(policy: AdapterPolicy) -> Result<Self> {
        let chain = InMemoryChain::new(LEDGER);
        let origin = market(8_600, 0x01);
        let target = market(9_150, 0x02);

        let tokens = chain.tokens();
        let ledger = chain.ledger();
        ledger.set_price(ORACLE, par_price());
        tokens.mint(LOAN, LENDER, units(2 * MARKET_LIQUIDITY))?;
        tokens.increase_allowance(LOAN, LENDER, LEDGER, U256::MAX)?;
        for market in [origin, target] {
            ledger.create_market(market)?;
            ledger.supply(LENDER, &market, units(MARKET_LIQUIDITY), LENDER)?;
        }

        let router = FixedRateSwapAdapter::new(ROUTER, tokens.clone())
            .with_rate(LOAN, COLLATERAL, units(40_000), units(41_000))
            .with_rate(COLLATERAL, LOAN, units(20_000), units(21_000));
        tokens.mint(LOAN, ROUTER, units(1_000_000))?;
        tokens.mint(COLLATERAL, ROUTER, units(1_000_000))?;
        chain.adapters().register(ROUTER, Arc::new(router));

        tokens.mint(COLLATERAL, INITIATOR, units(INITIAL_COLLATERAL))?;
        tokens.increase_allowance(COLLATERAL, INITIATOR, ORCHESTRATOR, U256::MAX)?;
        ledger.set_authorization(INITIATOR, ORCHESTRATOR, true);

        let orchestrator = Arc::new(chain.orchestrator(ORCHESTRATOR).with_policy(policy));
        Ok(Self {
            chain,
            orchestrator,
            origin,
            target,
        })
    }

    /// Deploy an extra adapter at `address`.
    pub fn register_adapter(&self, address: Address, adapter: Arc<dyn SwapAdapter>) {
        self.chain.adapters().register(address, adapter);
    }

    pub fn position(&self, market: &MarketDescriptor) -> Position {
        self.chain.ledger().position(market.id(), INITIATOR)
    }

    /// Loan asset owed by the initiator in `market`, rounded up.
    pub fn debt(&self, market: &MarketDescriptor) -> U256 {
        let position = self.position(market);
        let totals = self.chain.ledger().totals(market.id()).unwrap_or_default();
        to_assets_up(
            position.borrow_shares,
            totals.borrow_assets,
            totals.borrow_shares,
        )
        .unwrap_or_default()
    }

    pub fn balance(&self, token: Address, owner: Address) -> U256 {
        self.chain.tokens().balance_of(token, owner)
    }

    /// Borrow 41,000, swap it for 40,000 collateral, top up 10,000.
    pub fn open_continuation(&self) -> OpenContinuation {
        self.open_via(ROUTER, encode_order(LOAN, COLLATERAL, units(41_000), units(40_000)))
    }

    pub fn open_via(&self, adapter: Address, instruction: Bytes) -> OpenContinuation {
        OpenContinuation {
            market: self.origin,
            borrow_amount: units(41_000),
            top_up_amount: units(INITIAL_COLLATERAL),
            swap_adapter: adapter,
            swap_instruction: instruction,
        }
    }

    /// Withdraw 21,000 collateral and swap it for 20,000 of the loan asset.
    pub fn close_continuation(&self) -> CloseContinuation {
        self.close_via(ROUTER, encode_order(COLLATERAL, LOAN, units(21_000), units(20_000)))
    }

    pub fn close_via(&self, adapter: Address, instruction: Bytes) -> CloseContinuation {
        CloseContinuation {
            market: self.origin,
            withdraw_amount: units(21_000),
            swap_adapter: adapter,
            swap_instruction: instruction,
        }
    }

    /// Grow the origin position to 50,000 collateral in one unit of execution.
    pub fn open(&self) -> Result<Swept> {
        let continuation = self.open_continuation().encode();
        self.chain.atomic(|| {
            self.orchestrator
                .open_leverage(INITIATOR, &self.origin, units(50_000), &continuation)
        })
    }

    /// Repay 20,000 of the origin debt in one unit of execution.
    pub fn close(&self) -> Result<Swept> {
        let continuation = self.close_continuation().encode();
        self.chain.atomic(|| {
            self.orchestrator
                .close_leverage(INITIATOR, &self.origin, units(20_000), &continuation)
        })
    }

    pub fn switch(&self) -> Result<Swept> {
        self.chain.atomic(|| {
            self.orchestrator
                .switch_market(INITIATOR, &self.origin, &self.target)
        })
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
