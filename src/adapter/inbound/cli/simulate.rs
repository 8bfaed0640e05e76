//! Leverage walkthrough on in-memory collaborators.
//!
//! Deploys the configured orchestrator, ledger and markets in memory, then
//! opens a position, partially closes it, moves it to a second market and
//! finally shows an unknown repay continuation being rejected, each step as
//! one all-or-nothing unit of execution.

use std::sync::Arc;

use alloy_primitives::{address, Address, U256};
use tracing::info;

use crate::adapter::inbound::cli::command::SimulateArgs;
use crate::adapter::inbound::cli::output;
use crate::adapter::outbound::memory::shares::{oracle_price_scale, to_assets_up};
use crate::adapter::outbound::memory::{encode_order, FixedRateSwapAdapter, InMemoryChain};
use crate::application::orchestration::{PositionOrchestrator, Swept};
use crate::domain::{continuation, CloseContinuation, MarketDescriptor, OpenContinuation};
use crate::error::Result;
use crate::infrastructure::Config;
use crate::port::outbound::{Caller, LendingLedger, TokenLedger};

/// Swap venue the walkthrough trades through.
const ROUTER: Address = address!("5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a");
const LENDER: Address = address!("1e1e1e1e1e1e1e1e1e1e1e1e1e1e1e1e1e1e1e1e");
const ALICE: Address = address!("a11ce00000000000000000000000000000000000");

const LIQUIDITY: u64 = 100_000;
const STARTING_COLLATERAL: u64 = 10_000;

struct Walkthrough {
    chain: InMemoryChain,
    orchestrator: PositionOrchestrator,
    orchestrator_address: Address,
    origin: MarketDescriptor,
    target: MarketDescriptor,
}

impl Walkthrough {
    fn deploy(config: &Config, args: &SimulateArgs) -> Result<Self> {
        let origin = config.market(&args.from)?;
        let target = config.market(&args.to)?;
        let deployment = &config.orchestrator;
        let (loan, collateral) = (origin.loan_token, origin.collateral_token);

        let chain = InMemoryChain::new(deployment.ledger);
        let tokens = chain.tokens();
        let ledger = chain.ledger();
        tokens.mint(loan, LENDER, U256::from(2 * LIQUIDITY))?;
        tokens.increase_allowance(loan, LENDER, deployment.ledger, U256::MAX)?;
        for market in [origin, target] {
            ledger.set_price(market.oracle, oracle_price_scale());
            ledger.create_market(market)?;
            ledger.supply(LENDER, &market, U256::from(LIQUIDITY), LENDER)?;
        }

        let router = FixedRateSwapAdapter::new(ROUTER, tokens.clone())
            .with_rate(loan, collateral, U256::from(40_000), U256::from(41_000))
            .with_rate(collateral, loan, U256::from(20_000), U256::from(21_000));
        tokens.mint(loan, ROUTER, U256::from(1_000_000))?;
        tokens.mint(collateral, ROUTER, U256::from(1_000_000))?;
        chain.adapters().register(ROUTER, Arc::new(router));

        tokens.mint(collateral, ALICE, U256::from(STARTING_COLLATERAL))?;
        tokens.increase_allowance(collateral, ALICE, deployment.address, U256::MAX)?;
        ledger.set_authorization(ALICE, deployment.address, true);

        let orchestrator = chain
            .orchestrator(deployment.address)
            .with_policy(config.adapter_policy());
        info!(
            orchestrator = %deployment.address,
            ledger = %deployment.ledger,
            origin = %origin.id(),
            target = %target.id(),
            "Walkthrough deployed"
        );
        Ok(Self {
            chain,
            orchestrator,
            orchestrator_address: deployment.address,
            origin,
            target,
        })
    }

    /// Loan asset ALICE owes in `market`, rounded up.
    fn debt(&self, market: &MarketDescriptor) -> Result<U256> {
        let ledger = self.chain.ledger();
        let position = ledger.position(market.id(), ALICE);
        let totals = ledger.totals(market.id()).unwrap_or_default();
        Ok(to_assets_up(
            position.borrow_shares,
            totals.borrow_assets,
            totals.borrow_shares,
        )?)
    }

    fn report(&self, market: &MarketDescriptor, swept: Option<Swept>) -> Result<()> {
        let position = self.chain.ledger().position(market.id(), ALICE);
        output::field("Market", market.id());
        output::field("Collateral", position.collateral);
        output::field("Debt", self.debt(market)?);
        if let Some(swept) = swept {
            output::field("Swept", format!("{} loan, {} collateral", swept.loan, swept.collateral));
        }
        Ok(())
    }
}

/// Run the walkthrough against the configured deployment.
pub fn execute(args: &SimulateArgs) -> Result<()> {
    let config = Config::load(&args.config.config)?;
    config.init_logging();

    let walk = Walkthrough::deploy(&config, args)?;
    let (chain, orchestrator) = (&walk.chain, &walk.orchestrator);
    let (loan, collateral) = (walk.origin.loan_token, walk.origin.collateral_token);

    output::section("Open");
    let open = OpenContinuation {
        market: walk.origin,
        borrow_amount: U256::from(41_000),
        top_up_amount: U256::from(STARTING_COLLATERAL),
        swap_adapter: ROUTER,
        swap_instruction: encode_order(loan, collateral, U256::from(41_000), U256::from(40_000)),
    };
    let swept = chain.atomic(|| {
        orchestrator.open_leverage(ALICE, &walk.origin, U256::from(50_000), &open.encode())
    })?;
    walk.report(&walk.origin, Some(swept))?;

    output::section("Close");
    let close = CloseContinuation {
        market: walk.origin,
        withdraw_amount: U256::from(21_000),
        swap_adapter: ROUTER,
        swap_instruction: encode_order(collateral, loan, U256::from(21_000), U256::from(20_000)),
    };
    let swept = chain.atomic(|| {
        orchestrator.close_leverage(ALICE, &walk.origin, U256::from(20_000), &close.encode())
    })?;
    walk.report(&walk.origin, Some(swept))?;

    output::section("Switch");
    let swept =
        chain.atomic(|| orchestrator.switch_market(ALICE, &walk.origin, &walk.target))?;
    walk.report(&walk.origin, None)?;
    walk.report(&walk.target, Some(swept))?;

    output::section("Unknown continuation");
    let rejected = chain.atomic(|| {
        chain.ledger().repay(
            Caller::contract(walk.orchestrator_address, orchestrator),
            &walk.target,
            U256::from(1_000),
            U256::ZERO,
            ALICE,
            &continuation::wrap(7, close.encode()),
        )
    });
    match rejected {
        Ok(_) => output::warning("Repay with discriminator 7 was accepted"),
        Err(e) => output::success(&format!("Rejected: {e}")),
    }
    walk.report(&walk.target, None)?;

    output::success("Walkthrough complete");
    Ok(())
}
