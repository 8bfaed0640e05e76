use std::sync::Arc;

use alloy_primitives::{address, Address, U256};
use leverage_orchestrator::adapter::outbound::memory::{encode_order, FixedRateSwapAdapter};
use leverage_orchestrator::application::orchestration::{AdapterPolicy, Swept};
use leverage_orchestrator::domain::continuation::wrap;
use leverage_orchestrator::domain::{MarketDescriptor, OpenContinuation};
use leverage_orchestrator::error::{Error, LedgerError, OrchestratorError, SwapError};
use leverage_orchestrator::port::inbound::LedgerCallbacks;
use leverage_orchestrator::port::outbound::{Caller, LendingLedger};
use leverage_orchestrator::testkit::adapter::{Hijack, HijackingAdapter};
use leverage_orchestrator::testkit::domain::{
    units, COLLATERAL, INITIATOR, LEDGER, LOAN, ORCHESTRATOR, ROUTER, STRANGER,
};
use leverage_orchestrator::testkit::world::{World, INITIAL_COLLATERAL};

const HIJACKER: Address = address!("6666666666666666666666666666666666666666");
const GENEROUS: Address = address!("7777777777777777777777777777777777777777");

fn orchestrator_error(result: Result<Swept, Error>) -> OrchestratorError {
    match result {
        Err(Error::Orchestrator(err)) => err,
        Err(other) => panic!("expected orchestrator error, got {other}"),
        Ok(swept) => panic!("expected failure, got {swept:?}"),
    }
}

fn assert_orchestrator_empty(world: &World) {
    assert_eq!(world.balance(LOAN, ORCHESTRATOR), U256::ZERO);
    assert_eq!(world.balance(COLLATERAL, ORCHESTRATOR), U256::ZERO);
}

fn assert_untouched(world: &World) {
    let position = world.position(&world.origin);
    assert!(position.is_closed(), "position left behind: {position:?}");
    assert_eq!(
        world.balance(COLLATERAL, INITIATOR),
        units(INITIAL_COLLATERAL)
    );
    assert_eq!(world.balance(LOAN, INITIATOR), U256::ZERO);
    assert!(world.orchestrator.sender().current().is_none());
}

fn hijacked_world(hijack: impl FnOnce(&World) -> Hijack) -> World {
    let world = World::new();
    let adapter = Arc::new(HijackingAdapter::new(HIJACKER, hijack(&world)));
    world.register_adapter(HIJACKER, adapter.clone());
    adapter.attach(world.orchestrator.clone());
    world
}

#[test]
fn open_reaches_target_collateral() {
    let world = World::new();

    let swept = world.open().unwrap();

    assert!(swept.is_empty());
    assert_eq!(world.position(&world.origin).collateral, units(50_000));
    assert_eq!(world.debt(&world.origin), units(41_000));
    assert_eq!(world.balance(COLLATERAL, INITIATOR), U256::ZERO);
    assert_orchestrator_empty(&world);
    assert!(world.orchestrator.sender().current().is_none());
}

#[test]
fn close_repays_debt_with_withdrawn_collateral() {
    let world = World::new();
    world.open().unwrap();

    let swept = world.close().unwrap();

    assert!(swept.is_empty());
    assert_eq!(world.position(&world.origin).collateral, units(29_000));
    assert_eq!(world.debt(&world.origin), units(21_000));
    assert_orchestrator_empty(&world);
}

#[test]
fn unknown_repay_discriminator_leaves_position_unchanged() {
    let world = World::new();
    world.open().unwrap();
    let before = world.position(&world.origin);
    let data = wrap(7, world.close_continuation().encode());

    let result = world.chain.atomic(|| {
        world.chain.ledger().repay(
            Caller::contract(ORCHESTRATOR, world.orchestrator.as_ref()),
            &world.origin,
            units(20_000),
            U256::ZERO,
            INITIATOR,
            &data,
        )
    });

    assert!(matches!(
        result,
        Err(Error::Orchestrator(
            OrchestratorError::InvalidCallbackDiscriminator(7)
        ))
    ));
    assert_eq!(world.position(&world.origin), before);
    assert_eq!(world.debt(&world.origin), units(41_000));
}

#[test]
fn switch_moves_whole_position() {
    let world = World::new();
    world.open().unwrap();
    world.close().unwrap();

    let swept = world.switch().unwrap();

    assert!(swept.is_empty());
    assert!(world.position(&world.origin).is_closed());
    assert_eq!(world.debt(&world.origin), U256::ZERO);
    assert_eq!(world.position(&world.target).collateral, units(29_000));
    assert_eq!(world.debt(&world.target), units(21_000));
    assert_orchestrator_empty(&world);
}

#[test]
fn switch_straight_after_open() {
    let world = World::new();
    world.open().unwrap();

    world.switch().unwrap();

    assert!(world.position(&world.origin).is_closed());
    assert_eq!(world.position(&world.target).collateral, units(50_000));
    assert_eq!(world.debt(&world.target), units(41_000));
}

#[test]
fn switch_rejects_markets_with_different_assets() {
    let world = World::new();
    world.open().unwrap();
    let elsewhere = MarketDescriptor {
        collateral_token: STRANGER,
        ..world.target
    };

    let err = orchestrator_error(world.chain.atomic(|| {
        world
            .orchestrator
            .switch_market(INITIATOR, &world.origin, &elsewhere)
    }));

    assert_eq!(
        err,
        OrchestratorError::IncompatibleMarkets {
            prev: world.origin.id(),
            new: elsewhere.id(),
        }
    );
    assert_eq!(world.position(&world.origin).collateral, units(50_000));
}

#[test]
fn switch_without_debt_fails_in_the_ledger() {
    let world = World::new();

    let result = world.switch();

    assert!(matches!(
        result,
        Err(Error::Ledger(LedgerError::InconsistentInput))
    ));
    assert_untouched(&world);
}

#[test]
fn entry_while_occupied_is_a_reentrancy_violation() {
    let world = World::new();
    let _guard = world
        .orchestrator
        .sender()
        .begin(STRANGER, world.origin.id())
        .unwrap();

    let err = orchestrator_error(world.open());

    assert_eq!(
        err,
        OrchestratorError::ReentrancyViolation { active: STRANGER }
    );
}

#[test]
fn close_while_occupied_is_a_reentrancy_violation() {
    let world = World::new();
    world.open().unwrap();
    let before = world.position(&world.origin);
    let _guard = world
        .orchestrator
        .sender()
        .begin(STRANGER, world.origin.id())
        .unwrap();

    let err = orchestrator_error(world.close());

    assert_eq!(
        err,
        OrchestratorError::ReentrancyViolation { active: STRANGER }
    );
    assert_eq!(world.position(&world.origin), before);
    assert_eq!(world.debt(&world.origin), units(41_000));
}

#[test]
fn switch_while_occupied_is_a_reentrancy_violation() {
    let world = World::new();
    world.open().unwrap();
    let _guard = world
        .orchestrator
        .sender()
        .begin(STRANGER, world.target.id())
        .unwrap();

    let err = orchestrator_error(world.switch());

    assert_eq!(
        err,
        OrchestratorError::ReentrancyViolation { active: STRANGER }
    );
    assert_eq!(world.position(&world.origin).collateral, units(50_000));
    assert!(world.position(&world.target).is_closed());
}

#[test]
fn adapter_reentering_an_entry_point_is_rejected() {
    let world = hijacked_world(|world| Hijack::Reenter {
        initiator: STRANGER,
        market: world.origin,
    });
    let continuation = world.open_via(HIJACKER, Default::default()).encode();

    let err = orchestrator_error(world.chain.atomic(|| {
        world
            .orchestrator
            .open_leverage(INITIATOR, &world.origin, units(50_000), &continuation)
    }));

    assert_eq!(
        err,
        OrchestratorError::ReentrancyViolation { active: INITIATOR }
    );
    assert_untouched(&world);

    // The slot was released by the failed call.
    world.open().unwrap();
}

#[test]
fn callbacks_from_anyone_but_the_ledger_are_rejected() {
    let world = World::new();
    let data = world.open_continuation().encode();

    let err = world
        .orchestrator
        .on_supply_collateral(STRANGER, units(50_000), &data)
        .unwrap_err();
    assert_eq!(
        err.as_orchestrator(),
        Some(&OrchestratorError::UnauthorizedCallback {
            caller: STRANGER,
            ledger: LEDGER,
        })
    );

    let err = world
        .orchestrator
        .on_repay(ORCHESTRATOR, units(1), &data)
        .unwrap_err();
    assert!(matches!(
        err.as_orchestrator(),
        Some(OrchestratorError::UnauthorizedCallback { .. })
    ));
}

#[test]
fn adapter_spoofing_a_callback_mid_flow_is_rejected() {
    let world = hijacked_world(|world| Hijack::SpoofRepayCallback {
        data: wrap(1, world.close_continuation().encode()).to_vec(),
    });
    let continuation = world.open_via(HIJACKER, Default::default()).encode();

    let err = orchestrator_error(world.chain.atomic(|| {
        world
            .orchestrator
            .open_leverage(INITIATOR, &world.origin, units(50_000), &continuation)
    }));

    assert_eq!(
        err,
        OrchestratorError::UnauthorizedCallback {
            caller: HIJACKER,
            ledger: LEDGER,
        }
    );
    assert_untouched(&world);
}

#[test]
fn ledger_callback_outside_a_call_has_no_initiator() {
    let world = World::new();
    let data = world.open_continuation().encode();

    let err = world
        .orchestrator
        .on_supply_collateral(LEDGER, units(50_000), &data)
        .unwrap_err();

    assert_eq!(
        err.as_orchestrator(),
        Some(&OrchestratorError::NoActiveInitiator)
    );
}

#[test]
fn continuation_for_another_market_is_rejected() {
    let world = World::new();
    world.open().unwrap();
    let continuation = world.open_continuation().encode();

    let err = orchestrator_error(world.chain.atomic(|| {
        world
            .orchestrator
            .open_leverage(INITIATOR, &world.target, units(50_000), &continuation)
    }));

    assert_eq!(
        err,
        OrchestratorError::MarketMismatch {
            entry: world.target.id(),
            continuation: world.origin.id(),
        }
    );
    assert_eq!(world.position(&world.origin).collateral, units(50_000));
    assert_eq!(world.debt(&world.origin), units(41_000));
    assert!(world.position(&world.target).is_closed());
    assert!(world.orchestrator.sender().current().is_none());
}

#[test]
fn naming_the_ledger_as_adapter_on_open_is_a_confused_deputy() {
    let world = World::new();
    let continuation = world.open_via(LEDGER, Default::default()).encode();

    let err = orchestrator_error(world.chain.atomic(|| {
        world
            .orchestrator
            .open_leverage(INITIATOR, &world.origin, units(50_000), &continuation)
    }));

    assert_eq!(err, OrchestratorError::ConfusedDeputy { adapter: LEDGER });
    assert_untouched(&world);
}

#[test]
fn naming_the_ledger_as_adapter_on_close_is_a_confused_deputy() {
    let world = World::new();
    world.open().unwrap();
    let continuation = world.close_via(LEDGER, Default::default()).encode();

    let err = orchestrator_error(world.chain.atomic(|| {
        world
            .orchestrator
            .close_leverage(INITIATOR, &world.origin, units(20_000), &continuation)
    }));

    assert_eq!(err, OrchestratorError::ConfusedDeputy { adapter: LEDGER });
    assert_eq!(world.position(&world.origin).collateral, units(50_000));
    assert_eq!(world.debt(&world.origin), units(41_000));
}

#[test]
fn allow_list_excludes_unlisted_adapters() {
    let world = World::with_policy(AdapterPolicy::from_allowed([GENEROUS]));

    let err = orchestrator_error(world.open());

    assert_eq!(err, OrchestratorError::AdapterNotAllowed { adapter: ROUTER });
    assert_untouched(&world);
}

#[test]
fn allow_list_admits_listed_adapters() {
    let world = World::with_policy(AdapterPolicy::from_allowed([ROUTER]));

    world.open().unwrap();

    assert_eq!(world.position(&world.origin).collateral, units(50_000));
}

#[test]
fn swap_surplus_is_swept_back_to_the_initiator() {
    let world = World::new();
    let generous = FixedRateSwapAdapter::new(GENEROUS, world.chain.tokens().clone()).with_rate(
        LOAN,
        COLLATERAL,
        units(1),
        units(1),
    );
    world
        .chain
        .tokens()
        .mint(COLLATERAL, GENEROUS, units(100_000))
        .unwrap();
    world.register_adapter(GENEROUS, Arc::new(generous));
    let continuation = world
        .open_via(
            GENEROUS,
            encode_order(LOAN, COLLATERAL, units(41_000), units(41_000)),
        )
        .encode();

    let swept = world
        .chain
        .atomic(|| {
            world
                .orchestrator
                .open_leverage(INITIATOR, &world.origin, units(50_000), &continuation)
        })
        .unwrap();

    assert_eq!(
        swept,
        Swept {
            loan: U256::ZERO,
            collateral: units(1_000),
        }
    );
    assert_eq!(world.balance(COLLATERAL, INITIATOR), units(1_000));
    assert_eq!(world.position(&world.origin).collateral, units(50_000));
    assert_orchestrator_empty(&world);
}

#[test]
fn slippage_failure_reverts_everything() {
    let world = World::new();
    let continuation = world
        .open_via(
            ROUTER,
            encode_order(LOAN, COLLATERAL, units(41_000), units(40_001)),
        )
        .encode();

    let result = world.chain.atomic(|| {
        world
            .orchestrator
            .open_leverage(INITIATOR, &world.origin, units(50_000), &continuation)
    });

    assert!(matches!(
        result,
        Err(Error::Swap(SwapError::SlippageExceeded { .. }))
    ));
    assert_untouched(&world);
    assert_eq!(world.debt(&world.origin), U256::ZERO);
}

#[test]
fn unknown_adapter_is_rejected() {
    let world = World::new();
    let continuation = world.open_via(STRANGER, Default::default()).encode();

    let result = world.chain.atomic(|| {
        world
            .orchestrator
            .open_leverage(INITIATOR, &world.origin, units(50_000), &continuation)
    });

    assert!(matches!(
        result,
        Err(Error::Swap(SwapError::UnknownAdapter(adapter))) if adapter == STRANGER
    ));
    assert_untouched(&world);
}

#[test]
fn malformed_open_continuation_is_rejected() {
    let world = World::new();

    let err = orchestrator_error(world.chain.atomic(|| {
        world
            .orchestrator
            .open_leverage(INITIATOR, &world.origin, units(50_000), &[0x01, 0x02, 0x03])
    }));

    assert!(matches!(err, OrchestratorError::MalformedContinuation(_)));
    assert_untouched(&world);
}

#[test]
fn over_borrowing_is_refused_by_the_ledger() {
    let world = World::new();
    let continuation = OpenContinuation {
        borrow_amount: units(45_000),
        swap_instruction: encode_order(LOAN, COLLATERAL, units(45_000), U256::ZERO),
        ..world.open_continuation()
    }
    .encode();

    let result = world.chain.atomic(|| {
        world
            .orchestrator
            .open_leverage(INITIATOR, &world.origin, units(50_000), &continuation)
    });

    assert!(matches!(
        result,
        Err(Error::Ledger(LedgerError::InsufficientCollateral { .. }))
    ));
    assert_untouched(&world);
}

#[test]
fn revoked_authorization_stops_the_borrow() {
    let world = World::new();
    world
        .chain
        .ledger()
        .set_authorization(INITIATOR, ORCHESTRATOR, false);

    let result = world.open();

    assert!(matches!(
        result,
        Err(Error::Ledger(LedgerError::Unauthorized { .. }))
    ));
    assert_untouched(&world);
}
