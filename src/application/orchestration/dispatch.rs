//! Ledger callback dispatch.
//!
//! The ledger re-enters the orchestrator here mid-operation. Each callback
//! authenticates the ledger, decodes the continuation once, claims the
//! callback the entry point is waiting on and hands off to the matching
//! sub-flow.

use alloy_primitives::{Address, U256};
use tracing::{debug, warn};

use super::context::{ActiveCall, CallbackKind};
use super::orchestrator::PositionOrchestrator;
use crate::domain::{MarketDescriptor, OpenContinuation, RepayContinuation};
use crate::error::{OrchestratorError, Result};
use crate::port::inbound::LedgerCallbacks;

impl PositionOrchestrator {
    fn authenticate(&self, caller: Address) -> std::result::Result<(), OrchestratorError> {
        let ledger = self.ledger.address();
        if caller != ledger {
            warn!(caller = %caller, ledger = %ledger, "Rejected callback from non-ledger caller");
            return Err(OrchestratorError::UnauthorizedCallback { caller, ledger });
        }
        Ok(())
    }

    /// Claim the pending `kind` callback for a continuation acting on `market`.
    fn claim(
        &self,
        kind: CallbackKind,
        market: &MarketDescriptor,
    ) -> std::result::Result<Address, OrchestratorError> {
        let ActiveCall {
            initiator,
            market: entry,
        } = self.sender.accept(kind).inspect_err(|e| {
            warn!(kind = %kind, error = %e, "Rejected callback outside an outstanding ledger call");
        })?;

        let continuation = market.id();
        if continuation != entry {
            warn!(entry = %entry, continuation = %continuation, "Continuation names another market");
            return Err(OrchestratorError::MarketMismatch {
                entry,
                continuation,
            });
        }
        Ok(initiator)
    }
}

impl LedgerCallbacks for PositionOrchestrator {
    fn on_supply_collateral(&self, caller: Address, assets: U256, data: &[u8]) -> Result<()> {
        self.authenticate(caller)?;
        let continuation = OpenContinuation::decode(data)?;
        let initiator = self.claim(CallbackKind::SupplyCollateral, &continuation.market)?;
        debug!(
            initiator = %initiator,
            assets = %assets,
            borrow = %continuation.borrow_amount,
            top_up = %continuation.top_up_amount,
            "Supply callback: open"
        );

        self.open_flow(initiator, assets, &continuation)
    }

    fn on_repay(&self, caller: Address, assets: U256, data: &[u8]) -> Result<()> {
        self.authenticate(caller)?;
        let continuation = RepayContinuation::decode(data)?;

        match continuation {
            RepayContinuation::Close(close) => {
                let initiator = self.claim(CallbackKind::Repay, &close.market)?;
                debug!(
                    initiator = %initiator,
                    assets = %assets,
                    withdraw = %close.withdraw_amount,
                    "Repay callback: close"
                );
                self.close_flow(initiator, assets, &close)
            }
            RepayContinuation::MarketSwitch(switch) => {
                let initiator = self.claim(CallbackKind::Repay, &switch.prev_market)?;
                debug!(
                    initiator = %initiator,
                    assets = %assets,
                    new_market = %switch.new_market.id(),
                    "Repay callback: market switch"
                );
                self.switch_flow(initiator, assets, &switch)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::U256;

    use crate::application::orchestration::CallbackKind;
    use crate::domain::continuation::wrap;
    use crate::domain::RepayContinuation;
    use crate::error::OrchestratorError;
    use crate::port::inbound::LedgerCallbacks;
    use crate::testkit::domain::{units, INITIATOR, LEDGER, STRANGER};
    use crate::testkit::world::World;

    #[test]
    fn ledger_is_authenticated_before_decoding() {
        let world = World::new();
        let err = world
            .orchestrator
            .on_repay(STRANGER, U256::ZERO, &[0xff])
            .unwrap_err();
        assert!(matches!(
            err.as_orchestrator(),
            Some(OrchestratorError::UnauthorizedCallback { .. })
        ));
    }

    #[test]
    fn discriminator_is_checked_before_the_initiator() {
        let world = World::new();
        let err = world
            .orchestrator
            .on_repay(LEDGER, units(1), &wrap(0, vec![0u8; 64]))
            .unwrap_err();
        assert_eq!(
            err.as_orchestrator(),
            Some(&OrchestratorError::InvalidCallbackDiscriminator(0))
        );
    }

    #[test]
    fn ledger_address_alone_does_not_admit_a_callback() {
        let world = World::new();
        world.open().unwrap();
        let before = world.position(&world.origin);

        let _guard = world
            .orchestrator
            .sender()
            .begin(INITIATOR, world.origin.id())
            .unwrap();
        let data = RepayContinuation::Close(world.close_continuation()).encode();
        let err = world
            .orchestrator
            .on_repay(LEDGER, units(20_000), &data)
            .unwrap_err();

        assert_eq!(
            err.as_orchestrator(),
            Some(&OrchestratorError::UnexpectedCallback {
                kind: CallbackKind::Repay
            })
        );
        assert_eq!(world.position(&world.origin), before);
    }

    #[test]
    fn continuation_must_target_the_entry_market() {
        let world = World::new();
        let guard = world
            .orchestrator
            .sender()
            .begin(INITIATOR, world.target.id())
            .unwrap();
        guard.await_callback(CallbackKind::SupplyCollateral);

        let data = world.open_continuation().encode();
        let err = world
            .orchestrator
            .on_supply_collateral(LEDGER, units(50_000), &data)
            .unwrap_err();

        assert_eq!(
            err.as_orchestrator(),
            Some(&OrchestratorError::MarketMismatch {
                entry: world.target.id(),
                continuation: world.origin.id(),
            })
        );
        assert!(world.position(&world.origin).is_closed());
    }
}
