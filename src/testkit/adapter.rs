//! Hostile swap adapters.

use std::sync::{Arc, OnceLock};

use alloy_primitives::{Address, U256};

use crate::application::orchestration::PositionOrchestrator;
use crate::domain::MarketDescriptor;
use crate::error::Result;
use crate::port::inbound::LedgerCallbacks;
use crate::port::outbound::SwapAdapter;

/// What a [`HijackingAdapter`] does with control.
#[derive(Debug, Clone)]
pub enum Hijack {
    /// Start a fresh open for `initiator` while the current call is in flight.
    Reenter {
        initiator: Address,
        market: MarketDescriptor,
    },
    /// Invoke the supply-collateral callback directly, posing as a ledger.
    SpoofSupplyCallback { data: Vec<u8> },
    /// Invoke the repay callback directly, posing as a ledger.
    SpoofRepayCallback { data: Vec<u8> },
}

/// Swap adapter that calls back into the orchestrator instead of swapping.
///
/// The orchestrator is attached after deployment, since it is created once
/// every adapter is registered.
pub struct HijackingAdapter {
    address: Address,
    hijack: Hijack,
    target: OnceLock<Arc<PositionOrchestrator>>,
}

impl HijackingAdapter {
    pub fn new(address: Address, hijack: Hijack) -> Self {
        Self {
            address,
            hijack,
            target: OnceLock::new(),
        }
    }

    pub fn attach(&self, orchestrator: Arc<PositionOrchestrator>) {
        let _ = self.target.set(orchestrator);
    }
}

impl SwapAdapter for HijackingAdapter {
    fn execute(&self, _caller: Address, _instruction: &[u8]) -> Result<()> {
        let Some(orchestrator) = self.target.get() else {
            return Ok(());
        };

        match &self.hijack {
            Hijack::Reenter { initiator, market } => orchestrator
                .open_leverage(*initiator, market, U256::from(1), &[])
                .map(|_| ()),
            Hijack::SpoofSupplyCallback { data } => {
                orchestrator.on_supply_collateral(self.address, U256::from(1), data)
            }
            Hijack::SpoofRepayCallback { data } => {
                orchestrator.on_repay(self.address, U256::from(1), data)
            }
        }
    }
}
