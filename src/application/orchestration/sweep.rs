//! Post-flow balance sweep.

use alloy_primitives::{Address, U256};
use serde::Serialize;
use tracing::info;

use super::orchestrator::PositionOrchestrator;
use crate::domain::MarketDescriptor;
use crate::error::Result;

/// Amounts returned to the initiator once the ledger call completed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Swept {
    /// Loan asset returned.
    pub loan: U256,
    /// Collateral asset returned.
    pub collateral: U256,
}

impl Swept {
    /// True when nothing was left behind.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.loan.is_zero() && self.collateral.is_zero()
    }
}

impl PositionOrchestrator {
    /// Return every unit of the market's two assets held by the orchestrator.
    pub(super) fn sweep(&self, initiator: Address, market: &MarketDescriptor) -> Result<Swept> {
        let loan = self.sweep_token(market.loan_token, initiator)?;
        let collateral = if market.collateral_token == market.loan_token {
            U256::ZERO
        } else {
            self.sweep_token(market.collateral_token, initiator)?
        };
        Ok(Swept { loan, collateral })
    }

    fn sweep_token(&self, token: Address, to: Address) -> Result<U256> {
        let balance = self.tokens.balance_of(token, self.address());
        if balance.is_zero() {
            return Ok(U256::ZERO);
        }

        self.tokens.transfer(token, self.address(), to, balance)?;
        info!(token = %token, to = %to, amount = %balance, "Swept residual balance");
        Ok(balance)
    }
}
