//! Ledger position records.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

/// Per (market, account) record held by the ledger.
///
/// The orchestrator only ever reads positions; the ledger is the sole writer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Shares of the market's lending side.
    pub supply_shares: U256,
    /// Shares of the market's outstanding debt.
    pub borrow_shares: U256,
    /// Collateral posted, in collateral-asset units.
    pub collateral: U256,
}

impl Position {
    /// True when the account has no collateral and no debt in the market.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.borrow_shares.is_zero() && self.collateral.is_zero()
    }

    /// True when the account owes anything.
    #[must_use]
    pub fn has_debt(&self) -> bool {
        !self.borrow_shares.is_zero()
    }
}
