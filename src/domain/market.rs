//! Lending market descriptors.

use alloy_primitives::{keccak256, Address, U256};
use alloy_sol_types::SolValue;
use serde::{Deserialize, Serialize};

use super::abi::MarketParams;
use super::MarketId;

/// WAD scale used by liquidation thresholds (1e18).
pub const WAD: u128 = 1_000_000_000_000_000_000;

/// Immutable parameters identifying a lending market.
///
/// The orchestrator treats a descriptor as opaque input: it only reads the
/// two asset addresses and forwards the whole value to the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarketDescriptor {
    /// Asset lent and borrowed in the market.
    pub loan_token: Address,
    /// Asset posted as collateral.
    pub collateral_token: Address,
    /// Price source consulted by the ledger's risk engine.
    pub oracle: Address,
    /// Interest rate model.
    pub irm: Address,
    /// Liquidation loan-to-value, WAD-scaled.
    pub lltv: U256,
}

impl MarketDescriptor {
    /// Stable identifier: keccak256 of the ABI-encoded parameters.
    #[must_use]
    pub fn id(&self) -> MarketId {
        MarketId::new(keccak256(MarketParams::from(self).abi_encode()))
    }

    /// Whether both markets trade the same loan and collateral assets.
    #[must_use]
    pub fn shares_assets_with(&self, other: &Self) -> bool {
        self.loan_token == other.loan_token && self.collateral_token == other.collateral_token
    }
}
