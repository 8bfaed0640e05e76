//! Solidity ABI shapes of the continuation payloads.
//!
//! These are the on-the-wire layouts callers produce with `abi.encode`. The
//! rest of the crate works with the typed values in
//! [`continuation`](super::continuation) and converts at the boundary.

use alloy_sol_types::sol;

use super::MarketDescriptor;

sol! {
    /// Lending market parameters as the ledger encodes them.
    struct MarketParams {
        address loanToken;
        address collateralToken;
        address oracle;
        address irm;
        uint256 lltv;
    }

    /// Continuation carried by the supply-collateral callback.
    struct OpenLeverage {
        MarketParams market;
        uint256 borrowAmount;
        uint256 topUpAmount;
        address swapAdapter;
        bytes swapData;
    }

    /// Discriminated wrapper carried by the repay callback.
    struct RepayEnvelope {
        uint8 action;
        bytes payload;
    }

    /// Close payload inside a [`RepayEnvelope`].
    struct CloseLeverage {
        MarketParams market;
        uint256 withdrawAmount;
        address swapAdapter;
        bytes swapData;
    }

    /// Market switch payload inside a [`RepayEnvelope`].
    struct SwitchMarket {
        MarketParams prevMarket;
        MarketParams newMarket;
    }
}

impl From<&MarketDescriptor> for MarketParams {
    fn from(market: &MarketDescriptor) -> Self {
        Self {
            loanToken: market.loan_token,
            collateralToken: market.collateral_token,
            oracle: market.oracle,
            irm: market.irm,
            lltv: market.lltv,
        }
    }
}

impl From<MarketParams> for MarketDescriptor {
    fn from(params: MarketParams) -> Self {
        Self {
            loan_token: params.loanToken,
            collateral_token: params.collateralToken,
            oracle: params.oracle,
            irm: params.irm,
            lltv: params.lltv,
        }
    }
}
