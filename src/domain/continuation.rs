//! Continuation payloads carried through ledger callbacks.
//!
//! A caller builds a continuation, the ledger forwards it untouched, and the
//! orchestrator decodes it exactly once when the callback arrives. Repay
//! continuations are a closed set of variants selected by a one-byte
//! discriminator; anything outside that set is rejected.

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolValue;
use serde::Serialize;

use super::abi::{CloseLeverage, OpenLeverage, RepayEnvelope, SwitchMarket};
use super::MarketDescriptor;
use crate::error::OrchestratorError;

/// Repay discriminator selecting the Close flow.
pub const CLOSE_DISCRIMINATOR: u8 = 1;

/// Repay discriminator selecting the MarketSwitch flow.
pub const SWITCH_DISCRIMINATOR: u8 = 2;

fn malformed(err: alloy_sol_types::Error) -> OrchestratorError {
    OrchestratorError::MalformedContinuation(err.to_string())
}

/// Instructions for the supply-collateral callback of an open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpenContinuation {
    pub market: MarketDescriptor,
    /// Loan asset borrowed against the posted collateral.
    pub borrow_amount: U256,
    /// Collateral pulled from the initiator on top of the swap proceeds.
    pub top_up_amount: U256,
    pub swap_adapter: Address,
    /// Opaque bytes handed to the adapter.
    pub swap_instruction: Bytes,
}

impl OpenContinuation {
    #[must_use]
    pub fn encode(&self) -> Bytes {
        OpenLeverage {
            market: (&self.market).into(),
            borrowAmount: self.borrow_amount,
            topUpAmount: self.top_up_amount,
            swapAdapter: self.swap_adapter,
            swapData: self.swap_instruction.clone(),
        }
        .abi_encode()
        .into()
    }

    /// Decode a supply-collateral continuation.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestratorError::MalformedContinuation`] if the bytes are not
    /// a valid ABI encoding.
    pub fn decode(data: &[u8]) -> Result<Self, OrchestratorError> {
        let raw = OpenLeverage::abi_decode(data).map_err(malformed)?;
        Ok(Self {
            market: raw.market.into(),
            borrow_amount: raw.borrowAmount,
            top_up_amount: raw.topUpAmount,
            swap_adapter: raw.swapAdapter,
            swap_instruction: raw.swapData,
        })
    }
}

/// Close payload: unwind part of a position through a swap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CloseContinuation {
    pub market: MarketDescriptor,
    /// Collateral withdrawn and sold for the loan asset.
    pub withdraw_amount: U256,
    pub swap_adapter: Address,
    pub swap_instruction: Bytes,
}

impl CloseContinuation {
    /// Encode the inner close payload, as passed to `close_leverage`.
    #[must_use]
    pub fn encode(&self) -> Bytes {
        CloseLeverage {
            market: (&self.market).into(),
            withdrawAmount: self.withdraw_amount,
            swapAdapter: self.swap_adapter,
            swapData: self.swap_instruction.clone(),
        }
        .abi_encode()
        .into()
    }

    /// Decode the inner close payload.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestratorError::MalformedContinuation`] on invalid bytes.
    pub fn decode(data: &[u8]) -> Result<Self, OrchestratorError> {
        let raw = CloseLeverage::abi_decode(data).map_err(malformed)?;
        Ok(Self {
            market: raw.market.into(),
            withdraw_amount: raw.withdrawAmount,
            swap_adapter: raw.swapAdapter,
            swap_instruction: raw.swapData,
        })
    }
}

/// Switch payload: move a whole position between two compatible markets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwitchContinuation {
    pub prev_market: MarketDescriptor,
    pub new_market: MarketDescriptor,
}

impl SwitchContinuation {
    #[must_use]
    pub fn encode(&self) -> Bytes {
        SwitchMarket {
            prevMarket: (&self.prev_market).into(),
            newMarket: (&self.new_market).into(),
        }
        .abi_encode()
        .into()
    }

    /// # Errors
    ///
    /// Returns [`OrchestratorError::MalformedContinuation`] on invalid bytes.
    pub fn decode(data: &[u8]) -> Result<Self, OrchestratorError> {
        let raw = SwitchMarket::abi_decode(data).map_err(malformed)?;
        Ok(Self {
            prev_market: raw.prevMarket.into(),
            new_market: raw.newMarket.into(),
        })
    }
}

/// Everything the repay callback can be asked to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum RepayContinuation {
    Close(CloseContinuation),
    MarketSwitch(SwitchContinuation),
}

impl RepayContinuation {
    /// Wire discriminator of this variant.
    #[must_use]
    pub const fn discriminator(&self) -> u8 {
        match self {
            Self::Close(_) => CLOSE_DISCRIMINATOR,
            Self::MarketSwitch(_) => SWITCH_DISCRIMINATOR,
        }
    }

    /// Encode the full envelope, discriminator included.
    #[must_use]
    pub fn encode(&self) -> Bytes {
        let payload = match self {
            Self::Close(close) => close.encode(),
            Self::MarketSwitch(switch) => switch.encode(),
        };
        wrap(self.discriminator(), payload)
    }

    /// Decode an envelope and the payload it selects.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestratorError::InvalidCallbackDiscriminator`] for an
    /// unknown tag and [`OrchestratorError::MalformedContinuation`] if either
    /// layer fails to decode.
    pub fn decode(data: &[u8]) -> Result<Self, OrchestratorError> {
        let envelope = RepayEnvelope::abi_decode(data).map_err(malformed)?;
        match envelope.action {
            CLOSE_DISCRIMINATOR => Ok(Self::Close(CloseContinuation::decode(&envelope.payload)?)),
            SWITCH_DISCRIMINATOR => Ok(Self::MarketSwitch(SwitchContinuation::decode(
                &envelope.payload,
            )?)),
            other => Err(OrchestratorError::InvalidCallbackDiscriminator(other)),
        }
    }
}

/// Wrap an already-encoded payload in a repay envelope.
#[must_use]
pub fn wrap(discriminator: u8, payload: impl Into<Bytes>) -> Bytes {
    RepayEnvelope {
        action: discriminator,
        payload: payload.into(),
    }
    .abi_encode()
    .into()
}
