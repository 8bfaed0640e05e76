//! Fixed-rate swap venue.

use std::collections::HashMap;
use std::sync::Arc;

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{sol, SolValue};
use tracing::debug;

use crate::error::{Result, SwapError};
use crate::port::outbound::{SwapAdapter, TokenLedger};

sol! {
    /// Instruction understood by [`FixedRateSwapAdapter`].
    struct SwapOrder {
        address tokenIn;
        address tokenOut;
        uint256 amountIn;
        uint256 minAmountOut;
    }
}

/// ABI-encode a swap order for [`FixedRateSwapAdapter`].
#[must_use]
pub fn encode_order(
    token_in: Address,
    token_out: Address,
    amount_in: U256,
    min_amount_out: U256,
) -> Bytes {
    SwapOrder {
        tokenIn: token_in,
        tokenOut: token_out,
        amountIn: amount_in,
        minAmountOut: min_amount_out,
    }
    .abi_encode()
    .into()
}

#[derive(Debug, Clone, Copy)]
struct Rate {
    numerator: U256,
    denominator: U256,
}

/// Swap adapter quoting every pair at a fixed rational rate out of its own
/// inventory.
///
/// The input side is pulled from the caller through the allowance the caller
/// granted to the adapter's address, and the output is sent straight back.
pub struct FixedRateSwapAdapter {
    address: Address,
    tokens: Arc<dyn TokenLedger>,
    rates: HashMap<(Address, Address), Rate>,
}

impl FixedRateSwapAdapter {
    pub fn new(address: Address, tokens: Arc<dyn TokenLedger>) -> Self {
        Self {
            address,
            tokens,
            rates: HashMap::new(),
        }
    }

    /// Quote `token_in -> token_out` at `numerator / denominator`.
    #[must_use]
    pub fn with_rate(
        mut self,
        token_in: Address,
        token_out: Address,
        numerator: U256,
        denominator: U256,
    ) -> Self {
        self.rates.insert(
            (token_in, token_out),
            Rate {
                numerator,
                denominator,
            },
        );
        self
    }

    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    /// Output for `amount_in`, rounded down.
    ///
    /// # Errors
    ///
    /// Fails if the pair has no rate or the product overflows.
    pub fn quote(&self, token_in: Address, token_out: Address, amount_in: U256) -> Result<U256> {
        let rate = self
            .rates
            .get(&(token_in, token_out))
            .ok_or(SwapError::UnsupportedPair {
                token_in,
                token_out,
            })?;
        let out = amount_in
            .checked_mul(rate.numerator)
            .and_then(|product| product.checked_div(rate.denominator))
            .ok_or_else(|| SwapError::Rejected("rate overflow".into()))?;
        Ok(out)
    }
}

impl SwapAdapter for FixedRateSwapAdapter {
    fn execute(&self, caller: Address, instruction: &[u8]) -> Result<()> {
        let order = SwapOrder::abi_decode(instruction)
            .map_err(|e| SwapError::InvalidInstruction(e.to_string()))?;

        let amount_out = self.quote(order.tokenIn, order.tokenOut, order.amountIn)?;
        if amount_out < order.minAmountOut {
            return Err(SwapError::SlippageExceeded {
                amount_out,
                min_amount_out: order.minAmountOut,
            }
            .into());
        }

        self.tokens.transfer_from(
            order.tokenIn,
            self.address,
            caller,
            self.address,
            order.amountIn,
        )?;
        self.tokens
            .transfer(order.tokenOut, self.address, caller, amount_out)?;

        debug!(
            caller = %caller,
            token_in = %order.tokenIn,
            amount_in = %order.amountIn,
            token_out = %order.tokenOut,
            amount_out = %amount_out,
            "Swap filled"
        );
        Ok(())
    }
}
