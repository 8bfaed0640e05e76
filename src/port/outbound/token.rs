//! Asset transfer port.
//!
//! Multi-asset balance book with ERC-20 semantics. Allowances are additive:
//! granting adds to whatever is already approved, it never overwrites.

use alloy_primitives::{Address, U256};

use crate::error::Result;

/// Port for moving fungible assets between accounts.
///
/// The acting account is always an explicit argument (`from` for
/// [`transfer`](Self::transfer), `spender` for
/// [`transfer_from`](Self::transfer_from), `owner` for grants).
pub trait TokenLedger: Send + Sync {
    fn balance_of(&self, token: Address, owner: Address) -> U256;

    fn allowance(&self, token: Address, owner: Address, spender: Address) -> U256;

    /// Move `amount` from `from` to `to`, acting as `from`.
    fn transfer(&self, token: Address, from: Address, to: Address, amount: U256) -> Result<()>;

    /// Move `amount` from `from` to `to`, spending the allowance `from`
    /// granted to `spender`.
    fn transfer_from(
        &self,
        token: Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<()>;

    /// Add `amount` to the allowance `owner` grants `spender`.
    fn increase_allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
        amount: U256,
    ) -> Result<()>;
}
