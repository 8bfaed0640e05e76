//! Share accounting with virtual offsets.
//!
//! Every market behaves as if it held `VIRTUAL_ASSETS` assets backing
//! `VIRTUAL_SHARES` shares, which pins the initial share price and keeps the
//! conversions well defined on an empty market.

use alloy_primitives::U256;

use crate::domain::WAD;
use crate::error::LedgerError;

pub const VIRTUAL_SHARES: u64 = 1_000_000;
pub const VIRTUAL_ASSETS: u64 = 1;

type MathResult = Result<U256, LedgerError>;

/// Scale of oracle prices: one unit of collateral is worth `price / 1e36` loan units.
#[must_use]
pub fn oracle_price_scale() -> U256 {
    U256::from(WAD) * U256::from(WAD)
}

pub fn mul_div_down(x: U256, y: U256, d: U256) -> MathResult {
    x.checked_mul(y)
        .ok_or(LedgerError::MathOverflow)?
        .checked_div(d)
        .ok_or(LedgerError::MathOverflow)
}

pub fn mul_div_up(x: U256, y: U256, d: U256) -> MathResult {
    if d.is_zero() {
        return Err(LedgerError::MathOverflow);
    }
    x.checked_mul(y)
        .ok_or(LedgerError::MathOverflow)?
        .checked_add(d - U256::from(1))
        .ok_or(LedgerError::MathOverflow)
        .map(|numerator| numerator / d)
}

/// `x * y / WAD`, rounded down.
pub fn w_mul_down(x: U256, y: U256) -> MathResult {
    mul_div_down(x, y, U256::from(WAD))
}

fn offsets(total_assets: U256, total_shares: U256) -> Result<(U256, U256), LedgerError> {
    let assets = total_assets
        .checked_add(U256::from(VIRTUAL_ASSETS))
        .ok_or(LedgerError::MathOverflow)?;
    let shares = total_shares
        .checked_add(U256::from(VIRTUAL_SHARES))
        .ok_or(LedgerError::MathOverflow)?;
    Ok((assets, shares))
}

pub fn to_shares_down(assets: U256, total_assets: U256, total_shares: U256) -> MathResult {
    let (a, s) = offsets(total_assets, total_shares)?;
    mul_div_down(assets, s, a)
}

pub fn to_shares_up(assets: U256, total_assets: U256, total_shares: U256) -> MathResult {
    let (a, s) = offsets(total_assets, total_shares)?;
    mul_div_up(assets, s, a)
}

pub fn to_assets_down(shares: U256, total_assets: U256, total_shares: U256) -> MathResult {
    let (a, s) = offsets(total_assets, total_shares)?;
    mul_div_down(shares, a, s)
}

pub fn to_assets_up(shares: U256, total_assets: U256, total_shares: U256) -> MathResult {
    let (a, s) = offsets(total_assets, total_shares)?;
    mul_div_up(shares, a, s)
}
