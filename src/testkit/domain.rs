//! Builders for domain primitives used across tests.
//!
//! Fixed addresses for every actor of a leverage flow plus concise factory
//! functions for amounts and markets, so tests focus on assertions rather
//! than construction boilerplate.

use alloy_primitives::{address, Address, U256};

use crate::domain::{MarketDescriptor, WAD};

pub const LEDGER: Address = address!("bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb");
pub const ORCHESTRATOR: Address = address!("0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c");
pub const ROUTER: Address = address!("5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a");
pub const LENDER: Address = address!("1e1e1e1e1e1e1e1e1e1e1e1e1e1e1e1e1e1e1e1e");
pub const INITIATOR: Address = address!("a11ce00000000000000000000000000000000000");
pub const STRANGER: Address = address!("5757575757575757575757575757575757575757");

pub const LOAN: Address = address!("1010101010101010101010101010101010101010");
pub const COLLATERAL: Address = address!("2020202020202020202020202020202020202020");
pub const ORACLE: Address = address!("3030303030303030303030303030303030303030");

/// Whole token units; the tests work in integers.
pub fn units(amount: u64) -> U256 {
    U256::from(amount)
}

/// WAD-scaled fraction from basis points.
pub fn wad_bps(bps: u64) -> U256 {
    U256::from(WAD) * U256::from(bps) / U256::from(10_000)
}

/// Oracle price making one collateral unit worth one loan unit.
pub fn par_price() -> U256 {
    U256::from(WAD) * U256::from(WAD)
}

/// Market over [`LOAN`] and [`COLLATERAL`]; `irm_byte` tells otherwise
/// identical markets apart.
pub fn market(lltv_bps: u64, irm_byte: u8) -> MarketDescriptor {
    MarketDescriptor {
        loan_token: LOAN,
        collateral_token: COLLATERAL,
        oracle: ORACLE,
        irm: Address::repeat_byte(irm_byte),
        lltv: wad_bps(lltv_bps),
    }
}
