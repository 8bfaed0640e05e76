//! Canonical test configurations.
//!
//! Single source of truth for config documents used across tests.

/// A complete, valid configuration with two compatible markets.
pub fn sample_toml() -> &'static str {
    r#"
[logging]
level = "debug"
format = "json"

[orchestrator]
address = "0x0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c"
ledger = "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb"
allowed_adapters = ["0x5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a"]

[markets.origin]
loan_token = "0x1010101010101010101010101010101010101010"
collateral_token = "0x2020202020202020202020202020202020202020"
oracle = "0x3030303030303030303030303030303030303030"
irm = "0x0101010101010101010101010101010101010101"
lltv = "860000000000000000"

[markets.target]
loan_token = "0x1010101010101010101010101010101010101010"
collateral_token = "0x2020202020202020202020202020202020202020"
oracle = "0x3030303030303030303030303030303030303030"
irm = "0x0202020202020202020202020202020202020202"
lltv = "0xcb2bba6f17b8000"
"#
}
