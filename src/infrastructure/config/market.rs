//! Named lending market definitions.

use std::str::FromStr;

use alloy_primitives::{Address, U256};
use serde::Deserialize;

use crate::domain::{MarketDescriptor, WAD};
use crate::error::ConfigError;

/// A `[markets.<name>]` table.
///
/// `lltv` is a WAD-scaled string, decimal or `0x`-prefixed hex, so values
/// beyond the TOML integer range can be written out exactly.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketConfig {
    pub loan_token: Address,
    pub collateral_token: Address,
    pub oracle: Address,
    #[serde(default)]
    pub irm: Address,
    pub lltv: String,
}

impl MarketConfig {
    /// Parse into the descriptor the ledger identifies the market by.
    ///
    /// # Errors
    ///
    /// Fails if `lltv` does not parse or is not strictly between 0 and 1e18.
    pub fn descriptor(&self) -> Result<MarketDescriptor, ConfigError> {
        let lltv = U256::from_str(self.lltv.trim()).map_err(|e| ConfigError::InvalidValue {
            field: "lltv",
            reason: e.to_string(),
        })?;
        if lltv.is_zero() || lltv >= U256::from(WAD) {
            return Err(ConfigError::InvalidValue {
                field: "lltv",
                reason: format!("{lltv} must be nonzero and below 1e18"),
            });
        }
        if self.loan_token.is_zero() {
            return Err(ConfigError::MissingField { field: "loan_token" });
        }
        if self.collateral_token.is_zero() {
            return Err(ConfigError::MissingField {
                field: "collateral_token",
            });
        }

        Ok(MarketDescriptor {
            loan_token: self.loan_token,
            collateral_token: self.collateral_token,
            oracle: self.oracle,
            irm: self.irm,
            lltv,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn market(lltv: &str) -> MarketConfig {
        MarketConfig {
            loan_token: Address::repeat_byte(0x10),
            collateral_token: Address::repeat_byte(0x20),
            oracle: Address::repeat_byte(0x30),
            irm: Address::ZERO,
            lltv: lltv.into(),
        }
    }

    #[test]
    fn decimal_and_hex_lltv_agree() {
        let decimal = market("860000000000000000").descriptor().unwrap();
        let hex = market("0xbef55718ad60000").descriptor().unwrap();
        assert_eq!(decimal.lltv, hex.lltv);
        assert_eq!(decimal.id(), hex.id());
    }

    #[test]
    fn lltv_must_be_a_fraction() {
        for bad in ["0", "1000000000000000000", "abc", "-1"] {
            assert!(
                matches!(
                    market(bad).descriptor(),
                    Err(ConfigError::InvalidValue { field: "lltv", .. })
                ),
                "{bad} accepted"
            );
        }
    }

    #[test]
    fn zero_loan_token_is_missing() {
        let mut config = market("860000000000000000");
        config.loan_token = Address::ZERO;
        assert!(matches!(
            config.descriptor(),
            Err(ConfigError::MissingField { field: "loan_token" })
        ));
    }
}
