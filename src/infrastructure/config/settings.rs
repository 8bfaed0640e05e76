//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all settings of the
//! orchestrator deployment: who the orchestrator and the ledger are, which swap
//! adapters continuations may name, and the markets it operates on.
//!
//! # Example
//!
//! ```no_run
//! use leverage_orchestrator::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use alloy_primitives::Address;
use serde::Deserialize;

use super::logging::LoggingConfig;
use super::market::MarketConfig;
use crate::application::orchestration::AdapterPolicy;
use crate::domain::MarketDescriptor;
use crate::error::{ConfigError, Result};

/// Deployment of the orchestrator itself.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Address the orchestrator acts as.
    pub address: Address,
    /// Address of the lending ledger, the only legitimate callback caller.
    pub ledger: Address,
    /// Swap adapters continuations may name. Empty admits any adapter.
    pub allowed_adapters: Vec<Address>,
}

/// Main application configuration.
///
/// Load from a TOML file using [`Config::load`] or parse directly with
/// [`Config::parse_toml`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    pub orchestrator: OrchestratorConfig,

    /// Markets by name.
    #[serde(default)]
    pub markets: BTreeMap<String, MarketConfig>,
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    fn validate(&self) -> Result<()> {
        let orchestrator = &self.orchestrator;
        if orchestrator.address.is_zero() {
            return Err(ConfigError::MissingField {
                field: "orchestrator.address",
            }
            .into());
        }
        if orchestrator.ledger.is_zero() {
            return Err(ConfigError::MissingField {
                field: "orchestrator.ledger",
            }
            .into());
        }
        if orchestrator.address == orchestrator.ledger {
            return Err(ConfigError::InvalidValue {
                field: "orchestrator.ledger",
                reason: "must differ from the orchestrator address".to_string(),
            }
            .into());
        }
        if orchestrator.allowed_adapters.contains(&orchestrator.ledger) {
            return Err(ConfigError::InvalidValue {
                field: "orchestrator.allowed_adapters",
                reason: "the ledger cannot be a swap adapter".to_string(),
            }
            .into());
        }

        for (name, market) in &self.markets {
            market.descriptor().map_err(|e| match e {
                ConfigError::InvalidValue { field, reason } => ConfigError::InvalidValue {
                    field,
                    reason: format!("market '{name}': {reason}"),
                },
                other => other,
            })?;
        }
        Ok(())
    }

    /// Look up a configured market by name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownMarket`] if no market has that name.
    pub fn market(&self, name: &str) -> Result<MarketDescriptor> {
        let market = self
            .markets
            .get(name)
            .ok_or_else(|| ConfigError::UnknownMarket {
                name: name.to_string(),
            })?;
        Ok(market.descriptor()?)
    }

    /// Swap adapter admission derived from `allowed_adapters`.
    #[must_use]
    pub fn adapter_policy(&self) -> AdapterPolicy {
        AdapterPolicy::from_allowed(self.orchestrator.allowed_adapters.iter().copied())
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}
