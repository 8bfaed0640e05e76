//! Infrastructure layer.
//!
//! Technical concerns that support the application without containing
//! business logic.
//!
//! # Submodules
//!
//! - [`config`] - Configuration loading and validation

pub mod config;

pub use config::logging::LoggingConfig;
pub use config::market::MarketConfig;
pub use config::settings::{Config, OrchestratorConfig};
