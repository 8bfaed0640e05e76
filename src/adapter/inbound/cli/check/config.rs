use std::path::Path;

use crate::adapter::inbound::cli::output;
use crate::application::orchestration::AdapterPolicy;
use crate::error::Result;
use crate::infrastructure::Config;

/// Validate a configuration file and summarize what it deploys.
pub fn execute_config<P: AsRef<Path>>(config_path: P) -> Result<()> {
    let path = config_path.as_ref();
    let config = Config::load(path)?;

    output::section("Configuration Check");
    output::field("Config", path.display());
    output::success("Configuration file is valid");

    output::section("Summary");
    output::field("Orchestrator", config.orchestrator.address);
    output::field("Ledger", config.orchestrator.ledger);
    match config.adapter_policy() {
        AdapterPolicy::Any => {
            output::warning("No adapter allow-list: continuations may name any swap adapter");
        }
        AdapterPolicy::AllowList(allowed) => {
            output::field("Adapters", format!("{} allowed", allowed.len()));
        }
    }

    if config.markets.is_empty() {
        output::warning("No markets configured");
    }
    for (name, market) in &config.markets {
        let descriptor = market.descriptor()?;
        output::field(name, descriptor.id());
    }

    output::success("Configuration check complete");
    Ok(())
}
