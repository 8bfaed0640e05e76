//! CLI module graph.

pub mod check;
pub mod command;
pub mod decode;
pub mod encode;
pub mod market;
pub mod output;
pub mod simulate;

pub use command::{Cli, Commands};

use crate::error::Result;
use command::CheckCommand;

/// Dispatch a parsed command line.
pub fn execute(cli: Cli) -> Result<()> {
    output::configure(output::OutputConfig::new(cli.json, cli.quiet));

    match cli.command {
        Commands::Check(CheckCommand::Config(args)) => check::config::execute_config(&args.config),
        Commands::MarketId(args) => market::execute(&args),
        Commands::Encode(command) => encode::execute(&command),
        Commands::Decode(command) => decode::execute(&command),
        Commands::Simulate(args) => simulate::execute(&args),
    }
}
