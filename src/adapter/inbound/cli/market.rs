use crate::adapter::inbound::cli::command::MarketIdArgs;
use crate::adapter::inbound::cli::output;
use crate::error::Result;
use crate::infrastructure::Config;

/// Print the ledger id of a configured market.
pub fn execute(args: &MarketIdArgs) -> Result<()> {
    let config = Config::load(&args.config.config)?;
    let market = config.market(&args.name)?;
    output::value("market_id", market.id());
    Ok(())
}
