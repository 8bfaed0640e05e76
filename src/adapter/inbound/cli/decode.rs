//! Callback payload inspection.

use crate::adapter::inbound::cli::command::DecodeCommand;
use crate::adapter::inbound::cli::output;
use crate::domain::{OpenContinuation, RepayContinuation};
use crate::error::Result;

pub fn execute(command: &DecodeCommand) -> Result<()> {
    match command {
        DecodeCommand::Supply(args) => {
            let continuation = OpenContinuation::decode(&args.data)?;
            output::document("supply", serde_json::to_value(&continuation)?);
        }
        DecodeCommand::Repay(args) => {
            let continuation = RepayContinuation::decode(&args.data)?;
            output::document("repay", serde_json::to_value(&continuation)?);
        }
    }
    Ok(())
}
