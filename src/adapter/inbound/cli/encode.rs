//! Continuation builders.

use alloy_primitives::hex;

use crate::adapter::inbound::cli::command::{
    EncodeCloseArgs, EncodeCommand, EncodeOpenArgs, EncodeSwitchArgs,
};
use crate::adapter::inbound::cli::output;
use crate::domain::{CloseContinuation, OpenContinuation, RepayContinuation, SwitchContinuation};
use crate::error::Result;
use crate::infrastructure::Config;

pub fn execute(command: &EncodeCommand) -> Result<()> {
    match command {
        EncodeCommand::Open(args) => open(args),
        EncodeCommand::Close(args) => close(args),
        EncodeCommand::Switch(args) => switch(args),
    }
}

fn open(args: &EncodeOpenArgs) -> Result<()> {
    let config = Config::load(&args.config.config)?;
    let continuation = OpenContinuation {
        market: config.market(&args.market)?,
        borrow_amount: args.borrow,
        top_up_amount: args.top_up,
        swap_adapter: args.adapter,
        swap_instruction: args.swap_data.clone(),
    };
    output::value("continuation", hex::encode_prefixed(continuation.encode()));
    Ok(())
}

fn close(args: &EncodeCloseArgs) -> Result<()> {
    let config = Config::load(&args.config.config)?;
    let continuation = CloseContinuation {
        market: config.market(&args.market)?,
        withdraw_amount: args.withdraw,
        swap_adapter: args.adapter,
        swap_instruction: args.swap_data.clone(),
    };

    let encoded = if args.envelope {
        RepayContinuation::Close(continuation).encode()
    } else {
        continuation.encode()
    };
    output::value("continuation", hex::encode_prefixed(encoded));
    Ok(())
}

fn switch(args: &EncodeSwitchArgs) -> Result<()> {
    let config = Config::load(&args.config.config)?;
    let continuation = RepayContinuation::MarketSwitch(SwitchContinuation {
        prev_market: config.market(&args.from)?,
        new_market: config.market(&args.to)?,
    });
    output::value("continuation", hex::encode_prefixed(continuation.encode()));
    Ok(())
}
