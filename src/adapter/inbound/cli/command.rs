//! Command-line interface definitions.
//!
//! Defines the CLI structure for `leverctl` using `clap`. The CLI validates
//! configuration, derives market ids, builds and inspects continuation
//! payloads, and replays a leverage walkthrough on in-memory collaborators.

use std::path::PathBuf;

use alloy_primitives::{Address, Bytes, U256};
use clap::{Parser, Subcommand};

/// Leveraged position orchestration toolkit
#[derive(Parser, Debug)]
#[command(name = "leverctl")]
#[command(version)]
pub struct Cli {
    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the leverctl CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run diagnostic checks
    #[command(subcommand)]
    Check(CheckCommand),

    /// Print the id of a configured market
    MarketId(MarketIdArgs),

    /// Build continuation payloads
    #[command(subcommand)]
    Encode(EncodeCommand),

    /// Decode callback payloads to JSON
    #[command(subcommand)]
    Decode(DecodeCommand),

    /// Replay open, close and market switch on an in-memory ledger
    Simulate(SimulateArgs),
}

/// Subcommands for `leverctl check`.
#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Validate the configuration file syntax and semantics.
    Config(ConfigPathArg),
}

/// Subcommands for `leverctl encode`.
#[derive(Subcommand, Debug)]
pub enum EncodeCommand {
    /// Continuation for `open_leverage`.
    Open(EncodeOpenArgs),
    /// Continuation for `close_leverage`.
    Close(EncodeCloseArgs),
    /// Repay data the ledger forwards during `switch_market`.
    Switch(EncodeSwitchArgs),
}

/// Subcommands for `leverctl decode`.
#[derive(Subcommand, Debug)]
pub enum DecodeCommand {
    /// Data of a supply-collateral callback.
    Supply(DecodeArgs),
    /// Data of a repay callback.
    Repay(DecodeArgs),
}

/// Shared argument struct for commands that require only a configuration path.
#[derive(Parser, Debug)]
pub struct ConfigPathArg {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,
}

#[derive(Parser, Debug)]
pub struct MarketIdArgs {
    /// Market name under `[markets]`.
    pub name: String,

    #[command(flatten)]
    pub config: ConfigPathArg,
}

#[derive(Parser, Debug)]
pub struct EncodeOpenArgs {
    /// Market name under `[markets]`.
    #[arg(long)]
    pub market: String,

    /// Loan asset to borrow.
    #[arg(long)]
    pub borrow: U256,

    /// Collateral pulled from the initiator.
    #[arg(long, default_value = "0")]
    pub top_up: U256,

    /// Swap adapter address.
    #[arg(long)]
    pub adapter: Address,

    /// Hex instruction handed to the adapter.
    #[arg(long, default_value = "0x")]
    pub swap_data: Bytes,

    #[command(flatten)]
    pub config: ConfigPathArg,
}

#[derive(Parser, Debug)]
pub struct EncodeCloseArgs {
    /// Market name under `[markets]`.
    #[arg(long)]
    pub market: String,

    /// Collateral to withdraw and swap.
    #[arg(long)]
    pub withdraw: U256,

    /// Swap adapter address.
    #[arg(long)]
    pub adapter: Address,

    /// Hex instruction handed to the adapter.
    #[arg(long, default_value = "0x")]
    pub swap_data: Bytes,

    /// Wrap in the repay envelope, as the ledger forwards it.
    #[arg(long)]
    pub envelope: bool,

    #[command(flatten)]
    pub config: ConfigPathArg,
}

#[derive(Parser, Debug)]
pub struct EncodeSwitchArgs {
    /// Market the position leaves.
    #[arg(long)]
    pub from: String,

    /// Market the position moves to.
    #[arg(long)]
    pub to: String,

    #[command(flatten)]
    pub config: ConfigPathArg,
}

#[derive(Parser, Debug)]
pub struct SimulateArgs {
    /// Market the position is opened on.
    #[arg(long, default_value = "origin")]
    pub from: String,

    /// Market the position is switched to.
    #[arg(long, default_value = "target")]
    pub to: String,

    #[command(flatten)]
    pub config: ConfigPathArg,
}

#[derive(Parser, Debug)]
pub struct DecodeArgs {
    /// Hex payload, `0x` prefix optional.
    pub data: Bytes,
}
