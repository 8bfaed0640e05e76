//! Ledger-agnostic domain types.

pub mod abi;
pub mod continuation;
mod id;
mod market;
mod position;

pub use continuation::{
    CloseContinuation, OpenContinuation, RepayContinuation, SwitchContinuation,
    CLOSE_DISCRIMINATOR, SWITCH_DISCRIMINATOR,
};
pub use id::MarketId;
pub use market::{MarketDescriptor, WAD};
pub use position::Position;
