//! In-memory collaborators: asset book, lending ledger, swap venue and the
//! chain that ties them into one unit of execution.

mod chain;
mod ledger;
mod registry;
pub mod shares;
mod swap;
mod token;

pub use chain::{ChainSnapshot, InMemoryChain};
pub use ledger::{InMemoryLedger, LedgerSnapshot, MarketTotals};
pub use registry::AdapterRegistry;
pub use swap::{encode_order, FixedRateSwapAdapter, SwapOrder};
pub use token::{InMemoryTokens, TokenSnapshot};
