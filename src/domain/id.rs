//! Domain identifier types with proper encapsulation.

use std::fmt;

use alloy_primitives::B256;
use serde::{Deserialize, Serialize};

/// Lending market identifier - newtype for type safety.
///
/// Derived from a [`MarketDescriptor`](super::MarketDescriptor) by hashing its
/// ABI encoding, so two descriptors with the same fields always share an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MarketId(B256);

impl MarketId {
    /// Create a new `MarketId` from a raw 32-byte hash.
    #[must_use]
    pub const fn new(hash: B256) -> Self {
        Self(hash)
    }

    /// Get the underlying hash.
    #[must_use]
    pub const fn as_b256(&self) -> &B256 {
        &self.0
    }
}

impl fmt::Display for MarketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<B256> for MarketId {
    fn from(hash: B256) -> Self {
        Self::new(hash)
    }
}
