use std::collections::HashMap;
use std::sync::Arc;

use alloy_primitives::Address;
use parking_lot::RwLock;

use crate::port::outbound::{AdapterResolver, SwapAdapter};

/// Address book of deployed swap adapters.
#[derive(Default)]
pub struct AdapterRegistry {
    adapters: RwLock<HashMap<Address, Arc<dyn SwapAdapter>>>,
}

impl AdapterRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Deploy `adapter` at `address`, replacing whatever was there.
    pub fn register(&self, address: Address, adapter: Arc<dyn SwapAdapter>) {
        self.adapters.write().insert(address, adapter);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.adapters.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.adapters.read().is_empty()
    }
}

impl AdapterResolver for AdapterRegistry {
    fn resolve(&self, address: Address) -> Option<Arc<dyn SwapAdapter>> {
        self.adapters.read().get(&address).cloned()
    }
}
