//! Swap adapter admission.

use std::collections::HashSet;

use alloy_primitives::Address;

use crate::error::OrchestratorError;

/// Which swap adapters a continuation may name.
///
/// The ledger itself is never acceptable: the orchestrator holds the
/// initiator's authorization on the ledger, so handing the ledger an
/// arbitrary call would let a caller spend that authorization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AdapterPolicy {
    /// Any address other than the ledger.
    #[default]
    Any,
    /// Only the listed addresses.
    AllowList(HashSet<Address>),
}

impl AdapterPolicy {
    /// Build a policy from configured addresses; an empty list admits any adapter.
    pub fn from_allowed(adapters: impl IntoIterator<Item = Address>) -> Self {
        let allowed: HashSet<Address> = adapters.into_iter().collect();
        if allowed.is_empty() {
            Self::Any
        } else {
            Self::AllowList(allowed)
        }
    }

    /// Decide whether `adapter` may be called while `ledger` is the ledger.
    ///
    /// # Errors
    ///
    /// [`OrchestratorError::ConfusedDeputy`] when the adapter is the ledger,
    /// [`OrchestratorError::AdapterNotAllowed`] when an allow-list excludes it.
    pub fn check(&self, ledger: Address, adapter: Address) -> Result<(), OrchestratorError> {
        if adapter == ledger {
            return Err(OrchestratorError::ConfusedDeputy { adapter });
        }
        match self {
            Self::Any => Ok(()),
            Self::AllowList(allowed) if allowed.contains(&adapter) => Ok(()),
            Self::AllowList(_) => Err(OrchestratorError::AdapterNotAllowed { adapter }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use alloy_primitives::address;

    const LEDGER: Address = address!("4c4c4c4c4c4c4c4c4c4c4c4c4c4c4c4c4c4c4c4c");
    const ROUTER: Address = address!("5252525252525252525252525252525252525252");

    #[test]
    fn ledger_is_rejected_even_when_listed() {
        let policy = AdapterPolicy::from_allowed([LEDGER]);
        assert_eq!(
            policy.check(LEDGER, LEDGER),
            Err(OrchestratorError::ConfusedDeputy { adapter: LEDGER })
        );
        assert_eq!(
            AdapterPolicy::Any.check(LEDGER, LEDGER),
            Err(OrchestratorError::ConfusedDeputy { adapter: LEDGER })
        );
    }

    #[test]
    fn empty_list_admits_anything_but_the_ledger() {
        let policy = AdapterPolicy::from_allowed(Vec::new());
        assert_eq!(policy, AdapterPolicy::Any);
        assert!(policy.check(LEDGER, ROUTER).is_ok());
    }

    #[test]
    fn allow_list_excludes_unlisted_adapters() {
        let policy = AdapterPolicy::from_allowed([ROUTER]);
        assert!(policy.check(LEDGER, ROUTER).is_ok());

        let stranger = Address::repeat_byte(0x99);
        assert_eq!(
            policy.check(LEDGER, stranger),
            Err(OrchestratorError::AdapterNotAllowed { adapter: stranger })
        );
    }
}
