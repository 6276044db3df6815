//! Eligibility gating for deposit admission.
//!
//! The credential logic itself lives in an external oracle; the gate is a
//! stateless pass-through the service consults for events that require it.

use stakecast_types::{AccountId, CredentialTag};
use std::collections::{HashMap, HashSet};

/// Interface to the external eligibility oracle.
pub trait EligibilityOracle: Send + Sync {
    /// Whether the account holds at least one of the given tags. Pure query.
    fn holds_any(&self, account: AccountId, tags: &[CredentialTag]) -> bool;
}

/// Stateless wrapper around the oracle.
pub struct EligibilityGate {
    oracle: Box<dyn EligibilityOracle>,
}

impl EligibilityGate {
    pub fn new(oracle: Box<dyn EligibilityOracle>) -> Self {
        Self { oracle }
    }

    pub fn is_eligible(&self, account: AccountId, tags: &[CredentialTag]) -> bool {
        self.oracle.holds_any(account, tags)
    }
}

/// Map-backed oracle for tests and demos.
#[derive(Debug, Clone, Default)]
pub struct StaticEligibilityOracle {
    held: HashMap<AccountId, HashSet<CredentialTag>>,
}

impl StaticEligibilityOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self, account: AccountId, tag: impl Into<CredentialTag>) {
        self.held.entry(account).or_default().insert(tag.into());
    }
}

impl EligibilityOracle for StaticEligibilityOracle {
    fn holds_any(&self, account: AccountId, tags: &[CredentialTag]) -> bool {
        match self.held.get(&account) {
            Some(held) => tags.iter().any(|tag| held.contains(tag)),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(names: &[&str]) -> Vec<CredentialTag> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_holds_any_matches_one_of_set() {
        let mut oracle = StaticEligibilityOracle::new();
        oracle.issue(1, "kyc.tier1");

        assert!(oracle.holds_any(1, &tags(&["kyc.tier1", "kyc.tier2"])));
        assert!(!oracle.holds_any(1, &tags(&["kyc.tier2"])));
        assert!(!oracle.holds_any(2, &tags(&["kyc.tier1"])));
    }

    #[test]
    fn test_empty_tag_set_never_matches() {
        let mut oracle = StaticEligibilityOracle::new();
        oracle.issue(1, "kyc.tier1");

        let gate = EligibilityGate::new(Box::new(oracle));
        assert!(!gate.is_eligible(1, &[]));
    }
}
