//! Capability checks for gated operations.
//!
//! Role administration is an external concern; the engine consults it as an
//! explicit precondition check at the top of each gated operation rather
//! than through any attribute-style guard.

use serde::{Deserialize, Serialize};
use stakecast_types::AccountId;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Capabilities consulted by gated operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    /// May create events and update the eligibility tag set.
    Manager,
    /// May grant/revoke manager capability and trigger emergency sweeps.
    Administrator,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Manager => write!(f, "manager"),
            Capability::Administrator => write!(f, "administrator"),
        }
    }
}

/// Interface to the external capability administration.
pub trait CapabilityRegistry: Send + Sync {
    fn has_capability(&self, account: AccountId, capability: Capability) -> bool;
    fn grant(&mut self, account: AccountId, capability: Capability);
    fn revoke(&mut self, account: AccountId, capability: Capability);
}

/// In-memory capability store, bootstrapped with a single administrator.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCapabilities {
    grants: HashMap<AccountId, HashSet<Capability>>,
}

impl InMemoryCapabilities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with `admin` holding the administrator capability.
    pub fn with_administrator(admin: AccountId) -> Self {
        let mut store = Self::default();
        store.grant(admin, Capability::Administrator);
        store
    }
}

impl CapabilityRegistry for InMemoryCapabilities {
    fn has_capability(&self, account: AccountId, capability: Capability) -> bool {
        self.grants
            .get(&account)
            .map(|caps| caps.contains(&capability))
            .unwrap_or(false)
    }

    fn grant(&mut self, account: AccountId, capability: Capability) {
        self.grants.entry(account).or_default().insert(capability);
    }

    fn revoke(&mut self, account: AccountId, capability: Capability) {
        if let Some(caps) = self.grants.get_mut(&account) {
            caps.remove(&capability);
        }
    }
}
