//! Structured records of every state-changing operation.
//!
//! External systems index these for auditing; the shape is a compatibility
//! surface and is pinned by tests.

use serde::{Deserialize, Serialize};
use stakecast_types::{AccountId, Amount, CredentialTag, Epoch, EventId, Units};

/// One observable engine operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuditRecord {
    EventCreated {
        id: EventId,
        start_epoch: Epoch,
        end_epoch: Epoch,
        total_reward_pool: Amount,
        requires_eligibility: bool,
        max_per_wallet: Amount,
    },
    DepositRecorded {
        id: EventId,
        account: AccountId,
        amount: Amount,
        units: Units,
        epoch: Epoch,
    },
    RewardClaimed {
        id: EventId,
        account: AccountId,
        principal: Amount,
        reward: Amount,
        epoch: Epoch,
    },
    EligibilityTagsUpdated {
        tags: Vec<CredentialTag>,
    },
    /// Unilateral administrative withdrawal of all custodied funds,
    /// bypassing per-event accounting.
    EmergencySweep {
        to: AccountId,
        amount: Amount,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_shape_is_tagged() {
        let record = AuditRecord::DepositRecorded {
            id: 1,
            account: 7,
            amount: 100,
            units: 10_000,
            epoch: 100,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["kind"], "deposit_recorded");
        assert_eq!(json["units"], 10_000);
    }
}
