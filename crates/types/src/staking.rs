//! Core staking record types shared between the engine and external
//! consumers (indexers, RPC surfaces, tests).
//!
//! ## Key Invariants
//! - `end_epoch > start_epoch` for the life of a [`StakingEvent`]
//! - `total_staked` equals the sum of all live stake principal in the event
//! - `total_units` is cumulative: deposits increase it, claims never do
//! - `is_active` false-flips exactly once and never returns to true

use crate::scalars::{Amount, Epoch, EventId, Units};
use serde::{Deserialize, Serialize};

/// Lifecycle phase of a staking event at a given epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventPhase {
    /// Before `start_epoch`; no deposits admitted yet.
    Pending,
    /// Within `[start_epoch, end_epoch]`; deposits admitted.
    Open,
    /// After `end_epoch`; claims admitted.
    Closed,
}

/// Creation-time configuration for a staking event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventConfig {
    pub start_epoch: Epoch,
    pub end_epoch: Epoch,
    /// Fixed reward pool earmarked for this event, immutable after creation.
    pub total_reward_pool: Amount,
    /// Amount pulled from the creator into custody at creation time.
    pub funding_amount: Amount,
    /// Whether deposits must pass the eligibility oracle.
    pub requires_eligibility: bool,
    /// Cap on a single participant's cumulative principal in this event.
    pub max_per_wallet: Amount,
}

/// One reward campaign: a fixed window, a fixed pool, and running
/// aggregate totals maintained by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakingEvent {
    pub id: EventId,
    pub start_epoch: Epoch,
    pub end_epoch: Epoch,
    pub total_reward_pool: Amount,
    /// Sum of all currently staked principal. Grows with deposits, shrinks
    /// only through individual claims.
    pub total_staked: Amount,
    /// Cumulative time-weight credited across all participants. Maintained
    /// on deposit under the incremental strategy; left at zero and summed on
    /// demand under the recompute strategy.
    pub total_units: Units,
    /// Cached liveness flag. False-flips permanently once the current epoch
    /// passes `end_epoch`.
    pub is_active: bool,
    pub requires_eligibility: bool,
    pub max_per_wallet: Amount,
}

impl StakingEvent {
    /// Lifecycle phase at `now`.
    pub fn phase(&self, now: Epoch) -> EventPhase {
        if now < self.start_epoch {
            EventPhase::Pending
        } else if now <= self.end_epoch {
            EventPhase::Open
        } else {
            EventPhase::Closed
        }
    }

    /// Whether deposits are admitted at `now`.
    pub fn is_open(&self, now: Epoch) -> bool {
        self.phase(now) == EventPhase::Open
    }

    /// Whether the event window has ended at `now`.
    pub fn has_closed(&self, now: Epoch) -> bool {
        now > self.end_epoch
    }
}

/// One participant's position in one event. Created lazily on first
/// deposit, terminally zeroed by the one successful claim.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stake {
    /// Cumulative principal currently deposited (zero once claimed).
    pub amount: Amount,
    /// Cumulative time-weight credited (zero once claimed).
    pub units: Units,
    /// Epoch of the most recent deposit. Diagnostic only; not used in
    /// reward math.
    pub last_deposit_epoch: Epoch,
}

impl Stake {
    /// A stake with nothing deposited (or already claimed).
    pub fn is_empty(&self) -> bool {
        self.amount == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(start: Epoch, end: Epoch) -> StakingEvent {
        StakingEvent {
            id: 1,
            start_epoch: start,
            end_epoch: end,
            total_reward_pool: 1_000,
            total_staked: 0,
            total_units: 0,
            is_active: true,
            requires_eligibility: false,
            max_per_wallet: 500,
        }
    }

    #[test]
    fn test_phase_boundaries() {
        let ev = event(100, 200);
        assert_eq!(ev.phase(99), EventPhase::Pending);
        assert_eq!(ev.phase(100), EventPhase::Open);
        assert_eq!(ev.phase(200), EventPhase::Open);
        assert_eq!(ev.phase(201), EventPhase::Closed);
    }

    #[test]
    fn test_open_window_is_inclusive() {
        let ev = event(100, 200);
        assert!(!ev.is_open(99));
        assert!(ev.is_open(100));
        assert!(ev.is_open(200));
        assert!(!ev.is_open(201));
        assert!(!ev.has_closed(200));
        assert!(ev.has_closed(201));
    }

    #[test]
    fn test_default_stake_is_empty() {
        assert!(Stake::default().is_empty());
    }
}
