//! Event registry: owns every staking event record.
//!
//! ## Key Invariants
//! - Ids are 1-based, monotonic, never reused
//! - Configuration fields are immutable after creation
//! - `is_active` false-flips exactly once, via `refresh_status`

use crate::errors::StakingError;
use crate::params::FundingPolicy;
use serde::{Deserialize, Serialize};
use stakecast_types::{epochs_until, Epoch, EventConfig, EventId, StakingEvent};
use std::collections::HashMap;
use tracing::{debug, info};

/// Validate a creation request against the configured funding policy.
pub fn validate_config(config: &EventConfig, policy: FundingPolicy) -> Result<(), StakingError> {
    if config.end_epoch <= config.start_epoch {
        return Err(StakingError::InvalidConfiguration {
            reason: "end_epoch must be greater than start_epoch",
        });
    }
    if config.total_reward_pool == 0 {
        return Err(StakingError::InvalidConfiguration {
            reason: "total_reward_pool must be nonzero",
        });
    }
    if config.max_per_wallet == 0 {
        return Err(StakingError::InvalidConfiguration {
            reason: "max_per_wallet must be nonzero",
        });
    }
    match policy {
        FundingPolicy::CoverRewardPool if config.funding_amount < config.total_reward_pool => {
            Err(StakingError::InvalidConfiguration {
                reason: "funding_amount must cover total_reward_pool",
            })
        }
        FundingPolicy::NonZeroFunding if config.funding_amount == 0 => {
            Err(StakingError::InvalidConfiguration {
                reason: "funding_amount must be nonzero",
            })
        }
        _ => Ok(()),
    }
}

/// Owned collection of staking events, keyed by id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventRegistry {
    events: HashMap<EventId, StakingEvent>,
    last_id: EventId,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and store a new event; returns its freshly allocated id.
    pub fn create(
        &mut self,
        config: &EventConfig,
        policy: FundingPolicy,
    ) -> Result<EventId, StakingError> {
        validate_config(config, policy)?;

        let id = self.last_id + 1;
        self.last_id = id;
        self.events.insert(
            id,
            StakingEvent {
                id,
                start_epoch: config.start_epoch,
                end_epoch: config.end_epoch,
                total_reward_pool: config.total_reward_pool,
                total_staked: 0,
                total_units: 0,
                is_active: true,
                requires_eligibility: config.requires_eligibility,
                max_per_wallet: config.max_per_wallet,
            },
        );

        info!(
            event = id,
            start = config.start_epoch,
            end = config.end_epoch,
            pool = config.total_reward_pool,
            gated = config.requires_eligibility,
            cap = config.max_per_wallet,
            "staking event created"
        );
        Ok(id)
    }

    pub fn get(&self, id: EventId) -> Result<&StakingEvent, StakingError> {
        self.events.get(&id).ok_or(StakingError::NotFound(id))
    }

    pub fn get_mut(&mut self, id: EventId) -> Result<&mut StakingEvent, StakingError> {
        self.events.get_mut(&id).ok_or(StakingError::NotFound(id))
    }

    /// Whether the event still admits deposits at `now`, regardless of
    /// whether the cached flag has been refreshed yet.
    pub fn is_event_active(&self, id: EventId, now: Epoch) -> Result<bool, StakingError> {
        let event = self.get(id)?;
        Ok(event.is_active && !event.has_closed(now))
    }

    /// Epochs left in the event window: `max(0, end_epoch - now)`.
    pub fn remaining_epochs(&self, id: EventId, now: Epoch) -> Result<u64, StakingError> {
        let event = self.get(id)?;
        Ok(epochs_until(now, event.end_epoch))
    }

    /// Remaining window expressed in seconds via the configured average
    /// epoch duration. An estimate, not a schedule.
    pub fn remaining_duration_secs(
        &self,
        id: EventId,
        now: Epoch,
        average_epoch_secs: u64,
    ) -> Result<u64, StakingError> {
        let remaining = self.remaining_epochs(id, now)?;
        Ok(remaining.saturating_mul(average_epoch_secs))
    }

    /// Flip `is_active` to false once `now` has passed the end of the
    /// window. Idempotent; a no-op while the window is still open.
    pub fn refresh_status(&mut self, id: EventId, now: Epoch) -> Result<(), StakingError> {
        let event = self.get_mut(id)?;
        if event.is_active && event.has_closed(now) {
            event.is_active = false;
            debug!(event = id, epoch = now, "event window closed");
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
