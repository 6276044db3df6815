use crate::errors::StakingError;
use serde::{Deserialize, Serialize};

/// How event funding is validated at creation time. Both rules exist in
/// deployed variants of this system; the policy is configuration, not code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FundingPolicy {
    /// `funding_amount` must cover the declared reward pool.
    CoverRewardPool,
    /// `funding_amount` merely has to be nonzero.
    NonZeroFunding,
}

/// How an event's aggregate time-weight is obtained for reward queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TotalUnitsStrategy {
    /// Running field on the event, bumped on every deposit. O(1) per
    /// deposit and O(1) per reward query. The default.
    Incremental,
    /// Sum the units of every participant ever admitted to the event, on
    /// every reward query. O(1) per deposit but O(n) per query, where n is
    /// the number of distinct participants ever admitted; the cost does not
    /// shrink as stakes are claimed. Earlier claims also zero their units
    /// out of the sum, so later queries observe a smaller denominator.
    Recompute,
}

/// Static configuration for the staking engine.
///
/// Serializable so deployments can store it alongside other system config;
/// adjustable only out-of-band, never by engine operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakingParams {
    /// Average epoch duration in seconds. Used only by the
    /// remaining-duration estimate, never by accounting.
    pub average_epoch_secs: u64,
    /// Epochs per day, used to derive the day count for yield-rate
    /// estimates.
    pub epochs_per_day: u64,
    pub funding_policy: FundingPolicy,
    pub total_units_strategy: TotalUnitsStrategy,
}

impl Default for StakingParams {
    fn default() -> Self {
        // 12s epochs -> 7200 epochs per day
        Self {
            average_epoch_secs: 12,
            epochs_per_day: 7200,
            funding_policy: FundingPolicy::CoverRewardPool,
            total_units_strategy: TotalUnitsStrategy::Incremental,
        }
    }
}

impl StakingParams {
    pub fn validate(&self) -> Result<(), StakingError> {
        if self.average_epoch_secs == 0 {
            return Err(StakingError::InvalidConfiguration {
                reason: "average_epoch_secs must be nonzero",
            });
        }
        if self.epochs_per_day == 0 {
            return Err(StakingError::InvalidConfiguration {
                reason: "epochs_per_day must be nonzero",
            });
        }
        Ok(())
    }
}
