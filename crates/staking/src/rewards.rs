//! Reward math: time-weight units, proportional pool shares, and the
//! informational yield-rate estimators.
//!
//! Everything here is a pure function over registry and position data.
//! All math is integer-only with checked or saturating operations.

use crate::params::TotalUnitsStrategy;
use crate::positions::PositionLedger;
use stakecast_types::{mul_div_u128, Amount, Epoch, Stake, StakingEvent, Units};

/// Sentinel returned by the yield estimators when the rate is undefined
/// (nothing staked). Deliberately out of any plausible percentage range.
pub const RATE_UNDEFINED: u128 = u128::MAX;

const DAYS_PER_YEAR: u128 = 365;
const PERCENT: u128 = 100;

/// Time-weight earned by a deposit: `amount × (end_epoch − now)`.
///
/// Earlier deposits weigh more than later ones for the same principal.
/// The service's active-window check guarantees `now <= end_epoch`; the
/// multiplication saturates rather than wrapping.
pub fn units_for_deposit(amount: Amount, now: Epoch, end_epoch: Epoch) -> Units {
    let remaining = end_epoch.saturating_sub(now);
    amount.saturating_mul(remaining as u128)
}

/// Aggregate time-weight for the event under the configured strategy.
///
/// `Incremental` reads the running field in O(1). `Recompute` walks every
/// participant ever admitted to the event: O(n) per call, independent of
/// how many stakes remain unclaimed.
pub fn total_units(
    event: &StakingEvent,
    positions: &PositionLedger,
    strategy: TotalUnitsStrategy,
) -> Units {
    match strategy {
        TotalUnitsStrategy::Incremental => event.total_units,
        TotalUnitsStrategy::Recompute => positions.recompute_total_units(event.id),
    }
}

/// Proportional share of the pool: `units × pool / total_units`,
/// truncating. Zero when no units have been credited; `None` only if the
/// 128-bit intermediate product overflows.
pub fn reward_share(units: Units, total_units: Units, pool: Amount) -> Option<Amount> {
    if total_units == 0 {
        return Some(0);
    }
    mul_div_u128(units, pool, total_units)
}

/// Day count backing the annualized estimators:
/// `max(1, (end − start) / epochs_per_day)`.
pub fn day_count(event: &StakingEvent, epochs_per_day: u64) -> u64 {
    let span = event.end_epoch.saturating_sub(event.start_epoch);
    (span / epochs_per_day.max(1)).max(1)
}

/// Event-wide annualized yield estimate in whole percent:
/// `pool × 365 × 100 / (total_staked × day_count)`.
///
/// Informational only; never used for payout. Returns [`RATE_UNDEFINED`]
/// instead of dividing by zero when nothing is staked.
pub fn global_rate_pct(event: &StakingEvent, epochs_per_day: u64) -> u128 {
    if event.total_staked == 0 {
        return RATE_UNDEFINED;
    }
    let days = day_count(event, epochs_per_day) as u128;
    let numerator = event
        .total_reward_pool
        .saturating_mul(DAYS_PER_YEAR)
        .saturating_mul(PERCENT);
    numerator / event.total_staked.saturating_mul(days)
}

/// Per-participant annualized yield estimate in whole percent, substituting
/// the caller's projected reward and principal for the global totals.
/// Returns [`RATE_UNDEFINED`] when the caller has no stake.
pub fn personal_rate_pct(
    event: &StakingEvent,
    stake: &Stake,
    total_units: Units,
    epochs_per_day: u64,
) -> u128 {
    if stake.amount == 0 {
        return RATE_UNDEFINED;
    }
    let reward = reward_share(stake.units, total_units, event.total_reward_pool).unwrap_or(0);
    let days = day_count(event, epochs_per_day) as u128;
    let numerator = reward.saturating_mul(DAYS_PER_YEAR).saturating_mul(PERCENT);
    numerator / stake.amount.saturating_mul(days)
}
