//! Staking service: composes the registry, position ledger, and reward
//! math into the deposit/claim/administration surface.
//!
//! ## Concurrency discipline
//! Every state-mutating operation holds the core write guard across its
//! whole body: precondition checks, the external-ledger transfer, and the
//! state commit. A re-entrant call from inside a ledger transfer cannot
//! interleave with a half-applied operation. Reads take short read guards
//! and only ever observe commit boundaries.

use crate::assets::AssetLedger;
use crate::audit::AuditRecord;
use crate::capability::{Capability, CapabilityRegistry};
use crate::eligibility::{EligibilityGate, EligibilityOracle};
use crate::errors::StakingError;
use crate::params::{StakingParams, TotalUnitsStrategy};
use crate::positions::PositionLedger;
use crate::registry::EventRegistry;
use crate::rewards;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use stakecast_types::{
    checked_add_amount, AccountId, Amount, CredentialTag, Epoch, EventConfig, EventId, Stake,
    StakingEvent, Units,
};
use tracing::{info, warn};

/// Result of a successful claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimOutcome {
    pub event: EventId,
    pub account: AccountId,
    /// Principal returned to the participant.
    pub principal: Amount,
    /// Proportional share of the reward pool, truncating.
    pub reward: Amount,
}

impl ClaimOutcome {
    /// Total amount pushed back to the participant.
    pub fn total(&self) -> Amount {
        self.principal.saturating_add(self.reward)
    }
}

struct Core {
    registry: EventRegistry,
    positions: PositionLedger,
    capabilities: Box<dyn CapabilityRegistry>,
    eligibility_tags: Vec<CredentialTag>,
    journal: Vec<AuditRecord>,
}

impl Core {
    fn require_capability(
        &self,
        account: AccountId,
        capability: Capability,
    ) -> Result<(), StakingError> {
        if self.capabilities.has_capability(account, capability) {
            Ok(())
        } else {
            Err(StakingError::InsufficientAuthorization {
                account,
                capability,
            })
        }
    }
}

/// The orchestrator. Owns all event and position state; calls out to the
/// external ledger, eligibility oracle, and capability registry.
pub struct StakingService {
    core: RwLock<Core>,
    gate: EligibilityGate,
    params: StakingParams,
}

impl StakingService {
    pub fn new(
        params: StakingParams,
        oracle: Box<dyn EligibilityOracle>,
        capabilities: Box<dyn CapabilityRegistry>,
    ) -> Result<Self, StakingError> {
        params.validate()?;
        Ok(Self {
            core: RwLock::new(Core {
                registry: EventRegistry::new(),
                positions: PositionLedger::new(),
                capabilities,
                eligibility_tags: Vec::new(),
                journal: Vec::new(),
            }),
            gate: EligibilityGate::new(oracle),
            params,
        })
    }

    // -------------------------------------------------------------------
    // Event creation
    // -------------------------------------------------------------------

    /// Validate, fund, and register a new staking event. Manager-gated.
    /// The funding amount is pulled from the caller into custody before
    /// the record is stored; a failed pull leaves no trace.
    pub fn create_event(
        &self,
        ledger: &mut dyn AssetLedger,
        caller: AccountId,
        config: EventConfig,
    ) -> Result<EventId, StakingError> {
        let mut core = self.core.write();
        core.require_capability(caller, Capability::Manager)?;
        crate::registry::validate_config(&config, self.params.funding_policy)?;

        ledger.pull(caller, config.funding_amount)?;
        let id = core.registry.create(&config, self.params.funding_policy)?;

        core.journal.push(AuditRecord::EventCreated {
            id,
            start_epoch: config.start_epoch,
            end_epoch: config.end_epoch,
            total_reward_pool: config.total_reward_pool,
            requires_eligibility: config.requires_eligibility,
            max_per_wallet: config.max_per_wallet,
        });
        Ok(id)
    }

    // -------------------------------------------------------------------
    // Deposit
    // -------------------------------------------------------------------

    /// Admit a deposit into an open event. Returns the time-weight units
    /// earned. All-or-nothing: any precondition failure or ledger refusal
    /// leaves every balance and total unchanged.
    pub fn deposit(
        &self,
        ledger: &mut dyn AssetLedger,
        caller: AccountId,
        event_id: EventId,
        amount: Amount,
        now: Epoch,
    ) -> Result<Units, StakingError> {
        let mut core = self.core.write();

        let event = *core.registry.get(event_id)?;
        if !event.is_active || !event.is_open(now) {
            return Err(StakingError::NotOpen { id: event_id, now });
        }
        if amount == 0 {
            return Err(StakingError::InvalidConfiguration {
                reason: "deposit amount must be nonzero",
            });
        }
        if event.requires_eligibility
            && !self.gate.is_eligible(caller, &core.eligibility_tags)
        {
            return Err(StakingError::IneligibleParticipant { account: caller });
        }

        let attempted = core
            .positions
            .stake(event_id, caller)
            .amount
            .saturating_add(amount);
        if attempted > event.max_per_wallet {
            return Err(StakingError::WalletCapExceeded {
                account: caller,
                attempted,
                cap: event.max_per_wallet,
            });
        }

        let units = rewards::units_for_deposit(amount, now, event.end_epoch);

        ledger.pull(caller, amount)?;
        core.positions
            .record_deposit(event_id, caller, amount, units, now);
        let event = core.registry.get_mut(event_id)?;
        event.total_staked = event.total_staked.saturating_add(amount);
        if self.params.total_units_strategy == TotalUnitsStrategy::Incremental {
            event.total_units = event.total_units.saturating_add(units);
        }

        core.journal.push(AuditRecord::DepositRecorded {
            id: event_id,
            account: caller,
            amount,
            units,
            epoch: now,
        });
        info!(
            event = event_id,
            account = caller,
            amount,
            units,
            epoch = now,
            "deposit accepted"
        );
        Ok(units)
    }

    // -------------------------------------------------------------------
    // Claim
    // -------------------------------------------------------------------

    /// Pay out principal plus the proportional reward share for a closed
    /// event. Exactly-once: the stake is zeroed on success, and a repeat
    /// call fails with `NothingToClaim`.
    pub fn claim(
        &self,
        ledger: &mut dyn AssetLedger,
        caller: AccountId,
        event_id: EventId,
        now: Epoch,
    ) -> Result<ClaimOutcome, StakingError> {
        let mut core = self.core.write();

        core.registry.refresh_status(event_id, now)?;
        let event = *core.registry.get(event_id)?;
        if !event.has_closed(now) {
            return Err(StakingError::NotClosed { id: event_id, now });
        }

        let stake = core.positions.stake(event_id, caller);
        if stake.amount == 0 {
            return Err(StakingError::NothingToClaim {
                id: event_id,
                account: caller,
            });
        }

        let total_units =
            rewards::total_units(&event, &core.positions, self.params.total_units_strategy);
        let reward = rewards::reward_share(stake.units, total_units, event.total_reward_pool)
            .ok_or(StakingError::ArithmeticOverflow)?;
        let payout = checked_add_amount(stake.amount, reward)
            .ok_or(StakingError::ArithmeticOverflow)?;

        // Push before mutating so a ledger refusal leaves state untouched;
        // the held write guard keeps the whole body a single critical
        // section.
        ledger.push(caller, payout)?;
        let previous = core.positions.clear(event_id, caller);
        let event = core.registry.get_mut(event_id)?;
        event.total_staked = event.total_staked.saturating_sub(previous.amount);

        core.journal.push(AuditRecord::RewardClaimed {
            id: event_id,
            account: caller,
            principal: previous.amount,
            reward,
            epoch: now,
        });
        info!(
            event = event_id,
            account = caller,
            principal = previous.amount,
            reward,
            epoch = now,
            "claim paid"
        );
        Ok(ClaimOutcome {
            event: event_id,
            account: caller,
            principal: previous.amount,
            reward,
        })
    }

    // -------------------------------------------------------------------
    // Administration
    // -------------------------------------------------------------------

    /// Replace the credential tag set consulted by gated deposits.
    /// Manager-gated.
    pub fn set_eligibility_tags(
        &self,
        caller: AccountId,
        tags: Vec<CredentialTag>,
    ) -> Result<(), StakingError> {
        let mut core = self.core.write();
        core.require_capability(caller, Capability::Manager)?;
        core.eligibility_tags = tags.clone();
        core.journal
            .push(AuditRecord::EligibilityTagsUpdated { tags });
        Ok(())
    }

    /// Grant the manager capability. Administrator-gated.
    pub fn grant_manager(
        &self,
        caller: AccountId,
        account: AccountId,
    ) -> Result<(), StakingError> {
        let mut core = self.core.write();
        core.require_capability(caller, Capability::Administrator)?;
        core.capabilities.grant(account, Capability::Manager);
        info!(account, "manager capability granted");
        Ok(())
    }

    /// Revoke the manager capability. Administrator-gated.
    pub fn revoke_manager(
        &self,
        caller: AccountId,
        account: AccountId,
    ) -> Result<(), StakingError> {
        let mut core = self.core.write();
        core.require_capability(caller, Capability::Administrator)?;
        core.capabilities.revoke(account, Capability::Manager);
        info!(account, "manager capability revoked");
        Ok(())
    }

    /// Push the entire custody balance to `to`, bypassing per-event
    /// accounting. Administrator-gated escape hatch, logged distinctly.
    pub fn emergency_sweep(
        &self,
        ledger: &mut dyn AssetLedger,
        caller: AccountId,
        to: AccountId,
    ) -> Result<Amount, StakingError> {
        let mut core = self.core.write();
        core.require_capability(caller, Capability::Administrator)?;

        let amount = ledger.custody_balance();
        ledger.push(to, amount)?;

        core.journal.push(AuditRecord::EmergencySweep { to, amount });
        warn!(to, amount, "emergency sweep of custody balance");
        Ok(amount)
    }

    // -------------------------------------------------------------------
    // Read-only queries
    // -------------------------------------------------------------------

    pub fn event(&self, id: EventId) -> Result<StakingEvent, StakingError> {
        let core = self.core.read();
        core.registry.get(id).copied()
    }

    pub fn is_event_active(&self, id: EventId, now: Epoch) -> Result<bool, StakingError> {
        self.core.read().registry.is_event_active(id, now)
    }

    pub fn remaining_epochs(&self, id: EventId, now: Epoch) -> Result<u64, StakingError> {
        self.core.read().registry.remaining_epochs(id, now)
    }

    pub fn remaining_duration_secs(
        &self,
        id: EventId,
        now: Epoch,
    ) -> Result<u64, StakingError> {
        self.core
            .read()
            .registry
            .remaining_duration_secs(id, now, self.params.average_epoch_secs)
    }

    /// A participant's stake in an event; zero-valued when they have never
    /// deposited. Fails only on an unknown event id.
    pub fn stake(&self, id: EventId, account: AccountId) -> Result<Stake, StakingError> {
        let core = self.core.read();
        core.registry.get(id)?;
        Ok(core.positions.stake(id, account))
    }

    /// Event-wide annualized yield estimate; [`rewards::RATE_UNDEFINED`]
    /// when nothing is staked.
    pub fn global_rate_pct(&self, id: EventId) -> Result<u128, StakingError> {
        let core = self.core.read();
        let event = core.registry.get(id)?;
        Ok(rewards::global_rate_pct(event, self.params.epochs_per_day))
    }

    /// Caller's annualized yield estimate; [`rewards::RATE_UNDEFINED`]
    /// when they have no stake.
    pub fn personal_rate_pct(
        &self,
        id: EventId,
        account: AccountId,
    ) -> Result<u128, StakingError> {
        let core = self.core.read();
        let event = core.registry.get(id)?;
        let stake = core.positions.stake(id, account);
        let total_units =
            rewards::total_units(event, &core.positions, self.params.total_units_strategy);
        Ok(rewards::personal_rate_pct(
            event,
            &stake,
            total_units,
            self.params.epochs_per_day,
        ))
    }

    pub fn participants(&self, id: EventId) -> Result<Vec<AccountId>, StakingError> {
        let core = self.core.read();
        core.registry.get(id)?;
        Ok(core.positions.participants(id).to_vec())
    }

    pub fn participant_count(&self, id: EventId) -> Result<usize, StakingError> {
        let core = self.core.read();
        core.registry.get(id)?;
        Ok(core.positions.participant_count(id))
    }

    pub fn eligibility_tags(&self) -> Vec<CredentialTag> {
        self.core.read().eligibility_tags.clone()
    }

    /// Snapshot of the audit journal, oldest first.
    pub fn journal(&self) -> Vec<AuditRecord> {
        self.core.read().journal.clone()
    }
}
