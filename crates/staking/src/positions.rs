//! Position ledger: one stake per (event, participant).
//!
//! ## Key Invariants
//! - A stake is created lazily on first deposit and terminally zeroed by
//!   the one successful claim
//! - The per-event participant list is append-only and deduplicated: an
//!   account is appended exactly once, on its first deposit into the event

use serde::{Deserialize, Serialize};
use stakecast_types::{AccountId, Amount, Epoch, EventId, Stake, Units};
use std::collections::HashMap;
use tracing::debug;

/// Owned collection of stakes and per-event participant lists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PositionLedger {
    stakes: HashMap<(EventId, AccountId), Stake>,
    participants: HashMap<EventId, Vec<AccountId>>,
}

impl PositionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current stake for the pair; zero-valued when none exists. Never
    /// fails.
    pub fn stake(&self, event: EventId, account: AccountId) -> Stake {
        self.stakes
            .get(&(event, account))
            .copied()
            .unwrap_or_default()
    }

    /// Apply a deposit's deltas. Appends the account to the event's
    /// participant list only when the stake record is first created.
    pub fn record_deposit(
        &mut self,
        event: EventId,
        account: AccountId,
        amount: Amount,
        units: Units,
        now: Epoch,
    ) {
        let first_deposit = !self.stakes.contains_key(&(event, account));
        if first_deposit {
            self.participants.entry(event).or_default().push(account);
        }

        let stake = self.stakes.entry((event, account)).or_default();
        stake.amount = stake.amount.saturating_add(amount);
        stake.units = stake.units.saturating_add(units);
        stake.last_deposit_epoch = now;

        debug!(
            event,
            account,
            amount,
            units,
            first = first_deposit,
            "deposit recorded"
        );
    }

    /// Zero out a stake, returning its prior value. Claim path only; the
    /// service pre-checks that there is something to clear.
    pub fn clear(&mut self, event: EventId, account: AccountId) -> Stake {
        match self.stakes.get_mut(&(event, account)) {
            Some(stake) => {
                let previous = *stake;
                stake.amount = 0;
                stake.units = 0;
                previous
            }
            None => Stake::default(),
        }
    }

    /// Accounts that have ever deposited into the event, in first-deposit
    /// order.
    pub fn participants(&self, event: EventId) -> &[AccountId] {
        self.participants
            .get(&event)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn participant_count(&self, event: EventId) -> usize {
        self.participants(event).len()
    }

    /// Sum of live principal across the event's stakes. Audit helper for
    /// the `total_staked` conservation invariant.
    pub fn total_amount(&self, event: EventId) -> Amount {
        self.participants(event)
            .iter()
            .map(|account| self.stake(event, *account).amount)
            .fold(0, Amount::saturating_add)
    }

    /// Sum the units of every participant ever admitted to the event.
    /// O(n) in distinct participants; backs the recompute total-units
    /// strategy, which pays this cost on every reward query.
    pub fn recompute_total_units(&self, event: EventId) -> Units {
        self.participants(event)
            .iter()
            .map(|account| self.stake(event, *account).units)
            .fold(0, Units::saturating_add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_stake_reads_zero() {
        let ledger = PositionLedger::new();
        assert_eq!(ledger.stake(1, 7), Stake::default());
        assert_eq!(ledger.participant_count(1), 0);
    }

    #[test]
    fn test_deposits_accumulate() {
        let mut ledger = PositionLedger::new();
        ledger.record_deposit(1, 7, 100, 10_000, 100);
        ledger.record_deposit(1, 7, 50, 2_500, 150);

        let stake = ledger.stake(1, 7);
        assert_eq!(stake.amount, 150);
        assert_eq!(stake.units, 12_500);
        assert_eq!(stake.last_deposit_epoch, 150);
    }

    #[test]
    fn test_participant_appended_exactly_once() {
        let mut ledger = PositionLedger::new();
        ledger.record_deposit(1, 7, 100, 10_000, 100);
        ledger.record_deposit(1, 7, 100, 5_000, 150);
        ledger.record_deposit(1, 9, 100, 5_000, 150);

        assert_eq!(ledger.participants(1), &[7, 9]);
        assert_eq!(ledger.participant_count(1), 2);

        // Clearing does not remove the account from the list, and a cleared
        // record still counts as already-admitted
        ledger.clear(1, 7);
        ledger.record_deposit(1, 7, 10, 100, 160);
        assert_eq!(ledger.participants(1), &[7, 9]);
    }

    #[test]
    fn test_clear_returns_prior_stake() {
        let mut ledger = PositionLedger::new();
        ledger.record_deposit(1, 7, 100, 10_000, 100);

        let previous = ledger.clear(1, 7);
        assert_eq!(previous.amount, 100);
        assert_eq!(previous.units, 10_000);

        let now_empty = ledger.stake(1, 7);
        assert!(now_empty.is_empty());
        assert_eq!(now_empty.units, 0);
        // Diagnostic field survives the clear
        assert_eq!(now_empty.last_deposit_epoch, 100);
    }

    #[test]
    fn test_totals_per_event_are_isolated() {
        let mut ledger = PositionLedger::new();
        ledger.record_deposit(1, 7, 100, 10_000, 100);
        ledger.record_deposit(2, 7, 40, 400, 100);

        assert_eq!(ledger.total_amount(1), 100);
        assert_eq!(ledger.total_amount(2), 40);
        assert_eq!(ledger.recompute_total_units(1), 10_000);
        assert_eq!(ledger.recompute_total_units(2), 400);
    }
}
