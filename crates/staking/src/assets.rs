//! Value-transfer ledger interface.
//!
//! The engine never implements asset custody itself; it debits and credits
//! an external ledger through this trait and trusts its atomicity. A call
//! either moves the full amount or fails with no effect.

use serde::{Deserialize, Serialize};
use stakecast_types::{AccountId, Amount};
use std::collections::HashMap;
use thiserror::Error;

/// Failure reported by the external ledger. Propagated to callers as
/// `StakingError::LedgerTransferFailed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransferError {
    #[error("insufficient balance in account {account}: requested={requested}, available={available}")]
    InsufficientBalance {
        account: AccountId,
        requested: Amount,
        available: Amount,
    },
    #[error("insufficient custody balance: requested={requested}, available={available}")]
    InsufficientCustody {
        requested: Amount,
        available: Amount,
    },
}

/// Interface to the external value-transfer ledger.
pub trait AssetLedger: Send + Sync {
    /// Debit an external holder and credit engine custody.
    fn pull(&mut self, from: AccountId, amount: Amount) -> Result<(), TransferError>;

    /// Credit an external holder from engine custody.
    fn push(&mut self, to: AccountId, amount: Amount) -> Result<(), TransferError>;

    /// Balance of an external holder.
    fn balance_of(&self, account: AccountId) -> Amount;

    /// Total amount currently held in engine custody.
    fn custody_balance(&self) -> Amount;
}

/// In-memory ledger for runtime embedding, demos, and tests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryAssetLedger {
    balances: HashMap<AccountId, Amount>,
    custody: Amount,
}

impl InMemoryAssetLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an external holder's balance.
    pub fn credit(&mut self, account: AccountId, amount: Amount) {
        let balance = self.balances.entry(account).or_insert(0);
        *balance = balance.saturating_add(amount);
    }
}

impl AssetLedger for InMemoryAssetLedger {
    fn pull(&mut self, from: AccountId, amount: Amount) -> Result<(), TransferError> {
        let available = self.balances.get(&from).copied().unwrap_or(0);
        if available < amount {
            return Err(TransferError::InsufficientBalance {
                account: from,
                requested: amount,
                available,
            });
        }
        self.balances.insert(from, available - amount);
        self.custody = self.custody.saturating_add(amount);
        Ok(())
    }

    fn push(&mut self, to: AccountId, amount: Amount) -> Result<(), TransferError> {
        if self.custody < amount {
            return Err(TransferError::InsufficientCustody {
                requested: amount,
                available: self.custody,
            });
        }
        self.custody -= amount;
        let balance = self.balances.entry(to).or_insert(0);
        *balance = balance.saturating_add(amount);
        Ok(())
    }

    fn balance_of(&self, account: AccountId) -> Amount {
        self.balances.get(&account).copied().unwrap_or(0)
    }

    fn custody_balance(&self) -> Amount {
        self.custody
    }
}

/// Mock ledger recording every transfer for deterministic test assertions.
#[derive(Debug, Clone, Default)]
pub struct MockAssetLedger {
    inner: InMemoryAssetLedger,
    pull_calls: Vec<(AccountId, Amount)>,
    push_calls: Vec<(AccountId, Amount)>,
}

impl MockAssetLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an external holder's balance.
    pub fn credit(&mut self, account: AccountId, amount: Amount) {
        self.inner.credit(account, amount);
    }

    pub fn pull_calls(&self) -> &[(AccountId, Amount)] {
        &self.pull_calls
    }

    pub fn push_calls(&self) -> &[(AccountId, Amount)] {
        &self.push_calls
    }

    pub fn clear_calls(&mut self) {
        self.pull_calls.clear();
        self.push_calls.clear();
    }
}

impl AssetLedger for MockAssetLedger {
    fn pull(&mut self, from: AccountId, amount: Amount) -> Result<(), TransferError> {
        self.pull_calls.push((from, amount));
        self.inner.pull(from, amount)
    }

    fn push(&mut self, to: AccountId, amount: Amount) -> Result<(), TransferError> {
        self.push_calls.push((to, amount));
        self.inner.push(to, amount)
    }

    fn balance_of(&self, account: AccountId) -> Amount {
        self.inner.balance_of(account)
    }

    fn custody_balance(&self) -> Amount {
        self.inner.custody_balance()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pull_and_push_move_custody() {
        let mut ledger = InMemoryAssetLedger::new();
        ledger.credit(7, 1_000);

        ledger.pull(7, 400).unwrap();
        assert_eq!(ledger.balance_of(7), 600);
        assert_eq!(ledger.custody_balance(), 400);

        ledger.push(7, 150).unwrap();
        assert_eq!(ledger.balance_of(7), 750);
        assert_eq!(ledger.custody_balance(), 250);
    }

    #[test]
    fn test_pull_insufficient_balance() {
        let mut ledger = InMemoryAssetLedger::new();
        ledger.credit(7, 100);

        let err = ledger.pull(7, 101).unwrap_err();
        assert!(matches!(err, TransferError::InsufficientBalance { .. }));
        assert_eq!(ledger.balance_of(7), 100);
        assert_eq!(ledger.custody_balance(), 0);
    }

    #[test]
    fn test_push_insufficient_custody() {
        let mut ledger = InMemoryAssetLedger::new();
        let err = ledger.push(7, 1).unwrap_err();
        assert!(matches!(err, TransferError::InsufficientCustody { .. }));
    }

    #[test]
    fn test_mock_records_calls() {
        let mut mock = MockAssetLedger::new();
        mock.credit(3, 500);

        mock.pull(3, 200).unwrap();
        mock.push(3, 50).unwrap();

        assert_eq!(mock.pull_calls(), &[(3, 200)]);
        assert_eq!(mock.push_calls(), &[(3, 50)]);
    }
}
