use proptest::prelude::*;
use stakecast_staking::{
    Capability, CapabilityRegistry, InMemoryAssetLedger, InMemoryCapabilities, StakingParams,
    StakingService, StaticEligibilityOracle,
};
use stakecast_types::{AccountId, Amount, Epoch, EventConfig};

// Property-based tests for the accounting invariants:
// conservation of total_staked, the per-wallet cap, time-weight
// monotonicity, and the truncating reward-sum bound.

const ADMIN: AccountId = 1;
const MANAGER: AccountId = 2;

const START: Epoch = 100;
const END: Epoch = 200;
const POOL: Amount = 1_000;
const CAP: Amount = 500;

#[derive(Debug, Clone)]
struct TestDeposit {
    account: AccountId,
    amount: Amount,
    epoch: Epoch,
}

fn arbitrary_deposit() -> impl Strategy<Value = TestDeposit> {
    (10u64..16, 1u128..=300, START..=END).prop_map(|(account, amount, epoch)| TestDeposit {
        account,
        amount,
        epoch,
    })
}

fn build_service() -> (StakingService, InMemoryAssetLedger, u64) {
    let mut capabilities = InMemoryCapabilities::with_administrator(ADMIN);
    capabilities.grant(MANAGER, Capability::Manager);
    let service = StakingService::new(
        StakingParams::default(),
        Box::new(StaticEligibilityOracle::new()),
        Box::new(capabilities),
    )
    .unwrap();

    let mut ledger = InMemoryAssetLedger::new();
    ledger.credit(MANAGER, POOL);
    for account in 10..16 {
        ledger.credit(account, 1_000_000);
    }

    let id = service
        .create_event(
            &mut ledger,
            MANAGER,
            EventConfig {
                start_epoch: START,
                end_epoch: END,
                total_reward_pool: POOL,
                funding_amount: POOL,
                requires_eligibility: false,
                max_per_wallet: CAP,
            },
        )
        .unwrap();
    (service, ledger, id)
}

proptest! {
    #[test]
    fn total_staked_equals_position_sum(
        deposits in prop::collection::vec(arbitrary_deposit(), 1..40),
    ) {
        let (service, mut ledger, id) = build_service();

        for deposit in &deposits {
            // Sort-free apply: cap rejections are part of the property
            let _ = service.deposit(
                &mut ledger,
                deposit.account,
                id,
                deposit.amount,
                deposit.epoch,
            );

            let event = service.event(id).unwrap();
            let sum: Amount = service
                .participants(id)
                .unwrap()
                .iter()
                .map(|p| service.stake(id, *p).unwrap().amount)
                .sum();
            prop_assert_eq!(event.total_staked, sum);
        }
    }
}

proptest! {
    #[test]
    fn per_wallet_cap_never_exceeded(
        deposits in prop::collection::vec(arbitrary_deposit(), 1..40),
    ) {
        let (service, mut ledger, id) = build_service();

        for deposit in &deposits {
            let before = service.event(id).unwrap();
            let before_stake = service.stake(id, deposit.account).unwrap();

            let result = service.deposit(
                &mut ledger,
                deposit.account,
                id,
                deposit.amount,
                deposit.epoch,
            );

            let stake = service.stake(id, deposit.account).unwrap();
            prop_assert!(stake.amount <= CAP);

            // A rejection must leave the event and the stake untouched
            if result.is_err() {
                prop_assert_eq!(service.event(id).unwrap(), before);
                prop_assert_eq!(stake, before_stake);
            }
        }
    }
}

proptest! {
    #[test]
    fn rewards_paid_never_exceed_pool(
        deposits in prop::collection::vec(arbitrary_deposit(), 1..40),
    ) {
        let (service, mut ledger, id) = build_service();

        for deposit in &deposits {
            let _ = service.deposit(
                &mut ledger,
                deposit.account,
                id,
                deposit.amount,
                deposit.epoch,
            );
        }

        let event = service.event(id).unwrap();
        let mut rewards_paid: Amount = 0;
        for account in service.participants(id).unwrap() {
            let principal = service.stake(id, account).unwrap().amount;
            let outcome = service.claim(&mut ledger, account, id, END + 1).unwrap();
            prop_assert_eq!(outcome.principal, principal);
            rewards_paid += outcome.reward;
        }

        prop_assert!(rewards_paid <= POOL);
        // With any units credited, truncation under-pays by at most
        // participant_count - 1 indivisible units
        if event.total_units > 0 {
            let claimants = service.participant_count(id).unwrap() as Amount;
            prop_assert!(POOL - rewards_paid <= claimants - 1);
        }
    }
}

proptest! {
    #[test]
    fn earlier_deposits_never_earn_fewer_units(
        amount in 1u128..=CAP,
        first in START..=END,
        second in START..=END,
    ) {
        let earlier = first.min(second);
        let later = first.max(second);

        let earlier_units =
            stakecast_staking::rewards::units_for_deposit(amount, earlier, END);
        let later_units =
            stakecast_staking::rewards::units_for_deposit(amount, later, END);

        prop_assert!(earlier_units >= later_units);
        prop_assert_eq!(earlier_units, amount * u128::from(END - earlier));
    }
}
