//! stakecast: time-weighted staking-rewards accounting engine.
//!
//! Runs independent fixed-window reward campaigns ("staking events"):
//! deposits are admitted during the active window and earn time-weight
//! proportional to principal × remaining epochs; once the window closes,
//! each participant withdraws principal plus a truncating proportional
//! share of the event's fixed reward pool.
//!
//! Timing is expressed in abstract monotonically increasing epochs supplied
//! by the caller. Asset custody, credential logic, and role administration
//! live behind the [`assets::AssetLedger`], [`eligibility::EligibilityOracle`],
//! and [`capability::CapabilityRegistry`] traits.

pub mod assets;
pub mod audit;
pub mod capability;
pub mod eligibility;
pub mod errors;
pub mod params;
pub mod positions;
pub mod registry;
pub mod rewards;
pub mod service;

pub use assets::{AssetLedger, InMemoryAssetLedger, MockAssetLedger, TransferError};
pub use audit::AuditRecord;
pub use capability::{Capability, CapabilityRegistry, InMemoryCapabilities};
pub use eligibility::{EligibilityGate, EligibilityOracle, StaticEligibilityOracle};
pub use errors::StakingError;
pub use params::{FundingPolicy, StakingParams, TotalUnitsStrategy};
pub use positions::PositionLedger;
pub use registry::EventRegistry;
pub use service::{ClaimOutcome, StakingService};
