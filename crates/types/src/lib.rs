//! Shared scalar types for the stakecast staking engine.
//!
//! All accounting values are unsigned integers with explicit checked or
//! saturating arithmetic. NO floating point is allowed anywhere in reward
//! computation.

pub mod scalars;
pub mod staking;

pub use scalars::*;
pub use staking::*;
