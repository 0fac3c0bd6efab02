//! Repeated resolutions.
//!
//! Drives the single-attack engine across attack sequences on one hex and
//! across the full range of attacking power.

pub mod multi_attack;
pub mod sweep;

pub use multi_attack::{propagate, simulate_multi_attack, MultiAttackResult, SurvivorEntry};
pub use sweep::{sweep_powers, DestroyPoint, EvacuatePoint, PowerSweep, SweepConfig, SweepError};
