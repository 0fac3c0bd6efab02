//! Defending force representation.
//!
//! Contains unit kinds, per-hex unit counts, and the validated attack
//! description consumed by the resolution engine.

pub mod counts;
pub mod spec;
pub mod unit;

pub use counts::ForceCounts;
pub use spec::{
    attack_powers_from_f64, count_from_f64, validate_attack_powers, validate_force, AttackSpec,
    ValidationError, MAX_ATTACKS, MAX_DEFENSE_POWER, MAX_POWER, MIN_POWER,
};
pub use unit::{UnitKind, ALL_KINDS, COMBAT_KINDS};
