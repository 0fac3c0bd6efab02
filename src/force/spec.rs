//! Attack descriptions and their validation rules.
//!
//! An `AttackSpec` pairs an attacking power with the defending force of one
//! hex. Every rule is checked before any probability is computed; an invalid
//! spec never produces a distribution.

use serde::Serialize;

use super::counts::ForceCounts;
use super::unit::{UnitKind, COMBAT_KINDS};

/// Smallest legal attacking power.
pub const MIN_POWER: u32 = 1;

/// Largest legal attacking power.
pub const MAX_POWER: u32 = 12;

/// Largest total defense power a single hex may hold.
pub const MAX_DEFENSE_POWER: u32 = 12;

/// Most attacks that can legally be launched against one hex in sequence.
pub const MAX_ATTACKS: usize = 6;

/// Errors raised when an attack or its defending force breaks the rules.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("attacking power must be between 1 and 12, got {0}")]
    PowerOutOfRange(u32),

    #[error("{kind:?} count {count} exceeds the stacking limit of {limit}")]
    StackingLimit {
        kind: UnitKind,
        count: u32,
        limit: u32,
    },

    #[error("total defending power must be 12 or less, got {0}")]
    DefensePowerTooHigh(u32),

    #[error("cannot attack an unoccupied hex: no defending combat units")]
    NoCombatUnits,

    #[error("{field} must be 0 or greater, got {value}")]
    NegativeCount { field: String, value: f64 },

    #[error("{field} must be a whole number, got {value}")]
    NonIntegerCount { field: String, value: f64 },

    #[error("{field} is too large, got {value}")]
    CountTooLarge { field: String, value: f64 },

    #[error("cannot specify more than 6 attacks, got {0}")]
    TooManyAttacks(usize),

    #[error("attack {index} has power {power}; attack powers must be between 1 and 12")]
    AttackPowerOutOfRange { index: usize, power: u32 },

    #[error("attack {index} has power {value}; attack powers must be between 1 and 12")]
    LooseAttackPowerOutOfRange { index: usize, value: f64 },

    #[error("attack {index} has non-integer power {value}")]
    NonIntegerAttackPower { index: usize, value: f64 },

    #[error("attack {index} is not a number")]
    NonNumericAttackPower { index: usize },

    #[error("attack powers must be given as a list")]
    AttacksNotSequence,
}

/// A single attack against one defending hex.
///
/// Fields are public so sweep callers can change `power` or `can_retreat`
/// between runs; `engine::process` re-validates on every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AttackSpec {
    pub power: u32,
    pub force: ForceCounts,
    pub can_retreat: bool,
}

impl AttackSpec {
    /// Builds and validates an attack spec.
    pub fn new(
        power: u32,
        inf: u32,
        tnk: u32,
        art: u32,
        supply: u32,
        truck: u32,
        can_retreat: bool,
    ) -> Result<Self, ValidationError> {
        Self::from_force(power, ForceCounts::new(inf, tnk, art, supply, truck), can_retreat)
    }

    /// Builds and validates an attack spec from an existing force.
    pub fn from_force(
        power: u32,
        force: ForceCounts,
        can_retreat: bool,
    ) -> Result<Self, ValidationError> {
        let spec = AttackSpec {
            power,
            force,
            can_retreat,
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Checks power range, stacking limits, the defense power ceiling, and
    /// occupancy.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(MIN_POWER..=MAX_POWER).contains(&self.power) {
            return Err(ValidationError::PowerOutOfRange(self.power));
        }
        validate_force(&self.force)
    }

    /// Slot count: one per combat unit plus one presence slot for each
    /// logistics kind that is stocked.
    pub fn slot_count(&self) -> u32 {
        self.force.combat_units()
            + u32::from(self.force.supply > 0)
            + u32::from(self.force.truck > 0)
    }
}

/// Checks stacking limits, the defense power ceiling, and occupancy of a
/// defending force.
pub fn validate_force(force: &ForceCounts) -> Result<(), ValidationError> {
    for kind in COMBAT_KINDS {
        let count = force.count(kind);
        if let Some(limit) = kind.stacking_limit() {
            if count > limit {
                return Err(ValidationError::StackingLimit { kind, count, limit });
            }
        }
    }
    let defense = force.defense_power();
    if defense > MAX_DEFENSE_POWER {
        return Err(ValidationError::DefensePowerTooHigh(defense));
    }
    if force.combat_units() == 0 {
        return Err(ValidationError::NoCombatUnits);
    }
    Ok(())
}

/// Checks a sequence of attack powers: at most six, each in 1..=12.
pub fn validate_attack_powers(powers: &[u32]) -> Result<(), ValidationError> {
    if powers.len() > MAX_ATTACKS {
        return Err(ValidationError::TooManyAttacks(powers.len()));
    }
    for (index, &power) in powers.iter().enumerate() {
        if !(MIN_POWER..=MAX_POWER).contains(&power) {
            return Err(ValidationError::AttackPowerOutOfRange { index, power });
        }
    }
    Ok(())
}

/// Converts a loosely typed count (e.g. a JSON number) into a unit count.
pub fn count_from_f64(field: &str, value: f64) -> Result<u32, ValidationError> {
    if value.fract() != 0.0 || !value.is_finite() {
        return Err(ValidationError::NonIntegerCount {
            field: field.to_string(),
            value,
        });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeCount {
            field: field.to_string(),
            value,
        });
    }
    if value > u32::MAX as f64 {
        return Err(ValidationError::CountTooLarge {
            field: field.to_string(),
            value,
        });
    }
    Ok(value as u32)
}

/// Converts loosely typed attack powers into a validated power list.
pub fn attack_powers_from_f64(values: &[f64]) -> Result<Vec<u32>, ValidationError> {
    if values.len() > MAX_ATTACKS {
        return Err(ValidationError::TooManyAttacks(values.len()));
    }
    let mut powers = Vec::with_capacity(values.len());
    for (index, &value) in values.iter().enumerate() {
        if value.fract() != 0.0 || !value.is_finite() {
            return Err(ValidationError::NonIntegerAttackPower { index, value });
        }
        if value < MIN_POWER as f64 || value > MAX_POWER as f64 {
            return Err(ValidationError::LooseAttackPowerOutOfRange { index, value });
        }
        powers.push(value as u32);
    }
    Ok(powers)
}
