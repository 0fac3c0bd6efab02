//! Evacuation odds across a sequence of attacks on one hex.
//!
//! Every surviving force after attack `i` is attacked again at attack
//! `i + 1`. Forces with no combat units left are evacuated and stop; the rest
//! are merged by identical unit counts before the next attack so the frontier
//! stays small.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::engine::process;
use crate::force::{validate_attack_powers, AttackSpec, ForceCounts, ValidationError};

/// A surviving force and the probability of reaching it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SurvivorEntry {
    #[serde(flatten)]
    pub units: ForceCounts,
    pub probability: f64,
}

/// Result of propagating a force through an attack sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultiAttackResult {
    /// Total probability that the hex is evacuated at some point.
    pub prob_evacuate: f64,
    /// Probability first evacuated by each attack, in attack order.
    pub evacuated_by_attack: Vec<f64>,
    /// Expected defense power destroyed over the whole sequence.
    pub exp_power_destroyed: f64,
    /// Forces still holding the hex after the last attack.
    pub survivors: Vec<SurvivorEntry>,
}

/// Propagates `spec`'s defending force through `attack_powers` in order.
///
/// Every attack in the sequence, follow-ups included, uses the retreat
/// legality of `spec` rather than always allowing retreat. A unit hit at
/// least once leaves the hex either way, so `prob_evacuate` and the survivors
/// do not depend on it. `exp_power_destroyed` does: without retreat a single
/// hit destroys the unit. An empty list leaves the hex untouched.
pub fn propagate(
    spec: &AttackSpec,
    attack_powers: &[u32],
) -> Result<MultiAttackResult, ValidationError> {
    spec.validate()?;
    validate_attack_powers(attack_powers)?;

    let mut frontier: BTreeMap<ForceCounts, f64> = BTreeMap::new();
    frontier.insert(spec.force, 1.0);

    let mut prob_evacuate = 0.0;
    let mut evacuated_by_attack = Vec::with_capacity(attack_powers.len());
    let mut exp_power_destroyed = 0.0;

    for (index, &power) in attack_powers.iter().enumerate() {
        let mut next: BTreeMap<ForceCounts, f64> = BTreeMap::new();
        let mut evacuated = 0.0;

        for (force, &path_prob) in &frontier {
            let attack = AttackSpec::from_force(power, *force, spec.can_retreat)?;
            let result = process(&attack)?;
            exp_power_destroyed += path_prob * result.exp_power_destroyed;

            for entry in &result.units_left_distribution {
                let prob = path_prob * entry.probability;
                if entry.evacuate {
                    evacuated += prob;
                } else {
                    *next.entry(entry.units).or_insert(0.0) += prob;
                }
            }
        }

        debug!(
            attack = index + 1,
            power,
            states = next.len(),
            evacuated,
            "propagated attack"
        );

        prob_evacuate += evacuated;
        evacuated_by_attack.push(evacuated);
        frontier = next;
    }

    let survivors = frontier
        .into_iter()
        .map(|(units, probability)| SurvivorEntry { units, probability })
        .collect();

    Ok(MultiAttackResult {
        prob_evacuate,
        evacuated_by_attack,
        exp_power_destroyed,
        survivors,
    })
}

/// Total evacuation probability over an attack sequence.
pub fn simulate_multi_attack(
    spec: &AttackSpec,
    attack_powers: &[u32],
) -> Result<f64, ValidationError> {
    Ok(propagate(spec, attack_powers)?.prob_evacuate)
}
