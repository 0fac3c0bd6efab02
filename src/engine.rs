//! Single-attack engine.
//!
//! Validates an attack spec, runs the slot convolution, and derives every
//! marginal and summary. `Engine` additionally keeps a spec and its latest
//! result so callers can vary power or retreat legality between runs.

use std::io::Write;

use serde::Serialize;
use tracing::debug;

use crate::force::{AttackSpec, ValidationError};
use crate::resolve::{
    aggregate, OutcomeDistribution, PowerDestroyedEntry, PowerLeftEntry, UnitDestroyedEntry,
    UnitHitConvolver, UnitsLeftEntry,
};

/// Every distribution and summary produced by one resolution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineResult {
    pub outcome_distribution: OutcomeDistribution,
    pub power_left_distribution: Vec<PowerLeftEntry>,
    pub units_left_distribution: Vec<UnitsLeftEntry>,
    pub unit_destroyed_distribution: Vec<UnitDestroyedEntry>,
    pub total_power_destroyed_distribution: Vec<PowerDestroyedEntry>,
    pub prob_evacuate: f64,
    pub exp_power_destroyed: f64,
}

/// The two headline numbers of a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub prob_evacuate: f64,
    pub exp_power_destroyed: f64,
}

/// Resolves one attack. Fails before any computation if the attack is invalid.
pub fn process(spec: &AttackSpec) -> Result<EngineResult, ValidationError> {
    spec.validate()?;

    let outcomes = UnitHitConvolver::new(spec).convolve();
    let derived = aggregate(&spec.force, &outcomes);
    debug!(
        power = spec.power,
        can_retreat = spec.can_retreat,
        outcomes = outcomes.len(),
        prob_evacuate = derived.prob_evacuate,
        exp_power_destroyed = derived.exp_power_destroyed,
        "processed attack"
    );

    Ok(EngineResult {
        outcome_distribution: outcomes,
        power_left_distribution: derived.power_left,
        units_left_distribution: derived.units_left,
        unit_destroyed_distribution: derived.unit_destroyed,
        total_power_destroyed_distribution: derived.total_power_destroyed,
        prob_evacuate: derived.prob_evacuate,
        exp_power_destroyed: derived.exp_power_destroyed,
    })
}

/// Extracts the headline numbers from a result.
pub fn summarize(result: &EngineResult) -> Summary {
    Summary {
        prob_evacuate: result.prob_evacuate,
        exp_power_destroyed: result.exp_power_destroyed,
    }
}

/// Writes the key-findings report for a summary.
pub fn write_report<W: Write>(summary: &Summary, out: &mut W) -> std::io::Result<()> {
    writeln!(out, "EVACUATION PROBABILITY: {:.3}", summary.prob_evacuate)?;
    writeln!(out, "EXPECTED POWER DESTROYED: {:.3}", summary.exp_power_destroyed)
}

/// Holds an attack spec and the result of its latest resolution.
pub struct Engine {
    pub spec: AttackSpec,
    result: Option<EngineResult>,
}

impl Engine {
    /// Creates an engine for a validated spec. Nothing is computed yet.
    pub fn new(spec: AttackSpec) -> Self {
        Engine { spec, result: None }
    }

    /// Changes the attacking power. Checked on the next `process`.
    pub fn set_power(&mut self, power: u32) {
        self.spec.power = power;
    }

    /// Changes whether defenders may retreat.
    pub fn set_can_retreat(&mut self, can_retreat: bool) {
        self.spec.can_retreat = can_retreat;
    }

    /// Re-validates the attack and recomputes the result.
    ///
    /// On error the previous result is kept.
    pub fn process(&mut self) -> Result<&EngineResult, ValidationError> {
        let result = process(&self.spec)?;
        Ok(&*self.result.insert(result))
    }

    /// The latest result, if any.
    pub fn result(&self) -> Option<&EngineResult> {
        self.result.as_ref()
    }

    /// Writes the key findings of the latest result. Returns false if
    /// nothing has been processed yet.
    pub fn report<W: Write>(&self, out: &mut W) -> std::io::Result<bool> {
        match &self.result {
            Some(result) => {
                write_report(&summarize(result), out)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn golden_case() {
        let spec = AttackSpec::new(1, 1, 0, 0, 0, 0, true).unwrap();
        let result = process(&spec).unwrap();
        let summary = summarize(&result);
        assert_eq!(summary.prob_evacuate, 0.5);
        assert_eq!(summary.exp_power_destroyed, 0.0);
        assert_eq!(result.outcome_distribution.len(), 2);
    }

    #[test]
    fn process_rejects_mutated_invalid_spec() {
        let mut spec = AttackSpec::new(4, 2, 0, 0, 0, 0, true).unwrap();
        spec.power = 13;
        assert_eq!(process(&spec), Err(ValidationError::PowerOutOfRange(13)));
    }

    #[test]
    fn process_is_idempotent() {
        let spec = AttackSpec::new(7, 2, 1, 1, 1, 1, true).unwrap();
        let a = process(&spec).unwrap();
        let b = process(&spec).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn engine_reprocesses_after_changes() {
        let spec = AttackSpec::new(1, 2, 0, 0, 0, 0, true).unwrap();
        let mut engine = Engine::new(spec);
        assert!(engine.result().is_none());

        let low = engine.process().unwrap().prob_evacuate;
        engine.set_power(12);
        let high = engine.process().unwrap().prob_evacuate;
        assert_eq!(low, 0.0);
        assert!(high > low);

        engine.set_can_retreat(false);
        let result = engine.process().unwrap();
        assert!(result
            .outcome_distribution
            .entries()
            .iter()
            .all(|e| e.outcome.total_retreated() == 0));
    }

    #[test]
    fn engine_keeps_last_result_on_error() {
        let spec = AttackSpec::new(3, 1, 0, 0, 0, 0, true).unwrap();
        let mut engine = Engine::new(spec);
        engine.process().unwrap();
        engine.set_power(0);
        assert!(engine.process().is_err());
        assert!(engine.result().is_some());
    }

    #[test]
    fn report_before_and_after_processing() {
        let spec = AttackSpec::new(1, 1, 0, 0, 0, 0, true).unwrap();
        let mut engine = Engine::new(spec);

        let mut output = Vec::new();
        assert!(!engine.report(&mut output).unwrap());
        assert!(output.is_empty());

        engine.process().unwrap();
        assert!(engine.report(&mut output).unwrap());
        let text = String::from_utf8(output).unwrap();
        assert_eq!(
            text,
            "EVACUATION PROBABILITY: 0.500\nEXPECTED POWER DESTROYED: 0.000\n"
        );
    }
}
