//! Scenario files.
//!
//! A scenario file is a JSON document listing defending hexes to evaluate:
//!
//! ```json
//! { "scenarios": [
//!     { "name": "bastogne", "inf": 3, "tnk": 1, "supply": 2,
//!       "can_retreat": false, "power": 8, "attacks": [6, 6, 8] }
//! ] }
//! ```
//!
//! Counts are read as plain JSON numbers and checked here, so a fractional
//! or negative count is reported as a validation error naming the field.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::engine::{process, summarize, Summary};
use crate::force::{
    attack_powers_from_f64, count_from_f64, AttackSpec, ForceCounts, ValidationError,
};
use crate::sequence::{propagate, MultiAttackResult};

/// Errors from loading or evaluating scenarios.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse scenario JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("scenario '{name}': {source}")]
    Invalid {
        name: String,
        source: ValidationError,
    },
}

/// The full scenario document.
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioFile {
    pub scenarios: Vec<Scenario>,
}

/// One defending hex and the attacks to evaluate against it.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default = "default_inf")]
    pub inf: f64,
    #[serde(default)]
    pub tnk: f64,
    #[serde(default)]
    pub art: f64,
    #[serde(default)]
    pub supply: f64,
    #[serde(default)]
    pub truck: f64,
    #[serde(default = "default_can_retreat")]
    pub can_retreat: bool,
    #[serde(default = "default_power")]
    pub power: f64,
    /// Attack powers for a multi-attack run; must be a JSON array if given.
    #[serde(default)]
    pub attacks: Option<Value>,
}

fn default_inf() -> f64 {
    1.0
}

fn default_can_retreat() -> bool {
    true
}

fn default_power() -> f64 {
    1.0
}

impl Scenario {
    /// Converts the loose fields into a validated attack spec.
    pub fn attack_spec(&self) -> Result<AttackSpec, ValidationError> {
        let force = ForceCounts::new(
            count_from_f64("inf", self.inf)?,
            count_from_f64("tnk", self.tnk)?,
            count_from_f64("art", self.art)?,
            count_from_f64("supply", self.supply)?,
            count_from_f64("truck", self.truck)?,
        );
        let power = count_from_f64("power", self.power)?;
        AttackSpec::from_force(power, force, self.can_retreat)
    }

    /// The multi-attack sequence, if one was given.
    pub fn attack_powers(&self) -> Result<Option<Vec<u32>>, ValidationError> {
        let Some(value) = &self.attacks else {
            return Ok(None);
        };
        let Value::Array(items) = value else {
            return Err(ValidationError::AttacksNotSequence);
        };
        let mut raw = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            match item.as_f64() {
                Some(v) => raw.push(v),
                None => return Err(ValidationError::NonNumericAttackPower { index }),
            }
        }
        attack_powers_from_f64(&raw).map(Some)
    }
}

/// Outcome of evaluating one scenario.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioReport {
    pub name: String,
    pub spec: AttackSpec,
    pub summary: Summary,
    pub multi_attack: Option<MultiAttackResult>,
}

/// Loads scenarios from a JSON file.
pub fn load_scenarios(path: &Path) -> Result<ScenarioFile, ScenarioError> {
    let data = fs::read_to_string(path).map_err(|source| ScenarioError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_scenarios_from_str(&data)
}

/// Loads scenarios from a JSON string.
pub fn load_scenarios_from_str(json: &str) -> Result<ScenarioFile, ScenarioError> {
    Ok(serde_json::from_str(json)?)
}

/// Evaluates a single scenario: one attack at its power, plus the attack
/// sequence when one is given.
pub fn run_scenario(scenario: &Scenario) -> Result<ScenarioReport, ScenarioError> {
    let invalid = |source| ScenarioError::Invalid {
        name: scenario.name.clone(),
        source,
    };
    let spec = scenario.attack_spec().map_err(invalid)?;
    let powers = scenario.attack_powers().map_err(invalid)?;

    let summary = summarize(&process(&spec).map_err(invalid)?);
    let multi_attack = match powers {
        Some(powers) => Some(propagate(&spec, &powers).map_err(invalid)?),
        None => None,
    };

    info!(
        scenario = %scenario.name,
        prob_evacuate = summary.prob_evacuate,
        "evaluated scenario"
    );

    Ok(ScenarioReport {
        name: scenario.name.clone(),
        spec,
        summary,
        multi_attack,
    })
}

/// Evaluates every scenario in order, stopping at the first failure.
pub fn run_scenarios(file: &ScenarioFile) -> Result<Vec<ScenarioReport>, ScenarioError> {
    file.scenarios.iter().map(run_scenario).collect()
}
