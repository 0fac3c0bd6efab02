//! Attack-power sweep.
//!
//! Resolves the same defending force at every legal attacking power, with and
//! without a legal retreat, to show how evacuation odds and losses scale.
//! The 24 resolutions are independent; with more than one thread they run on
//! a dedicated rayon pool and are collected back in sweep order.

use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::engine::{process, summarize, Summary};
use crate::force::{validate_force, AttackSpec, ForceCounts, ValidationError, MAX_POWER, MIN_POWER};

/// Configuration for a power sweep.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Number of worker threads; 1 or fewer runs sequentially.
    pub threads: usize,
    /// Suppress progress logging.
    pub quiet: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        SweepConfig {
            threads: 4,
            quiet: false,
        }
    }
}

/// Errors from running a sweep.
#[derive(Debug, thiserror::Error)]
pub enum SweepError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("failed to build sweep thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Evacuation probability at one power (retreat allowed).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EvacuatePoint {
    pub power: u32,
    pub p_evacuate: f64,
}

/// Expected power destroyed at one power under one retreat regime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DestroyPoint {
    pub power: u32,
    pub exp_power_destroyed: f64,
    pub retreat: bool,
}

/// Sweep tables, in increasing power order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerSweep {
    pub evacuate: Vec<EvacuatePoint>,
    /// Retreat-allowed rows first, then no-retreat rows.
    pub destroy: Vec<DestroyPoint>,
}

/// Resolves `force` at every power from 1 to 12 under both retreat regimes.
pub fn sweep_powers(force: &ForceCounts, config: &SweepConfig) -> Result<PowerSweep, SweepError> {
    validate_force(force)?;

    let points: Vec<(bool, u32)> = [true, false]
        .into_iter()
        .flat_map(|retreat| (MIN_POWER..=MAX_POWER).map(move |power| (retreat, power)))
        .collect();

    let run = |&(retreat, power): &(bool, u32)| -> Result<(bool, u32, Summary), ValidationError> {
        let spec = AttackSpec::from_force(power, *force, retreat)?;
        Ok((retreat, power, summarize(&process(&spec)?)))
    };

    let summaries: Vec<(bool, u32, Summary)> = if config.threads > 1 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .build()?;
        pool.install(|| points.par_iter().map(run).collect::<Result<Vec<_>, _>>())?
    } else {
        points.iter().map(run).collect::<Result<Vec<_>, _>>()?
    };

    if !config.quiet {
        info!(
            inf = force.inf,
            tnk = force.tnk,
            art = force.art,
            points = summaries.len(),
            threads = config.threads,
            "power sweep complete"
        );
    }

    let evacuate = summaries
        .iter()
        .filter(|(retreat, _, _)| *retreat)
        .map(|&(_, power, s)| EvacuatePoint {
            power,
            p_evacuate: s.prob_evacuate,
        })
        .collect();
    let destroy = summaries
        .iter()
        .map(|&(retreat, power, s)| DestroyPoint {
            power,
            exp_power_destroyed: s.exp_power_destroyed,
            retreat,
        })
        .collect();

    Ok(PowerSweep { evacuate, destroy })
}
