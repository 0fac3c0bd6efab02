//! Summaries and marginals of a joint outcome distribution.
//!
//! All marginals are group-sums keyed by the relevant fields and returned in
//! increasing key order.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::force::ForceCounts;

use super::outcome::{OutcomeDistribution, OutcomeKey};

/// Probability that a given amount of defense power stays in the hex.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PowerLeftEntry {
    pub power_left: u32,
    pub probability: f64,
}

/// Probability of a literal surviving force.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UnitsLeftEntry {
    #[serde(flatten)]
    pub units: ForceCounts,
    pub probability: f64,
    /// No combat unit left; surviving logistics do not count.
    pub evacuate: bool,
}

/// Probability of a combination of combat units destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UnitDestroyedEntry {
    pub inf_destroyed: u32,
    pub tnk_destroyed: u32,
    pub art_destroyed: u32,
    pub total_destroyed: u32,
    pub total_survived: u32,
    pub total_power_destroyed: u32,
    pub probability: f64,
}

/// Probability of destroying exactly `power_destroyed`, with both tails.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PowerDestroyedEntry {
    pub power_destroyed: u32,
    pub probability: f64,
    /// P(X >= power_destroyed).
    pub or_more: f64,
    /// P(X <= power_destroyed).
    pub or_less: f64,
}

/// Marginals and scalar summaries derived from one outcome distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedDistributions {
    pub power_left: Vec<PowerLeftEntry>,
    pub units_left: Vec<UnitsLeftEntry>,
    pub unit_destroyed: Vec<UnitDestroyedEntry>,
    pub total_power_destroyed: Vec<PowerDestroyedEntry>,
    pub prob_evacuate: f64,
    pub exp_power_destroyed: f64,
}

/// Derives every marginal and summary for an attack on `force`.
pub fn aggregate(force: &ForceCounts, outcomes: &OutcomeDistribution) -> DerivedDistributions {
    let power_left = power_left_distribution(force, outcomes);
    let prob_evacuate = power_left
        .iter()
        .find(|e| e.power_left == 0)
        .map(|e| e.probability)
        .unwrap_or(0.0);
    let units_left = units_left_distribution(force, outcomes);
    let unit_destroyed = unit_destroyed_distribution(force, outcomes);
    let total_power_destroyed = power_destroyed_distribution(&unit_destroyed);
    let exp_power_destroyed = expectation(
        total_power_destroyed
            .iter()
            .map(|e| (e.power_destroyed as f64, e.probability)),
    );

    DerivedDistributions {
        power_left,
        units_left,
        unit_destroyed,
        total_power_destroyed,
        prob_evacuate,
        exp_power_destroyed,
    }
}

/// Marginal over residual defense power.
pub fn power_left_distribution(
    force: &ForceCounts,
    outcomes: &OutcomeDistribution,
) -> Vec<PowerLeftEntry> {
    let mut grouped: BTreeMap<u32, f64> = BTreeMap::new();
    for entry in outcomes.entries() {
        let left = entry.outcome.remaining(force).defense_power();
        *grouped.entry(left).or_insert(0.0) += entry.probability;
    }
    grouped
        .into_iter()
        .map(|(power_left, probability)| PowerLeftEntry {
            power_left,
            probability,
        })
        .collect()
}

/// Marginal over the literal surviving unit counts.
pub fn units_left_distribution(
    force: &ForceCounts,
    outcomes: &OutcomeDistribution,
) -> Vec<UnitsLeftEntry> {
    let mut grouped: BTreeMap<ForceCounts, f64> = BTreeMap::new();
    for entry in outcomes.entries() {
        *grouped.entry(entry.outcome.remaining(force)).or_insert(0.0) += entry.probability;
    }
    grouped
        .into_iter()
        .map(|(units, probability)| UnitsLeftEntry {
            units,
            probability,
            evacuate: units.is_evacuated(),
        })
        .collect()
}

/// Marginal over destroyed combat units, with derived totals.
pub fn unit_destroyed_distribution(
    force: &ForceCounts,
    outcomes: &OutcomeDistribution,
) -> Vec<UnitDestroyedEntry> {
    let mut grouped: BTreeMap<(u32, u32, u32), f64> = BTreeMap::new();
    for entry in outcomes.entries() {
        let o = &entry.outcome;
        *grouped
            .entry((o.inf_destroyed, o.tnk_destroyed, o.art_destroyed))
            .or_insert(0.0) += entry.probability;
    }
    let defenders = force.combat_units();
    grouped
        .into_iter()
        .map(|((inf, tnk, art), probability)| {
            let total_destroyed = inf + tnk + art;
            UnitDestroyedEntry {
                inf_destroyed: inf,
                tnk_destroyed: tnk,
                art_destroyed: art,
                total_destroyed,
                total_survived: defenders.saturating_sub(total_destroyed),
                total_power_destroyed: OutcomeKey {
                    inf_destroyed: inf,
                    tnk_destroyed: tnk,
                    art_destroyed: art,
                    ..Default::default()
                }
                .power_destroyed(),
                probability,
            }
        })
        .collect()
}

/// Distribution of total power destroyed with "or more" and "or less" tails,
/// in increasing order of power destroyed.
pub fn power_destroyed_distribution(
    unit_destroyed: &[UnitDestroyedEntry],
) -> Vec<PowerDestroyedEntry> {
    let mut grouped: BTreeMap<u32, f64> = BTreeMap::new();
    for entry in unit_destroyed {
        *grouped.entry(entry.total_power_destroyed).or_insert(0.0) += entry.probability;
    }

    let mut rows: Vec<PowerDestroyedEntry> = grouped
        .into_iter()
        .map(|(power_destroyed, probability)| PowerDestroyedEntry {
            power_destroyed,
            probability,
            or_more: 0.0,
            or_less: 0.0,
        })
        .collect();

    let mut acc = 0.0;
    for row in rows.iter_mut().rev() {
        acc += row.probability;
        row.or_more = acc;
    }
    let mut acc = 0.0;
    for row in rows.iter_mut() {
        acc += row.probability;
        row.or_less = acc;
    }
    rows
}

/// Σ value·probability; 0 for an empty or zero-mass distribution.
pub fn expectation<I>(pairs: I) -> f64
where
    I: IntoIterator<Item = (f64, f64)>,
{
    pairs.into_iter().map(|(value, p)| value * p).sum()
}
