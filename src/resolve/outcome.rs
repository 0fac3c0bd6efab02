//! Joint outcome of one attack resolution.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::force::{ForceCounts, UnitKind};

/// Per-kind retreat and destroy counters for one possible result.
///
/// Logistics kinds never retreat, so they only carry a destroyed count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct OutcomeKey {
    pub inf_retreat: u32,
    pub inf_destroyed: u32,
    pub tnk_retreat: u32,
    pub tnk_destroyed: u32,
    pub art_retreat: u32,
    pub art_destroyed: u32,
    pub supply_destroyed: u32,
    pub truck_destroyed: u32,
}

impl OutcomeKey {
    /// Retreat count for a combat kind (always 0 for logistics).
    pub fn retreated(&self, kind: UnitKind) -> u32 {
        match kind {
            UnitKind::Infantry => self.inf_retreat,
            UnitKind::Tank => self.tnk_retreat,
            UnitKind::Artillery => self.art_retreat,
            UnitKind::Supply | UnitKind::Truck => 0,
        }
    }

    /// Destroyed count for any kind.
    pub fn destroyed(&self, kind: UnitKind) -> u32 {
        match kind {
            UnitKind::Infantry => self.inf_destroyed,
            UnitKind::Tank => self.tnk_destroyed,
            UnitKind::Artillery => self.art_destroyed,
            UnitKind::Supply => self.supply_destroyed,
            UnitKind::Truck => self.truck_destroyed,
        }
    }

    pub(crate) fn add_retreat(&mut self, kind: UnitKind) {
        match kind {
            UnitKind::Infantry => self.inf_retreat += 1,
            UnitKind::Tank => self.tnk_retreat += 1,
            UnitKind::Artillery => self.art_retreat += 1,
            UnitKind::Supply | UnitKind::Truck => {}
        }
    }

    pub(crate) fn add_destroyed(&mut self, kind: UnitKind, n: u32) {
        match kind {
            UnitKind::Infantry => self.inf_destroyed += n,
            UnitKind::Tank => self.tnk_destroyed += n,
            UnitKind::Artillery => self.art_destroyed += n,
            UnitKind::Supply => self.supply_destroyed += n,
            UnitKind::Truck => self.truck_destroyed += n,
        }
    }

    /// Total retreats across combat kinds.
    pub fn total_retreated(&self) -> u32 {
        self.inf_retreat + self.tnk_retreat + self.art_retreat
    }

    /// Defense power destroyed outright (retreats excluded).
    pub fn power_destroyed(&self) -> u32 {
        self.inf_destroyed * UnitKind::Infantry.power()
            + self.tnk_destroyed * UnitKind::Tank.power()
            + self.art_destroyed * UnitKind::Artillery.power()
    }

    /// Units still in the hex after this outcome, given the force before it.
    pub fn remaining(&self, before: &ForceCounts) -> ForceCounts {
        let left = |kind: UnitKind| {
            before
                .count(kind)
                .saturating_sub(self.retreated(kind) + self.destroyed(kind))
        };
        ForceCounts {
            inf: left(UnitKind::Infantry),
            tnk: left(UnitKind::Tank),
            art: left(UnitKind::Artillery),
            supply: left(UnitKind::Supply),
            truck: left(UnitKind::Truck),
        }
    }
}

/// One row of the outcome distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OutcomeEntry {
    #[serde(flatten)]
    pub outcome: OutcomeKey,
    pub probability: f64,
}

/// Probability mass over every distinct joint outcome, ordered by key.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct OutcomeDistribution {
    entries: Vec<OutcomeEntry>,
}

impl OutcomeDistribution {
    /// Builds a distribution from grouped mass.
    pub fn from_grouped(grouped: BTreeMap<OutcomeKey, f64>) -> Self {
        let entries = grouped
            .into_iter()
            .map(|(outcome, probability)| OutcomeEntry {
                outcome,
                probability,
            })
            .collect();
        OutcomeDistribution { entries }
    }

    /// Rows in increasing key order.
    pub fn entries(&self) -> &[OutcomeEntry] {
        &self.entries
    }

    /// Number of distinct outcomes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no outcome has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Probability of an exact outcome (0 if absent).
    pub fn prob(&self, outcome: &OutcomeKey) -> f64 {
        self.entries
            .binary_search_by(|e| e.outcome.cmp(outcome))
            .map(|i| self.entries[i].probability)
            .unwrap_or(0.0)
    }

    /// Total probability mass.
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|e| e.probability).sum()
    }
}
