//! Slot-by-slot convolution of hit assignments.
//!
//! Starting from the law of rolled hits, each slot in turn draws how many of
//! the still-unassigned hits land on it, and the running joint distribution
//! is re-keyed by the hits left over. Given `h` unassigned hits, a slot with
//! `w` of `F` faces takes Binomial(h, w / F) of them. The final slot takes
//! whatever remains with certainty, so no hit is ever left unassigned.
//!
//! Per-slot outcome rules, applied as soon as the slot's hit count `k` is
//! known:
//!
//! - combat unit, retreat allowed: `k == 1` retreats, `k > 1` is destroyed
//! - combat unit, no retreat: `k > 0` is destroyed
//! - logistics presence: destroyed count grows by the raw `k`, clipped to
//!   the real stock once every slot has been processed

use std::collections::BTreeMap;

use tracing::debug;

use crate::dice::{allocate_slots, binomial_pmf, HitRollDistribution, SlotAllocation};
use crate::force::{AttackSpec, UnitKind};

use super::outcome::{OutcomeDistribution, OutcomeKey};

/// Running state during convolution: hits still unassigned plus the
/// counters accumulated so far.
type Partial = (u32, OutcomeKey);

/// Builds the joint outcome distribution for one attack.
#[derive(Debug, Clone)]
pub struct UnitHitConvolver {
    spec: AttackSpec,
    allocation: SlotAllocation,
    hit_law: HitRollDistribution,
    /// Unit-hit laws keyed by slot weight: `laws[&w][h][k]` is the chance a
    /// slot of weight `w` takes `k` of `h` available hits.
    laws: BTreeMap<u32, Vec<Vec<f64>>>,
}

impl UnitHitConvolver {
    /// Prepares a convolver using the standard slot enumeration.
    pub fn new(spec: &AttackSpec) -> Self {
        Self::from_allocation(spec, allocate_slots(spec))
    }

    /// Prepares a convolver with an explicit slot order and weighting.
    pub fn from_allocation(spec: &AttackSpec, allocation: SlotAllocation) -> Self {
        let hit_law = HitRollDistribution::new(spec.power);
        let mut laws = BTreeMap::new();
        for slot in &allocation.slots {
            laws.entry(slot.weight).or_insert_with(|| {
                unit_hit_laws(hit_law.power(), slot.weight, allocation.faces)
            });
        }
        UnitHitConvolver {
            spec: *spec,
            allocation,
            hit_law,
            laws,
        }
    }

    /// Slot order and weights in use.
    pub fn allocation(&self) -> &SlotAllocation {
        &self.allocation
    }

    /// Runs the convolution and returns the grouped outcome distribution.
    pub fn convolve(&self) -> OutcomeDistribution {
        let mut frontier: BTreeMap<Partial, f64> = self
            .hit_law
            .iter()
            .map(|(hits, p)| ((hits, OutcomeKey::default()), p))
            .collect();

        let last = self.allocation.slots.len().saturating_sub(1);
        for (i, slot) in self.allocation.slots.iter().enumerate() {
            let mut next: BTreeMap<Partial, f64> = BTreeMap::new();
            for (&(available, key), &prob) in &frontier {
                if i == last {
                    let mut key = key;
                    apply_hits(&mut key, slot.kind, available, self.spec.can_retreat);
                    *next.entry((0, key)).or_insert(0.0) += prob;
                    continue;
                }
                let row = &self.laws[&slot.weight][available as usize];
                for (k, &pk) in row.iter().enumerate() {
                    let k = k as u32;
                    let mut key = key;
                    apply_hits(&mut key, slot.kind, k, self.spec.can_retreat);
                    *next.entry((available - k, key)).or_insert(0.0) += prob * pk;
                }
            }
            frontier = next;
        }

        debug!(
            power = self.hit_law.power(),
            slots = self.allocation.slots.len(),
            faces = self.allocation.faces,
            states = frontier.len(),
            "convolved slot hits"
        );

        let supply = self.spec.force.supply;
        let truck = self.spec.force.truck;
        let mut grouped: BTreeMap<OutcomeKey, f64> = BTreeMap::new();
        for ((_, mut key), prob) in frontier {
            key.supply_destroyed = key.supply_destroyed.min(supply);
            key.truck_destroyed = key.truck_destroyed.min(truck);
            *grouped.entry(key).or_insert(0.0) += prob;
        }
        OutcomeDistribution::from_grouped(grouped)
    }
}

/// Applies the retreat/destroy rule for `hits` landing on one slot.
fn apply_hits(key: &mut OutcomeKey, kind: UnitKind, hits: u32, can_retreat: bool) {
    if !kind.is_combat() {
        key.add_destroyed(kind, hits);
        return;
    }
    match (can_retreat, hits) {
        (_, 0) => {}
        (true, 1) => key.add_retreat(kind),
        _ => key.add_destroyed(kind, 1),
    }
}

/// Hit-count laws for a slot of `weight` faces out of `faces`, for every
/// number of available hits from 0 to `power`.
fn unit_hit_laws(power: u32, weight: u32, faces: u32) -> Vec<Vec<f64>> {
    let q = weight as f64 / faces as f64;
    (0..=power)
        .map(|available| {
            (0..=available)
                .map(|k| binomial_pmf(available, k, q))
                .collect()
        })
        .collect()
}
