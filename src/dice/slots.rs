//! Hit-face allocation across defending slots.
//!
//! A hit is assigned by rolling a die whose faces are shared out among the
//! defenders. There are 6 faces for stacks of fewer than 7 slots and 12
//! otherwise; faces are spread as evenly as possible, with any remainder
//! going to the first slots in enumeration order.

use serde::Serialize;

use crate::force::{AttackSpec, UnitKind, ALL_KINDS};

/// Face budget for small stacks.
pub const SMALL_FACE_BUDGET: u32 = 6;

/// Face budget for stacks of 7 or more slots.
pub const LARGE_FACE_BUDGET: u32 = 12;

/// One hit-addressable target: a combat unit instance or a logistics
/// presence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Slot {
    pub kind: UnitKind,
    /// Faces of the hit die that land on this slot.
    pub weight: u32,
}

/// Face budget and per-slot weights for one defending stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotAllocation {
    pub faces: u32,
    pub slots: Vec<Slot>,
}

/// Face budget for `n` slots.
pub const fn face_budget(n: u32) -> u32 {
    if n < 7 {
        SMALL_FACE_BUDGET
    } else {
        LARGE_FACE_BUDGET
    }
}

/// Spreads the face budget for `n` slots as evenly as possible.
///
/// Whole rounds of one face per slot are dealt while the remaining budget
/// covers every slot; the leftover goes one face each to the first slots.
pub fn slot_weights(n: u32) -> (u32, Vec<u32>) {
    let faces = face_budget(n);
    let mut weights = vec![0u32; n as usize];
    if n == 0 {
        return (faces, weights);
    }
    let mut remaining = faces;
    while remaining >= n {
        for w in weights.iter_mut() {
            *w += 1;
        }
        remaining -= n;
    }
    for w in weights.iter_mut().take(remaining as usize) {
        *w += 1;
    }
    (faces, weights)
}

/// Enumerates the slots of a defending stack in fixed order (infantry,
/// tanks, artillery, then the supply and truck presence slots) and assigns
/// each its share of the face budget.
pub fn allocate_slots(spec: &AttackSpec) -> SlotAllocation {
    let kinds: Vec<UnitKind> = ALL_KINDS
        .iter()
        .flat_map(|&kind| {
            let count = spec.force.count(kind);
            let instances = if kind.is_combat() {
                count
            } else {
                u32::from(count > 0)
            };
            std::iter::repeat(kind).take(instances as usize)
        })
        .collect();

    let (faces, weights) = slot_weights(kinds.len() as u32);
    let slots = kinds
        .into_iter()
        .zip(weights)
        .map(|(kind, weight)| Slot { kind, weight })
        .collect();

    SlotAllocation { faces, slots }
}
