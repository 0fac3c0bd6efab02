//! Dice mechanics.
//!
//! Hit rolling and the sharing of hit-die faces among defending slots.

pub mod hits;
pub mod slots;

pub use hits::{binomial_pmf, HitRollDistribution, HIT_CHANCE};
pub use slots::{allocate_slots, face_budget, slot_weights, Slot, SlotAllocation};
