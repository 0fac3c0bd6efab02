//! Bulge-odds engine library.
//!
//! Computes exact outcome distributions for an attack on a single defending
//! hex: dice mechanics, slot-by-slot hit convolution, outcome aggregation,
//! and propagation across attack sequences and power sweeps.

pub mod dice;
pub mod engine;
pub mod force;
pub mod resolve;
pub mod scenario;
pub mod sequence;
