//! Attack resolution.
//!
//! Turns an attack spec into the exact joint distribution of retreat and
//! destroy counts, then derives marginals and summaries from it.

pub mod aggregate;
pub mod convolve;
pub mod outcome;

pub use aggregate::{
    aggregate, expectation, DerivedDistributions, PowerDestroyedEntry, PowerLeftEntry,
    UnitDestroyedEntry, UnitsLeftEntry,
};
pub use convolve::UnitHitConvolver;
pub use outcome::{OutcomeDistribution, OutcomeEntry, OutcomeKey};
