//! Distribution of rolled hits.
//!
//! Each point of attacking power rolls one die that hits on a 50% chance, so
//! the number of hits is Binomial(power, 0.5).

use serde::Serialize;

/// Per-die chance of scoring a hit.
pub const HIT_CHANCE: f64 = 0.5;

/// Binomial coefficient C(n, k).
///
/// Exact while the running product fits in a `u64`; past that the remaining
/// factors are applied in floating point.
pub(crate) fn choose(n: u32, k: u32) -> f64 {
    if k > n {
        return 0.0;
    }
    let k = k.min(n - k) as u64;
    let n = n as u64;
    let mut acc = 1u64;
    for i in 0..k {
        match acc.checked_mul(n - i) {
            Some(v) => acc = v / (i + 1),
            None => {
                return (i..k).fold(acc as f64, |x, j| x * (n - j) as f64 / (j + 1) as f64);
            }
        }
    }
    acc as f64
}

/// P(X = k) for X ~ Binomial(n, q).
///
/// With `n == 0` the outcome is deterministically 0.
pub fn binomial_pmf(n: u32, k: u32, q: f64) -> f64 {
    if k > n {
        return 0.0;
    }
    if n == 0 {
        return 1.0;
    }
    choose(n, k) * q.powi(k as i32) * (1.0 - q).powi((n - k) as i32)
}

/// Exact law of the number of hits rolled by an attack.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HitRollDistribution {
    power: u32,
    /// `probs[h]` is the probability of rolling exactly `h` hits.
    probs: Vec<f64>,
}

impl HitRollDistribution {
    /// Computes the hit law for the given attacking power.
    pub fn new(power: u32) -> Self {
        let scale = HIT_CHANCE.powi(power as i32);
        let probs = (0..=power)
            .map(|h| choose(power, h) * scale)
            .collect();
        HitRollDistribution { power, probs }
    }

    /// The attacking power this law was built for.
    pub fn power(&self) -> u32 {
        self.power
    }

    /// Probability of exactly `hits` hits (0 outside `0..=power`).
    pub fn prob(&self, hits: u32) -> f64 {
        self.probs.get(hits as usize).copied().unwrap_or(0.0)
    }

    /// Iterates `(hits, probability)` pairs in increasing hit order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.probs.iter().enumerate().map(|(h, &p)| (h as u32, p))
    }

    /// Sum of all probabilities; 1 up to rounding.
    pub fn total(&self) -> f64 {
        self.probs.iter().sum()
    }
}
