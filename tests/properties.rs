//! Randomized invariant checks over legal defending hexes.
//!
//! Forces and powers are drawn from a seeded generator so failures are
//! reproducible.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use bulge_odds::engine::process;
use bulge_odds::force::{validate_force, AttackSpec, ForceCounts};
use bulge_odds::sequence::{propagate, simulate_multi_attack};

const SEED: u64 = 0xB0B_1944;

/// Draws a random force that satisfies stacking and occupancy rules.
fn random_force(rng: &mut SmallRng) -> ForceCounts {
    loop {
        let force = ForceCounts::new(
            rng.gen_range(0..=6),
            rng.gen_range(0..=6),
            rng.gen_range(0..=3),
            rng.gen_range(0..=4),
            rng.gen_range(0..=3),
        );
        if validate_force(&force).is_ok() {
            return force;
        }
    }
}

fn random_spec(rng: &mut SmallRng) -> AttackSpec {
    let force = random_force(rng);
    let power = rng.gen_range(1..=12);
    AttackSpec::from_force(power, force, rng.gen_bool(0.5)).unwrap()
}

#[test]
fn outcome_mass_sums_to_one() {
    let mut rng = SmallRng::seed_from_u64(SEED);
    for _ in 0..200 {
        let spec = random_spec(&mut rng);
        let result = process(&spec).unwrap();
        let total = result.outcome_distribution.total();
        assert!((total - 1.0).abs() < 1e-9, "{:?}: total {}", spec, total);
        assert!(result
            .outcome_distribution
            .entries()
            .iter()
            .all(|e| e.probability >= 0.0));
    }
}

#[test]
fn summaries_stay_in_bounds() {
    let mut rng = SmallRng::seed_from_u64(SEED + 1);
    for _ in 0..200 {
        let spec = random_spec(&mut rng);
        let result = process(&spec).unwrap();
        assert!((0.0..=1.0 + 1e-12).contains(&result.prob_evacuate), "{:?}", spec);
        let max = spec.force.defense_power() as f64;
        assert!(result.exp_power_destroyed >= 0.0, "{:?}", spec);
        assert!(result.exp_power_destroyed <= max + 1e-9, "{:?}", spec);
    }
}

#[test]
fn no_retreat_means_no_retreat_counts() {
    let mut rng = SmallRng::seed_from_u64(SEED + 2);
    for _ in 0..100 {
        let mut spec = random_spec(&mut rng);
        spec.can_retreat = false;
        let result = process(&spec).unwrap();
        assert!(result
            .outcome_distribution
            .entries()
            .iter()
            .all(|e| e.outcome.total_retreated() == 0));
    }
}

#[test]
fn marginals_agree_with_joint() {
    let mut rng = SmallRng::seed_from_u64(SEED + 3);
    for _ in 0..100 {
        let spec = random_spec(&mut rng);
        let result = process(&spec).unwrap();
        for marginal in [
            result.power_left_distribution.iter().map(|e| e.probability).sum::<f64>(),
            result.units_left_distribution.iter().map(|e| e.probability).sum::<f64>(),
            result.unit_destroyed_distribution.iter().map(|e| e.probability).sum::<f64>(),
        ] {
            assert!((marginal - 1.0).abs() < 1e-9, "{:?}", spec);
        }
        let tails = &result.total_power_destroyed_distribution;
        assert!((tails.first().unwrap().or_more - 1.0).abs() < 1e-9);
        assert!((tails.last().unwrap().or_less - 1.0).abs() < 1e-9);
        let evac: f64 = result
            .units_left_distribution
            .iter()
            .filter(|e| e.evacuate)
            .map(|e| e.probability)
            .sum();
        assert!((evac - result.prob_evacuate).abs() < 1e-12, "{:?}", spec);
    }
}

#[test]
fn process_is_bit_identical_across_calls() {
    let mut rng = SmallRng::seed_from_u64(SEED + 4);
    for _ in 0..50 {
        let spec = random_spec(&mut rng);
        assert_eq!(process(&spec).unwrap(), process(&spec).unwrap());
    }
}

#[test]
fn multi_attack_is_monotone_and_conserves_mass() {
    let mut rng = SmallRng::seed_from_u64(SEED + 5);
    for _ in 0..20 {
        let spec = random_spec(&mut rng);
        let powers: Vec<u32> = (0..6).map(|_| rng.gen_range(1..=12)).collect();
        let mut previous = 0.0;
        for n in 1..=powers.len() {
            let p = simulate_multi_attack(&spec, &powers[..n]).unwrap();
            assert!(p + 1e-12 >= previous, "{:?} {:?}", spec, &powers[..n]);
            previous = p;
        }
        let result = propagate(&spec, &powers).unwrap();
        let alive: f64 = result.survivors.iter().map(|s| s.probability).sum();
        assert!((result.prob_evacuate + alive - 1.0).abs() < 1e-9);
    }
}
