// ─────────────────────────────────────────────────────────────────────
// SCPN Discharge Kinetics — Property-Based Tests (proptest) for kinetic-math
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for kinetic-math using proptest.
//!
//! Covers: Poisson/Normal draws, seed derivation, cell sampling.

use kinetic_math::random::{derive_seed, RandomStream};
use kinetic_math::sampling::random_position;
use kinetic_types::state::{CellGeometry, CutFace};
use proptest::prelude::*;

// ── Random Draws ─────────────────────────────────────────────────────

proptest! {
    /// Poisson draws never exceed a generous tail bound and are finite.
    #[test]
    fn poisson_draws_bounded(seed in 0u64..10_000, mean in 0.0f64..5_000.0) {
        let mut rng = RandomStream::new(seed);
        for _ in 0..16 {
            let k = rng.poisson(mean, 250.0);
            prop_assert!((k as f64) <= mean + 20.0 * mean.sqrt() + 50.0);
        }
    }

    /// Exponential waiting times are positive for positive rates.
    #[test]
    fn exponential_positive(seed in 0u64..10_000, rate in 1e-6f64..1e6) {
        let mut rng = RandomStream::new(seed);
        let t = rng.exponential(rate);
        prop_assert!(t.is_finite());
        prop_assert!(t >= 0.0);
    }

    /// Seed derivation separates neighbouring ranks.
    #[test]
    fn derived_seeds_distinct(seed in any::<u64>(), rank in 0u64..1024) {
        prop_assert_ne!(derive_seed(seed, rank), derive_seed(seed, rank + 1));
    }
}

// ── Cell Sampling ────────────────────────────────────────────────────

proptest! {
    /// Sampled positions lie in the valid region of cut cells.
    #[test]
    fn sampled_positions_valid(
        seed in 0u64..10_000,
        offset in 0.05f64..0.95,
        dx in 1e-3f64..10.0,
    ) {
        let lo = [0.0, 0.0];
        let geom = CellGeometry::regular(lo, dx).cut(
            1.0 - offset,
            CutFace { centroid: [offset * dx, 0.5 * dx], normal: [1.0, 0.0] },
        );
        let mut rng = RandomStream::new(seed);
        for _ in 0..32 {
            let p = random_position(&geom, &mut rng);
            prop_assert!(geom.is_valid_position(&p), "{:?} invalid", p);
        }
    }
}
