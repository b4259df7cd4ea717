// ─────────────────────────────────────────────────────────────────────
// SCPN Discharge Kinetics — Property-Based Tests (proptest) for kinetic-core
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for kinetic-core using proptest.
//!
//! Covers: population tree mass balance, leaf budget, air chemistry charge
//! conservation, stepper non-negativity.

use kinetic_core::partition::EqualMassPartitioner;
use kinetic_core::physics::{CellConditions, GasState, PlasmaPhysics};
use kinetic_core::point_mass::{HasMass, PointMass};
use kinetic_core::stepper::Stepper;
use kinetic_core::tree::Tree;
use kinetic_math::random::RandomStream;
use kinetic_types::config::{HybridParams, StepperKind};
use kinetic_types::state::CellState;
use proptest::prelude::*;

fn point_cloud() -> impl Strategy<Value = Vec<PointMass<2>>> {
    prop::collection::vec(
        (0.0f64..1.0, 0.0f64..1.0, 1u32..20, 0.0f64..10.0),
        1..200,
    )
    .prop_map(|raw| {
        raw.into_iter()
            .map(|(x, y, w, e)| PointMass::new([x, y], w as f64, e))
            .collect()
    })
}

fn total<P: HasMass>(points: &[P]) -> f64 {
    points.iter().map(HasMass::mass).sum()
}

// ── Population Tree ──────────────────────────────────────────────────

proptest! {
    /// Leaf masses always add up to the root mass.
    #[test]
    fn tree_conserves_mass(points in point_cloud(), target in 1usize..64, axis in 0usize..2) {
        let mass = total(&points);
        let mut tree = Tree::<2, PointMass<2>>::new(points).unwrap();
        tree.build(axis, target, &EqualMassPartitioner).unwrap();
        prop_assert!((tree.leaf_mass() - mass).abs() <= 1e-9 * mass.max(1.0));
        let merged = tree.merged_leaves();
        prop_assert!((total(&merged) - mass).abs() <= 1e-9 * mass.max(1.0));
    }

    /// The tree never exceeds the budget and only stops short when nothing can split.
    #[test]
    fn tree_respects_budget(points in point_cloud(), target in 1usize..64) {
        let mut tree = Tree::<2, PointMass<2>>::new(points).unwrap();
        tree.build(0, target, &EqualMassPartitioner).unwrap();
        prop_assert!(tree.num_leaves() <= target);
        if tree.num_leaves() < target {
            prop_assert!(tree.leaves().all(|leaf| !leaf.can_split::<2>()));
        }
    }

    /// Raw leaf points preserve mass and no leaf is empty.
    #[test]
    fn tree_leaf_points_round_trip(points in point_cloud(), target in 1usize..32) {
        let mass = total(&points);
        let mut tree = Tree::<2, PointMass<2>>::new(points).unwrap();
        tree.build(1, target, &EqualMassPartitioner).unwrap();
        let leaves = tree.into_leaf_points();
        prop_assert!(leaves.iter().all(|l| !l.is_empty()));
        let flat: Vec<PointMass<2>> = leaves.into_iter().flatten().collect();
        prop_assert!((total(&flat) - mass).abs() <= 1e-9 * mass.max(1.0));
        prop_assert!(flat.iter().all(|p| p.mass() > 0.0 && p.position.iter().all(|x| x.is_finite())));
    }
}

// ── Air Chemistry ────────────────────────────────────────────────────

proptest! {
    /// Every air reaction conserves charge for any firing count.
    #[test]
    fn air3_reactions_conserve_charge(k in 0i64..1_000, energy_resolved in any::<bool>()) {
        let physics = PlasmaPhysics::air3(GasState::default(), energy_resolved);
        let network = physics.network().unwrap();
        for reaction in network.reactions() {
            prop_assert_eq!(reaction.charge_change(network.charges()) * k, 0);
        }
        for photo in network.photo_reactions() {
            prop_assert_eq!(photo.charge_change(network.charges()) * k, 0);
        }
    }
}

// ── Steppers ─────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Exact and hybrid steppers keep populations non-negative and charge neutral.
    #[test]
    fn steppers_keep_state_physical(
        seed in 0u64..10_000,
        electrons in 0i64..5_000,
        negatives in 0i64..500,
        field in 0.0f64..8.0e6,
        hybrid in any::<bool>(),
    ) {
        let physics = PlasmaPhysics::air3(GasState::default(), false);
        let mut network = physics.network().unwrap();
        let conditions = CellConditions {
            field_magnitude: field,
            volume: 1.0e-12,
            electron_energy: 0.0,
        };
        physics.update_rates(&mut network, &conditions).unwrap();

        let kind = if hybrid { StepperKind::Hybrid } else { StepperKind::Ssa };
        let stepper = Stepper::new(kind, HybridParams::default(), 250.0);
        let mut state = CellState::new(3, 1)
            .with_particles(&[electrons, electrons + negatives, negatives]);
        let mut rng = RandomStream::new(seed);
        network
            .advance(&stepper, &mut state, false, None, 1.0e-11, &mut rng, "prop")
            .unwrap();

        prop_assert!(state.particles.iter().all(|&n| n >= 0));
        prop_assert_eq!(state.charge(network.charges()), 0);
        prop_assert!(state.photons.iter().all(|&n| n >= 0));
    }
}
