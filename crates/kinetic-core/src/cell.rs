// ─────────────────────────────────────────────────────────────────────
// SCPN Discharge Kinetics — Cell Drivers
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Per-cell and multi-cell entry points used by the outer time stepper.
//!
//! Cells are independent. `advance_cells` runs them data-parallel with rayon;
//! each worker owns a clone of the reaction network (rates are per cell) and
//! each cell draws from its own random stream keyed by cell index and call
//! count, so results do not depend on the thread schedule.

use crate::network::ReactionNetwork;
use crate::physics::{CellConditions, GasState, PlasmaPhysics};
use crate::stepper::{StepStats, Stepper};
use crate::superparticle::{merge_superparticles, SuperParticle};
use kinetic_math::random::{derive_seed, resolve_seed, RandomStream};
use kinetic_math::vector::{is_finite, norm};
use kinetic_types::config::KineticsConfig;
use kinetic_types::error::{KineticError, KineticResult};
use kinetic_types::state::{CellGeometry, CellState};
use ndarray::Array2;
use rayon::prelude::*;

/// Everything the outer solver hands over for one cell.
#[derive(Debug, Clone)]
pub struct CellInput<const D: usize> {
    pub geometry: CellGeometry<D>,
    pub e_field: [f64; D],
    pub state: CellState,
}

impl<const D: usize> CellInput<D> {
    pub fn new(geometry: CellGeometry<D>, e_field: [f64; D], state: CellState) -> Self {
        CellInput {
            geometry,
            e_field,
            state,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CellKinetics {
    config: KineticsConfig,
    physics: PlasmaPhysics,
    network: ReactionNetwork,
    stepper: Stepper,
    seed: u64,
    calls: u64,
}

fn advance_with<const D: usize>(
    physics: &PlasmaPhysics,
    stepper: &Stepper,
    network: &mut ReactionNetwork,
    cell: &mut CellInput<D>,
    dt: f64,
    rng: &mut RandomStream,
    index: usize,
) -> KineticResult<StepStats> {
    let context = format!("cell {index}");
    cell.geometry.validate()?;
    if !is_finite(&cell.e_field) {
        return Err(KineticError::InvalidInput(format!(
            "{context}: electric field must be finite"
        )));
    }

    let energy_resolved = physics.energy_resolved();
    let electron = physics.electron_species();
    let conditions = CellConditions {
        field_magnitude: norm(&cell.e_field),
        volume: cell.geometry.volume(),
        electron_energy: if energy_resolved {
            cell.state.mean_energies.get(electron).copied().unwrap_or(0.0)
        } else {
            0.0
        },
    };

    physics.update_rates(network, &conditions)?;
    let sources = physics.energy_sources(&cell.state, &conditions);
    cell.state.clear_photons();
    network.advance(
        stepper,
        &mut cell.state,
        energy_resolved,
        sources.as_deref(),
        dt,
        rng,
        &context,
    )
}

impl CellKinetics {
    pub fn new(config: KineticsConfig, physics: PlasmaPhysics) -> KineticResult<Self> {
        config.validate()?;
        if config.energy_resolved != physics.energy_resolved() {
            return Err(KineticError::ConfigError(format!(
                "energy_resolved = {} does not match the {} closure",
                config.energy_resolved,
                physics.name()
            )));
        }
        let network = physics.network()?;
        let stepper = Stepper::from_config(&config);
        let seed = resolve_seed(config.random.seed);
        log::debug!(
            "kinetics set up: {} with {} stepper, {} reactions",
            physics.name(),
            stepper.kind(),
            network.num_reactions()
        );
        Ok(CellKinetics {
            config,
            physics,
            network,
            stepper,
            seed,
            calls: 0,
        })
    }

    /// Three-species air with the closure implied by `config.energy_resolved`.
    pub fn air3(config: KineticsConfig, gas: GasState) -> KineticResult<Self> {
        let physics = PlasmaPhysics::air3(gas, config.energy_resolved);
        Self::new(config, physics)
    }

    pub fn config(&self) -> &KineticsConfig {
        &self.config
    }

    pub fn physics(&self) -> &PlasmaPhysics {
        &self.physics
    }

    pub fn network(&self) -> &ReactionNetwork {
        &self.network
    }

    pub fn stepper(&self) -> &Stepper {
        &self.stepper
    }

    /// Stream for `cell` during multi-cell call number `call`.
    pub fn rng_for_cell(&self, call: u64, cell: usize) -> RandomStream {
        RandomStream::for_stream(
            derive_seed(self.seed, call),
            self.config.random.rank,
            cell as u64,
        )
    }

    /// Advance a single cell with a caller-supplied stream.
    pub fn advance_cell<const D: usize>(
        &mut self,
        cell: &mut CellInput<D>,
        dt: f64,
        rng: &mut RandomStream,
        index: usize,
    ) -> KineticResult<StepStats> {
        advance_with(
            &self.physics,
            &self.stepper,
            &mut self.network,
            cell,
            dt,
            rng,
            index,
        )
    }

    /// Advance every cell over `dt` in parallel. The first fatal error is returned.
    pub fn advance_cells<const D: usize>(
        &mut self,
        cells: &mut [CellInput<D>],
        dt: f64,
    ) -> KineticResult<Vec<StepStats>> {
        let call = self.calls;
        self.calls += 1;
        let this = &*self;

        cells
            .par_iter_mut()
            .enumerate()
            .map_init(
                || this.network.clone(),
                |network, (i, cell)| {
                    let mut rng = this.rng_for_cell(call, i);
                    advance_with(&this.physics, &this.stepper, network, cell, dt, &mut rng, i)
                },
            )
            .collect()
    }

    /// Convert absorbed photons into photo-reaction products in one cell.
    pub fn absorb_photons<const D: usize>(
        &self,
        cell: &mut CellInput<D>,
        absorbed: &[i64],
        index: usize,
    ) -> KineticResult<()> {
        self.network.photoionize(
            &mut cell.state,
            absorbed,
            self.physics.energy_resolved(),
            &format!("cell {index}"),
        )
    }

    /// Merge or split every cell's super-particles towards the per-cell budget.
    pub fn merge_cells<const D: usize>(&self, particles: &mut [Vec<SuperParticle<D>>]) -> KineticResult<()> {
        self.config.validate_dimension(D)?;
        let config = &self.config.superparticles;
        particles.par_iter_mut().try_for_each(|list| {
            let merged = merge_superparticles(std::mem::take(list), config)?;
            *list = merged;
            Ok(())
        })
    }
}

fn check_uniform<const D: usize>(cells: &[CellInput<D>]) -> KineticResult<usize> {
    let ns = cells.first().map_or(0, |c| c.state.num_species());
    if let Some((i, _)) = cells.iter().enumerate().find(|(_, c)| c.state.num_species() != ns) {
        return Err(KineticError::InvalidInput(format!(
            "cell {i} has {} species, expected {ns}",
            cells[i].state.num_species()
        )));
    }
    Ok(ns)
}

/// Particle counts as a (cells, species) array.
pub fn particle_counts<const D: usize>(cells: &[CellInput<D>]) -> KineticResult<Array2<i64>> {
    let ns = check_uniform(cells)?;
    Ok(Array2::from_shape_fn((cells.len(), ns), |(i, s)| {
        cells[i].state.particles[s]
    }))
}

/// Number densities [m^-D] as a (cells, species) array.
pub fn densities<const D: usize>(cells: &[CellInput<D>]) -> KineticResult<Array2<f64>> {
    let ns = check_uniform(cells)?;
    for (i, c) in cells.iter().enumerate() {
        c.geometry
            .validate()
            .map_err(|e| KineticError::InvalidInput(format!("cell {i}: {e}")))?;
    }
    Ok(Array2::from_shape_fn((cells.len(), ns), |(i, s)| {
        cells[i].state.particles[s] as f64 / cells[i].geometry.volume()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::air3::{ELECTRON, NEGATIVE, POSITIVE};
    use kinetic_types::config::StepperKind;

    fn cells(n: usize, e: f64) -> Vec<CellInput<2>> {
        (0..n)
            .map(|i| {
                CellInput::new(
                    CellGeometry::regular([i as f64 * 1.0e-4, 0.0], 1.0e-4),
                    [e, 0.0],
                    CellState::new(3, 1).with_particles(&[1_000, 1_000, 0]),
                )
            })
            .collect()
    }

    fn config(kind: StepperKind) -> KineticsConfig {
        let mut cfg = KineticsConfig::default();
        cfg.algorithm = kind;
        cfg.random.seed = 7;
        cfg
    }

    #[test]
    fn test_advance_cells_conserves_charge() {
        for kind in [StepperKind::Ssa, StepperKind::Tau, StepperKind::Hybrid] {
            let mut kinetics = CellKinetics::air3(config(kind), GasState::default()).unwrap();
            let mut grid = cells(8, 4.0e6);
            let stats = kinetics.advance_cells(&mut grid, 1.0e-10).unwrap();
            assert_eq!(stats.len(), 8);
            for c in &grid {
                let charge = -c.state.particles[ELECTRON] + c.state.particles[POSITIVE]
                    - c.state.particles[NEGATIVE];
                assert_eq!(charge, 0);
                assert!(c.state.particles.iter().all(|&n| n >= 0));
            }
        }
    }

    #[test]
    fn test_advance_cells_is_schedule_independent() {
        let mut a = CellKinetics::air3(config(StepperKind::Hybrid), GasState::default()).unwrap();
        let mut b = CellKinetics::air3(config(StepperKind::Hybrid), GasState::default()).unwrap();
        let mut grid_a = cells(16, 5.0e6);
        let mut grid_b = cells(16, 5.0e6);
        a.advance_cells(&mut grid_a, 1.0e-10).unwrap();
        b.advance_cells(&mut grid_b, 1.0e-10).unwrap();
        for (x, y) in grid_a.iter().zip(grid_b.iter()) {
            assert_eq!(x.state, y.state);
        }
    }

    #[test]
    fn test_single_cell_matches_stream() {
        let mut kinetics = CellKinetics::air3(config(StepperKind::Ssa), GasState::default()).unwrap();
        let mut cell = cells(1, 5.0e6).remove(0);
        let mut rng = kinetics.rng_for_cell(0, 0);
        kinetics.advance_cell(&mut cell, 1.0e-10, &mut rng, 0).unwrap();
        assert!(cell.state.particles[ELECTRON] >= 0);
    }

    #[test]
    fn test_energy_resolved_cell() {
        let mut cfg = config(StepperKind::Hybrid);
        cfg.energy_resolved = true;
        let mut kinetics = CellKinetics::air3(cfg, GasState::default()).unwrap();
        let mut grid = cells(2, 1.0e6);
        for c in grid.iter_mut() {
            c.state.mean_energies = vec![4.0, 0.0, 0.0];
        }
        kinetics.advance_cells(&mut grid, 1.0e-11).unwrap();
        for c in &grid {
            assert!(c.state.mean_energies.iter().all(|e| e.is_finite() && *e >= 0.0));
        }
    }

    #[test]
    fn test_closure_mismatch_rejected() {
        let mut cfg = config(StepperKind::Ssa);
        cfg.energy_resolved = true;
        let lfa = PlasmaPhysics::air3(GasState::default(), false);
        assert!(matches!(
            CellKinetics::new(cfg, lfa),
            Err(KineticError::ConfigError(_))
        ));
    }

    #[test]
    fn test_bad_geometry_reported_with_cell() {
        let mut kinetics = CellKinetics::air3(config(StepperKind::Ssa), GasState::default()).unwrap();
        let mut grid = cells(3, 1.0e6);
        grid[2].geometry.kappa = 0.0;
        assert!(kinetics.advance_cells(&mut grid, 1.0e-10).is_err());
    }

    #[test]
    fn test_non_finite_field_rejected() {
        let mut kinetics = CellKinetics::air3(config(StepperKind::Ssa), GasState::default()).unwrap();
        let mut cell = cells(1, f64::NAN).remove(0);
        let mut rng = kinetics.rng_for_cell(0, 0);
        let err = kinetics.advance_cell(&mut cell, 1.0e-10, &mut rng, 4).unwrap_err();
        match err {
            KineticError::InvalidInput(msg) => assert!(msg.contains("cell 4")),
            other => panic!("Unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_absorb_photons_creates_pairs() {
        let kinetics = CellKinetics::air3(config(StepperKind::Ssa), GasState::default()).unwrap();
        let mut cell = cells(1, 0.0).remove(0);
        kinetics.absorb_photons(&mut cell, &[25], 0).unwrap();
        assert_eq!(cell.state.particles, vec![1_025, 1_025, 0]);
    }

    #[test]
    fn test_merge_cells() {
        let kinetics = CellKinetics::air3(config(StepperKind::Ssa), GasState::default()).unwrap();
        let mut lists: Vec<Vec<SuperParticle<2>>> = (0..4)
            .map(|c| {
                (0..100)
                    .map(|i| SuperParticle::new([i as f64, c as f64], 2.0, 1.0))
                    .collect()
            })
            .collect();
        lists.push(Vec::new());
        kinetics.merge_cells(&mut lists).unwrap();
        let target = kinetics.config().superparticles.particles_per_cell;
        for list in &lists[..4] {
            assert_eq!(list.len(), target);
            assert!((list.iter().map(|p| p.weight).sum::<f64>() - 200.0).abs() < 1e-9);
        }
        assert!(lists[4].is_empty());
    }

    #[test]
    fn test_ndarray_exports() {
        let grid = cells(3, 0.0);
        let counts = particle_counts(&grid).unwrap();
        assert_eq!(counts.dim(), (3, 3));
        assert_eq!(counts[[1, 0]], 1_000);
        let n = densities(&grid).unwrap();
        assert!((n[[0, 1]] - 1_000.0 / 1.0e-8).abs() < 1e-3 * n[[0, 1]]);

        let mut ragged = cells(2, 0.0);
        ragged[1].state = CellState::new(2, 1);
        assert!(particle_counts(&ragged).is_err());
    }
}
