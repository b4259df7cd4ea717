// ─────────────────────────────────────────────────────────────────────
// SCPN Discharge Kinetics — Super-Particles
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Weighted computational particles and the operations that keep them in
//! step with the integer counts produced by the reaction network.

use crate::partition::EqualMassPartitioner;
use crate::point_mass::{HasEnergy, HasMass, HasPosition, Primitive};
use crate::tree::rebuild;
use kinetic_math::random::RandomStream;
use kinetic_math::sampling::random_position;
use kinetic_types::config::SuperparticleConfig;
use kinetic_types::error::{KineticError, KineticResult};
use kinetic_types::state::CellGeometry;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SuperParticle<const D: usize> {
    pub position: [f64; D],
    /// Number of physical particles represented.
    pub weight: f64,
    /// Mean energy per physical particle [eV].
    pub energy: f64,
}

impl<const D: usize> SuperParticle<D> {
    pub fn new(position: [f64; D], weight: f64, energy: f64) -> Self {
        SuperParticle {
            position,
            weight,
            energy,
        }
    }
}

impl<const D: usize> HasPosition<D> for SuperParticle<D> {
    fn position(&self) -> [f64; D] {
        self.position
    }
}

impl<const D: usize> HasMass for SuperParticle<D> {
    fn mass(&self) -> f64 {
        self.weight
    }
}

impl<const D: usize> HasEnergy for SuperParticle<D> {
    fn energy(&self) -> f64 {
        self.energy
    }
}

impl<const D: usize> Primitive<D> for SuperParticle<D> {
    fn with_parts(position: [f64; D], mass: f64, energy: f64) -> Self {
        SuperParticle::new(position, mass, energy)
    }
}

/// Ionizing photon packet emitted from a cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Photon<const D: usize> {
    pub position: [f64; D],
    pub direction: [f64; D],
    pub weight: f64,
}

/// Integer weights spreading `count` physical particles over at most
/// `particles_per_cell` super-particles. Weights differ by at most one.
pub fn particle_weights(count: u64, particles_per_cell: usize) -> Vec<u64> {
    let ppc = particles_per_cell.max(1) as u64;
    if count <= ppc {
        return vec![1; count as usize];
    }
    let base = count / ppc;
    let extra = count % ppc;
    (0..ppc).map(|i| if i < extra { base + 1 } else { base }).collect()
}

pub fn total_weight<const D: usize>(particles: &[SuperParticle<D>]) -> f64 {
    particles.iter().map(|p| p.weight).sum()
}

/// Merge or split `particles` towards `particles_per_cell` super-particles
/// with the equal-mass population tree.
pub fn merge_superparticles<const D: usize>(
    particles: Vec<SuperParticle<D>>,
    config: &SuperparticleConfig,
) -> KineticResult<Vec<SuperParticle<D>>> {
    if particles.is_empty() {
        return Ok(particles);
    }
    let weight = total_weight(&particles);
    if weight < 1.0 {
        log::warn!("skipping merge of {} particles with total weight {weight} < 1", particles.len());
        return Ok(particles);
    }
    rebuild(
        particles,
        config.first_split_axis,
        config.particles_per_cell,
        &EqualMassPartitioner,
    )
}

/// Bring the physical weight of `particles` to `new_count`.
///
/// New physical particles are placed uniformly in the valid part of the cell
/// with `mean_energy`. Removal takes weight proportionally from every
/// particle first and the rounding remainder from randomly chosen ones.
pub fn reconcile_particles<const D: usize>(
    particles: &mut Vec<SuperParticle<D>>,
    new_count: i64,
    mean_energy: f64,
    geometry: &CellGeometry<D>,
    particles_per_cell: usize,
    rng: &mut RandomStream,
) -> KineticResult<()> {
    if new_count < 0 {
        return Err(KineticError::InvalidInput(format!(
            "cannot reconcile particles to negative count {new_count}"
        )));
    }
    let current = total_weight(particles).round() as i64;
    let diff = new_count - current;
    if diff > 0 {
        for w in particle_weights(diff as u64, particles_per_cell) {
            let position = random_position(geometry, rng);
            particles.push(SuperParticle::new(position, w as f64, mean_energy));
        }
    } else if diff < 0 {
        remove_weight(particles, (-diff) as u64, rng);
    }
    Ok(())
}

/// Remove `amount` physical particles from the list.
pub fn remove_weight<const D: usize>(particles: &mut Vec<SuperParticle<D>>, amount: u64, rng: &mut RandomStream) {
    let total = total_weight(particles);
    let amount = amount as f64;
    if amount >= total {
        particles.clear();
        return;
    }

    let fraction = amount / total;
    let mut removed = 0.0;
    for p in particles.iter_mut() {
        let take = (p.weight * fraction).floor();
        p.weight -= take;
        removed += take;
    }

    let mut leftover = (amount - removed).round() as u64;
    while leftover > 0 {
        let candidates: Vec<usize> = particles
            .iter()
            .enumerate()
            .filter(|(_, p)| p.weight >= 1.0)
            .map(|(i, _)| i)
            .collect();
        if candidates.is_empty() {
            log::warn!("{leftover} physical particles left unremoved: no super-particle holds a full weight");
            break;
        }
        // Bounded by candidate count so each sweep makes progress.
        let picks = (leftover as usize).min(candidates.len());
        for _ in 0..picks {
            let i = candidates[rng.index(candidates.len())];
            if particles[i].weight >= 1.0 {
                particles[i].weight -= 1.0;
                leftover -= 1;
            }
        }
    }
    particles.retain(|p| p.weight > 0.0);
}

/// Photon packets for `count` emitted photons, isotropic and uniformly
/// placed in the valid part of the cell.
pub fn generate_photons<const D: usize>(
    count: i64,
    geometry: &CellGeometry<D>,
    particles_per_cell: usize,
    rng: &mut RandomStream,
) -> KineticResult<Vec<Photon<D>>> {
    if count < 0 {
        return Err(KineticError::InvalidInput(format!(
            "cannot generate a negative number of photons ({count})"
        )));
    }
    Ok(particle_weights(count as u64, particles_per_cell)
        .into_iter()
        .map(|w| Photon {
            position: random_position(geometry, rng),
            direction: rng.direction(),
            weight: w as f64,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry() -> CellGeometry<2> {
        CellGeometry::regular([0.0, 0.0], 1.0e-3)
    }

    #[test]
    fn test_particle_weights() {
        assert_eq!(particle_weights(3, 8), vec![1, 1, 1]);
        let w = particle_weights(10, 4);
        assert_eq!(w, vec![3, 3, 2, 2]);
        assert_eq!(particle_weights(0, 4), Vec::<u64>::new());
    }

    #[test]
    fn test_merge_respects_budget() {
        let particles: Vec<SuperParticle<2>> = (0..100)
            .map(|i| SuperParticle::new([i as f64 * 1e-5, 0.0], 1.0, 2.0))
            .collect();
        let config = SuperparticleConfig {
            particles_per_cell: 8,
            first_split_axis: 0,
        };
        let merged = merge_superparticles(particles, &config).unwrap();
        assert_eq!(merged.len(), 8);
        assert!((total_weight(&merged) - 100.0).abs() < 1e-9);
        assert!(merged.iter().all(|p| (p.energy - 2.0).abs() < 1e-12));
    }

    #[test]
    fn test_merge_empty_and_light_lists() {
        let config = SuperparticleConfig::default();
        assert!(merge_superparticles::<3>(Vec::new(), &config).unwrap().is_empty());
        let light = vec![SuperParticle::new([0.0, 0.0, 0.0], 0.5, 1.0)];
        assert_eq!(merge_superparticles(light.clone(), &config).unwrap(), light);
    }

    #[test]
    fn test_reconcile_adds_particles_in_cell() {
        let geom = geometry();
        let mut rng = RandomStream::new(51);
        let mut particles = Vec::new();
        reconcile_particles(&mut particles, 100, 3.0, &geom, 16, &mut rng).unwrap();
        assert_eq!(particles.len(), 16);
        assert!((total_weight(&particles) - 100.0).abs() < 1e-12);
        assert!(particles.iter().all(|p| geom.contains(&p.position) && p.energy == 3.0));
    }

    #[test]
    fn test_reconcile_removes_weight() {
        let geom = geometry();
        let mut rng = RandomStream::new(52);
        let mut particles: Vec<SuperParticle<2>> = (0..5)
            .map(|i| SuperParticle::new([0.0, 0.0], 10.0 + i as f64, 1.0))
            .collect();
        reconcile_particles(&mut particles, 23, 1.0, &geom, 16, &mut rng).unwrap();
        assert!((total_weight(&particles) - 23.0).abs() < 1e-12);
        assert!(particles.iter().all(|p| p.weight >= 1.0));

        reconcile_particles(&mut particles, 0, 1.0, &geom, 16, &mut rng).unwrap();
        assert!(particles.is_empty());
        assert!(reconcile_particles(&mut particles, -1, 1.0, &geom, 16, &mut rng).is_err());
    }

    #[test]
    fn test_generate_photons() {
        let geom = geometry();
        let mut rng = RandomStream::new(53);
        let photons = generate_photons(1000, &geom, 10, &mut rng).unwrap();
        assert_eq!(photons.len(), 10);
        assert_eq!(photons.iter().map(|p| p.weight).sum::<f64>(), 1000.0);
        for p in &photons {
            let n = (p.direction[0].powi(2) + p.direction[1].powi(2)).sqrt();
            assert!((n - 1.0).abs() < 1e-12);
        }
        assert!(generate_photons(0, &geom, 10, &mut rng).unwrap().is_empty());
    }
}
