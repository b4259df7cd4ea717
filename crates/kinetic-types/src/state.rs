// ─────────────────────────────────────────────────────────────────────
// SCPN Discharge Kinetics — State
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use crate::error::{KineticError, KineticResult};
use crate::species::SpeciesRegistry;
use serde::{Deserialize, Serialize};

/// Discrete kinetic state of one mesh cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellState {
    pub particles: Vec<i64>,      // Physical particle counts [num_species]
    pub photons: Vec<i64>,        // Emitted photon counts [num_photon_groups]
    pub mean_energies: Vec<f64>,  // Mean energy per species (eV), energy-resolved mode only
}

impl CellState {
    pub fn new(num_species: usize, num_photon_groups: usize) -> Self {
        CellState {
            particles: vec![0; num_species],
            photons: vec![0; num_photon_groups],
            mean_energies: vec![0.0; num_species],
        }
    }

    pub fn with_particles(mut self, particles: &[i64]) -> Self {
        self.particles = particles.to_vec();
        if self.mean_energies.len() != self.particles.len() {
            self.mean_energies.resize(self.particles.len(), 0.0);
        }
        self
    }

    pub fn with_mean_energies(mut self, mean_energies: &[f64]) -> Self {
        self.mean_energies = mean_energies.to_vec();
        self
    }

    pub fn num_species(&self) -> usize {
        self.particles.len()
    }

    pub fn total_particles(&self) -> i64 {
        self.particles.iter().sum()
    }

    /// Net charge in elementary charges.
    pub fn charge(&self, charges: &[i32]) -> i64 {
        self.particles
            .iter()
            .zip(charges.iter())
            .map(|(&n, &z)| n * z as i64)
            .sum()
    }

    /// Total energy per species, mean energy times count.
    pub fn total_energies(&self) -> Vec<f64> {
        self.particles
            .iter()
            .zip(self.mean_energies.iter())
            .map(|(&n, &e)| n as f64 * e)
            .collect()
    }

    /// Zero the photon counters before a new emission step.
    pub fn clear_photons(&mut self) {
        self.photons.iter_mut().for_each(|p| *p = 0);
    }

    /// Enforce the non-negative population floor.
    pub fn validate(&self, context: &str) -> KineticResult<()> {
        if self.mean_energies.len() != self.particles.len() {
            return Err(KineticError::InvalidInput(format!(
                "{context}: mean_energies length {} != particle length {}",
                self.mean_energies.len(),
                self.particles.len()
            )));
        }
        if let Some((species, &count)) = self.particles.iter().enumerate().find(|(_, &n)| n < 0) {
            return Err(KineticError::NegativePopulation {
                species,
                count,
                context: context.to_string(),
            });
        }
        if let Some((group, &count)) = self.photons.iter().enumerate().find(|(_, &n)| n < 0) {
            return Err(KineticError::InvariantViolation(format!(
                "{context}: photon group {group} has negative count {count}"
            )));
        }
        if self.mean_energies.iter().any(|e| !e.is_finite()) {
            return Err(KineticError::InvariantViolation(format!(
                "{context}: mean energies must be finite"
            )));
        }
        Ok(())
    }

    pub fn check_shape(&self, registry: &SpeciesRegistry) -> KineticResult<()> {
        if self.particles.len() != registry.num_species()
            || self.photons.len() != registry.num_photon_groups()
        {
            return Err(KineticError::InvalidInput(format!(
                "cell state shape ({}, {}) does not match registry ({}, {})",
                self.particles.len(),
                self.photons.len(),
                registry.num_species(),
                registry.num_photon_groups()
            )));
        }
        Ok(())
    }
}

/// Embedded-boundary face cutting a cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CutFace<const D: usize> {
    pub centroid: [f64; D], // Boundary centroid, physical coordinates
    pub normal: [f64; D],   // Unit normal pointing into the valid region
}

/// Geometry of one (possibly cut) cell handed in by the mesh layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellGeometry<const D: usize> {
    pub lo: [f64; D], // Physical lower corner
    pub hi: [f64; D], // Physical upper corner
    pub dx: f64,
    pub kappa: f64, // Volume fraction in (0, 1]
    pub boundary: Option<CutFace<D>>,
}

impl<const D: usize> CellGeometry<D> {
    /// Regular (uncut) cube of side `dx` with lower corner `lo`.
    pub fn regular(lo: [f64; D], dx: f64) -> Self {
        let mut hi = lo;
        for h in hi.iter_mut() {
            *h += dx;
        }
        CellGeometry {
            lo,
            hi,
            dx,
            kappa: 1.0,
            boundary: None,
        }
    }

    pub fn cut(mut self, kappa: f64, boundary: CutFace<D>) -> Self {
        self.kappa = kappa;
        self.boundary = Some(boundary);
        self
    }

    /// Physical volume of the valid region, dx^D * kappa.
    pub fn volume(&self) -> f64 {
        self.dx.powi(D as i32) * self.kappa
    }

    pub fn center(&self) -> [f64; D] {
        let mut c = [0.0; D];
        for (d, v) in c.iter_mut().enumerate() {
            *v = 0.5 * (self.lo[d] + self.hi[d]);
        }
        c
    }

    pub fn contains(&self, pos: &[f64; D]) -> bool {
        (0..D).all(|d| pos[d] >= self.lo[d] && pos[d] <= self.hi[d])
    }

    /// Inside the box and on the valid side of the cut face.
    pub fn is_valid_position(&self, pos: &[f64; D]) -> bool {
        if !self.contains(pos) {
            return false;
        }
        match &self.boundary {
            Some(face) => {
                let s: f64 = (0..D)
                    .map(|d| (pos[d] - face.centroid[d]) * face.normal[d])
                    .sum();
                s >= 0.0
            }
            None => true,
        }
    }

    pub fn validate(&self) -> KineticResult<()> {
        if !self.dx.is_finite() || self.dx <= 0.0 {
            return Err(KineticError::InvalidInput(format!(
                "cell dx must be finite and > 0, got {}",
                self.dx
            )));
        }
        if !self.kappa.is_finite() || self.kappa <= 0.0 || self.kappa > 1.0 {
            return Err(KineticError::InvalidInput(format!(
                "cell volume fraction must be in (0, 1], got {}",
                self.kappa
            )));
        }
        for d in 0..D {
            if !self.lo[d].is_finite() || !self.hi[d].is_finite() || self.hi[d] <= self.lo[d] {
                return Err(KineticError::InvalidInput(format!(
                    "cell bounds invalid along axis {d}: lo={}, hi={}",
                    self.lo[d], self.hi[d]
                )));
            }
        }
        Ok(())
    }
}
