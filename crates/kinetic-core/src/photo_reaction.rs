// ─────────────────────────────────────────────────────────────────────
// SCPN Discharge Kinetics — Photo-Reactions
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use kinetic_types::error::{KineticError, KineticResult};

/// Absorption of one photon of group `source`, producing one particle of
/// each target species (photo-ionization when targets are e + M+).
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoReaction {
    source: usize,
    targets: Vec<usize>,
    target_energies: Vec<f64>, // eV deposited per produced particle
}

impl PhotoReaction {
    pub fn new(source: usize, targets: &[usize]) -> Self {
        PhotoReaction {
            source,
            targets: targets.to_vec(),
            target_energies: vec![0.0; targets.len()],
        }
    }

    pub fn with_target_energies(mut self, energies: &[f64]) -> KineticResult<Self> {
        if energies.len() != self.targets.len() {
            return Err(KineticError::ConfigError(format!(
                "photo-reaction from group {} has {} targets but {} energies",
                self.source,
                self.targets.len(),
                energies.len()
            )));
        }
        self.target_energies = energies.to_vec();
        Ok(self)
    }

    pub fn source(&self) -> usize {
        self.source
    }

    pub fn targets(&self) -> &[usize] {
        &self.targets
    }

    pub fn target_energies(&self) -> &[f64] {
        &self.target_energies
    }

    pub fn charge_change(&self, charges: &[i32]) -> i64 {
        self.targets.iter().map(|&t| charges[t] as i64).sum()
    }

    /// Add the products of `absorbed` photons to `particles`.
    pub fn jump_state(&self, particles: &mut [i64], absorbed: i64) {
        for &t in &self.targets {
            particles[t] += absorbed;
        }
    }

    pub fn validate(&self, num_species: usize, num_photon_groups: usize) -> KineticResult<()> {
        if self.source >= num_photon_groups {
            return Err(KineticError::ConfigError(format!(
                "photo-reaction source group {} outside 0..{num_photon_groups}",
                self.source
            )));
        }
        if let Some(&t) = self.targets.iter().find(|&&t| t >= num_species) {
            return Err(KineticError::ConfigError(format!(
                "photo-reaction target species {t} outside 0..{num_species}"
            )));
        }
        Ok(())
    }
}
