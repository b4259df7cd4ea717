// ─────────────────────────────────────────────────────────────────────
// SCPN Discharge Kinetics — Species Registry
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Ordered registry of particle species and photon groups.
//!
//! Indices are dense and zero-based; every per-cell vector in the kinetics
//! core is indexed by them for the lifetime of a run.

use crate::error::{KineticError, KineticResult};
use serde::{Deserialize, Serialize};

/// A charged or neutral particle species.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Species {
    pub name: String,
    /// Charge number (units of the elementary charge).
    pub charge: i32,
    #[serde(default)]
    pub mobile: bool,
    #[serde(default)]
    pub diffusive: bool,
}

impl Species {
    pub fn new(name: &str, charge: i32) -> Self {
        Species {
            name: name.to_string(),
            charge,
            mobile: false,
            diffusive: false,
        }
    }

    pub fn mobile(mut self, mobile: bool) -> Self {
        self.mobile = mobile;
        self
    }

    pub fn diffusive(mut self, diffusive: bool) -> Self {
        self.diffusive = diffusive;
        self
    }
}

/// A radiative-transfer photon group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotonGroup {
    pub name: String,
}

impl PhotonGroup {
    pub fn new(name: &str) -> Self {
        PhotonGroup {
            name: name.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeciesRegistry {
    species: Vec<Species>,
    photon_groups: Vec<PhotonGroup>,
}

impl SpeciesRegistry {
    pub fn new(species: Vec<Species>, photon_groups: Vec<PhotonGroup>) -> KineticResult<Self> {
        for (i, s) in species.iter().enumerate() {
            if species[..i].iter().any(|other| other.name == s.name) {
                return Err(KineticError::ConfigError(format!(
                    "duplicate species name '{}'",
                    s.name
                )));
            }
        }
        for (i, g) in photon_groups.iter().enumerate() {
            if photon_groups[..i].iter().any(|other| other.name == g.name) {
                return Err(KineticError::ConfigError(format!(
                    "duplicate photon group name '{}'",
                    g.name
                )));
            }
        }
        Ok(SpeciesRegistry {
            species,
            photon_groups,
        })
    }

    pub fn num_species(&self) -> usize {
        self.species.len()
    }

    pub fn num_photon_groups(&self) -> usize {
        self.photon_groups.len()
    }

    pub fn species(&self) -> &[Species] {
        &self.species
    }

    pub fn photon_groups(&self) -> &[PhotonGroup] {
        &self.photon_groups
    }

    pub fn species_index(&self, name: &str) -> Option<usize> {
        self.species.iter().position(|s| s.name == name)
    }

    pub fn photon_index(&self, name: &str) -> Option<usize> {
        self.photon_groups.iter().position(|g| g.name == name)
    }

    /// Charge numbers in index order.
    pub fn charges(&self) -> Vec<i32> {
        self.species.iter().map(|s| s.charge).collect()
    }
}
