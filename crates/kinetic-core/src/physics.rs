// ─────────────────────────────────────────────────────────────────────
// SCPN Discharge Kinetics — Plasma Physics Closures
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Chemistry closures as a tagged variant.
//!
//! The local-field closure computes rates from |E|; the local-energy closure
//! computes them from the mean electron energy and additionally supplies an
//! electron heating source. Each variant only exposes what it supports.

use crate::air3::{Air3Lea, Air3Lfa, ELECTRON};
use crate::network::ReactionNetwork;
use kinetic_types::constants::{neutral_density, ATM_TO_PASCAL};
use kinetic_types::error::{KineticError, KineticResult};
use kinetic_types::state::CellState;

/// Background gas state shared by the air closures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GasState {
    pub pressure_pa: f64,
    pub temperature_k: f64,
    /// Photo-emission quenching pressure.
    pub quench_pressure_pa: f64,
    pub o2_fraction: f64,
}

impl Default for GasState {
    fn default() -> Self {
        GasState {
            pressure_pa: ATM_TO_PASCAL,
            temperature_k: 300.0,
            quench_pressure_pa: 4000.0,
            o2_fraction: 0.2,
        }
    }
}

impl GasState {
    /// Neutral number density [m^-3].
    pub fn neutral_density(&self) -> f64 {
        neutral_density(self.pressure_pa, self.temperature_k)
    }

    pub fn validate(&self) -> KineticResult<()> {
        let positive = [self.pressure_pa, self.temperature_k, self.quench_pressure_pa];
        if positive.iter().any(|v| !v.is_finite() || *v <= 0.0) {
            return Err(KineticError::ConfigError(
                "gas pressure, temperature and quench pressure must be finite and > 0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.o2_fraction) {
            return Err(KineticError::ConfigError(format!(
                "O2 fraction must be in [0, 1], got {}",
                self.o2_fraction
            )));
        }
        Ok(())
    }
}

/// Local conditions a closure needs to set rates for one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellConditions {
    /// |E| [V/m]
    pub field_magnitude: f64,
    /// Valid cell volume dx^D * kappa [m^D]
    pub volume: f64,
    /// Mean electron energy [eV]; used by the local-energy closure only.
    pub electron_energy: f64,
}

impl CellConditions {
    pub fn validate(&self) -> KineticResult<()> {
        if !self.field_magnitude.is_finite() || self.field_magnitude < 0.0 {
            return Err(KineticError::InvalidInput(format!(
                "field magnitude must be finite and >= 0, got {}",
                self.field_magnitude
            )));
        }
        if !self.volume.is_finite() || self.volume <= 0.0 {
            return Err(KineticError::InvalidInput(format!(
                "cell volume must be finite and > 0, got {}",
                self.volume
            )));
        }
        if !self.electron_energy.is_finite() {
            return Err(KineticError::InvalidInput(
                "mean electron energy must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub enum PlasmaPhysics {
    Lfa(Air3Lfa),
    Lea(Air3Lea),
}

impl PlasmaPhysics {
    /// Local-field closure unless mean energies are tracked.
    pub fn air3(gas: GasState, energy_resolved: bool) -> Self {
        if energy_resolved {
            PlasmaPhysics::Lea(Air3Lea::new(gas))
        } else {
            PlasmaPhysics::Lfa(Air3Lfa::new(gas))
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PlasmaPhysics::Lfa(_) => "air3-lfa",
            PlasmaPhysics::Lea(_) => "air3-lea",
        }
    }

    pub fn energy_resolved(&self) -> bool {
        matches!(self, PlasmaPhysics::Lea(_))
    }

    /// Species whose mean energy drives the local-energy rates.
    pub fn electron_species(&self) -> usize {
        match self {
            PlasmaPhysics::Lfa(_) | PlasmaPhysics::Lea(_) => ELECTRON,
        }
    }

    pub fn network(&self) -> KineticResult<ReactionNetwork> {
        match self {
            PlasmaPhysics::Lfa(p) => p.network(),
            PlasmaPhysics::Lea(p) => p.network(),
        }
    }

    /// Write this cell's rate coefficients into `network`.
    pub fn update_rates(
        &self,
        network: &mut ReactionNetwork,
        conditions: &CellConditions,
    ) -> KineticResult<()> {
        conditions.validate()?;
        let rates = match self {
            PlasmaPhysics::Lfa(p) => p.rates(conditions),
            PlasmaPhysics::Lea(p) => p.rates(conditions),
        };
        network.set_rates(&rates)
    }

    /// Energy sources per species [eV/s]; only the local-energy closure has any.
    pub fn energy_sources(&self, state: &CellState, conditions: &CellConditions) -> Option<Vec<f64>> {
        match self {
            PlasmaPhysics::Lfa(_) => None,
            PlasmaPhysics::Lea(p) => Some(p.energy_sources(state, conditions)),
        }
    }
}
