// ─────────────────────────────────────────────────────────────────────
// SCPN Discharge Kinetics — Three-Species Air Chemistry
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Electrons, positive ions and negative ions in air with one ionizing
//! photon group (Zheleznyak photo-ionization).
//!
//! Reaction order is fixed:
//!   0: e -> e + e + M+        (impact ionization)
//!   1: e -> M-                (attachment)
//!   2: e -> e + y             (photo-emission)
//!   3: e + M+ -> 0            (electron-ion recombination)
//!   4: M+ + M- -> 0           (ion-ion recombination)
//! and photons of group 0 ionize on absorption: y -> e + M+.

use crate::network::ReactionNetwork;
use crate::photo_reaction::PhotoReaction;
use crate::physics::{CellConditions, GasState};
use crate::reaction::Reaction;
use kinetic_types::constants::{ATM_TO_PASCAL, TOWNSEND};
use kinetic_types::error::KineticResult;
use kinetic_types::species::{PhotonGroup, Species, SpeciesRegistry};
use kinetic_types::state::CellState;

pub const ELECTRON: usize = 0;
pub const POSITIVE: usize = 1;
pub const NEGATIVE: usize = 2;
pub const PHOTON_Z: usize = 0;

pub const NUM_REACTIONS: usize = 5;

/// Townsend ionization fit, alpha = A p exp(-B p / E).
const TOWNSEND_A: f64 = 11.25; // m^-1 Pa^-1
const TOWNSEND_B: f64 = 273.8; // V m^-1 Pa^-1
const ATTACHMENT_COEFF: f64 = 1.1e-3; // m^-1 Pa^-1
const MOBILITY_ATM: f64 = 0.0372; // m^2 V^-1 s^-1 at 1 atm
const BETA_EI: f64 = 5.0e-14; // m^3/s
const BETA_II: f64 = 2.0e-13; // m^3/s

const IONIZATION_ENERGY: f64 = 15.6; // eV
const EXCITATION_ENERGY: f64 = 12.0; // eV
const PHOTOELECTRON_ENERGY: f64 = 1.0; // eV

// Local-energy Arrhenius fits, k = k0 exp(-eps_a / eps) N.
const LEA_K_ION: f64 = 1.0e-13;
const LEA_K_EXC: f64 = 2.0e-14;
const LEA_K_ATT: f64 = 1.0e-17;

/// Excitation-to-ionization ratio as a function of reduced field [Td].
pub fn excitation_ratio(e_td: f64) -> f64 {
    if e_td > 100.0 {
        0.1 * (233.0 / e_td).exp()
    } else {
        1.0
    }
}

/// Photo-ionization efficiency factor for a given O2 fraction.
pub fn sergey_factor(o2_fraction: f64) -> f64 {
    3.0e-2 + 0.4 * o2_fraction.powf(0.6)
}

fn quench_factor(gas: &GasState) -> f64 {
    gas.quench_pressure_pa / (gas.pressure_pa + gas.quench_pressure_pa)
}

pub fn air3_registry() -> KineticResult<SpeciesRegistry> {
    SpeciesRegistry::new(
        vec![
            Species::new("electron", -1).mobile(true).diffusive(true),
            Species::new("positive", 1),
            Species::new("negative", -1),
        ],
        vec![PhotonGroup::new("photon_z")],
    )
}

fn air3_network() -> KineticResult<ReactionNetwork> {
    let reactions = vec![
        Reaction::new(&[ELECTRON], &[ELECTRON, ELECTRON, POSITIVE], &[])
            .with_energy_jumps(&[(ELECTRON, -IONIZATION_ENERGY)]),
        Reaction::new(&[ELECTRON], &[NEGATIVE], &[]),
        Reaction::new(&[ELECTRON], &[ELECTRON], &[PHOTON_Z])
            .with_energy_jumps(&[(ELECTRON, -EXCITATION_ENERGY)]),
        Reaction::new(&[ELECTRON, POSITIVE], &[], &[]),
        Reaction::new(&[POSITIVE, NEGATIVE], &[], &[]),
    ];
    let photo = vec![PhotoReaction::new(PHOTON_Z, &[ELECTRON, POSITIVE])
        .with_target_energies(&[PHOTOELECTRON_ENERGY, 0.0])?];
    ReactionNetwork::new(air3_registry()?, reactions, photo)
}

/// Local-field approximation: every rate follows from |E|.
#[derive(Debug, Clone)]
pub struct Air3Lfa {
    gas: GasState,
}

impl Air3Lfa {
    pub fn new(gas: GasState) -> Self {
        Air3Lfa { gas }
    }

    pub fn gas(&self) -> &GasState {
        &self.gas
    }

    pub fn network(&self) -> KineticResult<ReactionNetwork> {
        self.gas.validate()?;
        air3_network()
    }

    /// Townsend ionization coefficient [1/m].
    pub fn townsend_alpha(&self, e: f64) -> f64 {
        if e <= 0.0 {
            return 0.0;
        }
        let p = self.gas.pressure_pa;
        TOWNSEND_A * p * (-TOWNSEND_B * p / e).exp()
    }

    /// Attachment coefficient [1/m].
    pub fn attachment_eta(&self) -> f64 {
        ATTACHMENT_COEFF * self.gas.pressure_pa
    }

    /// Electron mobility [m^2/(V s)].
    pub fn mobility(&self) -> f64 {
        MOBILITY_ATM * ATM_TO_PASCAL / self.gas.pressure_pa
    }

    pub fn drift_velocity(&self, e: f64) -> f64 {
        self.mobility() * e
    }

    /// Emitted ionizing photons per ionization event.
    pub fn photo_efficiency(&self, e: f64) -> f64 {
        let e_td = e / (self.gas.neutral_density() * TOWNSEND);
        quench_factor(&self.gas)
            * excitation_ratio(e_td)
            * sergey_factor(self.gas.o2_fraction)
    }

    /// Rates in fixed reaction order.
    pub fn rates(&self, c: &CellConditions) -> Vec<f64> {
        let e = c.field_magnitude;
        let ve = self.drift_velocity(e);
        let ionization = self.townsend_alpha(e) * ve;
        vec![
            ionization,
            self.attachment_eta() * ve,
            ionization * self.photo_efficiency(e),
            BETA_EI / c.volume,
            BETA_II / c.volume,
        ]
    }
}

/// Local-energy approximation: rates follow from the mean electron energy.
#[derive(Debug, Clone)]
pub struct Air3Lea {
    gas: GasState,
}

impl Air3Lea {
    pub fn new(gas: GasState) -> Self {
        Air3Lea { gas }
    }

    pub fn gas(&self) -> &GasState {
        &self.gas
    }

    pub fn network(&self) -> KineticResult<ReactionNetwork> {
        self.gas.validate()?;
        air3_network()
    }

    fn arrhenius(k0: f64, activation: f64, energy: f64) -> f64 {
        if energy <= 0.0 {
            return 0.0;
        }
        k0 * (-activation / energy).exp()
    }

    pub fn mobility(&self) -> f64 {
        MOBILITY_ATM * ATM_TO_PASCAL / self.gas.pressure_pa
    }

    pub fn rates(&self, c: &CellConditions) -> Vec<f64> {
        let n = self.gas.neutral_density();
        let eps = c.electron_energy;
        let excitation = Self::arrhenius(LEA_K_EXC, EXCITATION_ENERGY, eps) * n;
        vec![
            Self::arrhenius(LEA_K_ION, IONIZATION_ENERGY, eps) * n,
            LEA_K_ATT * n * self.gas.o2_fraction,
            excitation * quench_factor(&self.gas) * sergey_factor(self.gas.o2_fraction),
            BETA_EI / c.volume,
            BETA_II / c.volume,
        ]
    }

    /// Ohmic electron heating, mu |E|^2 per electron [eV/s].
    pub fn energy_sources(&self, state: &CellState, c: &CellConditions) -> Vec<f64> {
        let mut sources = vec![0.0; state.num_species()];
        if let Some(s) = sources.get_mut(ELECTRON) {
            let ne = state.particles[ELECTRON].max(0) as f64;
            *s = ne * self.mobility() * c.field_magnitude * c.field_magnitude;
        }
        sources
    }
}
