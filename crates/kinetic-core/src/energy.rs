// ─────────────────────────────────────────────────────────────────────
// SCPN Discharge Kinetics — Energy Ledger
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Total-energy bookkeeping for energy-resolved stepping.
//!
//! Steppers work on total energies per species; the ledger is opened from the
//! mean energies of a cell and closed back into means once the step is done.

use crate::reaction::{EnergyChange, Reaction};
use kinetic_types::state::CellState;

#[derive(Debug, Clone, PartialEq)]
pub struct EnergyLedger {
    totals: Vec<f64>,
}

impl EnergyLedger {
    pub fn from_state(state: &CellState) -> Self {
        EnergyLedger {
            totals: state.total_energies(),
        }
    }

    pub fn totals(&self) -> &[f64] {
        &self.totals
    }

    /// Apply `k` firings of `reaction`; `counts` are the populations the
    /// firings were drawn against.
    pub fn apply(&mut self, reaction: &Reaction, counts: &[i64], k: i64) {
        if k == 0 {
            return;
        }
        for change in reaction.energy_change() {
            match *change {
                EnergyChange::RemoveMean { species, count } => {
                    let n = counts[species];
                    if n > 0 {
                        let mean = self.totals[species] / n as f64;
                        self.totals[species] -= mean * (count * k) as f64;
                    }
                }
                EnergyChange::Add { species, amount } => {
                    self.totals[species] += amount * k as f64;
                }
            }
        }
    }

    /// External heating, `sources` in eV/s per species.
    pub fn add_sources(&mut self, sources: &[f64], dt: f64) {
        for (total, s) in self.totals.iter_mut().zip(sources.iter()) {
            *total += s * dt;
        }
    }

    /// Deposit energy directly, e.g. from photo-ionization.
    pub fn deposit(&mut self, species: usize, amount: f64) {
        self.totals[species] += amount;
    }

    /// Convert back to means. Empty species get zero and means are floored at zero.
    pub fn write_means(&self, state: &mut CellState) {
        for (s, mean) in state.mean_energies.iter_mut().enumerate() {
            let n = state.particles[s];
            *mean = if n > 0 {
                (self.totals[s] / n as f64).max(0.0)
            } else {
                0.0
            };
        }
    }
}
