// ─────────────────────────────────────────────────────────────────────
// SCPN Discharge Kinetics — Reaction Network
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! A validated set of reactions over a species registry.
//!
//! The network is the stepping boundary: per-cell states are validated on the
//! way in and on the way out, and total charge must be unchanged by every
//! advance.

use crate::energy::EnergyLedger;
use crate::photo_reaction::PhotoReaction;
use crate::reaction::Reaction;
use crate::stepper::{StepStats, Stepper};
use kinetic_math::random::RandomStream;
use kinetic_types::error::{KineticError, KineticResult};
use kinetic_types::species::SpeciesRegistry;
use kinetic_types::state::CellState;

#[derive(Debug, Clone)]
pub struct ReactionNetwork {
    registry: SpeciesRegistry,
    reactions: Vec<Reaction>,
    photo_reactions: Vec<PhotoReaction>,
    charges: Vec<i32>,
}

impl ReactionNetwork {
    /// Build a network, rejecting out-of-range indices and any reaction that
    /// does not conserve charge.
    pub fn new(
        registry: SpeciesRegistry,
        reactions: Vec<Reaction>,
        photo_reactions: Vec<PhotoReaction>,
    ) -> KineticResult<Self> {
        let ns = registry.num_species();
        let np = registry.num_photon_groups();
        let charges = registry.charges();

        for r in &reactions {
            r.validate(ns, np)?;
            let dq = r.charge_change(&charges);
            if dq != 0 {
                return Err(KineticError::ConfigError(format!(
                    "reaction {r} changes charge by {dq}"
                )));
            }
        }
        for (i, p) in photo_reactions.iter().enumerate() {
            p.validate(ns, np)?;
            let dq = p.charge_change(&charges);
            if dq != 0 {
                return Err(KineticError::ConfigError(format!(
                    "photo-reaction from group {} changes charge by {dq}",
                    p.source()
                )));
            }
            if photo_reactions[..i].iter().any(|o| o.source() == p.source()) {
                return Err(KineticError::ConfigError(format!(
                    "photon group {} has more than one photo-reaction",
                    p.source()
                )));
            }
        }

        Ok(ReactionNetwork {
            registry,
            reactions,
            photo_reactions,
            charges,
        })
    }

    pub fn registry(&self) -> &SpeciesRegistry {
        &self.registry
    }

    pub fn reactions(&self) -> &[Reaction] {
        &self.reactions
    }

    pub fn photo_reactions(&self) -> &[PhotoReaction] {
        &self.photo_reactions
    }

    pub fn charges(&self) -> &[i32] {
        &self.charges
    }

    pub fn num_reactions(&self) -> usize {
        self.reactions.len()
    }

    pub fn set_rate(&mut self, reaction: usize, rate: f64) -> KineticResult<()> {
        let r = self.reactions.get_mut(reaction).ok_or_else(|| {
            KineticError::InvalidInput(format!("no reaction with index {reaction}"))
        })?;
        r.set_rate(rate);
        Ok(())
    }

    /// Replace every rate coefficient at once.
    pub fn set_rates(&mut self, rates: &[f64]) -> KineticResult<()> {
        if rates.len() != self.reactions.len() {
            return Err(KineticError::InvalidInput(format!(
                "expected {} rates, got {}",
                self.reactions.len(),
                rates.len()
            )));
        }
        for (r, &k) in self.reactions.iter_mut().zip(rates.iter()) {
            r.set_rate(k);
        }
        Ok(())
    }

    /// Advance one cell over `dt`. Energy sources (eV/s per species) only
    /// apply in energy-resolved mode.
    #[allow(clippy::too_many_arguments)]
    pub fn advance(
        &self,
        stepper: &Stepper,
        state: &mut CellState,
        energy_resolved: bool,
        sources: Option<&[f64]>,
        dt: f64,
        rng: &mut RandomStream,
        context: &str,
    ) -> KineticResult<StepStats> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(KineticError::InvalidInput(format!(
                "{context}: time step must be finite and >= 0, got {dt}"
            )));
        }
        state.check_shape(&self.registry)?;
        state.validate(context)?;
        let charge_before = state.charge(&self.charges);

        let stats = if energy_resolved {
            let mut ledger = EnergyLedger::from_state(state);
            let stats = stepper.advance(&self.reactions, state, Some(&mut ledger), dt, rng, context)?;
            if let Some(sources) = sources {
                ledger.add_sources(sources, dt);
            }
            ledger.write_means(state);
            stats
        } else {
            stepper.advance(&self.reactions, state, None, dt, rng, context)?
        };

        state.validate(context)?;
        self.check_charge(state, charge_before, context)?;
        Ok(stats)
    }

    /// Turn absorbed photons into photo-reaction products.
    pub fn photoionize(
        &self,
        state: &mut CellState,
        absorbed: &[i64],
        energy_resolved: bool,
        context: &str,
    ) -> KineticResult<()> {
        if absorbed.len() != self.registry.num_photon_groups() {
            return Err(KineticError::InvalidInput(format!(
                "{context}: {} absorbed photon counts for {} groups",
                absorbed.len(),
                self.registry.num_photon_groups()
            )));
        }
        if let Some(&n) = absorbed.iter().find(|&&n| n < 0) {
            return Err(KineticError::InvalidInput(format!(
                "{context}: negative absorbed photon count {n}"
            )));
        }
        state.check_shape(&self.registry)?;
        let charge_before = state.charge(&self.charges);

        let mut ledger = energy_resolved.then(|| EnergyLedger::from_state(state));
        for p in &self.photo_reactions {
            let n = absorbed[p.source()];
            if n == 0 {
                continue;
            }
            p.jump_state(&mut state.particles, n);
            if let Some(ledger) = ledger.as_mut() {
                for (&t, &e) in p.targets().iter().zip(p.target_energies().iter()) {
                    ledger.deposit(t, e * n as f64);
                }
            }
        }
        if let Some(ledger) = ledger {
            ledger.write_means(state);
        }

        state.validate(context)?;
        self.check_charge(state, charge_before, context)
    }

    fn check_charge(&self, state: &CellState, before: i64, context: &str) -> KineticResult<()> {
        let after = state.charge(&self.charges);
        if after != before {
            return Err(KineticError::InvariantViolation(format!(
                "{context}: charge changed from {before} to {after}"
            )));
        }
        Ok(())
    }
}
