// ─────────────────────────────────────────────────────────────────────
// SCPN Discharge Kinetics — SSA Stepper
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Exact stochastic simulation (Gillespie direct method).
//!
//! Each iteration recomputes all propensities, draws an exponential waiting
//! time with the total propensity as rate and fires one reaction chosen by a
//! cumulative-sum draw. A waiting time that overshoots the budget ends the
//! step without firing.

use crate::energy::EnergyLedger;
use crate::propensity::propensities;
use crate::reaction::Reaction;
use crate::stepper::StepStats;
use kinetic_math::random::RandomStream;
use kinetic_types::error::{KineticError, KineticResult};
use kinetic_types::state::CellState;

/// Index of the reaction picked by a uniform draw against the cumulative sum
/// of `props`. `None` when nothing can fire.
pub fn select_reaction(props: &[f64], total: f64, rng: &mut RandomStream) -> Option<usize> {
    if !(total > 0.0) {
        return None;
    }
    let target = rng.uniform01() * total;
    let mut cumulative = 0.0;
    let mut last_positive = None;
    for (j, &a) in props.iter().enumerate() {
        if a <= 0.0 {
            continue;
        }
        cumulative += a;
        last_positive = Some(j);
        if target < cumulative {
            return Some(j);
        }
    }
    // Round-off can leave target just above the final partial sum.
    last_positive
}

/// Fire `reaction` once and enforce the population floor.
pub fn fire(
    reaction: &Reaction,
    state: &mut CellState,
    ledger: Option<&mut EnergyLedger>,
    context: &str,
) -> KineticResult<()> {
    if let Some(ledger) = ledger {
        ledger.apply(reaction, &state.particles, 1);
    }
    reaction.jump_state(&mut state.particles, &mut state.photons, 1);
    for &(species, _) in reaction.state_change() {
        let count = state.particles[species];
        if count < 0 {
            return Err(KineticError::NegativePopulation {
                species,
                count,
                context: format!("{context}: SSA firing of {reaction}"),
            });
        }
    }
    Ok(())
}

/// Draw and fire exactly one reaction, ignoring any time budget.
/// Returns the fired index and the waiting time, or `None` if all
/// propensities vanish.
pub fn step_once(
    reactions: &[Reaction],
    state: &mut CellState,
    ledger: Option<&mut EnergyLedger>,
    rng: &mut RandomStream,
    context: &str,
) -> KineticResult<Option<(usize, f64)>> {
    let mut props = Vec::with_capacity(reactions.len());
    let total = propensities(reactions, &state.particles, &mut props);
    let Some(j) = select_reaction(&props, total, rng) else {
        return Ok(None);
    };
    let wait = rng.exponential(total);
    fire(&reactions[j], state, ledger, context)?;
    Ok(Some((j, wait)))
}

/// Run the direct method for a time budget `dt`.
pub fn advance_ssa(
    reactions: &[Reaction],
    state: &mut CellState,
    mut ledger: Option<&mut EnergyLedger>,
    dt: f64,
    rng: &mut RandomStream,
    context: &str,
) -> KineticResult<StepStats> {
    let mut stats = StepStats::default();
    let mut props = Vec::with_capacity(reactions.len());
    let mut clock = 0.0;

    while clock < dt {
        let total = propensities(reactions, &state.particles, &mut props);
        if !(total > 0.0) {
            break;
        }
        let wait = rng.exponential(total);
        if clock + wait > dt {
            break;
        }
        let Some(j) = select_reaction(&props, total, rng) else {
            break;
        };
        fire(&reactions[j], state, ledger.as_deref_mut(), context)?;
        clock += wait;
        stats.firings += 1;
    }
    Ok(stats)
}
