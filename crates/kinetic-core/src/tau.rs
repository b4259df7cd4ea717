// ─────────────────────────────────────────────────────────────────────
// SCPN Discharge Kinetics — Tau-Leaping Stepper
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Explicit tau-leaping.
//!
//! Propensities are frozen for the whole leap. Each reaction fires a Poisson
//! number of times with mean `a_j * tau` (Normal above the swap mean) and all
//! jumps are applied as one update. No population floor is enforced here.

use crate::energy::EnergyLedger;
use crate::propensity::propensity;
use crate::reaction::Reaction;
use crate::stepper::StepStats;
use kinetic_math::random::RandomStream;
use kinetic_types::state::CellState;

/// Draw firing counts for the reactions in `subset` given frozen propensities.
pub fn draw_firings(
    subset: &[usize],
    props: &[f64],
    tau: f64,
    poisson_normal_swap: f64,
    rng: &mut RandomStream,
) -> Vec<u64> {
    subset
        .iter()
        .map(|&j| rng.poisson(props[j] * tau, poisson_normal_swap))
        .collect()
}

/// Apply drawn firings in one net update. `counts` are the frozen populations
/// the draws were made against.
pub fn apply_firings(
    reactions: &[Reaction],
    subset: &[usize],
    firings: &[u64],
    counts: &[i64],
    state: &mut CellState,
    mut ledger: Option<&mut EnergyLedger>,
) -> u64 {
    let mut total = 0;
    for (&j, &k) in subset.iter().zip(firings.iter()) {
        if k == 0 {
            continue;
        }
        let k_i = k as i64;
        reactions[j].jump_state(&mut state.particles, &mut state.photons, k_i);
        if let Some(ledger) = ledger.as_deref_mut() {
            ledger.apply(&reactions[j], counts, k_i);
        }
        total += k;
    }
    total
}

/// Leap the reactions in `subset` over `tau` with propensities `props`.
#[allow(clippy::too_many_arguments)]
pub fn leap_subset(
    reactions: &[Reaction],
    subset: &[usize],
    props: &[f64],
    tau: f64,
    poisson_normal_swap: f64,
    state: &mut CellState,
    ledger: Option<&mut EnergyLedger>,
    rng: &mut RandomStream,
) -> u64 {
    let counts = state.particles.clone();
    let firings = draw_firings(subset, props, tau, poisson_normal_swap, rng);
    apply_firings(reactions, subset, &firings, &counts, state, ledger)
}

/// One tau-leap of every reaction over `tau`.
pub fn advance_tau(
    reactions: &[Reaction],
    state: &mut CellState,
    ledger: Option<&mut EnergyLedger>,
    tau: f64,
    poisson_normal_swap: f64,
    rng: &mut RandomStream,
) -> StepStats {
    let props: Vec<f64> = reactions
        .iter()
        .map(|r| propensity(r, &state.particles))
        .collect();
    let all: Vec<usize> = (0..reactions.len()).collect();
    let firings = leap_subset(
        reactions,
        &all,
        &props,
        tau,
        poisson_normal_swap,
        state,
        ledger,
        rng,
    );
    StepStats {
        firings,
        leaps: 1,
        ..StepStats::default()
    }
}
