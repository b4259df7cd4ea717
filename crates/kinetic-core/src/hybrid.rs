// ─────────────────────────────────────────────────────────────────────
// SCPN Discharge Kinetics — Hybrid SSA/Tau Coordinator
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Hybrid stepping with critical-reaction partitioning.
//!
//! Reactions that can fire fewer than `critical_threshold` times before
//! exhausting a reactant are critical and are advanced exactly (at most one
//! firing per sub-step). All others are tau-leaped with a step bounded by the
//! leap condition on the expected relative change of every reactant species.
//! When the leap bound is only a few SSA steps long the remainder of the
//! macro-step runs as pure SSA.

use crate::energy::EnergyLedger;
use crate::propensity::propensities;
use crate::reaction::Reaction;
use crate::ssa::{advance_ssa, select_reaction};
use crate::stepper::StepStats;
use crate::tau::leap_subset;
use kinetic_math::random::RandomStream;
use kinetic_types::config::HybridParams;
use kinetic_types::error::KineticResult;
use kinetic_types::state::CellState;

/// Rejected leaps allowed per sub-step before degrading to SSA.
const MAX_LEAP_REJECTIONS: u32 = 32;

/// Number of times `reaction` can fire before exhausting a consumed species.
/// `u64::MAX` for reactions that consume nothing.
pub fn firings_to_exhaustion(reaction: &Reaction, counts: &[i64]) -> u64 {
    reaction
        .state_change()
        .iter()
        .filter(|(_, v)| *v < 0)
        .map(|&(s, v)| (counts[s].max(0) / -v) as u64)
        .min()
        .unwrap_or(u64::MAX)
}

/// Split reaction indices into (critical, non-critical).
pub fn partition_reactions(
    reactions: &[Reaction],
    counts: &[i64],
    critical_threshold: u64,
) -> (Vec<usize>, Vec<usize>) {
    (0..reactions.len()).partition(|&j| firings_to_exhaustion(&reactions[j], counts) < critical_threshold)
}

/// Cao g_i: determined by the highest-order reaction species `i` is a reactant in.
pub fn highest_order_factor(reactions: &[Reaction], species: usize, count: i64) -> f64 {
    let mut order = 0;
    let mut multiplicity = 0;
    for r in reactions {
        let m = r.multiplicity(species);
        if m == 0 {
            continue;
        }
        let o = r.order();
        if o > order || (o == order && m > multiplicity) {
            order = o;
            multiplicity = m;
        }
    }
    let x = count as f64;
    let inv = |shift: f64| 1.0 / (x - shift).max(1.0);
    match (order, multiplicity) {
        (0, _) | (1, _) => 1.0,
        (2, 1) => 2.0,
        (2, _) => 2.0 + inv(1.0),
        (3, 1) => 3.0,
        (3, 2) => 1.5 * (2.0 + inv(1.0)),
        (3, _) => 3.0 + inv(1.0) + 2.0 * inv(2.0),
        (o, _) => o as f64,
    }
}

/// Largest leap that keeps the expected relative change of every reactant
/// of the non-critical set below `epsilon`.
pub fn noncritical_time_step(
    reactions: &[Reaction],
    noncritical: &[usize],
    props: &[f64],
    counts: &[i64],
    epsilon: f64,
) -> f64 {
    let mut tau = f64::INFINITY;
    let mut seen: Vec<usize> = Vec::new();
    for &j in noncritical {
        for &(species, _) in reactions[j].reactant_groups() {
            if seen.contains(&species) {
                continue;
            }
            seen.push(species);

            let mut mu = 0.0;
            let mut sigma2 = 0.0;
            for &l in noncritical {
                let v = reactions[l].net_change(species) as f64;
                mu += v * props[l];
                sigma2 += v * v * props[l];
            }
            let g = highest_order_factor(reactions, species, counts[species]);
            let bound = (epsilon * counts[species] as f64 / g).max(1.0);
            if mu.abs() > 0.0 {
                tau = tau.min(bound / mu.abs());
            }
            if sigma2 > 0.0 {
                tau = tau.min(bound * bound / sigma2);
            }
        }
    }
    tau
}

/// Advance `state` over `dt` with the hybrid scheme.
#[allow(clippy::too_many_arguments)]
pub fn advance_hybrid(
    reactions: &[Reaction],
    state: &mut CellState,
    mut ledger: Option<&mut EnergyLedger>,
    dt: f64,
    params: &HybridParams,
    poisson_normal_swap: f64,
    rng: &mut RandomStream,
    context: &str,
) -> KineticResult<StepStats> {
    let mut stats = StepStats::default();
    let mut props = Vec::with_capacity(reactions.len());
    let mut clock = 0.0;

    while clock < dt {
        let a0 = propensities(reactions, &state.particles, &mut props);
        if !(a0 > 0.0) {
            break;
        }
        let (critical, noncritical) =
            partition_reactions(reactions, &state.particles, params.critical_threshold);
        let mut tau_nc = noncritical_time_step(
            reactions,
            &noncritical,
            &props,
            &state.particles,
            params.leap_epsilon,
        );

        if tau_nc < params.ssa_limit / a0 {
            log::debug!(
                "{context}: leap {tau_nc:.3e} s below {} SSA steps, finishing with SSA",
                params.ssa_limit
            );
            let tail = advance_ssa(reactions, state, ledger, dt - clock, rng, context)?;
            stats.merge(&tail);
            stats.ssa_fallback = true;
            return Ok(stats);
        }

        let critical_props: Vec<f64> = critical.iter().map(|&j| props[j]).collect();
        let a_c: f64 = critical_props.iter().sum();
        let tau_c = rng.exponential(a_c);
        let remaining = dt - clock;

        let mut rejections = 0;
        loop {
            let tau = tau_nc.min(tau_c).min(remaining);
            let saved_state = state.clone();
            let saved_ledger = ledger.as_deref().cloned();

            let leaped = leap_subset(
                reactions,
                &noncritical,
                &props,
                tau,
                poisson_normal_swap,
                state,
                ledger.as_deref_mut(),
                rng,
            );
            let mut fired_critical = 0;
            if tau_c <= remaining && tau_c <= tau_nc {
                if let Some(pick) = select_reaction(&critical_props, a_c, rng) {
                    // Floor is checked below together with the leap.
                    let counts = state.particles.clone();
                    reactions[critical[pick]].jump_state(
                        &mut state.particles,
                        &mut state.photons,
                        1,
                    );
                    if let Some(l) = ledger.as_deref_mut() {
                        l.apply(&reactions[critical[pick]], &counts, 1);
                    }
                    fired_critical = 1;
                }
            }

            if state.particles.iter().all(|&n| n >= 0) {
                stats.firings += leaped + fired_critical;
                stats.leaps += 1;
                clock += tau;
                break;
            }

            *state = saved_state;
            if let (Some(l), Some(saved)) = (ledger.as_deref_mut(), saved_ledger) {
                *l = saved;
            }
            stats.rejected_leaps += 1;
            rejections += 1;
            tau_nc *= 0.5;
            log::debug!("{context}: leap of {tau:.3e} s went negative, halving");

            if rejections >= MAX_LEAP_REJECTIONS {
                log::debug!("{context}: leap rejected {rejections} times, finishing with SSA");
                let tail = advance_ssa(reactions, state, ledger, dt - clock, rng, context)?;
                stats.merge(&tail);
                stats.ssa_fallback = true;
                return Ok(stats);
            }
        }
    }
    Ok(stats)
}
