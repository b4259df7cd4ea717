// ─────────────────────────────────────────────────────────────────────
// SCPN Discharge Kinetics — Propensity Engine
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Discrete mass-action propensities.
//!
//! The propensity of a reaction is its rate times the product, over reactant
//! occurrences, of the decreasing particle count: a species appearing twice
//! contributes `x (x - 1)`. Field or energy dependence is already folded into
//! the rate by the physics closure.

use crate::reaction::Reaction;

/// x (x - 1) ... (x - m + 1), zero when fewer than `m` particles remain.
#[inline]
pub fn falling_factorial(x: i64, m: u32) -> f64 {
    if x < m as i64 {
        return 0.0;
    }
    (0..m as i64).map(|i| (x - i) as f64).product()
}

/// Propensity of one reaction, floored at zero.
#[inline]
pub fn propensity(reaction: &Reaction, counts: &[i64]) -> f64 {
    let mut a = reaction.rate();
    for &(species, m) in reaction.reactant_groups() {
        a *= falling_factorial(counts[species], m);
        if a == 0.0 {
            return 0.0;
        }
    }
    a.max(0.0)
}

/// Fill `out` with every propensity and return their sum.
pub fn propensities(reactions: &[Reaction], counts: &[i64], out: &mut Vec<f64>) -> f64 {
    out.clear();
    out.extend(reactions.iter().map(|r| propensity(r, counts)));
    out.iter().sum()
}
