// ─────────────────────────────────────────────────────────────────────
// SCPN Discharge Kinetics — Stepper Dispatch
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use crate::energy::EnergyLedger;
use crate::hybrid::advance_hybrid;
use crate::reaction::Reaction;
use crate::ssa::advance_ssa;
use crate::tau::advance_tau;
use kinetic_math::random::RandomStream;
use kinetic_types::config::{HybridParams, KineticsConfig, StepperKind};
use kinetic_types::error::KineticResult;
use kinetic_types::state::CellState;

/// Counters reported by one stepper call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepStats {
    pub firings: u64,
    pub leaps: u32,
    pub rejected_leaps: u32,
    pub ssa_fallback: bool,
}

impl StepStats {
    pub fn merge(&mut self, other: &StepStats) {
        self.firings += other.firings;
        self.leaps += other.leaps;
        self.rejected_leaps += other.rejected_leaps;
        self.ssa_fallback |= other.ssa_fallback;
    }
}

/// Integrator choice plus its tuning, fixed for a run.
#[derive(Debug, Clone)]
pub struct Stepper {
    kind: StepperKind,
    hybrid: HybridParams,
    poisson_normal_swap: f64,
}

impl Stepper {
    pub fn new(kind: StepperKind, hybrid: HybridParams, poisson_normal_swap: f64) -> Self {
        Stepper {
            kind,
            hybrid,
            poisson_normal_swap,
        }
    }

    pub fn from_config(config: &KineticsConfig) -> Self {
        Self::new(
            config.algorithm,
            config.hybrid.clone(),
            config.poisson_normal_swap,
        )
    }

    pub fn kind(&self) -> StepperKind {
        self.kind
    }

    pub fn advance(
        &self,
        reactions: &[Reaction],
        state: &mut CellState,
        ledger: Option<&mut EnergyLedger>,
        dt: f64,
        rng: &mut RandomStream,
        context: &str,
    ) -> KineticResult<StepStats> {
        match self.kind {
            StepperKind::Ssa => advance_ssa(reactions, state, ledger, dt, rng, context),
            StepperKind::Tau => Ok(advance_tau(
                reactions,
                state,
                ledger,
                dt,
                self.poisson_normal_swap,
                rng,
            )),
            StepperKind::Hybrid => advance_hybrid(
                reactions,
                state,
                ledger,
                dt,
                &self.hybrid,
                self.poisson_normal_swap,
                rng,
                context,
            ),
        }
    }
}
