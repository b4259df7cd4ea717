// ─────────────────────────────────────────────────────────────────────
// SCPN Discharge Kinetics — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use crate::error::{KineticError, KineticResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Reaction-network integrator selected for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StepperKind {
    Ssa,
    Tau,
    Hybrid,
}

impl FromStr for StepperKind {
    type Err = KineticError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ssa" => Ok(StepperKind::Ssa),
            "tau" => Ok(StepperKind::Tau),
            "hybrid" => Ok(StepperKind::Hybrid),
            other => Err(KineticError::ConfigError(format!(
                "unknown stepper '{other}' (expected ssa, tau or hybrid)"
            ))),
        }
    }
}

impl TryFrom<String> for StepperKind {
    type Error = KineticError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<StepperKind> for String {
    fn from(kind: StepperKind) -> Self {
        kind.to_string()
    }
}

impl fmt::Display for StepperKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StepperKind::Ssa => "ssa",
            StepperKind::Tau => "tau",
            StepperKind::Hybrid => "hybrid",
        };
        f.write_str(name)
    }
}

/// Top-level run configuration for the kinetics core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KineticsConfig {
    #[serde(default = "default_algorithm")]
    pub algorithm: StepperKind,
    /// Track mean energies per species (LEA-style closures).
    #[serde(default)]
    pub energy_resolved: bool,
    #[serde(default)]
    pub hybrid: HybridParams,
    /// Poisson mean above which tau-leaping draws from a Normal instead.
    #[serde(default = "default_poisson_normal_swap")]
    pub poisson_normal_swap: f64,
    #[serde(default)]
    pub superparticles: SuperparticleConfig,
    #[serde(default)]
    pub random: RandomConfig,
}

/// Hybrid SSA/tau tuning. Treated as configuration, not a numerical contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HybridParams {
    /// A reaction is critical if it can fire fewer than this many times.
    #[serde(default = "default_critical_threshold")]
    pub critical_threshold: u64,
    /// Leap condition: bound on the expected relative change per species.
    #[serde(default = "default_leap_epsilon")]
    pub leap_epsilon: f64,
    /// Degrade to SSA when the non-critical leap is shorter than `ssa_limit / a0`.
    #[serde(default = "default_ssa_limit")]
    pub ssa_limit: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuperparticleConfig {
    /// Target number of super-particles per cell and species.
    #[serde(default = "default_particles_per_cell")]
    pub particles_per_cell: usize,
    /// First kd-tree split axis; later levels cycle through the dimensions.
    #[serde(default)]
    pub first_split_axis: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomConfig {
    /// Base seed. Negative values request a time-based seed.
    #[serde(default)]
    pub seed: i64,
    /// Process rank, added to the seed for distinct per-process streams.
    #[serde(default)]
    pub rank: u64,
}

fn default_algorithm() -> StepperKind {
    StepperKind::Hybrid
}
fn default_poisson_normal_swap() -> f64 {
    250.0
}
fn default_critical_threshold() -> u64 {
    10
}
fn default_leap_epsilon() -> f64 {
    0.03
}
fn default_ssa_limit() -> f64 {
    10.0
}
fn default_particles_per_cell() -> usize {
    32
}

impl Default for HybridParams {
    fn default() -> Self {
        HybridParams {
            critical_threshold: default_critical_threshold(),
            leap_epsilon: default_leap_epsilon(),
            ssa_limit: default_ssa_limit(),
        }
    }
}

impl Default for SuperparticleConfig {
    fn default() -> Self {
        SuperparticleConfig {
            particles_per_cell: default_particles_per_cell(),
            first_split_axis: 0,
        }
    }
}

impl Default for RandomConfig {
    fn default() -> Self {
        RandomConfig { seed: 0, rank: 0 }
    }
}

impl Default for KineticsConfig {
    fn default() -> Self {
        KineticsConfig {
            algorithm: default_algorithm(),
            energy_resolved: false,
            hybrid: HybridParams::default(),
            poisson_normal_swap: default_poisson_normal_swap(),
            superparticles: SuperparticleConfig::default(),
            random: RandomConfig::default(),
        }
    }
}

impl KineticsConfig {
    /// Load from a JSON file and validate.
    pub fn from_file(path: &str) -> KineticResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Parse and validate. Well-formed JSON with bad values is a `ConfigError`.
    pub fn from_json(contents: &str) -> KineticResult<Self> {
        let config: Self = serde_json::from_str(contents).map_err(|e| {
            if e.is_data() {
                KineticError::ConfigError(e.to_string())
            } else {
                KineticError::Json(e)
            }
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Setup-time checks. Runs before any cell-level work.
    pub fn validate(&self) -> KineticResult<()> {
        if self.hybrid.critical_threshold == 0 {
            return Err(KineticError::ConfigError(
                "hybrid.critical_threshold must be >= 1".to_string(),
            ));
        }
        if !self.hybrid.leap_epsilon.is_finite()
            || self.hybrid.leap_epsilon <= 0.0
            || self.hybrid.leap_epsilon >= 1.0
        {
            return Err(KineticError::ConfigError(format!(
                "hybrid.leap_epsilon must be in (0, 1), got {}",
                self.hybrid.leap_epsilon
            )));
        }
        if !self.hybrid.ssa_limit.is_finite() || self.hybrid.ssa_limit < 0.0 {
            return Err(KineticError::ConfigError(format!(
                "hybrid.ssa_limit must be finite and >= 0, got {}",
                self.hybrid.ssa_limit
            )));
        }
        if !self.poisson_normal_swap.is_finite() || self.poisson_normal_swap <= 0.0 {
            return Err(KineticError::ConfigError(format!(
                "poisson_normal_swap must be finite and > 0, got {}",
                self.poisson_normal_swap
            )));
        }
        if self.superparticles.particles_per_cell == 0 {
            return Err(KineticError::ConfigError(
                "superparticles.particles_per_cell (target leaf count) must be >= 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Check the split axis against the spatial dimension in use.
    pub fn validate_dimension(&self, dim: usize) -> KineticResult<()> {
        if self.superparticles.first_split_axis >= dim {
            return Err(KineticError::ConfigError(format!(
                "superparticles.first_split_axis {} out of range for {dim}D",
                self.superparticles.first_split_axis
            )));
        }
        Ok(())
    }
}
