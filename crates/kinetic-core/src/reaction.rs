// ─────────────────────────────────────────────────────────────────────
// SCPN Discharge Kinetics — Reaction Descriptor
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Stoichiometry record for one plasma reaction.
//!
//! Reactants may repeat to express higher-order kinetics. The net state change
//! and the energy change are derived once at construction and are read-only
//! while stepping; only the rate coefficient is updated between macro-steps.

use kinetic_types::error::{KineticError, KineticResult};

/// Energy bookkeeping for one firing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnergyChange {
    /// `count` particles of `species` leave, each taking the current mean energy.
    RemoveMean { species: usize, count: i64 },
    /// `amount` (eV) is added to the total energy of `species`.
    Add { species: usize, amount: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reaction {
    reactants: Vec<usize>,
    particle_products: Vec<usize>,
    photon_products: Vec<usize>,
    energy_jumps: Vec<(usize, f64)>,
    rate: f64,
    // Derived
    reactant_groups: Vec<(usize, u32)>,
    state_change: Vec<(usize, i64)>,
    photon_change: Vec<(usize, i64)>,
    energy_change: Vec<EnergyChange>,
}

/// Sorted (index, multiplicity) pairs of a multiset.
fn multiplicities(items: &[usize]) -> Vec<(usize, u32)> {
    let mut sorted = items.to_vec();
    sorted.sort_unstable();
    let mut out: Vec<(usize, u32)> = Vec::new();
    for idx in sorted {
        match out.last_mut() {
            Some((last, m)) if *last == idx => *m += 1,
            _ => out.push((idx, 1)),
        }
    }
    out
}

impl Reaction {
    pub fn new(reactants: &[usize], particle_products: &[usize], photon_products: &[usize]) -> Self {
        let mut reaction = Reaction {
            reactants: reactants.to_vec(),
            particle_products: particle_products.to_vec(),
            photon_products: photon_products.to_vec(),
            energy_jumps: Vec::new(),
            rate: 0.0,
            reactant_groups: Vec::new(),
            state_change: Vec::new(),
            photon_change: Vec::new(),
            energy_change: Vec::new(),
        };
        reaction.compute_state_change();
        reaction
    }

    /// Attach per-firing energy increments (eV) keyed by species.
    pub fn with_energy_jumps(mut self, jumps: &[(usize, f64)]) -> Self {
        self.energy_jumps = jumps.to_vec();
        self.compute_state_change();
        self
    }

    pub fn with_rate(mut self, rate: f64) -> Self {
        self.rate = rate;
        self
    }

    fn compute_state_change(&mut self) {
        self.reactant_groups = multiplicities(&self.reactants);

        let mut delta: Vec<(usize, i64)> = Vec::new();
        let bump = |delta: &mut Vec<(usize, i64)>, idx: usize, by: i64| {
            match delta.iter_mut().find(|(s, _)| *s == idx) {
                Some((_, v)) => *v += by,
                None => delta.push((idx, by)),
            }
        };
        for &r in &self.reactants {
            bump(&mut delta, r, -1);
        }
        for &p in &self.particle_products {
            bump(&mut delta, p, 1);
        }
        delta.retain(|&(_, v)| v != 0);
        delta.sort_unstable_by_key(|&(s, _)| s);
        self.state_change = delta;

        self.photon_change = multiplicities(&self.photon_products)
            .into_iter()
            .map(|(g, m)| (g, m as i64))
            .collect();

        let mut energy = Vec::new();
        for &(species, v) in &self.state_change {
            if v < 0 {
                energy.push(EnergyChange::RemoveMean { species, count: -v });
            }
        }
        for &(species, amount) in &self.energy_jumps {
            if self.net_change(species) >= 0 && amount != 0.0 {
                energy.push(EnergyChange::Add { species, amount });
            }
        }
        self.energy_change = energy;
    }

    pub fn reactants(&self) -> &[usize] {
        &self.reactants
    }

    pub fn particle_products(&self) -> &[usize] {
        &self.particle_products
    }

    pub fn photon_products(&self) -> &[usize] {
        &self.photon_products
    }

    pub fn energy_jumps(&self) -> &[(usize, f64)] {
        &self.energy_jumps
    }

    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    #[inline]
    pub fn set_rate(&mut self, rate: f64) {
        self.rate = rate;
    }

    /// Reactant species with their multiplicities, sorted by species.
    #[inline]
    pub fn reactant_groups(&self) -> &[(usize, u32)] {
        &self.reactant_groups
    }

    /// Net non-zero particle delta per firing, sorted by species.
    #[inline]
    pub fn state_change(&self) -> &[(usize, i64)] {
        &self.state_change
    }

    #[inline]
    pub fn photon_change(&self) -> &[(usize, i64)] {
        &self.photon_change
    }

    #[inline]
    pub fn energy_change(&self) -> &[EnergyChange] {
        &self.energy_change
    }

    /// Molecularity: number of reactant occurrences.
    pub fn order(&self) -> usize {
        self.reactants.len()
    }

    pub fn net_change(&self, species: usize) -> i64 {
        self.state_change
            .iter()
            .find(|(s, _)| *s == species)
            .map_or(0, |&(_, v)| v)
    }

    pub fn multiplicity(&self, species: usize) -> u32 {
        self.reactant_groups
            .iter()
            .find(|(s, _)| *s == species)
            .map_or(0, |&(_, m)| m)
    }

    /// Apply `k` firings to particle and photon counts.
    pub fn jump_state(&self, particles: &mut [i64], photons: &mut [i64], k: i64) {
        for &(s, v) in &self.state_change {
            particles[s] += v * k;
        }
        for &(g, v) in &self.photon_change {
            photons[g] += v * k;
        }
    }

    /// Net charge created by one firing.
    pub fn charge_change(&self, charges: &[i32]) -> i64 {
        self.state_change
            .iter()
            .map(|&(s, v)| v * charges[s] as i64)
            .sum()
    }

    /// Check every index against the registry sizes.
    pub fn validate(&self, num_species: usize, num_photon_groups: usize) -> KineticResult<()> {
        let species_ok = self
            .reactants
            .iter()
            .chain(self.particle_products.iter())
            .chain(self.energy_jumps.iter().map(|(s, _)| s))
            .all(|&s| s < num_species);
        if !species_ok {
            return Err(KineticError::ConfigError(format!(
                "reaction {self} references a species outside 0..{num_species}"
            )));
        }
        if self.photon_products.iter().any(|&g| g >= num_photon_groups) {
            return Err(KineticError::ConfigError(format!(
                "reaction {self} references a photon group outside 0..{num_photon_groups}"
            )));
        }
        if self.energy_jumps.iter().any(|(_, e)| !e.is_finite()) {
            return Err(KineticError::ConfigError(format!(
                "reaction {self} has a non-finite energy jump"
            )));
        }
        Ok(())
    }
}

impl std::fmt::Display for Reaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let join = |items: &[usize], prefix: &str| {
            items
                .iter()
                .map(|i| format!("{prefix}{i}"))
                .collect::<Vec<_>>()
                .join(" + ")
        };
        let lhs = join(&self.reactants, "s");
        let mut rhs = join(&self.particle_products, "s");
        let photons = join(&self.photon_products, "y");
        if !photons.is_empty() {
            if !rhs.is_empty() {
                rhs.push_str(" + ");
            }
            rhs.push_str(&photons);
        }
        let lhs = if lhs.is_empty() { "0".to_string() } else { lhs };
        let rhs = if rhs.is_empty() { "0".to_string() } else { rhs };
        write!(f, "{lhs} -> {rhs}")
    }
}
