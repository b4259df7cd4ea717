// ─────────────────────────────────────────────────────────────────────
// SCPN Discharge Kinetics — Point Masses
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Capability traits for particle proxies and the plain `PointMass`.

use kinetic_types::error::{KineticError, KineticResult};

/// Relative slack when deciding whether a weight holds two physical particles.
pub const SPLIT_SLACK: f64 = 1.0e-6;

pub trait HasPosition<const D: usize> {
    fn position(&self) -> [f64; D];
}

pub trait HasMass {
    fn mass(&self) -> f64;
}

pub trait HasEnergy {
    fn energy(&self) -> f64;
}

/// Anything the population tree can partition and rebuild.
pub trait Primitive<const D: usize>: HasPosition<D> + HasMass + HasEnergy + Clone {
    fn with_parts(position: [f64; D], mass: f64, energy: f64) -> Self;

    /// True when the weight represents at least two physical particles.
    fn can_split(&self) -> bool {
        self.mass() * (1.0 + SPLIT_SLACK) >= 2.0
    }
}

/// Mass-weighted centroid, total mass and mass-weighted energy.
/// `None` for an empty or massless list.
pub fn weighted_average<const D: usize, P: Primitive<D>>(points: &[P]) -> Option<([f64; D], f64, f64)> {
    let mass: f64 = points.iter().map(HasMass::mass).sum();
    if !(mass > 0.0) {
        return None;
    }
    let mut position = [0.0; D];
    let mut energy = 0.0;
    for p in points {
        let m = p.mass();
        let x = p.position();
        for d in 0..D {
            position[d] += m * x[d];
        }
        energy += m * p.energy();
    }
    for x in position.iter_mut() {
        *x /= mass;
    }
    Some((position, mass, energy / mass))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointMass<const D: usize> {
    pub position: [f64; D],
    pub mass: f64,
    pub energy: f64,
}

impl<const D: usize> PointMass<D> {
    pub fn new(position: [f64; D], mass: f64, energy: f64) -> Self {
        PointMass {
            position,
            mass,
            energy,
        }
    }

    /// Merge `points` into their mass-weighted average. Total mass must be >= 1.
    pub fn from_points<P: Primitive<D>>(points: &[P]) -> KineticResult<Self> {
        match weighted_average::<D, P>(points) {
            Some((position, mass, energy)) if mass >= 1.0 => Ok(PointMass::new(position, mass, energy)),
            Some((_, mass, _)) => Err(KineticError::InvalidInput(format!(
                "cannot merge point masses with total mass {mass} < 1"
            ))),
            None => Err(KineticError::InvalidInput(
                "cannot merge an empty or massless point list".to_string(),
            )),
        }
    }
}

impl<const D: usize> HasPosition<D> for PointMass<D> {
    fn position(&self) -> [f64; D] {
        self.position
    }
}

impl<const D: usize> HasMass for PointMass<D> {
    fn mass(&self) -> f64 {
        self.mass
    }
}

impl<const D: usize> HasEnergy for PointMass<D> {
    fn energy(&self) -> f64 {
        self.energy
    }
}

impl<const D: usize> Primitive<D> for PointMass<D> {
    fn with_parts(position: [f64; D], mass: f64, energy: f64) -> Self {
        PointMass::new(position, mass, energy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_averaging_constructor() {
        let points = [
            PointMass::new([0.0, 0.0], 1.0, 2.0),
            PointMass::new([3.0, 0.0], 2.0, 5.0),
        ];
        let merged = PointMass::from_points(&points).unwrap();
        assert!((merged.mass - 3.0).abs() < 1e-15);
        assert!((merged.position[0] - 2.0).abs() < 1e-15);
        assert!((merged.energy - 4.0).abs() < 1e-15);
    }

    #[test]
    fn test_averaging_requires_unit_mass() {
        let light = [PointMass::new([0.0, 0.0, 0.0], 0.4, 1.0)];
        assert!(PointMass::from_points(&light).is_err());
        let empty: [PointMass<3>; 0] = [];
        assert!(PointMass::from_points(&empty).is_err());
    }

    #[test]
    fn test_can_split_threshold() {
        assert!(PointMass::new([0.0], 2.0, 0.0).can_split());
        assert!(PointMass::new([0.0], 2.0 - 1e-9, 0.0).can_split());
        assert!(!PointMass::new([0.0], 1.5, 0.0).can_split());
    }
}
