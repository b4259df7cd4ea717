// ─────────────────────────────────────────────────────────────────────
// SCPN Discharge Kinetics — Mass-Balanced Partitioner
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Splitting rules used by the population tree.
//!
//! The default rule sorts a leaf along the split axis and walks a median
//! index forward while the left side stays lighter than the right. Points
//! before the median go left, points after go right, and the median itself is
//! either divided between the sides (if it holds at least two physical
//! particles) or handed whole to the lighter side.

use crate::point_mass::{HasMass, Primitive};
use kinetic_types::constants::MASS_TOLERANCE;
use kinetic_types::error::{KineticError, KineticResult};

pub type Split<P> = (Vec<P>, Vec<P>);

pub trait Partitioner<const D: usize, P: Primitive<D>> {
    fn partition(&self, points: Vec<P>, axis: usize) -> KineticResult<Split<P>>;
}

impl<const D: usize, P: Primitive<D>, F> Partitioner<D, P> for F
where
    F: Fn(Vec<P>, usize) -> KineticResult<Split<P>>,
{
    fn partition(&self, points: Vec<P>, axis: usize) -> KineticResult<Split<P>> {
        self(points, axis)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EqualMassPartitioner;

fn total_mass<P: HasMass>(points: &[P]) -> f64 {
    points.iter().map(HasMass::mass).sum()
}

/// Fail if the two sides do not add up to `expected` within the relative tolerance.
pub fn check_mass_balance(expected: f64, left: f64, right: f64) -> KineticResult<()> {
    let actual = left + right;
    if (expected - actual).abs() > MASS_TOLERANCE * expected.abs().max(1.0) {
        return Err(KineticError::MassNotConserved { expected, actual });
    }
    Ok(())
}

impl<const D: usize, P: Primitive<D>> Partitioner<D, P> for EqualMassPartitioner {
    fn partition(&self, mut points: Vec<P>, axis: usize) -> KineticResult<Split<P>> {
        if axis >= D {
            return Err(KineticError::InvalidInput(format!(
                "split axis {axis} outside 0..{D}"
            )));
        }
        if points.is_empty() {
            return Ok((Vec::new(), Vec::new()));
        }
        points.sort_by(|a, b| a.position()[axis].total_cmp(&b.position()[axis]));

        let mass = total_mass(&points);
        let mut median = 0;
        let mut mass_left = 0.0;
        let mut mass_right = mass - points[0].mass();
        for i in 1..points.len() {
            let median_mass = points[median].mass();
            if mass_left + median_mass < mass_right {
                mass_left += median_mass;
                median = i;
                mass_right = mass - mass_left - points[i].mass();
            } else {
                break;
            }
        }

        let mut right = points.split_off(median + 1);
        let pivot = points.pop();
        let mut left = points;

        if let Some(pivot) = pivot {
            let median_mass = pivot.mass();
            if pivot.can_split() {
                let diff = mass_right - mass_left;
                if median_mass < diff.abs() {
                    if diff > 0.0 {
                        left.push(pivot);
                    } else {
                        right.push(pivot);
                    }
                } else {
                    // Level the two sides first, then share what is left in
                    // integer portions, odd portion to the left.
                    let (mut to_left, mut to_right) = if diff >= 0.0 { (diff, 0.0) } else { (0.0, -diff) };
                    let remainder = median_mass - diff.abs();
                    let portions = remainder.round();
                    if portions > 0.0 {
                        let n_right = (portions / 2.0).floor();
                        let n_left = portions - n_right;
                        to_left += remainder / portions * n_left;
                        to_right += remainder / portions * n_right;
                    } else {
                        to_left += remainder;
                    }
                    let position = pivot.position();
                    let energy = pivot.energy();
                    if to_left > 0.0 {
                        left.push(P::with_parts(position, to_left, energy));
                    }
                    if to_right > 0.0 {
                        right.push(P::with_parts(position, to_right, energy));
                    }
                }
            } else if mass_left <= mass_right {
                left.push(pivot);
            } else {
                right.push(pivot);
            }
        }

        check_mass_balance(mass, total_mass(&left), total_mass(&right))?;
        Ok((left, right))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point_mass::PointMass;

    fn line(masses: &[f64]) -> Vec<PointMass<2>> {
        masses
            .iter()
            .enumerate()
            .map(|(i, &m)| PointMass::new([i as f64, 0.0], m, 1.0))
            .collect()
    }

    fn side_mass(points: &[PointMass<2>]) -> f64 {
        points.iter().map(HasMass::mass).sum()
    }

    #[test]
    fn test_unit_masses_median_goes_left() {
        let (l, r) = EqualMassPartitioner.partition(line(&[1.0; 5]), 0).unwrap();
        assert_eq!(side_mass(&l), 3.0);
        assert_eq!(side_mass(&r), 2.0);
        assert!(l.iter().all(|p| p.position[0] <= 2.0));
        assert!(r.iter().all(|p| p.position[0] >= 3.0));
    }

    #[test]
    fn test_sorts_before_scanning() {
        let mut points = line(&[1.0; 4]);
        points.reverse();
        let (l, r) = EqualMassPartitioner.partition(points, 0).unwrap();
        assert_eq!(side_mass(&l), 2.0);
        assert_eq!(side_mass(&r), 2.0);
        assert!(l.iter().all(|p| p.position[0] < 2.0));
    }

    #[test]
    fn test_single_heavy_point_split_in_half() {
        let (l, r) = EqualMassPartitioner
            .partition(vec![PointMass::new([0.0, 0.0], 4.0, 3.0)], 0)
            .unwrap();
        assert_eq!(l.len(), 1);
        assert_eq!(r.len(), 1);
        assert_eq!(l[0].mass, 2.0);
        assert_eq!(r[0].mass, 2.0);
        assert_eq!(l[0].energy, 3.0);
        assert_eq!(r[0].position, [0.0, 0.0]);
    }

    #[test]
    fn test_heavy_median_levels_sides() {
        // Light point then a heavy one: heavy median is shared.
        let (l, r) = EqualMassPartitioner.partition(line(&[1.0, 100.0]), 0).unwrap();
        assert!((side_mass(&l) - 51.0).abs() < 1e-12);
        assert!((side_mass(&r) - 50.0).abs() < 1e-12);
    }

    #[test]
    fn test_odd_mass_point_favours_left() {
        let (l, r) = EqualMassPartitioner
            .partition(vec![PointMass::new([0.0, 0.0], 3.0, 0.0)], 1)
            .unwrap();
        assert_eq!(side_mass(&l), 2.0);
        assert_eq!(side_mass(&r), 1.0);
    }

    #[test]
    fn test_bad_axis_rejected() {
        assert!(EqualMassPartitioner.partition(line(&[1.0, 1.0]), 2).is_err());
    }

    #[test]
    fn test_closure_partitioner() {
        let halves = |mut points: Vec<PointMass<2>>, _axis: usize| -> KineticResult<Split<PointMass<2>>> {
            let right = points.split_off(points.len() / 2);
            Ok((points, right))
        };
        let (l, r) = halves.partition(line(&[1.0; 6]), 0).unwrap();
        assert_eq!(l.len(), 3);
        assert_eq!(r.len(), 3);
    }

    #[test]
    fn test_mass_balance_check() {
        assert!(check_mass_balance(10.0, 4.0, 6.0).is_ok());
        let err = check_mass_balance(10.0, 4.0, 5.0).unwrap_err();
        assert!(matches!(err, KineticError::MassNotConserved { .. }));
    }
}
