// ─────────────────────────────────────────────────────────────────────
// SCPN Discharge Kinetics — Cut-Cell Sampling
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Random placement of new particles inside (possibly cut) cells.

use crate::random::RandomStream;
use crate::vector::axpy;
use kinetic_types::state::CellGeometry;

/// Rejection-sampling budget before falling back to a safe position.
const MAX_REJECTIONS: usize = 256;

/// Uniform position in the valid region of `geom`.
///
/// Regular cells sample the full box. Cut cells reject points behind the
/// embedded boundary; if the budget runs out the boundary centroid nudged a
/// small step along the normal is returned.
pub fn random_position<const D: usize>(geom: &CellGeometry<D>, rng: &mut RandomStream) -> [f64; D] {
    let face = match &geom.boundary {
        Some(face) if geom.kappa < 1.0 => face,
        _ => return rng.position_in_box(&geom.lo, &geom.hi),
    };

    for _ in 0..MAX_REJECTIONS {
        let pos = rng.position_in_box(&geom.lo, &geom.hi);
        if geom.is_valid_position(&pos) {
            return pos;
        }
    }

    log::warn!(
        "cut-cell rejection sampling exhausted after {MAX_REJECTIONS} draws (kappa = {})",
        geom.kappa
    );
    let mut pos = axpy(&face.centroid, 1.0e-6 * geom.dx, &face.normal);
    for d in 0..D {
        pos[d] = pos[d].clamp(geom.lo[d], geom.hi[d]);
    }
    pos
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinetic_types::state::CutFace;

    #[test]
    fn test_regular_cell_positions_inside() {
        let geom = CellGeometry::regular([1.0, -1.0, 0.0], 0.5);
        let mut rng = RandomStream::new(3);
        for _ in 0..500 {
            let p = random_position(&geom, &mut rng);
            assert!(geom.contains(&p), "Position {p:?} outside cell");
        }
    }

    #[test]
    fn test_cut_cell_positions_on_valid_side() {
        let geom = CellGeometry::regular([0.0, 0.0], 1.0).cut(
            0.25,
            CutFace {
                centroid: [0.75, 0.5],
                normal: [1.0, 0.0],
            },
        );
        let mut rng = RandomStream::new(4);
        for _ in 0..500 {
            let p = random_position(&geom, &mut rng);
            assert!(p[0] >= 0.75, "Position {p:?} behind embedded boundary");
        }
    }

    #[test]
    fn test_exhausted_budget_returns_valid_fallback() {
        // Valid region is a sliver of measure zero at the upper face.
        let geom = CellGeometry::regular([0.0, 0.0], 1.0).cut(
            1.0e-3,
            CutFace {
                centroid: [1.0, 0.5],
                normal: [1.0, 0.0],
            },
        );
        let mut rng = RandomStream::new(5);
        let p = random_position(&geom, &mut rng);
        assert!(geom.contains(&p));
        assert!((p[0] - 1.0).abs() < 1e-12);
    }
}
