//! Lattice geometry: length/angle cell form, the reciprocal metric tensor
//! linking Miller indices to inverse d-spacing, and the integer search bounds
//! that cover a sphere in reciprocal space.

use crate::domain::{Hkl, XrdError, XrdResult};
use serde::{Deserialize, Serialize};

pub type Matrix3 = [[f64; 3]; 3];

/// A periodic lattice in ABC form: edge lengths in Angstroms, inter-axial
/// angles in radians (`angles[0]` between b and c, `angles[1]` between a and
/// c, `angles[2]` between a and b).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatticeAbc {
    pub lengths: [f64; 3],
    pub angles: [f64; 3],
}

impl LatticeAbc {
    pub fn new(lengths: [f64; 3], angles: [f64; 3]) -> XrdResult<Self> {
        for (axis, &length) in lengths.iter().enumerate() {
            if !(length.is_finite() && length > 0.0) {
                return Err(XrdError::MalformedLattice {
                    reason: format!("length {} on axis {axis} is not a positive number", length),
                });
            }
        }
        for (axis, &angle) in angles.iter().enumerate() {
            if !(angle.is_finite() && angle > 0.0 && angle < std::f64::consts::PI) {
                return Err(XrdError::MalformedLattice {
                    reason: format!(
                        "angle {} on axis {axis} is outside the open interval (0, pi)",
                        angle
                    ),
                });
            }
        }

        let lattice = Self { lengths, angles };
        if determinant3(&lattice.direct_metric()) <= 0.0 {
            return Err(XrdError::MalformedLattice {
                reason: "angles do not describe a cell with positive volume".to_string(),
            });
        }
        Ok(lattice)
    }

    /// Direct metric tensor G with `G[i][j] = a_i . a_j`.
    pub fn direct_metric(&self) -> Matrix3 {
        let [a, b, c] = self.lengths;
        let [alpha, beta, gamma] = self.angles;
        [
            [a * a, a * b * gamma.cos(), a * c * beta.cos()],
            [a * b * gamma.cos(), b * b, b * c * alpha.cos()],
            [a * c * beta.cos(), b * c * alpha.cos(), c * c],
        ]
    }
}

/// Converts a Cartesian cell matrix (lattice vectors as rows) to ABC form.
pub fn cell_to_abc(cell: &Matrix3) -> XrdResult<LatticeAbc> {
    let norms = [norm3(&cell[0]), norm3(&cell[1]), norm3(&cell[2])];
    for (axis, &norm) in norms.iter().enumerate() {
        if !(norm.is_finite() && norm > 0.0) {
            return Err(XrdError::MalformedLattice {
                reason: format!("cell row {axis} has zero or non-finite length"),
            });
        }
    }

    let cos_angle = |u: &[f64; 3], v: &[f64; 3], nu: f64, nv: f64| {
        (dot3(u, v) / (nu * nv)).clamp(-1.0, 1.0)
    };
    let angles = [
        cos_angle(&cell[1], &cell[2], norms[1], norms[2]).acos(),
        cos_angle(&cell[0], &cell[2], norms[0], norms[2]).acos(),
        cos_angle(&cell[0], &cell[1], norms[0], norms[1]).acos(),
    ];

    LatticeAbc::new(norms, angles)
}

/// Quadratic form M with `1/d^2 = hkl^T . M . hkl`: the reciprocal metric,
/// i.e. the inverse of the direct metric tensor.
pub fn inv_d_squared_matrix(lattice: &LatticeAbc) -> XrdResult<Matrix3> {
    invert3(&lattice.direct_metric()).ok_or_else(|| XrdError::MalformedLattice {
        reason: "direct metric tensor is singular".to_string(),
    })
}

/// Inverse d-spacing of a single reflection under the quadratic form M.
pub fn inv_d_for_hkl(matrix: &Matrix3, hkl: Hkl) -> f64 {
    let v = [hkl.h as f64, hkl.k as f64, hkl.l as f64];
    let mut quad = 0.0;
    for i in 0..3 {
        for j in 0..3 {
            quad += v[i] * matrix[i][j] * v[j];
        }
    }
    quad.max(0.0).sqrt()
}

/// Smallest integer box `[-H,H]x[-K,K]x[-L,L]` containing every hkl with
/// `inv_d < inv_d_max`. On the ellipsoid `hkl^T.G^-1.hkl = R^2` the extreme
/// value of index i is `R * sqrt(G[i][i]) = R * length_i`.
pub fn minimum_search_bounds(inv_d_max: f64, lattice: &LatticeAbc) -> [i32; 3] {
    let bound = |length: f64| (inv_d_max * length).ceil() as i32;
    [
        bound(lattice.lengths[0]),
        bound(lattice.lengths[1]),
        bound(lattice.lengths[2]),
    ]
}

fn dot3(u: &[f64; 3], v: &[f64; 3]) -> f64 {
    u[0] * v[0] + u[1] * v[1] + u[2] * v[2]
}

fn norm3(v: &[f64; 3]) -> f64 {
    dot3(v, v).sqrt()
}

fn determinant3(m: &Matrix3) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

fn invert3(m: &Matrix3) -> Option<Matrix3> {
    let det = determinant3(m);
    if det.abs() < 1.0e-12 {
        return None;
    }

    let cofactor = |r0: usize, r1: usize, c0: usize, c1: usize| {
        m[r0][c0] * m[r1][c1] - m[r0][c1] * m[r1][c0]
    };

    let adjugate = [
        [
            cofactor(1, 2, 1, 2),
            -cofactor(0, 2, 1, 2),
            cofactor(0, 1, 1, 2),
        ],
        [
            -cofactor(1, 2, 0, 2),
            cofactor(0, 2, 0, 2),
            -cofactor(0, 1, 0, 2),
        ],
        [
            cofactor(1, 2, 0, 1),
            -cofactor(0, 2, 0, 1),
            cofactor(0, 1, 0, 1),
        ],
    ];

    let mut inverse = [[0.0; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            inverse[i][j] = adjugate[i][j] / det;
        }
    }
    Some(inverse)
}

#[cfg(test)]
mod tests {
    use super::{
        LatticeAbc, cell_to_abc, inv_d_for_hkl, inv_d_squared_matrix, minimum_search_bounds,
    };
    use crate::domain::{Hkl, XrdError};
    use std::f64::consts::{FRAC_PI_2, PI};

    fn orthorhombic(a: f64, b: f64, c: f64) -> LatticeAbc {
        LatticeAbc::new([a, b, c], [FRAC_PI_2, FRAC_PI_2, FRAC_PI_2]).expect("valid lattice")
    }

    #[test]
    fn rejects_non_positive_lengths_and_degenerate_angles() {
        assert!(matches!(
            LatticeAbc::new([0.0, 5.0, 10.0], [FRAC_PI_2; 3]),
            Err(XrdError::MalformedLattice { .. })
        ));
        assert!(matches!(
            LatticeAbc::new([3.0, 5.0, 10.0], [PI, FRAC_PI_2, FRAC_PI_2]),
            Err(XrdError::MalformedLattice { .. })
        ));
    }

    #[test]
    fn cell_to_abc_recovers_lengths_and_angles() {
        let cell = [[3.0, 0.0, 0.0], [0.0, 5.0, 0.0], [0.0, 0.0, 10.0]];
        let lattice = cell_to_abc(&cell).expect("orthorhombic cell");
        assert_eq!(lattice.lengths, [3.0, 5.0, 10.0]);
        for angle in lattice.angles {
            assert!((angle - FRAC_PI_2).abs() < 1.0e-12);
        }
    }

    #[test]
    fn cell_to_abc_rejects_zero_rows() {
        let cell = [[3.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 0.0, 10.0]];
        assert!(matches!(
            cell_to_abc(&cell),
            Err(XrdError::MalformedLattice { .. })
        ));
    }

    #[test]
    fn orthorhombic_inv_d_matches_closed_form() {
        // 1/d^2 = (h/a)^2 + (k/b)^2 + (l/c)^2 for right-angle cells.
        let lattice = orthorhombic(3.0, 5.0, 10.0);
        let matrix = inv_d_squared_matrix(&lattice).expect("invertible metric");

        let inv_d = inv_d_for_hkl(&matrix, Hkl::new(1, 2, 3));
        let expected = ((1.0 / 3.0f64).powi(2) + (2.0 / 5.0f64).powi(2) + (3.0 / 10.0f64).powi(2))
            .sqrt();
        assert!((inv_d - expected).abs() < 1.0e-12);
    }

    #[test]
    fn monoclinic_metric_is_symmetric_and_positive() {
        let lattice =
            LatticeAbc::new([4.0, 6.0, 8.0], [FRAC_PI_2, 1.9, FRAC_PI_2]).expect("monoclinic");
        let matrix = inv_d_squared_matrix(&lattice).expect("invertible metric");
        for i in 0..3 {
            assert!(matrix[i][i] > 0.0);
            for j in 0..3 {
                assert!((matrix[i][j] - matrix[j][i]).abs() < 1.0e-12);
            }
        }
    }

    #[test]
    fn search_bounds_cover_the_inv_d_sphere() {
        let lattice = orthorhombic(3.0, 5.0, 10.0);
        let inv_d_max = 2.0 / 1.54056;
        let bounds = minimum_search_bounds(inv_d_max, &lattice);
        assert_eq!(bounds, [4, 7, 13]);

        // Every boundary-exceeding index must already violate inv_d < inv_d_max.
        let matrix = inv_d_squared_matrix(&lattice).expect("invertible metric");
        for (axis, &bound) in bounds.iter().enumerate() {
            let mut hkl = [0; 3];
            hkl[axis] = bound + 1;
            let inv_d = inv_d_for_hkl(&matrix, Hkl::new(hkl[0], hkl[1], hkl[2]));
            assert!(inv_d >= inv_d_max);
        }
    }
}
