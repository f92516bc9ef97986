//! Quadrature rules for quadrilaterals and hexahedra formed as tensor products of
//! one-dimensional Gauss rules.
//!
//! The last coordinate varies fastest.

use crate::univariate::gauss;
use crate::Rule;

/// A Gauss rule on `[-1, 1]^2` with the given number of points per dimension.
pub fn quadrilateral_gauss(num_points_per_dim: usize) -> Rule<2> {
    let n = num_points_per_dim;
    let (weights1d, points1d) = gauss(n);
    let mut weights = Vec::with_capacity(n * n);
    let mut points = Vec::with_capacity(n * n);

    for (&wx, &[x]) in weights1d.iter().zip(&points1d) {
        for (&wy, &[y]) in weights1d.iter().zip(&points1d) {
            weights.push(wx * wy);
            points.push([x, y]);
        }
    }

    (weights, points)
}

/// A Gauss rule on `[-1, 1]^3` with the given number of points per dimension.
pub fn hexahedron_gauss(num_points_per_dim: usize) -> Rule<3> {
    let n = num_points_per_dim;
    let (weights2d, points2d) = quadrilateral_gauss(n);
    let (weights1d, points1d) = gauss(n);
    let mut weights = Vec::with_capacity(n * n * n);
    let mut points = Vec::with_capacity(n * n * n);

    for (&wxy, &[x, y]) in weights2d.iter().zip(&points2d) {
        for (&wz, &[z]) in weights1d.iter().zip(&points1d) {
            weights.push(wxy * wz);
            points.push([x, y, z]);
        }
    }

    (weights, points)
}
