//! Collapsed-coordinate (Duffy) rules for the reference triangle and tetrahedron.
//!
//! A Gauss rule on the unit square (cube) is mapped onto the simplex by collapsing one edge
//! (face) onto a vertex. The rules have positive weights and all points strictly inside the
//! simplex, but they are not symmetric.

use crate::univariate::gauss_unit;
use crate::Rule;

/// Collapsed rule with `n` points per direction on the triangle `(0,0), (1,0), (0,1)`.
///
/// Integrates polynomials of total degree up to `2n - 2` exactly.
pub fn triangle_collapsed(num_points_per_dim: usize) -> Rule<2> {
    let n = num_points_per_dim;
    let (weights1d, points1d) = gauss_unit(n);
    let mut weights = Vec::with_capacity(n * n);
    let mut points = Vec::with_capacity(n * n);

    for (&wu, &[u]) in weights1d.iter().zip(&points1d) {
        for (&wv, &[v]) in weights1d.iter().zip(&points1d) {
            weights.push(wu * wv * (1.0 - u));
            points.push([u, v * (1.0 - u)]);
        }
    }

    (weights, points)
}

/// Collapsed rule with `n` points per direction on the tetrahedron
/// `(0,0,0), (1,0,0), (0,1,0), (0,0,1)`.
///
/// Integrates polynomials of total degree up to `2n - 3` exactly.
pub fn tetrahedron_collapsed(num_points_per_dim: usize) -> Rule<3> {
    let n = num_points_per_dim;
    let (weights1d, points1d) = gauss_unit(n);
    let mut weights = Vec::with_capacity(n * n * n);
    let mut points = Vec::with_capacity(n * n * n);

    for (&wu, &[u]) in weights1d.iter().zip(&points1d) {
        for (&wv, &[v]) in weights1d.iter().zip(&points1d) {
            for (&ww, &[w]) in weights1d.iter().zip(&points1d) {
                let jacobian = (1.0 - u) * (1.0 - u) * (1.0 - v);
                weights.push(wu * wv * ww * jacobian);
                points.push([u, v * (1.0 - u), w * (1.0 - u) * (1.0 - v)]);
            }
        }
    }

    (weights, points)
}
