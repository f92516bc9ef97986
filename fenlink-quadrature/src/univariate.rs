//! Quadrature rules for one-dimensional domains.

use crate::Rule;
use std::f64::consts::PI;

/// Legendre polynomial `p_n` and its predecessor `p_{n-1}` evaluated at `x`.
///
/// Derivatives are only available in the open interval (-1, 1).
#[derive(Debug, Default)]
struct Legendre {
    n: usize,
    x: f64,
    p_n: f64,
    p_n_minus_1: f64,
}

impl Legendre {
    fn evaluate(n: usize, x: f64) -> Self {
        // m P_m(x) = (2m - 1) x P_{m-1}(x) - (m - 1) P_{m-2}(x)
        let mut current = 1.0;
        let mut previous = 0.0;
        for m in 1..=n {
            let m = m as f64;
            let next = ((2.0 * m - 1.0) * x * current - (m - 1.0) * previous) / m;
            previous = current;
            current = next;
        }

        Self {
            n,
            x,
            p_n: current,
            p_n_minus_1: previous,
        }
    }

    fn derivative(&self) -> f64 {
        let n = self.n as f64;
        n * (self.x * self.p_n - self.p_n_minus_1) / (self.x * self.x - 1.0)
    }
}

/// Gauss–Legendre quadrature on the reference interval `[-1, 1]`.
///
/// A rule with `n` points integrates polynomials of degree up to `2n - 1` exactly.
/// Points are returned in ascending order.
///
/// # Panics
///
/// Panics if zero points are requested.
pub fn gauss(num_points: usize) -> Rule<1> {
    let n = num_points;
    assert!(n > 0, "number of points must be positive");

    let half = (n + 1) / 2;
    let mut roots = Vec::with_capacity(half);

    // Newton iteration from the Chebyshev-like initial guess. Only the roots in [0, 1)
    // are computed, the rest follow from symmetry.
    for i in 0..half {
        let mut x = (PI * (i as f64 + 0.75) / (n as f64 + 0.5)).cos();
        let mut iterations = 0;
        loop {
            let legendre = Legendre::evaluate(n, x);
            let dx = -legendre.p_n / legendre.derivative();
            x += dx;
            iterations += 1;
            if dx.abs() <= 1e-15 || iterations >= 100 {
                break;
            }
        }
        let dp = Legendre::evaluate(n, x).derivative();
        roots.push((x, 2.0 / ((1.0 - x * x) * dp * dp)));
    }

    let mut weights = Vec::with_capacity(n);
    let mut points = Vec::with_capacity(n);
    // roots are in descending order, so the mirrored ones come first
    for &(x, w) in roots.iter() {
        points.push([-x]);
        weights.push(w);
    }
    let num_mirrored = n / 2;
    for &(x, w) in roots.iter().take(num_mirrored).rev() {
        points.push([x]);
        weights.push(w);
    }
    if n % 2 == 1 {
        // The middle root was pushed once, mirrored, as -x. Snap it to exactly zero.
        points[half - 1] = [0.0];
    }

    assert_eq!(points.len(), n, "Internal error: incorrect number of points produced");
    (weights, points)
}

/// Gauss–Legendre quadrature on the unit interval `[0, 1]`.
pub fn gauss_unit(num_points: usize) -> Rule<1> {
    let (weights, points) = gauss(num_points);
    let weights = weights.into_iter().map(|w| 0.5 * w).collect();
    let points = points.into_iter().map(|[x]| [0.5 * (x + 1.0)]).collect();
    (weights, points)
}
