//! Quadrature rules on finite element reference domains.
//!
//! All rules are plain `f64` data: a list of weights and a list of points. The reference
//! domains are
//!
//! - the interval `[-1, 1]`,
//! - the quadrilateral `[-1, 1]^2` and the hexahedron `[-1, 1]^3`,
//! - the triangle with vertices `(0, 0)`, `(1, 0)`, `(0, 1)`,
//! - the tetrahedron with vertices `(0, 0, 0)`, `(1, 0, 0)`, `(0, 1, 0)`, `(0, 0, 1)`.
//!
//! Rules can either be requested by number of points (see [`univariate`], [`tensor`] and
//! [`simplex`]) or by the polynomial strength they must integrate exactly (see [`strength`]).

use std::fmt;
use std::fmt::{Display, Formatter};

pub mod simplex;
pub mod strength;
pub mod tensor;
pub mod univariate;

/// Library-wide error type.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// Indicates that a rule satisfying the given requirements is not available.
    NoRuleAvailable,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoRuleAvailable => {
                write!(f, "There is no quadrature rule satisfying the requirements available")
            }
        }
    }
}

impl std::error::Error for Error {}

/// A D-dimensional point.
pub type Point<const D: usize> = [f64; D];

/// A D-dimensional rule given as `(weights, points)`.
pub type Rule<const D: usize> = (Vec<f64>, Vec<Point<D>>);

/// A one-dimensional rule.
pub type Rule1d = Rule<1>;

/// A two-dimensional rule.
pub type Rule2d = Rule<2>;

/// A three-dimensional rule.
pub type Rule3d = Rule<3>;

/// Approximates the integral of `f` with the given rule.
pub fn integrate<const D: usize>(rule: &Rule<D>, f: impl Fn(&Point<D>) -> f64) -> f64 {
    let (weights, points) = rule;
    weights
        .iter()
        .zip(points)
        .map(|(w, p)| w * f(p))
        .sum()
}
