//! Triangle elements on the reference triangle with vertices (0, 0), (1, 0), (0, 1).
//!
//! The barycentric coordinates are $\lambda_0 = 1 - \xi - \eta$, $\lambda_1 = \xi$ and
//! $\lambda_2 = \eta$. TRI6 numbers the midpoints of edges (0, 1), (1, 2), (2, 0) after the
//! vertices.
use super::{impl_reference_element, SimplexLagrange};
use crate::connectivity::TRI_EDGES;

#[rustfmt::skip]
pub const TRI3_NODES: [[f64; 2]; 3] = [
    [0.0, 0.0],
    [1.0, 0.0],
    [0.0, 1.0],
];

#[rustfmt::skip]
pub const TRI6_NODES: [[f64; 2]; 6] = [
    [0.0, 0.0],
    [1.0, 0.0],
    [0.0, 1.0],
    [0.5, 0.0],
    [0.5, 0.5],
    [0.0, 0.5],
];

const TRI3_LAGRANGE: SimplexLagrange = SimplexLagrange {
    dimension: 2,
    edges: &TRI_EDGES,
    quadratic: false,
};

const TRI6_LAGRANGE: SimplexLagrange = SimplexLagrange {
    dimension: 2,
    edges: &TRI_EDGES,
    quadratic: true,
};

/// Three-node linear triangle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Tri3Element;

/// Six-node quadratic triangle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Tri6Element;

impl_reference_element!(Tri3Element, TRI3_LAGRANGE);
impl_reference_element!(Tri6Element, TRI6_LAGRANGE);
