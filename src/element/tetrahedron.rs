//! Tetrahedral elements on the reference tetrahedron with vertices at the origin and the
//! three unit points.
//!
//! TET10 numbers the midpoints of the edges (0, 1), (1, 2), (2, 0), (0, 3), (1, 3), (2, 3)
//! after the vertices.
use super::{impl_reference_element, SimplexLagrange};
use crate::connectivity::TET_EDGES;

#[rustfmt::skip]
pub const TET4_NODES: [[f64; 3]; 4] = [
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
];

#[rustfmt::skip]
pub const TET10_NODES: [[f64; 3]; 10] = [
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
    [0.5, 0.0, 0.0],
    [0.5, 0.5, 0.0],
    [0.0, 0.5, 0.0],
    [0.0, 0.0, 0.5],
    [0.5, 0.0, 0.5],
    [0.0, 0.5, 0.5],
];

const TET4_LAGRANGE: SimplexLagrange = SimplexLagrange {
    dimension: 3,
    edges: &TET_EDGES,
    quadratic: false,
};

const TET10_LAGRANGE: SimplexLagrange = SimplexLagrange {
    dimension: 3,
    edges: &TET_EDGES,
    quadratic: true,
};

/// Four-node linear tetrahedron.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Tet4Element;

/// Ten-node quadratic tetrahedron.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Tet10Element;

impl_reference_element!(Tet4Element, TET4_LAGRANGE);
impl_reference_element!(Tet10Element, TET10_LAGRANGE);
