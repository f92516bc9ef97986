//! Quadrilateral elements on the reference square $[-1, 1]^2$.
//!
//! Corners are numbered counter-clockwise starting at (-1, -1). QUAD9 numbers the midpoints of
//! edges (0, 1), (1, 2), (2, 3), (3, 0) after the corners and the centre last.
use super::{impl_reference_element, TensorLagrange};

#[rustfmt::skip]
pub const QUAD4_NODES: [[f64; 2]; 4] = [
    [-1.0, -1.0],
    [ 1.0, -1.0],
    [ 1.0,  1.0],
    [-1.0,  1.0],
];

#[rustfmt::skip]
pub const QUAD9_NODES: [[f64; 2]; 9] = [
    [-1.0, -1.0],
    [ 1.0, -1.0],
    [ 1.0,  1.0],
    [-1.0,  1.0],
    [ 0.0, -1.0],
    [ 1.0,  0.0],
    [ 0.0,  1.0],
    [-1.0,  0.0],
    [ 0.0,  0.0],
];

const QUAD4_LAGRANGE: TensorLagrange<2> = TensorLagrange {
    nodes: &QUAD4_NODES,
    quadratic: false,
};

const QUAD9_LAGRANGE: TensorLagrange<2> = TensorLagrange {
    nodes: &QUAD9_NODES,
    quadratic: true,
};

/// Four-node bilinear quadrilateral.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Quad4Element;

/// Nine-node biquadratic quadrilateral.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Quad9Element;

impl_reference_element!(Quad4Element, QUAD4_LAGRANGE);
impl_reference_element!(Quad9Element, QUAD9_LAGRANGE);
