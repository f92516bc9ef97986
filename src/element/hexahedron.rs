//! Hexahedral elements on the reference cube $[-1, 1]^3$.
//!
//! The corners of the bottom face (z = -1) are numbered counter-clockwise, followed by the
//! corners of the top face in the same order. HEX27 continues with the midpoints of the twelve
//! edges in the order of [`HEX_EDGES`](crate::connectivity::HEX_EDGES), then the centres of the
//! six facets in the order of [`HEX_FACETS`](crate::connectivity::HEX_FACETS), then the centre.
use super::{impl_reference_element, TensorLagrange};

#[rustfmt::skip]
pub const HEX8_NODES: [[f64; 3]; 8] = [
    [-1.0, -1.0, -1.0],
    [ 1.0, -1.0, -1.0],
    [ 1.0,  1.0, -1.0],
    [-1.0,  1.0, -1.0],
    [-1.0, -1.0,  1.0],
    [ 1.0, -1.0,  1.0],
    [ 1.0,  1.0,  1.0],
    [-1.0,  1.0,  1.0],
];

#[rustfmt::skip]
pub const HEX27_NODES: [[f64; 3]; 27] = [
    // Corners
    [-1.0, -1.0, -1.0],
    [ 1.0, -1.0, -1.0],
    [ 1.0,  1.0, -1.0],
    [-1.0,  1.0, -1.0],
    [-1.0, -1.0,  1.0],
    [ 1.0, -1.0,  1.0],
    [ 1.0,  1.0,  1.0],
    [-1.0,  1.0,  1.0],
    // Edge midpoints
    [ 0.0, -1.0, -1.0],
    [ 1.0,  0.0, -1.0],
    [ 0.0,  1.0, -1.0],
    [-1.0,  0.0, -1.0],
    [-1.0, -1.0,  0.0],
    [ 1.0, -1.0,  0.0],
    [ 1.0,  1.0,  0.0],
    [-1.0,  1.0,  0.0],
    [ 0.0, -1.0,  1.0],
    [ 1.0,  0.0,  1.0],
    [ 0.0,  1.0,  1.0],
    [-1.0,  0.0,  1.0],
    // Facet centres
    [ 0.0, -1.0,  0.0],
    [ 1.0,  0.0,  0.0],
    [ 0.0,  1.0,  0.0],
    [-1.0,  0.0,  0.0],
    [ 0.0,  0.0, -1.0],
    [ 0.0,  0.0,  1.0],
    // Centre
    [ 0.0,  0.0,  0.0],
];

const HEX8_LAGRANGE: TensorLagrange<3> = TensorLagrange {
    nodes: &HEX8_NODES,
    quadratic: false,
};

const HEX27_LAGRANGE: TensorLagrange<3> = TensorLagrange {
    nodes: &HEX27_NODES,
    quadratic: true,
};

/// Eight-node trilinear hexahedron.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Hex8Element;

/// 27-node triquadratic hexahedron.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Hex27Element;

impl_reference_element!(Hex8Element, HEX8_LAGRANGE);
impl_reference_element!(Hex27Element, HEX27_LAGRANGE);
