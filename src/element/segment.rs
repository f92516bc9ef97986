//! Line elements on the reference interval [-1, 1].
//!
//! The LINE3 midpoint node is numbered last.
use super::{impl_reference_element, TensorLagrange};

pub const LINE2_NODES: [[f64; 1]; 2] = [[-1.0], [1.0]];

pub const LINE3_NODES: [[f64; 1]; 3] = [[-1.0], [1.0], [0.0]];

const LINE2_LAGRANGE: TensorLagrange<1> = TensorLagrange {
    nodes: &LINE2_NODES,
    quadratic: false,
};

const LINE3_LAGRANGE: TensorLagrange<1> = TensorLagrange {
    nodes: &LINE3_NODES,
    quadratic: true,
};

/// Two-node linear line element.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Line2Element;

/// Three-node quadratic line element.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Line3Element;

impl_reference_element!(Line2Element, LINE2_LAGRANGE);
impl_reference_element!(Line3Element, LINE3_LAGRANGE);
