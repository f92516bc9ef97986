//! The linear prism, the tensor product of the reference triangle and the interval [-1, 1].
//!
//! Nodes 0..3 form the bottom triangle (z = -1) and nodes 3..6 the top triangle (z = 1).
use nalgebra::DMatrix;
use numeric_literals::replace_float_literals;

use super::{assert_output_shapes, barycentric_coordinates, barycentric_gradient, hessian_components};
use super::ReferenceFiniteElement;
use crate::Real;

#[rustfmt::skip]
pub const PENTA6_NODES: [[f64; 3]; 6] = [
    [0.0, 0.0, -1.0],
    [1.0, 0.0, -1.0],
    [0.0, 1.0, -1.0],
    [0.0, 0.0,  1.0],
    [1.0, 0.0,  1.0],
    [0.0, 1.0,  1.0],
];

/// Six-node linear prism.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Penta6Element;

/// Linear factor in the extrusion direction for the bottom (`top == false`) or top layer,
/// together with its derivative.
#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
fn extrusion_factor<T: Real>(top: bool, zeta: T) -> (T, T) {
    if top {
        ((1.0 + zeta) / 2.0, 0.5)
    } else {
        ((1.0 - zeta) / 2.0, -0.5)
    }
}

impl<T: Real> ReferenceFiniteElement<T> for Penta6Element {
    fn num_nodes(&self) -> usize {
        6
    }

    fn dimension(&self) -> usize {
        3
    }

    fn populate_basis(&self, basis: &mut [T], xi: &[T]) {
        assert_eq!(basis.len(), 6, "Basis buffer must have one entry per node.");
        assert_eq!(xi.len(), 3, "Reference coordinate has wrong dimension.");
        let lambda = barycentric_coordinates(&xi[..2]);
        for node in 0..6 {
            let (h, _) = extrusion_factor(node >= 3, xi[2]);
            basis[node] = lambda[node % 3] * h;
        }
    }

    fn populate_basis_gradients(&self, gradients: &mut DMatrix<T>, xi: &[T]) {
        assert_output_shapes(self, 3, gradients, xi);
        let lambda = barycentric_coordinates(&xi[..2]);
        for node in 0..6 {
            let i = node % 3;
            let (h, dh) = extrusion_factor(node >= 3, xi[2]);
            gradients[(0, node)] = barycentric_gradient::<T>(i, 0) * h;
            gradients[(1, node)] = barycentric_gradient::<T>(i, 1) * h;
            gradients[(2, node)] = lambda[i] * dh;
        }
    }

    fn populate_basis_hessians(&self, hessians: &mut DMatrix<T>, xi: &[T]) {
        let components = hessian_components(3);
        assert_output_shapes(self, components.len(), hessians, xi);
        for node in 0..6 {
            let i = node % 3;
            let (_, dh) = extrusion_factor(node >= 3, xi[2]);
            for (row, &(p, q)) in components.iter().enumerate() {
                // Only mixed in-plane/extrusion derivatives survive
                hessians[(row, node)] = match (p, q) {
                    (0, 2) | (2, 0) => barycentric_gradient::<T>(i, 0) * dh,
                    (1, 2) | (2, 1) => barycentric_gradient::<T>(i, 1) * dh,
                    _ => T::zero(),
                };
            }
        }
    }
}
