//! Reference elements and their shape functions.
//!
//! Every element type provides its shape functions $N_i$, their first parametric derivatives
//! $\partial N_i / \partial \xi_j$ and their second parametric derivatives in Voigt order
//! (see [`hessian_components`]). Coordinate conventions are documented on each element module.
use nalgebra::{convert, DMatrix};
use numeric_literals::replace_float_literals;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Display, Formatter};

use crate::Real;

mod hexahedron;
mod prism;
mod quadrilateral;
mod segment;
mod tetrahedron;
mod triangle;

pub use hexahedron::*;
pub use prism::*;
pub use quadrilateral::*;
pub use segment::*;
pub use tetrahedron::*;
pub use triangle::*;

/// The shape of a reference element.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GeometryType {
    Line,
    Tri,
    Quad,
    Tet,
    Penta,
    Hex,
}

impl GeometryType {
    /// Parametric dimension of the shape.
    pub fn dimension(&self) -> usize {
        match self {
            Self::Line => 1,
            Self::Tri | Self::Quad => 2,
            Self::Tet | Self::Penta | Self::Hex => 3,
        }
    }

    /// Number of distinct ways two neighbours can enumerate a shared facet of this shape.
    ///
    /// Only meaningful for shapes that occur as facets.
    pub fn num_orientations(&self) -> usize {
        match self {
            Self::Line => 1,
            Self::Tri => 3,
            Self::Quad => 4,
            Self::Tet | Self::Penta | Self::Hex => 1,
        }
    }

    /// Whether the shape is a simplex, i.e. whether it is parametrized by barycentric coordinates.
    pub fn is_simplex(&self) -> bool {
        matches!(self, Self::Tri | Self::Tet)
    }
}

impl Display for GeometryType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Line => "LINE",
            Self::Tri => "TRI",
            Self::Quad => "QUAD",
            Self::Tet => "TET",
            Self::Penta => "PENTA",
            Self::Hex => "HEX",
        };
        write!(f, "{}", name)
    }
}

/// Polynomial interpolation order of a Lagrange element.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum InterpolationOrder {
    Linear,
    Quadratic,
}

impl InterpolationOrder {
    pub fn degree(&self) -> usize {
        match self {
            Self::Linear => 1,
            Self::Quadratic => 2,
        }
    }
}

/// The supported Lagrange element types.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ElementType {
    Line2,
    Line3,
    Tri3,
    Tri6,
    Quad4,
    Quad9,
    Tet4,
    Tet10,
    Penta6,
    Hex8,
    Hex27,
}

impl ElementType {
    pub fn geometry(&self) -> GeometryType {
        match self {
            Self::Line2 | Self::Line3 => GeometryType::Line,
            Self::Tri3 | Self::Tri6 => GeometryType::Tri,
            Self::Quad4 | Self::Quad9 => GeometryType::Quad,
            Self::Tet4 | Self::Tet10 => GeometryType::Tet,
            Self::Penta6 => GeometryType::Penta,
            Self::Hex8 | Self::Hex27 => GeometryType::Hex,
        }
    }

    pub fn interpolation_order(&self) -> InterpolationOrder {
        match self {
            Self::Line2 | Self::Tri3 | Self::Quad4 | Self::Tet4 | Self::Penta6 | Self::Hex8 => {
                InterpolationOrder::Linear
            }
            Self::Line3 | Self::Tri6 | Self::Quad9 | Self::Tet10 | Self::Hex27 => InterpolationOrder::Quadratic,
        }
    }

    /// Looks up the element type with the given shape and interpolation order.
    pub fn from_geometry(geometry: GeometryType, order: InterpolationOrder) -> Option<Self> {
        use GeometryType::*;
        use InterpolationOrder::*;
        match (geometry, order) {
            (Line, Linear) => Some(Self::Line2),
            (Line, Quadratic) => Some(Self::Line3),
            (Tri, Linear) => Some(Self::Tri3),
            (Tri, Quadratic) => Some(Self::Tri6),
            (Quad, Linear) => Some(Self::Quad4),
            (Quad, Quadratic) => Some(Self::Quad9),
            (Tet, Linear) => Some(Self::Tet4),
            (Tet, Quadratic) => Some(Self::Tet10),
            (Penta, Linear) => Some(Self::Penta6),
            (Penta, Quadratic) => None,
            (Hex, Linear) => Some(Self::Hex8),
            (Hex, Quadratic) => Some(Self::Hex27),
        }
    }

    /// The linear element with the same shape.
    pub fn linear(&self) -> Self {
        Self::from_geometry(self.geometry(), InterpolationOrder::Linear)
            .expect("Every geometry type has a linear element")
    }

    pub fn dimension(&self) -> usize {
        self.geometry().dimension()
    }

    pub fn num_nodes(&self) -> usize {
        match self {
            Self::Line2 => 2,
            Self::Line3 => 3,
            Self::Tri3 => 3,
            Self::Tri6 => 6,
            Self::Quad4 => 4,
            Self::Quad9 => 9,
            Self::Tet4 => 4,
            Self::Tet10 => 10,
            Self::Penta6 => 6,
            Self::Hex8 => 8,
            Self::Hex27 => 27,
        }
    }

    pub fn num_corner_nodes(&self) -> usize {
        self.linear().num_nodes()
    }

    /// Reference coordinates of the nodes, one column per node.
    pub fn reference_coordinates<T: Real>(&self) -> DMatrix<T> {
        match self {
            Self::Line2 => columns_from_table(&LINE2_NODES),
            Self::Line3 => columns_from_table(&LINE3_NODES),
            Self::Tri3 => columns_from_table(&TRI3_NODES),
            Self::Tri6 => columns_from_table(&TRI6_NODES),
            Self::Quad4 => columns_from_table(&QUAD4_NODES),
            Self::Quad9 => columns_from_table(&QUAD9_NODES),
            Self::Tet4 => columns_from_table(&TET4_NODES),
            Self::Tet10 => columns_from_table(&TET10_NODES),
            Self::Penta6 => columns_from_table(&PENTA6_NODES),
            Self::Hex8 => columns_from_table(&HEX8_NODES),
            Self::Hex27 => columns_from_table(&HEX27_NODES),
        }
    }

    fn reference_element<T: Real>(&self) -> &'static dyn ReferenceFiniteElement<T> {
        match self {
            Self::Line2 => &Line2Element,
            Self::Line3 => &Line3Element,
            Self::Tri3 => &Tri3Element,
            Self::Tri6 => &Tri6Element,
            Self::Quad4 => &Quad4Element,
            Self::Quad9 => &Quad9Element,
            Self::Tet4 => &Tet4Element,
            Self::Tet10 => &Tet10Element,
            Self::Penta6 => &Penta6Element,
            Self::Hex8 => &Hex8Element,
            Self::Hex27 => &Hex27Element,
        }
    }
}

impl Display for ElementType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Line2 => "LINE2",
            Self::Line3 => "LINE3",
            Self::Tri3 => "TRI3",
            Self::Tri6 => "TRI6",
            Self::Quad4 => "QUAD4",
            Self::Quad9 => "QUAD9",
            Self::Tet4 => "TET4",
            Self::Tet10 => "TET10",
            Self::Penta6 => "PENTA6",
            Self::Hex8 => "HEX8",
            Self::Hex27 => "HEX27",
        };
        write!(f, "{}", name)
    }
}

/// A reference element with shape functions and their first and second parametric derivatives.
///
/// All `populate_*` methods panic if the output does not have the expected shape, i.e.
/// `num_nodes` entries for the basis, `dimension x num_nodes` for the gradients and
/// `num_hessian_components x num_nodes` for the second derivatives.
pub trait ReferenceFiniteElement<T: Real> {
    fn num_nodes(&self) -> usize;

    fn dimension(&self) -> usize;

    fn populate_basis(&self, basis: &mut [T], xi: &[T]);

    fn populate_basis_gradients(&self, gradients: &mut DMatrix<T>, xi: &[T]);

    fn populate_basis_hessians(&self, hessians: &mut DMatrix<T>, xi: &[T]);
}

impl<T: Real> ReferenceFiniteElement<T> for ElementType {
    fn num_nodes(&self) -> usize {
        ElementType::num_nodes(self)
    }

    fn dimension(&self) -> usize {
        ElementType::dimension(self)
    }

    fn populate_basis(&self, basis: &mut [T], xi: &[T]) {
        self.reference_element::<T>().populate_basis(basis, xi)
    }

    fn populate_basis_gradients(&self, gradients: &mut DMatrix<T>, xi: &[T]) {
        self.reference_element::<T>()
            .populate_basis_gradients(gradients, xi)
    }

    fn populate_basis_hessians(&self, hessians: &mut DMatrix<T>, xi: &[T]) {
        self.reference_element::<T>()
            .populate_basis_hessians(hessians, xi)
    }
}

/// Index pairs `(i, j)` of the second derivatives $\partial^2 / \partial \xi_i \partial \xi_j$
/// stored as rows of a Hessian matrix, in Voigt order.
pub fn hessian_components(dimension: usize) -> &'static [(usize, usize)] {
    match dimension {
        1 => &[(0, 0)],
        2 => &[(0, 0), (1, 1), (0, 1)],
        3 => &[(0, 0), (1, 1), (2, 2), (1, 2), (0, 2), (0, 1)],
        _ => panic!("Unsupported parametric dimension {}", dimension),
    }
}

/// Implements [`ReferenceFiniteElement`] for a unit struct by forwarding to a constant
/// Lagrange element description.
macro_rules! impl_reference_element {
    ($element:ident, $lagrange:expr) => {
        impl<T: crate::Real> crate::element::ReferenceFiniteElement<T> for $element {
            fn num_nodes(&self) -> usize {
                crate::element::ReferenceFiniteElement::<T>::num_nodes(&$lagrange)
            }

            fn dimension(&self) -> usize {
                crate::element::ReferenceFiniteElement::<T>::dimension(&$lagrange)
            }

            fn populate_basis(&self, basis: &mut [T], xi: &[T]) {
                crate::element::ReferenceFiniteElement::<T>::populate_basis(&$lagrange, basis, xi)
            }

            fn populate_basis_gradients(&self, gradients: &mut nalgebra::DMatrix<T>, xi: &[T]) {
                crate::element::ReferenceFiniteElement::<T>::populate_basis_gradients(&$lagrange, gradients, xi)
            }

            fn populate_basis_hessians(&self, hessians: &mut nalgebra::DMatrix<T>, xi: &[T]) {
                crate::element::ReferenceFiniteElement::<T>::populate_basis_hessians(&$lagrange, hessians, xi)
            }
        }
    };
}

pub(crate) use impl_reference_element;

fn columns_from_table<T: Real, const D: usize>(table: &[[f64; D]]) -> DMatrix<T> {
    DMatrix::from_fn(D, table.len(), |i, j| convert(table[j][i]))
}

fn assert_output_shapes<T: Real>(element: &dyn ReferenceFiniteElement<T>, rows: usize, output: &DMatrix<T>, xi: &[T]) {
    assert_eq!(xi.len(), element.dimension(), "Reference coordinate has wrong dimension.");
    assert_eq!(output.nrows(), rows, "Output matrix has wrong number of rows.");
    assert_eq!(output.ncols(), element.num_nodes(), "Output matrix must have one column per node.");
}

/// Linear Lagrange polynomial on [-1, 1] associated with the node at `alpha` (-1 or 1).
#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
#[inline(always)]
fn phi_linear_1d<T: Real>(alpha: T, xi: T) -> T {
    (1.0 + alpha * xi) / 2.0
}

#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
#[inline(always)]
fn phi_linear_1d_grad<T: Real>(alpha: T) -> T {
    alpha / 2.0
}

/// Quadratic Lagrange polynomial on [-1, 1] associated with the node at `alpha` (-1, 0 or 1).
#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
#[inline(always)]
fn phi_quadratic_1d<T: Real>(alpha: T, xi: T) -> T {
    let alpha2 = alpha * alpha;
    (3.0 / 2.0 * alpha2 - 1.0) * xi * xi + 0.5 * alpha * xi + 1.0 - alpha2
}

#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
#[inline(always)]
fn phi_quadratic_1d_grad<T: Real>(alpha: T, xi: T) -> T {
    let alpha2 = alpha * alpha;
    2.0 * (3.0 / 2.0 * alpha2 - 1.0) * xi + 0.5 * alpha
}

#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
#[inline(always)]
fn phi_quadratic_1d_grad2<T: Real>(alpha: T) -> T {
    3.0 * alpha * alpha - 2.0
}

/// Values, first and second derivatives of the 1D factors of a tensor-product Lagrange
/// basis function.
fn tensor_factor<T: Real>(quadratic: bool, alpha: f64, xi: T) -> [T; 3] {
    let alpha: T = convert(alpha);
    if quadratic {
        [
            phi_quadratic_1d(alpha, xi),
            phi_quadratic_1d_grad(alpha, xi),
            phi_quadratic_1d_grad2(alpha),
        ]
    } else {
        [phi_linear_1d(alpha, xi), phi_linear_1d_grad(alpha), T::zero()]
    }
}

/// Tensor-product Lagrange element on $[-1, 1]^D$ whose nodes are given by a coordinate table.
///
/// Lines, quadrilaterals and hexahedra of both orders are all instances of this.
pub(crate) struct TensorLagrange<const D: usize> {
    pub nodes: &'static [[f64; D]],
    pub quadratic: bool,
}

impl<const D: usize> TensorLagrange<D> {
    /// Evaluates the factor table `factors[node][axis][derivative order]`.
    fn factors<T: Real>(&self, xi: &[T]) -> Vec<[[T; 3]; D]> {
        assert_eq!(xi.len(), D, "Reference coordinate has wrong dimension.");
        self.nodes
            .iter()
            .map(|node| {
                let mut factors = [[T::zero(); 3]; D];
                for axis in 0..D {
                    factors[axis] = tensor_factor(self.quadratic, node[axis], xi[axis]);
                }
                factors
            })
            .collect()
    }

    /// Product over all axes, where `order[axis]` selects value, first or second derivative.
    fn product<T: Real>(factors: &[[T; 3]; D], order: [usize; D]) -> T {
        (0..D).fold(T::one(), |acc, axis| acc * factors[axis][order[axis]])
    }
}

impl<T: Real, const D: usize> ReferenceFiniteElement<T> for TensorLagrange<D> {
    fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    fn dimension(&self) -> usize {
        D
    }

    fn populate_basis(&self, basis: &mut [T], xi: &[T]) {
        assert_eq!(basis.len(), self.nodes.len(), "Basis buffer must have one entry per node.");
        for (value, factors) in basis.iter_mut().zip(self.factors(xi)) {
            *value = Self::product(&factors, [0; D]);
        }
    }

    fn populate_basis_gradients(&self, gradients: &mut DMatrix<T>, xi: &[T]) {
        assert_output_shapes(self, D, gradients, xi);
        for (node, factors) in self.factors(xi).iter().enumerate() {
            for axis in 0..D {
                let mut order = [0; D];
                order[axis] = 1;
                gradients[(axis, node)] = Self::product(factors, order);
            }
        }
    }

    fn populate_basis_hessians(&self, hessians: &mut DMatrix<T>, xi: &[T]) {
        let components = hessian_components(D);
        assert_output_shapes(self, components.len(), hessians, xi);
        for (node, factors) in self.factors(xi).iter().enumerate() {
            for (row, &(i, j)) in components.iter().enumerate() {
                let mut order = [0; D];
                order[i] += 1;
                order[j] += 1;
                hessians[(row, node)] = Self::product(factors, order);
            }
        }
    }
}

/// Gradient of barycentric coordinate `lambda_i` with respect to reference coordinate `axis`.
///
/// For simplices, `lambda_0 = 1 - sum(xi)` and `lambda_i = xi_{i-1}` for `i > 0`.
fn barycentric_gradient<T: Real>(i: usize, axis: usize) -> T {
    if i == 0 {
        -T::one()
    } else if i == axis + 1 {
        T::one()
    } else {
        T::zero()
    }
}

fn barycentric_coordinates<T: Real>(xi: &[T]) -> Vec<T> {
    let sum = xi.iter().fold(T::zero(), |acc, &x| acc + x);
    std::iter::once(T::one() - sum).chain(xi.iter().copied()).collect()
}

/// Lagrange element on a simplex, linear or quadratic.
///
/// Quadratic elements place one node at the midpoint of every edge in `edges`, numbered
/// after the vertices.
pub(crate) struct SimplexLagrange {
    pub dimension: usize,
    pub edges: &'static [[usize; 2]],
    pub quadratic: bool,
}

impl<T: Real> ReferenceFiniteElement<T> for SimplexLagrange {
    fn num_nodes(&self) -> usize {
        let vertices = self.dimension + 1;
        if self.quadratic {
            vertices + self.edges.len()
        } else {
            vertices
        }
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn populate_basis(&self, basis: &mut [T], xi: &[T]) {
        assert_eq!(basis.len(), ReferenceFiniteElement::<T>::num_nodes(self));
        assert_eq!(xi.len(), self.dimension, "Reference coordinate has wrong dimension.");
        let lambda = barycentric_coordinates(xi);
        if !self.quadratic {
            basis.copy_from_slice(&lambda);
            return;
        }
        for (i, &l) in lambda.iter().enumerate() {
            basis[i] = l * (2.0 * l - 1.0);
        }
        for (e, &[a, b]) in self.edges.iter().enumerate() {
            basis[lambda.len() + e] = 4.0 * lambda[a] * lambda[b];
        }
    }

    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn populate_basis_gradients(&self, gradients: &mut DMatrix<T>, xi: &[T]) {
        assert_output_shapes(self, self.dimension, gradients, xi);
        let lambda = barycentric_coordinates(xi);
        for axis in 0..self.dimension {
            for (i, &l) in lambda.iter().enumerate() {
                let dl = barycentric_gradient::<T>(i, axis);
                gradients[(axis, i)] = if self.quadratic { (4.0 * l - 1.0) * dl } else { dl };
            }
            if self.quadratic {
                for (e, &[a, b]) in self.edges.iter().enumerate() {
                    let da = barycentric_gradient::<T>(a, axis);
                    let db = barycentric_gradient::<T>(b, axis);
                    gradients[(axis, lambda.len() + e)] = 4.0 * (lambda[b] * da + lambda[a] * db);
                }
            }
        }
    }

    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn populate_basis_hessians(&self, hessians: &mut DMatrix<T>, xi: &[T]) {
        let components = hessian_components(self.dimension);
        assert_output_shapes(self, components.len(), hessians, xi);
        // Barycentric coordinates are affine, so only quadratic elements have curvature
        hessians.fill(T::zero());
        if !self.quadratic {
            return;
        }
        let num_vertices = self.dimension + 1;
        for (row, &(p, q)) in components.iter().enumerate() {
            for i in 0..num_vertices {
                let di_p = barycentric_gradient::<T>(i, p);
                let di_q = barycentric_gradient::<T>(i, q);
                hessians[(row, i)] = 4.0 * di_p * di_q;
            }
            for (e, &[a, b]) in self.edges.iter().enumerate() {
                let da_p = barycentric_gradient::<T>(a, p);
                let da_q = barycentric_gradient::<T>(a, q);
                let db_p = barycentric_gradient::<T>(b, p);
                let db_q = barycentric_gradient::<T>(b, q);
                hessians[(row, num_vertices + e)] = 4.0 * (da_p * db_q + da_q * db_p);
            }
        }
    }
}
