use log::debug;
use nalgebra::{DMatrix, DVector};

use crate::element::{hessian_components, ElementType, ReferenceFiniteElement};
use crate::quadrature::{intpoints, IntegrationScheme};
use crate::Real;

/// A quadrature rule together with the shape functions of an element type and their first
/// and second parametric derivatives, evaluated at every point.
///
/// For point `k`, [`n`](Self::n) is a `1 x num_nodes` row, [`dn_dxi`](Self::dn_dxi) is
/// `dimension x num_nodes` and [`d2n_dxi2`](Self::d2n_dxi2) holds the second derivatives in the
/// Voigt order of [`hessian_components`].
#[derive(Debug, Clone, PartialEq)]
pub struct IntegrationData<T: Real> {
    element_type: ElementType,
    scheme: IntegrationScheme,
    order: Option<usize>,
    weights: DVector<T>,
    points: DMatrix<T>,
    n: Vec<DMatrix<T>>,
    dn_dxi: Vec<DMatrix<T>>,
    d2n_dxi2: Vec<DMatrix<T>>,
}

impl<T: Real> IntegrationData<T> {
    /// Creates empty integration data for an element type.
    pub fn new(element_type: ElementType) -> Self {
        Self {
            element_type,
            scheme: IntegrationScheme::default(),
            order: None,
            weights: DVector::zeros(0),
            points: DMatrix::zeros(element_type.dimension(), 0),
            n: Vec::new(),
            dn_dxi: Vec::new(),
            d2n_dxi2: Vec::new(),
        }
    }

    /// Evaluates the shape functions at the points of the quadrature rule of the given order.
    ///
    /// Populating again with the same arguments reproduces the same data.
    pub fn populate(&mut self, scheme: IntegrationScheme, order: usize) -> eyre::Result<()> {
        let (weights, points) = intpoints(scheme, self.element_type.geometry(), order)?;
        self.populate_with(weights, points);
        self.scheme = scheme;
        self.order = Some(order);
        debug!(
            "Populated integration data for {} with {} points of order {}",
            self.element_type,
            self.weights.len(),
            order
        );
        Ok(())
    }

    /// Evaluates the shape functions at custom points, e.g. facet points mapped into the
    /// reference element.
    ///
    /// Panics if the points do not have the dimension of the element or the number of weights
    /// differs from the number of points.
    pub fn populate_with(&mut self, weights: DVector<T>, points: DMatrix<T>) {
        let element = self.element_type;
        let dim = element.dimension();
        let num_nodes = element.num_nodes();
        assert_eq!(points.nrows(), dim, "Points must have the dimension of the element.");
        assert_eq!(weights.len(), points.ncols(), "Need exactly one weight per point.");

        let num_components = hessian_components(dim).len();
        let mut basis = vec![T::zero(); num_nodes];
        self.n.clear();
        self.dn_dxi.clear();
        self.d2n_dxi2.clear();
        for k in 0..points.ncols() {
            let xi: Vec<T> = points.column(k).iter().copied().collect();
            element.populate_basis(&mut basis, &xi);
            self.n.push(DMatrix::from_row_slice(1, num_nodes, &basis));

            let mut gradients = DMatrix::zeros(dim, num_nodes);
            element.populate_basis_gradients(&mut gradients, &xi);
            self.dn_dxi.push(gradients);

            let mut hessians = DMatrix::zeros(num_components, num_nodes);
            element.populate_basis_hessians(&mut hessians, &xi);
            self.d2n_dxi2.push(hessians);
        }
        self.weights = weights;
        self.points = points;
        self.order = None;
    }

    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    pub fn scheme(&self) -> IntegrationScheme {
        self.scheme
    }

    /// The order of the rule, if the data was populated from a standard rule.
    pub fn order(&self) -> Option<usize> {
        self.order
    }

    pub fn is_populated(&self) -> bool {
        !self.n.is_empty()
    }

    pub fn num_points(&self) -> usize {
        self.weights.len()
    }

    pub fn weights(&self) -> &DVector<T> {
        &self.weights
    }

    /// Points as columns of a `dimension x num_points` matrix.
    pub fn points(&self) -> &DMatrix<T> {
        &self.points
    }

    pub fn n(&self, k: usize) -> &DMatrix<T> {
        &self.n[k]
    }

    pub fn dn_dxi(&self, k: usize) -> &DMatrix<T> {
        &self.dn_dxi[k]
    }

    pub fn d2n_dxi2(&self, k: usize) -> &DMatrix<T> {
        &self.d2n_dxi2[k]
    }
}
