//! Quadrature rules on the reference elements.
//!
//! Rules are returned as a weight vector and a `dimension x num_points` point matrix in the
//! reference coordinates documented in [`crate::element`].
use nalgebra::{convert, DMatrix, DVector};
use serde::{Deserialize, Serialize};

use fenlink_quadrature::strength;
use fenlink_quadrature::Rule;

use crate::element::{ElementType, GeometryType};
use crate::Real;

pub mod facet;

/// Errors returned by quadrature methods.
pub use fenlink_quadrature::Error as QuadratureError;

/// Family of quadrature rules.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntegrationScheme {
    /// Gauss–Legendre rules, collapsed onto simplices.
    #[default]
    Gauss,
}

/// Weights and points of a quadrature rule.
pub type Intpoints<T> = (DVector<T>, DMatrix<T>);

/// The quadrature rule of the given scheme on a reference shape, exact for polynomials of
/// degree `order`.
pub fn intpoints<T: Real>(
    scheme: IntegrationScheme,
    geometry: GeometryType,
    order: usize,
) -> Result<Intpoints<T>, QuadratureError> {
    match scheme {
        IntegrationScheme::Gauss => match geometry {
            GeometryType::Line => strength::line(order).map(convert_rule),
            GeometryType::Tri => strength::triangle(order).map(convert_rule),
            GeometryType::Quad => strength::quadrilateral(order).map(convert_rule),
            GeometryType::Tet => strength::tetrahedron(order).map(convert_rule),
            GeometryType::Penta => strength::prism(order).map(convert_rule),
            GeometryType::Hex => strength::hexahedron(order).map(convert_rule),
        },
    }
}

/// Default quadrature order for an element type, twice its interpolation degree.
pub fn default_order(element_type: ElementType) -> usize {
    2 * element_type.interpolation_order().degree()
}

fn convert_rule<T: Real, const D: usize>((weights, points): Rule<D>) -> Intpoints<T> {
    let weights = DVector::from_iterator(weights.len(), weights.into_iter().map(convert));
    let points = DMatrix::from_fn(D, points.len(), |i, j| convert(points[j][i]));
    (weights, points)
}
