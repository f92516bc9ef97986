//! Quadrature on the facets of volume elements.
//!
//! A facet rule is computed once on the reference facet shape and then mapped into the
//! reference coordinates of the adjacent volume elements. On the master side the facet is
//! parametrized by the master's own corner order. The slave numbers the corners of the same
//! facet independently, so its map additionally depends on an orientation code that
//! relates the two corner sequences:
//!
//! Neighbours traverse a shared facet in opposite cyclic directions. With master corners
//! `M_0, ..., M_{n-1}`, the slave sees the corners `S_j = M_{(o + n - j) mod n}`, where the
//! orientation code `o` is the position of `M_0` in the slave sequence. Line facets only
//! admit `S = (M_1, M_0)`, which is orientation 0.
//!
//! With these maps, the `k`-th point of the master table and the `k`-th point of the slave
//! table are the same physical point. Weights refer to the reference facet and are therefore
//! shared by both sides.
use eyre::eyre;
use log::debug;
use nalgebra::{DMatrix, DVector};

use crate::connectivity;
use crate::element::{ElementType, GeometryType, ReferenceFiniteElement};
use crate::error::OrientationError;
use crate::mesh::Id;
use crate::quadrature::{intpoints, IntegrationScheme, Intpoints};
use crate::Real;

/// Source of one volume coordinate in terms of the facet coordinates `(s, t)`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum AxisSource {
    S,
    MinusS,
    T,
    MinusT,
    One,
    MinusOne,
}

impl AxisSource {
    pub fn evaluate<T: Real>(&self, s: T, t: T) -> T {
        match self {
            Self::S => s,
            Self::MinusS => -s,
            Self::T => t,
            Self::MinusT => -t,
            Self::One => T::one(),
            Self::MinusOne => -T::one(),
        }
    }
}

/// Source of one barycentric coordinate of a tetrahedron in terms of the triangle
/// coordinates `(xi, eta)`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BarycentricSource {
    /// `1 - xi - eta`
    Complement,
    Xi,
    Eta,
    Zero,
}

impl BarycentricSource {
    pub fn evaluate<T: Real>(&self, xi: T, eta: T) -> T {
        match self {
            Self::Complement => T::one() - xi - eta,
            Self::Xi => xi,
            Self::Eta => eta,
            Self::Zero => T::zero(),
        }
    }
}

use AxisSource::{MinusOne as M1, MinusS as Ms, MinusT as Mt, One as P1, S as Ps, T as Pt};
use BarycentricSource::{Complement as C, Eta as E, Xi as X, Zero as Z};

/// Volume coordinates `(x, y)` of the edges of a quadrilateral, parametrized by `s`.
///
/// The second facet coordinate is unused.
pub const QUAD_MASTER: [[AxisSource; 2]; 4] = [[Ps, M1], [P1, Ps], [Ms, P1], [M1, Ms]];

/// Slave-side counterpart of [`QUAD_MASTER`]: the slave traverses the edge backwards.
pub const QUAD_SLAVE: [[AxisSource; 2]; 4] = [[Ms, M1], [P1, Ms], [Ps, P1], [M1, Ps]];

/// Volume coordinates `(x, y, z)` of the facets of a hexahedron, parametrized by `(s, t)`.
#[rustfmt::skip]
pub const HEX_MASTER: [[AxisSource; 3]; 6] = [
    [Ps, M1, Pt],
    [P1, Ps, Pt],
    [Ms, P1, Pt],
    [M1, Pt, Ps],
    [Pt, Ps, M1],
    [Ps, Pt, P1],
];

/// Slave-side volume coordinates of the hexahedron facets, one row per
/// `facet * 4 + orientation`.
#[rustfmt::skip]
pub const HEX_SLAVE: [[AxisSource; 3]; 24] = [
    // Facet 0
    [Pt, M1, Ps],
    [Ms, M1, Pt],
    [Mt, M1, Ms],
    [Ps, M1, Mt],
    // Facet 1
    [P1, Pt, Ps],
    [P1, Ms, Pt],
    [P1, Mt, Ms],
    [P1, Ps, Mt],
    // Facet 2
    [Mt, P1, Ps],
    [Ps, P1, Pt],
    [Pt, P1, Ms],
    [Ms, P1, Mt],
    // Facet 3
    [M1, Ps, Pt],
    [M1, Pt, Ms],
    [M1, Ms, Mt],
    [M1, Mt, Ps],
    // Facet 4
    [Ps, Pt, M1],
    [Pt, Ms, M1],
    [Ms, Mt, M1],
    [Mt, Ps, M1],
    // Facet 5
    [Pt, Ps, P1],
    [Ms, Pt, P1],
    [Mt, Ms, P1],
    [Ps, Mt, P1],
];

/// Barycentric coordinates `(zeta_0, ..., zeta_3)` of the facets of a tetrahedron,
/// parametrized by the triangle coordinates `(xi, eta)`.
#[rustfmt::skip]
pub const TET_MASTER: [[BarycentricSource; 4]; 4] = [
    [C, X, Z, E],
    [Z, C, X, E],
    [C, Z, E, X],
    [C, E, X, Z],
];

/// Slave-side barycentric coordinates of the tetrahedron facets, one row per
/// `facet * 3 + orientation`.
#[rustfmt::skip]
pub const TET_SLAVE: [[BarycentricSource; 4]; 12] = [
    // Facet 0
    [C, E, Z, X],
    [X, C, Z, E],
    [E, X, Z, C],
    // Facet 1
    [Z, C, E, X],
    [Z, X, C, E],
    [Z, E, X, C],
    // Facet 2
    [C, Z, X, E],
    [X, Z, E, C],
    [E, Z, C, X],
    // Facet 3
    [C, X, E, Z],
    [X, E, C, Z],
    [E, C, X, Z],
];

/// The side of a facet from which its integration points are requested.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FacetSide {
    Master,
    Slave { orientation: usize },
}

/// Number of ways two neighbours can enumerate a facet of the given shape.
pub fn num_orientations(facet_geometry: GeometryType) -> usize {
    facet_geometry.num_orientations()
}

/// Local corner of the slave facet that coincides with master corner `i`.
fn slave_corner(num_corners: usize, orientation: usize, i: usize) -> usize {
    if num_corners == 2 {
        1 - i
    } else {
        (orientation + num_corners - i) % num_corners
    }
}

/// Determines the orientation code relating two corner sequences of the same facet.
///
/// Returns an error if `slave` is not an opposite traversal of `master`.
pub fn facet_orientation(master: &[Id], slave: &[Id]) -> Result<usize, OrientationError> {
    let n = master.len();
    let mismatch = || OrientationError::NotAFacetPermutation {
        master: master.to_vec(),
        slave: slave.to_vec(),
    };
    if n < 2 || slave.len() != n {
        return Err(mismatch());
    }
    let orientation = if n == 2 {
        0
    } else {
        slave
            .iter()
            .position(|&id| id == master[0])
            .ok_or_else(mismatch)?
    };
    let consistent = (0..n).all(|i| slave[slave_corner(n, orientation, i)] == master[i]);
    if consistent {
        Ok(orientation)
    } else {
        Err(mismatch())
    }
}

fn check_facet(element_type: ElementType, facet: usize) -> Result<(), OrientationError> {
    if facet < connectivity::num_facets(element_type) {
        Ok(())
    } else {
        Err(OrientationError::FacetOutOfRange { element_type, facet })
    }
}

fn check_orientation(element_type: ElementType, facet: usize, orientation: usize) -> Result<(), OrientationError> {
    let geometry = connectivity::facet_type(element_type, facet)
        .map(|ty| ty.geometry())
        .ok_or(OrientationError::FacetOutOfRange { element_type, facet })?;
    let count = num_orientations(geometry);
    if orientation < count {
        Ok(())
    } else {
        Err(OrientationError::OrientationOutOfRange {
            geometry,
            orientation,
            count,
        })
    }
}

fn apply_axis_table<T: Real, const D: usize>(row: &[AxisSource; D], facet_points: &DMatrix<T>) -> DMatrix<T> {
    let t_row = |k: usize| {
        if facet_points.nrows() > 1 {
            facet_points[(1, k)]
        } else {
            T::zero()
        }
    };
    DMatrix::from_fn(D, facet_points.ncols(), |i, k| row[i].evaluate(facet_points[(0, k)], t_row(k)))
}

/// Maps points on the reference triangle into the barycentric coordinates of a tetrahedron.
///
/// `orientation` selects the slave table; `None` selects the master table. Returns a
/// `4 x num_points` matrix whose row `i` belongs to node `i`.
pub fn intpoints_tet<T: Real>(
    facet_points: &DMatrix<T>,
    facet: usize,
    orientation: Option<usize>,
) -> Result<DMatrix<T>, OrientationError> {
    assert_eq!(facet_points.nrows(), 2, "Triangle points must have two coordinates.");
    check_facet(ElementType::Tet4, facet)?;
    let row = match orientation {
        None => &TET_MASTER[facet],
        Some(orientation) => {
            check_orientation(ElementType::Tet4, facet, orientation)?;
            &TET_SLAVE[facet * 3 + orientation]
        }
    };
    Ok(DMatrix::from_fn(4, facet_points.ncols(), |i, k| {
        row[i].evaluate(facet_points[(0, k)], facet_points[(1, k)])
    }))
}

/// Maps points on the reference square into the reference coordinates of a hexahedron.
///
/// `orientation` selects the slave table; `None` selects the master table.
pub fn intpoints_hex<T: Real>(
    facet_points: &DMatrix<T>,
    facet: usize,
    orientation: Option<usize>,
) -> Result<DMatrix<T>, OrientationError> {
    assert_eq!(facet_points.nrows(), 2, "Quadrilateral points must have two coordinates.");
    check_facet(ElementType::Hex8, facet)?;
    let row = match orientation {
        None => &HEX_MASTER[facet],
        Some(orientation) => {
            check_orientation(ElementType::Hex8, facet, orientation)?;
            &HEX_SLAVE[facet * 4 + orientation]
        }
    };
    Ok(apply_axis_table(row, facet_points))
}

/// Maps points on the reference line into the reference coordinates of a quadrilateral.
pub fn intpoints_quad<T: Real>(facet_points: &DMatrix<T>, facet: usize, side: FacetSide) -> Result<DMatrix<T>, OrientationError> {
    assert_eq!(facet_points.nrows(), 1, "Line points must have one coordinate.");
    check_facet(ElementType::Quad4, facet)?;
    let row = match side {
        FacetSide::Master => &QUAD_MASTER[facet],
        FacetSide::Slave { orientation } => {
            check_orientation(ElementType::Quad4, facet, orientation)?;
            &QUAD_SLAVE[facet]
        }
    };
    Ok(apply_axis_table(row, facet_points))
}

/// Maps facet points into volume coordinates by interpolating the volume coordinates of the
/// facet corners with the linear facet shape functions.
///
/// Works for every element type with facets and serves as the reference for the tables.
pub fn interpolate_facet_points<T: Real>(
    element_type: ElementType,
    facet: usize,
    side: FacetSide,
    facet_points: &DMatrix<T>,
) -> Result<DMatrix<T>, OrientationError> {
    check_facet(element_type, facet)?;
    let facet_type = connectivity::facet_type(element_type, facet)
        .ok_or(OrientationError::FacetOutOfRange { element_type, facet })?
        .linear();
    assert_eq!(facet_points.nrows(), facet_type.dimension(), "Facet points have wrong dimension.");
    if let FacetSide::Slave { orientation } = side {
        check_orientation(element_type, facet, orientation)?;
    }

    let corners = connectivity::facet_corners(element_type, facet);
    let n = corners.len();
    let volume_nodes = element_type.linear().reference_coordinates::<T>();
    let mut basis = vec![T::zero(); n];
    let mut points = DMatrix::zeros(element_type.dimension(), facet_points.ncols());
    for k in 0..facet_points.ncols() {
        let xi: Vec<T> = facet_points.column(k).iter().copied().collect();
        facet_type.populate_basis(&mut basis, &xi);
        for (i, &phi) in basis.iter().enumerate() {
            let corner = match side {
                FacetSide::Master => corners[i],
                FacetSide::Slave { orientation } => corners[slave_corner(n, orientation, i)],
            };
            let mut column = points.column_mut(k);
            column += volume_nodes.column(corner) * phi;
        }
    }
    Ok(points)
}

/// Maps facet points into the reference coordinates of a volume element.
///
/// Tetrahedra, hexahedra and quadrilaterals use the fixed tables of this module, triangles
/// and the master side of prisms interpolate the facet corners. Slave-side prism tables are
/// not available.
pub fn facet_points<T: Real>(
    element_type: ElementType,
    facet: usize,
    side: FacetSide,
    facet_points: &DMatrix<T>,
) -> Result<DMatrix<T>, OrientationError> {
    let orientation = match side {
        FacetSide::Master => None,
        FacetSide::Slave { orientation } => Some(orientation),
    };
    match element_type.geometry() {
        GeometryType::Tet => {
            let barycentric = intpoints_tet(facet_points, facet, orientation)?;
            Ok(barycentric.rows(1, 3).into_owned())
        }
        GeometryType::Hex => intpoints_hex(facet_points, facet, orientation),
        GeometryType::Quad => intpoints_quad(facet_points, facet, side),
        GeometryType::Tri => interpolate_facet_points(element_type, facet, side, facet_points),
        GeometryType::Penta => match side {
            FacetSide::Master => interpolate_facet_points(element_type, facet, side, facet_points),
            FacetSide::Slave { .. } => Err(OrientationError::Unimplemented { element_type }),
        },
        GeometryType::Line => Err(OrientationError::FacetOutOfRange { element_type, facet }),
    }
}

fn facet_rule<T: Real>(
    scheme: IntegrationScheme,
    element_type: ElementType,
    facet: usize,
    order: usize,
) -> eyre::Result<Intpoints<T>> {
    let facet_type = connectivity::facet_type(element_type, facet)
        .filter(|_| facet < connectivity::num_facets(element_type))
        .ok_or(OrientationError::FacetOutOfRange { element_type, facet })?;
    Ok(intpoints(scheme, facet_type.geometry(), order)?)
}

/// Integration points of facet `facet` expressed in the master's reference coordinates.
pub fn master_intpoints<T: Real>(
    scheme: IntegrationScheme,
    element_type: ElementType,
    facet: usize,
    order: usize,
) -> eyre::Result<Intpoints<T>> {
    let (weights, points) = facet_rule(scheme, element_type, facet, order)?;
    let points = facet_points(element_type, facet, FacetSide::Master, &points)?;
    Ok((weights, points))
}

/// Integration points of facet `facet` expressed in the slave's reference coordinates, in the
/// order of the master-side points.
pub fn slave_intpoints<T: Real>(
    scheme: IntegrationScheme,
    element_type: ElementType,
    facet: usize,
    orientation: usize,
    order: usize,
) -> eyre::Result<Intpoints<T>> {
    let (weights, points) = facet_rule(scheme, element_type, facet, order)?;
    let points = facet_points(element_type, facet, FacetSide::Slave { orientation }, &points)?;
    Ok((weights, points))
}

/// Deviations between the master and the slave integration points of a facet.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct IntpointDeviation {
    /// Sum of the absolute differences of the weights.
    pub weights: f64,
    /// Largest physical distance between corresponding points.
    pub points: f64,
}

/// Checks that the master and slave tables of a facet describe the same physical points.
///
/// The master is the reference element itself. The slave is a second copy of the reference
/// element whose facet corners are moved onto the master corners they coincide with under the
/// given orientation. The remaining slave nodes do not influence points on the facet.
pub fn verify_intpoints(
    scheme: IntegrationScheme,
    element_type: ElementType,
    facet: usize,
    orientation: usize,
    order: usize,
) -> eyre::Result<IntpointDeviation> {
    let linear = element_type.linear();
    let (master_weights, master_points): (DVector<f64>, DMatrix<f64>) =
        master_intpoints(scheme, element_type, facet, order)?;
    let (slave_weights, slave_points): (DVector<f64>, DMatrix<f64>) =
        slave_intpoints(scheme, element_type, facet, orientation, order)?;
    if master_points.ncols() != slave_points.ncols() {
        return Err(eyre!("Master and slave tables have different numbers of points"));
    }

    let reference = linear.reference_coordinates::<f64>();
    let corners = connectivity::facet_corners(element_type, facet);
    let n = corners.len();
    let mut slave_geometry = reference.clone();
    for i in 0..n {
        let slave_local = corners[slave_corner(n, orientation, i)];
        slave_geometry
            .column_mut(slave_local)
            .copy_from(&reference.column(corners[i]));
    }

    let mut basis = vec![0.0; linear.num_nodes()];
    let mut max_distance = 0.0;
    for k in 0..slave_points.ncols() {
        let xi: Vec<f64> = slave_points.column(k).iter().copied().collect();
        ReferenceFiniteElement::<f64>::populate_basis(&linear, &mut basis, &xi);
        let physical = &slave_geometry * DVector::from_column_slice(&basis);
        let distance = (physical - master_points.column(k)).norm();
        max_distance = f64::max(max_distance, distance);
    }
    let weight_deviation = (&master_weights - &slave_weights).abs().sum();

    debug!(
        "Facet {} of {} with orientation {}: weight deviation {:e}, point deviation {:e}",
        facet, element_type, orientation, weight_deviation, max_distance
    );
    Ok(IntpointDeviation {
        weights: weight_deviation,
        points: max_distance,
    })
}
