//! Error types.
//!
//! Failures that depend on the mesh or the configuration are reported through these types.
//! Violations of internal invariants panic instead.
use std::fmt;
use std::fmt::{Display, Formatter};

use crate::element::{ElementType, GeometryType};
use crate::mesh::{Id, Index};

/// Inconsistent mesh topology.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TopologyError {
    /// The nodes of a local edge match the edge entity neither directly nor through the
    /// duplicate-node lookup.
    UnresolvedEdgeDirection { element: Id, edge: usize, expected: [Id; 2], found: [Id; 2] },
    /// A facet edge could not be found among the edges of the adjacent volume element.
    UnmatchedFacetEdge { facet: Id, edge: usize },
    UnknownNode(Id),
    DuplicateNode(Id),
    WrongNodeCount { element_type: ElementType, expected: usize, found: usize },
    MixedBlock { block: Id, expected: ElementType, found: ElementType },
    /// No element other than the master shares the given facet.
    NoNeighbour { element: Index, facet: usize },
    /// Two elements share the corners of a facet but do not traverse it in opposite directions.
    InconsistentFacet { master: Index, slave: Index, facet: usize },
    FacetOutOfRange { element_type: ElementType, facet: usize },
    UnknownElement(Index),
    UnknownSideSet(Id),
    DuplicateSideSet(Id),
}

impl Display for TopologyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnresolvedEdgeDirection {
                element,
                edge,
                expected,
                found,
            } => write!(
                f,
                "Cannot resolve direction of local edge {} of element {}: edge has nodes {:?}, element has {:?}",
                edge, element, expected, found
            ),
            Self::UnmatchedFacetEdge { facet, edge } => write!(
                f,
                "Edge {} of facet {} is not an edge of the adjacent volume element",
                edge, facet
            ),
            Self::UnknownNode(id) => write!(f, "Node {} does not exist", id),
            Self::DuplicateNode(id) => write!(f, "Node {} was added twice", id),
            Self::WrongNodeCount {
                element_type,
                expected,
                found,
            } => write!(
                f,
                "Element of type {} needs {} nodes, but {} were given",
                element_type, expected, found
            ),
            Self::MixedBlock { block, expected, found } => write!(
                f,
                "Block {} contains elements of type {}, cannot add element of type {}",
                block, expected, found
            ),
            Self::NoNeighbour { element, facet } => write!(
                f,
                "Facet {} of element {} is not shared with another element",
                facet, element
            ),
            Self::InconsistentFacet { master, slave, facet } => write!(
                f,
                "Element {} does not traverse facet {} of element {} in the opposite direction",
                slave, facet, master
            ),
            Self::FacetOutOfRange { element_type, facet } => {
                write!(f, "Element type {} has no facet {}", element_type, facet)
            }
            Self::UnknownElement(index) => write!(f, "Element with index {} does not exist", index),
            Self::UnknownSideSet(id) => write!(f, "Side set {} does not exist", id),
            Self::DuplicateSideSet(id) => write!(f, "Side set {} was defined twice", id),
        }
    }
}

impl std::error::Error for TopologyError {}

/// Failures when relating the parametrizations of two elements sharing a facet.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum OrientationError {
    /// The orientation code exceeds the symmetry count of the facet shape.
    OrientationOutOfRange { geometry: GeometryType, orientation: usize, count: usize },
    FacetOutOfRange { element_type: ElementType, facet: usize },
    /// The slave corner sequence is not an opposite traversal of the master corner sequence.
    NotAFacetPermutation { master: Vec<Id>, slave: Vec<Id> },
    /// No slave-side table exists for this element type.
    Unimplemented { element_type: ElementType },
}

impl Display for OrientationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::OrientationOutOfRange {
                geometry,
                orientation,
                count,
            } => write!(
                f,
                "Orientation {} is invalid for {} facets, which have {} orientations",
                orientation, geometry, count
            ),
            Self::FacetOutOfRange { element_type, facet } => {
                write!(f, "Element type {} has no facet {}", element_type, facet)
            }
            Self::NotAFacetPermutation { master, slave } => write!(
                f,
                "Corners {:?} do not describe the facet with corners {:?} seen from the opposite side",
                slave, master
            ),
            Self::Unimplemented { element_type } => {
                write!(f, "Slave-side facet integration points are not available for {}", element_type)
            }
        }
    }
}

impl std::error::Error for OrientationError {}

/// Failures when linking an element to its degrees of freedom.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LinkError {
    /// A group declares more than one edge dof type.
    MultipleEdgeDofTypes { group: Id, count: usize },
    /// A group declares more than one face dof type.
    MultipleFaceDofTypes { group: Id, count: usize },
    /// The link mode needs a volume element the facet does not have.
    MissingVolume { facet: Id, side: &'static str },
    MissingCutBlock { facet: Id },
    /// The dof manager does not know a dof the element refers to.
    MissingDof { id: u64 },
    Topology(TopologyError),
}

impl Display for LinkError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::MultipleEdgeDofTypes { group, count } => write!(
                f,
                "Group {} has {} edge dof types, at most one is supported",
                group, count
            ),
            Self::MultipleFaceDofTypes { group, count } => write!(
                f,
                "Group {} has {} face dof types, at most one is supported",
                group, count
            ),
            Self::MissingVolume { facet, side } => write!(f, "Facet {} has no {} element", facet, side),
            Self::MissingCutBlock { facet } => write!(f, "Facet {} does not carry a cut block", facet),
            Self::MissingDof { id } => write!(f, "Dof {} does not exist", id),
            Self::Topology(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for LinkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Topology(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TopologyError> for LinkError {
    fn from(err: TopologyError) -> Self {
        Self::Topology(err)
    }
}

/// Failures when constructing or querying a group.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GroupError {
    UnknownBlock(Id),
    UnknownSideSet(Id),
    EmptyGroup(Id),
    /// The facets of a side set do not share one element type.
    MixedElementTypes { group: Id },
    /// No integration table exists for the requested facet and orientation.
    NoIntegrationTable { facet: usize, orientation: Option<usize> },
}

impl Display for GroupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownBlock(id) => write!(f, "Block {} does not exist", id),
            Self::UnknownSideSet(id) => write!(f, "Side set {} does not exist", id),
            Self::EmptyGroup(id) => write!(f, "Group {} has no elements", id),
            Self::MixedElementTypes { group } => {
                write!(f, "Elements of group {} do not share a single element type", group)
            }
            Self::NoIntegrationTable { facet, orientation } => match orientation {
                Some(orientation) => write!(
                    f,
                    "No slave integration table for facet {} with orientation {}",
                    facet, orientation
                ),
                None => write!(f, "No master integration table for facet {}", facet),
            },
        }
    }
}

impl std::error::Error for GroupError {}
