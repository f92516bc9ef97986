//! Static local topology of the reference elements.
//!
//! All tables refer to local node indices of the element. Edges are given as pairs of corner
//! nodes, facets as corner cycles whose orientation points out of the element.
use crate::element::{ElementType, GeometryType};

pub const LINE_EDGES: [[usize; 2]; 1] = [[0, 1]];

/// Edges of the reference triangle.
///
/// ```text
/// 2
/// | \
/// |   \
/// 0----1
/// ```
pub const TRI_EDGES: [[usize; 2]; 3] = [[0, 1], [1, 2], [2, 0]];

/// Edges of the reference quadrilateral.
///
/// ```text
/// 3----2
/// |    |
/// 0----1
/// ```
pub const QUAD_EDGES: [[usize; 2]; 4] = [[0, 1], [1, 2], [2, 3], [3, 0]];

pub const TET_EDGES: [[usize; 2]; 6] = [[0, 1], [1, 2], [2, 0], [0, 3], [1, 3], [2, 3]];

/// Edges of the reference hexahedron.
///
/// ```text
///   7--------6
///  /|       /|
/// 4--------5 |
/// | 3------|-2
/// |/       |/
/// 0--------1
/// ```
#[rustfmt::skip]
pub const HEX_EDGES: [[usize; 2]; 12] = [
    [0, 1], [1, 2], [2, 3], [3, 0],
    [0, 4], [1, 5], [2, 6], [3, 7],
    [4, 5], [5, 6], [6, 7], [7, 4],
];

#[rustfmt::skip]
pub const PENTA_EDGES: [[usize; 2]; 9] = [
    [0, 1], [1, 2], [2, 0],
    [0, 3], [1, 4], [2, 5],
    [3, 4], [4, 5], [5, 3],
];

pub const TET_FACETS: [[usize; 3]; 4] = [[0, 1, 3], [1, 2, 3], [0, 3, 2], [0, 2, 1]];

#[rustfmt::skip]
pub const HEX_FACETS: [[usize; 4]; 6] = [
    [0, 1, 5, 4],
    [1, 2, 6, 5],
    [2, 3, 7, 6],
    [0, 4, 7, 3],
    [0, 3, 2, 1],
    [4, 5, 6, 7],
];

/// Facets of the prism: the three quadrilateral sides followed by the bottom and top triangles.
pub const PENTA_FACETS: [&[usize]; 5] = [&[0, 1, 4, 3], &[1, 2, 5, 4], &[2, 0, 3, 5], &[0, 2, 1], &[3, 4, 5]];

const TRI_CORNERS: [usize; 3] = [0, 1, 2];
const QUAD_CORNERS: [usize; 4] = [0, 1, 2, 3];

/// Local edges of a shape as pairs of corner nodes.
pub fn edges(geometry: GeometryType) -> &'static [[usize; 2]] {
    match geometry {
        GeometryType::Line => &LINE_EDGES,
        GeometryType::Tri => &TRI_EDGES,
        GeometryType::Quad => &QUAD_EDGES,
        GeometryType::Tet => &TET_EDGES,
        GeometryType::Penta => &PENTA_EDGES,
        GeometryType::Hex => &HEX_EDGES,
    }
}

pub fn num_edges(element_type: ElementType) -> usize {
    edges(element_type.geometry()).len()
}

/// The two local corner nodes of edge `e`.
///
/// Panics if `e` is out of bounds.
pub fn edge_nodes(element_type: ElementType, e: usize) -> [usize; 2] {
    edges(element_type.geometry())[e]
}

/// Index of the local edge connecting corners `a` and `b` in either order, if any.
pub fn find_edge(geometry: GeometryType, a: usize, b: usize) -> Option<usize> {
    edges(geometry)
        .iter()
        .position(|&[p, q]| (p, q) == (a, b) || (p, q) == (b, a))
}

pub fn num_facets(element_type: ElementType) -> usize {
    match element_type.geometry() {
        GeometryType::Line => 0,
        GeometryType::Tri => TRI_EDGES.len(),
        GeometryType::Quad => QUAD_EDGES.len(),
        GeometryType::Tet => TET_FACETS.len(),
        GeometryType::Penta => PENTA_FACETS.len(),
        GeometryType::Hex => HEX_FACETS.len(),
    }
}

/// Corner nodes of facet `f`, ordered as an outward cycle.
///
/// Panics if the element type has no facets or `f` is out of bounds.
pub fn facet_corners(element_type: ElementType, f: usize) -> &'static [usize] {
    match element_type.geometry() {
        GeometryType::Line => panic!("Line elements have no facets"),
        GeometryType::Tri => &TRI_EDGES[f],
        GeometryType::Quad => &QUAD_EDGES[f],
        GeometryType::Tet => &TET_FACETS[f],
        GeometryType::Penta => PENTA_FACETS[f],
        GeometryType::Hex => &HEX_FACETS[f],
    }
}

/// The element type of facet `f`, or `None` if the element type has no facets.
pub fn facet_type(element_type: ElementType, f: usize) -> Option<ElementType> {
    use ElementType::*;
    match element_type {
        Line2 | Line3 => None,
        Tri3 | Quad4 => Some(Line2),
        Tri6 | Quad9 => Some(Line3),
        Tet4 => Some(Tri3),
        Tet10 => Some(Tri6),
        Hex8 => Some(Quad4),
        Hex27 => Some(Quad9),
        Penta6 if f < 3 => Some(Quad4),
        Penta6 => Some(Tri3),
    }
}

/// Local node indices of facet `f` in the node order of its facet element type.
///
/// Higher-order nodes are found by the edge (and, for hexahedra, facet) numbering of the
/// quadratic elements.
pub fn facet_nodes(element_type: ElementType, f: usize) -> Vec<usize> {
    let corners = facet_corners(element_type, f);
    let geometry = element_type.geometry();
    let num_corners = element_type.num_corner_nodes();
    let mut nodes = corners.to_vec();
    if element_type.interpolation_order().degree() == 1 {
        return nodes;
    }

    if corners.len() == 2 {
        // A 2D facet is an edge of the element: its midpoint is the only extra node
        nodes.push(num_corners + f);
        return nodes;
    }

    for (i, &a) in corners.iter().enumerate() {
        let b = corners[(i + 1) % corners.len()];
        let e = find_edge(geometry, a, b).expect("Consecutive facet corners must form an edge");
        nodes.push(num_corners + e);
    }
    if geometry == GeometryType::Hex {
        nodes.push(num_corners + HEX_EDGES.len() + f);
    }
    nodes
}

/// Local edges of the element traversed by facet `f`, in the edge order of the facet.
pub fn facet_edges(element_type: ElementType, f: usize) -> Vec<usize> {
    let corners = facet_corners(element_type, f);
    let geometry = element_type.geometry();
    if corners.len() == 2 {
        return vec![f];
    }
    (0..corners.len())
        .map(|i| {
            let a = corners[i];
            let b = corners[(i + 1) % corners.len()];
            find_edge(geometry, a, b).expect("Consecutive facet corners must form an edge")
        })
        .collect()
}

/// Number of face entities of an element.
///
/// A two-dimensional element is itself a face; the faces of a volume element are its facets.
pub fn num_faces(element_type: ElementType) -> usize {
    match element_type.dimension() {
        1 => 0,
        2 => 1,
        _ => num_facets(element_type),
    }
}

/// Corner nodes of local face `i`.
pub fn face_corners(element_type: ElementType, i: usize) -> &'static [usize] {
    match element_type.geometry() {
        GeometryType::Line => panic!("Line elements have no faces"),
        GeometryType::Tri => {
            assert_eq!(i, 0, "A triangle has a single face");
            &TRI_CORNERS
        }
        GeometryType::Quad => {
            assert_eq!(i, 0, "A quadrilateral has a single face");
            &QUAD_CORNERS
        }
        _ => facet_corners(element_type, i),
    }
}
