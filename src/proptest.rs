//! Strategies for property-based testing of meshes, facets and reference elements.
use crate::connectivity;
use crate::element::{ElementType, GeometryType};
use crate::mesh::MeshBuilder;
use crate::mesh::procedural::{create_box_hex8, create_box_tet4, create_rectangle_quad4, create_rectangle_tri3};
use crate::mesh::Id;
use ::proptest::prelude::*;
use nalgebra::{Matrix3, Point3, Vector3};

pub fn point3() -> impl Strategy<Value = Point3<f64>> {
    // Pick a reasonably small range to pick coordinates from,
    // otherwise we can easily get floating point numbers that are
    // so ridiculously large as to break anything we might want to do with them
    let range = -10.0..10.0;
    [range.clone(), range.clone(), range.clone()].prop_map(|[x, y, z]| Point3::new(x, y, z))
}

/// A point inside the reference domain of the given element type.
pub fn reference_point(element_type: ElementType) -> impl Strategy<Value = Vec<f64>> {
    let dim = element_type.dimension();
    let geometry = element_type.geometry();
    prop::collection::vec(0.0..1.0, dim).prop_map(move |u| match geometry {
        GeometryType::Line | GeometryType::Quad | GeometryType::Hex => u.iter().map(|&u| 2.0 * u - 1.0).collect(),
        GeometryType::Tri | GeometryType::Tet => {
            // Fold the unit cube into the simplex
            let sum: f64 = u.iter().sum();
            if sum <= 1.0 {
                u
            } else {
                let scale = (1.0 - 1e-3) / sum;
                u.iter().map(|&u| u * scale).collect()
            }
        }
        GeometryType::Penta => {
            let (xi, eta) = if u[0] + u[1] <= 1.0 {
                (u[0], u[1])
            } else {
                (1.0 - u[0], 1.0 - u[1])
            };
            vec![xi, eta, 2.0 * u[2] - 1.0]
        }
    })
}

/// A facet of the element type together with an orientation of that facet.
pub fn facet_and_orientation(element_type: ElementType) -> impl Strategy<Value = (usize, usize)> {
    (0..connectivity::num_facets(element_type)).prop_flat_map(move |facet| {
        let count = connectivity::facet_type(element_type, facet)
            .map(|ty| ty.geometry().num_orientations())
            .unwrap_or(1);
        (Just(facet), 0..count)
    })
}

/// An affine map `x -> A x + b` with a positive determinant bounded away from zero.
pub fn affine_map3() -> impl Strategy<Value = (Matrix3<f64>, Vector3<f64>)> {
    let perturbation = prop::array::uniform9(-0.3..0.3);
    let scaling = [0.5..2.0, 0.5..2.0, 0.5..2.0];
    let translation = [-5.0..5.0, -5.0..5.0, -5.0..5.0];
    (perturbation, scaling, translation).prop_map(|(p, s, b)| {
        let a = Matrix3::from_diagonal(&Vector3::from(s)) + Matrix3::from_row_slice(&p) * 0.5;
        (a, Vector3::from(b))
    })
}

/// Local node numbering of an element rotated by `r` steps, preserving its orientation.
fn rotate_local_nodes(element_type: ElementType, nodes: &[Id], r: usize) -> Vec<Id> {
    let cycle = |nodes: &[Id]| -> Vec<Id> {
        let n = nodes.len();
        (0..n).map(|i| nodes[(i + r) % n]).collect()
    };
    match element_type {
        ElementType::Tri3 | ElementType::Quad4 => cycle(nodes),
        ElementType::Hex8 => [cycle(&nodes[0..4]), cycle(&nodes[4..8])].concat(),
        ElementType::Tet4 => [vec![nodes[0]], cycle(&nodes[1..4])].concat(),
        _ => panic!("Cannot rotate nodes of {}", element_type),
    }
}

/// A small structured mesh of the given element type in which nodes and elements are inserted
/// in arbitrary order and every element starts its local numbering at an arbitrary corner, so
/// that neighbouring elements traverse shared edges in arbitrary directions.
pub fn shuffled_mesh(element_type: ElementType, block: Id) -> impl Strategy<Value = MeshBuilder> {
    let cells = if element_type.dimension() == 2 { 1..4usize } else { 1..3usize };
    [cells.clone(), cells.clone(), cells]
        .prop_flat_map(move |[nx, ny, nz]| {
            let base = match element_type {
                ElementType::Quad4 => create_rectangle_quad4([nx, ny], [1.0, 1.0], block),
                ElementType::Tri3 => create_rectangle_tri3([nx, ny], [1.0, 1.0], block),
                ElementType::Hex8 => create_box_hex8([nx, ny, nz], [1.0, 1.0, 1.0], block),
                ElementType::Tet4 => create_box_tet4([nx, ny, nz], [1.0, 1.0, 1.0], block),
                _ => panic!("No structured mesh available for {}", element_type),
            }
            .build();
            let nodes: Vec<(Id, Point3<f64>)> = base.nodes().iter().map(|n| (n.id, n.coords)).collect();
            let elements: Vec<Vec<Id>> = base
                .elements()
                .iter()
                .map(|element| base.node_ids(&element.nodes))
                .collect();
            let num_rotations = match element_type {
                ElementType::Tri3 | ElementType::Tet4 => 3usize,
                _ => 4,
            };
            let rotations = prop::collection::vec(0..num_rotations, elements.len());
            (Just(nodes).prop_shuffle(), Just(elements).prop_shuffle(), rotations)
        })
        .prop_map(move |(nodes, elements, rotations)| {
            let mut builder = MeshBuilder::new(element_type.dimension());
            for (id, coords) in nodes {
                builder
                    .add_node(id, coords)
                    .expect("Node ids of a structured mesh are unique");
            }
            for (element, r) in elements.iter().zip(rotations) {
                builder
                    .add_element(block, element_type, &rotate_local_nodes(element_type, element, r))
                    .expect("Elements of a structured mesh are valid");
            }
            builder
        })
}
