use fenlink::element::ElementType;
use fenlink::error::TopologyError;
use fenlink::mesh::procedural::{create_box_hex8, create_box_tet4, create_rectangle_quad4, create_rectangle_tri3};
use fenlink::mesh::{MeshBuilder, SideSetKind};
use nalgebra::Point3;

/// Two unit quads side by side whose shared edge is split into duplicated nodes.
///
/// ```text
/// 4 --- 5 8 --- 6
/// |     | |     |
/// 1 --- 2 7 --- 3
/// ```
fn split_quads() -> MeshBuilder {
    let mut builder = MeshBuilder::new(2);
    let coords = [
        (1, [0.0, 0.0]),
        (2, [1.0, 0.0]),
        (3, [2.0, 0.0]),
        (4, [0.0, 1.0]),
        (5, [1.0, 1.0]),
        (6, [2.0, 1.0]),
        (7, [1.0, 0.0]),
        (8, [1.0, 1.0]),
    ];
    for (id, [x, y]) in coords {
        builder.add_node(id, Point3::new(x, y, 0.0)).unwrap();
    }
    builder.add_duplicate_node(2, 7).unwrap();
    builder.add_duplicate_node(5, 8).unwrap();
    builder.add_element(1, ElementType::Quad4, &[1, 2, 5, 4]).unwrap();
    builder.add_element(2, ElementType::Quad4, &[7, 3, 6, 8]).unwrap();
    builder
}

#[test]
fn rectangle_quad4_entities() {
    let builder = create_rectangle_quad4([2, 2], [2.0, 1.0], 1);
    assert_eq!(builder.exterior_facets().len(), 8);
    assert_eq!(builder.interior_facets().len(), 4);

    let mesh = builder.build();
    assert_eq!(mesh.dimension(), 2);
    assert_eq!(mesh.nodes().len(), 9);
    assert_eq!(mesh.elements().len(), 4);
    assert_eq!(mesh.edges().len(), 12);
    assert_eq!(mesh.faces().len(), 4);
    assert_eq!(mesh.blocks().len(), 1);
    assert_eq!(mesh.block(1).unwrap().elements, vec![0, 1, 2, 3]);

    let last = mesh.find_node(9).unwrap();
    assert_eq!(mesh.node(last).coords, Point3::new(2.0, 1.0, 0.0));
    let coordinates = mesh.element_coordinates(mesh.element(0));
    assert_eq!(coordinates.shape(), (2, 4));
    assert_eq!(mesh.node_ids(&mesh.element(0).nodes), vec![1, 2, 5, 4]);
}

#[test]
fn rectangle_tri3_entities() {
    let builder = create_rectangle_tri3([1, 1], [1.0, 1.0], 1);
    assert_eq!(builder.exterior_facets().len(), 4);
    assert_eq!(builder.interior_facets().len(), 1);
    let mesh = builder.build();
    assert_eq!(mesh.elements().len(), 2);
    assert_eq!(mesh.edges().len(), 5);
}

#[test]
fn box_hex8_entities() {
    let builder = create_box_hex8([2, 1, 1], [2.0, 1.0, 1.0], 3);
    assert_eq!(builder.interior_facets(), vec![(0, 1)]);
    assert_eq!(builder.exterior_facets().len(), 10);
    let mesh = builder.build();
    assert_eq!(mesh.nodes().len(), 12);
    assert_eq!(mesh.edges().len(), 20);
    assert_eq!(mesh.faces().len(), 11);
    // The shared face is the same entity for both elements
    assert_eq!(mesh.element(0).faces[1], mesh.element(1).faces[3]);
}

#[test]
fn box_tet4_is_conforming() {
    let builder = create_box_tet4([1, 1, 1], [1.0, 1.0, 1.0], 1);
    assert_eq!(builder.interior_facets().len(), 6);
    assert_eq!(builder.exterior_facets().len(), 12);
    let mesh = builder.build();
    assert_eq!(mesh.elements().len(), 6);
    // 12 cube edges, 6 face diagonals and the main diagonal
    assert_eq!(mesh.edges().len(), 19);
}

#[test]
fn interface_sideset_orientation_matches_corners() {
    for builder in [
        create_box_hex8([2, 2, 1], [1.0, 1.0, 1.0], 1),
        create_box_tet4([2, 1, 1], [1.0, 1.0, 1.0], 1),
        create_rectangle_tri3([2, 2], [1.0, 1.0], 1),
    ] {
        let mut builder = builder;
        let interior = builder.interior_facets();
        builder.add_interface_sideset(10, &interior).unwrap();
        let mesh = builder.build();
        let sideset = mesh.sideset(10).unwrap();
        assert_eq!(sideset.kind, SideSetKind::Interface);
        assert_eq!(sideset.facets.len(), interior.len());

        for &f in &sideset.facets {
            let facet = mesh.facet(f);
            let master = mesh.element(facet.master.unwrap());
            let slave = mesh.element(facet.slave.unwrap());
            assert_ne!(master.index, slave.index);

            let master_corners = fenlink::connectivity::facet_corners(master.element_type, facet.master_index);
            let slave_corners = fenlink::connectivity::facet_corners(slave.element_type, facet.slave_index);
            let n = master_corners.len();
            for i in 0..n {
                let j = if n == 2 { 1 - i } else { (facet.orientation + n - i) % n };
                assert_eq!(master.nodes[master_corners[i]], slave.nodes[slave_corners[j]]);
            }
            // The facet element follows the master numbering
            assert_eq!(facet.element.nodes[0], master.nodes[master_corners[0]]);
        }
    }
}

#[test]
fn duplicated_nodes_share_entities() {
    let mut builder = split_quads();
    assert_eq!(builder.interior_facets(), vec![(0, 1)]);
    builder.add_interface_sideset(5, &[(0, 1)]).unwrap();
    let mesh = builder.build();

    let left = mesh.element(0);
    let right = mesh.element(1);
    assert_eq!(left.edges[1], right.edges[3]);
    assert_eq!(mesh.duplicate_of(mesh.find_node(2).unwrap()), mesh.find_node(7));
    assert_eq!(mesh.duplicate_of(mesh.find_node(7).unwrap()), mesh.find_node(2));

    let facet = mesh.facet(mesh.sideset(5).unwrap().facets[0]);
    assert_eq!(facet.slave, Some(1));
    assert_eq!(facet.slave_index, 3);
}

#[test]
fn boundary_and_cut_sidesets() {
    let mut builder = create_rectangle_quad4([2, 1], [2.0, 1.0], 1);
    builder.add_boundary_sideset(2, &[(0, 0), (1, 0)]).unwrap();
    builder.add_cut_sideset(3, 1, &[[2, 5], [1, 2]]).unwrap();
    let mesh = builder.build();

    let boundary = mesh.sideset(2).unwrap();
    assert_eq!(boundary.kind, SideSetKind::Boundary);
    for &f in &boundary.facets {
        let facet = mesh.facet(f);
        assert_eq!(facet.element.element_type, ElementType::Line2);
        assert_eq!(facet.element.group, 2);
        assert!(facet.slave.is_none());
        assert!(facet.master.is_some());
    }

    let cut = mesh.sideset(3).unwrap();
    assert_eq!(cut.kind, SideSetKind::Cut);
    assert_eq!(cut.facets.len(), 2);
    let facet = mesh.facet(cut.facets[0]);
    assert_eq!(facet.cut_block, Some(1));
    assert!(facet.master.is_none());
    assert_eq!(mesh.node_ids(&facet.element.nodes), vec![2, 5]);
    // The cut segment runs along an existing edge and reuses it
    assert_eq!(facet.element.edges[0], mesh.element(0).edges[1]);

    let ids: Vec<_> = mesh.facets().iter().map(|f| f.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);
}

#[test]
fn ghost_layers_have_own_edges() {
    let mut builder = create_box_hex8([2, 1, 1], [2.0, 1.0, 1.0], 1);
    builder.add_interface_sideset(4, &[(0, 1)]).unwrap();
    let num_edges_before = builder.clone().build().edges().len();
    builder.add_ghost_layers(4, 2).unwrap();
    let mesh = builder.build();

    let facet = mesh.facet(0);
    assert_eq!(facet.layers.len(), 2);
    assert_eq!(mesh.edges().len(), num_edges_before + 2 * 4);
    assert_eq!(mesh.faces().len(), 11 + 2);
    for (l, layer) in facet.layers.iter().enumerate() {
        assert_eq!(layer.nodes, facet.element.nodes);
        assert_eq!(layer.id, facet.id * 3 + l as u64 + 1);
        for (e, &edge) in layer.edges.iter().enumerate() {
            assert_ne!(edge, facet.element.edges[e]);
            assert_eq!(mesh.edge(edge).nodes, mesh.edge(facet.element.edges[e]).nodes);
        }
    }
}

#[test]
fn topology_errors() {
    let mut builder = create_rectangle_quad4([1, 1], [1.0, 1.0], 1);
    assert_eq!(
        builder.add_node(1, Point3::origin()),
        Err(TopologyError::DuplicateNode(1))
    );
    assert_eq!(
        builder.add_element(1, ElementType::Quad4, &[1, 2, 3]),
        Err(TopologyError::WrongNodeCount {
            element_type: ElementType::Quad4,
            expected: 4,
            found: 3
        })
    );
    assert_eq!(
        builder.add_element(1, ElementType::Quad4, &[1, 2, 3, 99]),
        Err(TopologyError::UnknownNode(99))
    );
    assert!(matches!(
        builder.add_element(1, ElementType::Tri3, &[1, 2, 3]),
        Err(TopologyError::MixedBlock { block: 1, .. })
    ));
    assert_eq!(
        builder.add_interface_sideset(2, &[(0, 0)]),
        Err(TopologyError::NoNeighbour { element: 0, facet: 0 })
    );
    assert!(matches!(
        builder.add_boundary_sideset(2, &[(0, 4)]),
        Err(TopologyError::FacetOutOfRange { facet: 4, .. })
    ));
    assert_eq!(
        builder.add_boundary_sideset(2, &[(5, 0)]),
        Err(TopologyError::UnknownElement(5))
    );
    builder.add_boundary_sideset(2, &[(0, 0)]).unwrap();
    assert_eq!(
        builder.add_boundary_sideset(2, &[(0, 1)]),
        Err(TopologyError::DuplicateSideSet(2))
    );
    assert_eq!(builder.add_ghost_layers(7, 1), Err(TopologyError::UnknownSideSet(7)));
}

#[test]
fn builder_assigns_rank_as_owner() {
    let mut builder = MeshBuilder::new(2).with_rank(3);
    builder.add_node(1, Point3::new(0.0, 0.0, 0.0)).unwrap();
    builder.add_node(2, Point3::new(1.0, 0.0, 0.0)).unwrap();
    builder.add_node(3, Point3::new(0.0, 1.0, 0.0)).unwrap();
    let element = builder.add_element(1, ElementType::Tri3, &[1, 2, 3]).unwrap();
    builder.set_node_owner(0, 1);
    builder.set_element_tags(element, 11, 12, true);
    let mesh = builder.build();
    assert_eq!(mesh.rank(), 3);
    assert_eq!(mesh.node(0).owner, 1);
    assert_eq!(mesh.node(1).owner, 3);
    let element = mesh.element(element);
    assert_eq!(element.owner, 3);
    assert_eq!((element.geometry_tag, element.physical_tag, element.curved), (11, 12, true));
    assert_eq!(element.faces.len(), 1);
}
