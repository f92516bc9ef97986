use fenlink::dof::{DofConfig, DofManager, DofType, GroupDofTypes};
use fenlink::fem::{link_block_element, link_facet, EdgeDirection, ElementSource, LinkMode};
use fenlink::mesh::procedural::{create_box_hex8, create_rectangle_quad4};
use nalgebra::Vector3;
use util::assert_panics;

#[test]
fn rotation_data() {
    let mesh = create_rectangle_quad4([1, 1], [1.0, 1.0], 1).build();
    let manager = DofManager::new(&mesh, DofConfig::default());
    let mut element = link_block_element(&mesh, &manager, 0).unwrap();
    assert!(!element.has_rotation_data());
    assert_eq!(element.node_rotation(0), None);

    element.allocate_rotation_data(4);
    assert!(element.has_rotation_data());
    assert_eq!(element.node_rotation(3), Some((0.0, Vector3::zeros())));

    let axis = Vector3::new(0.0, 0.0, 1.0);
    element.set_node_rotation(2, 0.5, &axis);
    assert_eq!(element.node_rotation(2), Some((0.5, axis)));
    assert_eq!(element.node_rotation(1), Some((0.0, Vector3::zeros())));
}

#[test]
fn dof_indices_follow_manager() {
    let mesh = create_rectangle_quad4([2, 1], [2.0, 1.0], 1).build();
    let config = DofConfig::default().with_group(1, GroupDofTypes::nodal(&[DofType::Temperature]));
    let mut manager = DofManager::new(&mesh, config);
    let element = link_block_element(&mesh, &manager, 1).unwrap();
    assert!(element.dof_indices(&manager).iter().all(Option::is_none));

    manager.fix(element.dof(0), 1.0);
    manager.index_dofs();
    let indices = element.dof_indices(&manager);
    assert_eq!(indices[0], Some(0));
    assert!(indices[1..].iter().all(|index| index.unwrap() < 5));
}

#[test]
fn edge_directions_of_linked_elements() {
    let mut builder = create_box_hex8([2, 1, 1], [2.0, 1.0, 1.0], 1);
    builder.add_interface_sideset(2, &[(0, 1)]).unwrap();
    let mesh = builder.build();
    let manager = DofManager::new(&mesh, DofConfig::default());

    // The first element to reference an edge defines its direction
    let first = link_block_element(&mesh, &manager, 0).unwrap();
    assert_eq!(first.source(), ElementSource::Volume(0));
    assert!((0..12).all(|e| first.edge_direction(e) == EdgeDirection::Forward));

    let facet = link_facet(&mesh, &manager, 0, 2, LinkMode::FacetOnly).unwrap();
    assert_eq!(facet.number_of_dofs(), 0);
    // Directions are resolved even for sides without edge dofs
    assert_eq!(facet.edge_directions().len(), 4);
    assert_panics!(facet.edge_direction(4));

    let second = link_block_element(&mesh, &manager, 1).unwrap();
    assert_panics!(second.edge_direction(12));
}

#[test]
fn set_rotation_without_allocation_panics() {
    assert_panics!({
        let mesh = create_rectangle_quad4([1, 1], [1.0, 1.0], 1).build();
        let manager = DofManager::new(&mesh, DofConfig::default());
        let mut element = link_block_element(&mesh, &manager, 0).unwrap();
        element.set_node_rotation(0, 1.0, &Vector3::x());
    });
}
