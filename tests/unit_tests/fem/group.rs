use fenlink::dof::{DofConfig, DofManager, DofType, EntityKey, GroupDofTypes};
use fenlink::element::ElementType;
use fenlink::error::{GroupError, LinkError, OrientationError};
use fenlink::fem::{Group, GroupKind, GroupSettings, GroupState, LinkMode, Measure, ShellLink};
use fenlink::mesh::procedural::{create_box_hex8, create_rectangle_quad4};
use fenlink::mesh::{Id, MeshBuilder};
use fenlink::quadrature::IntegrationScheme;
use nalgebra::{DMatrix, Point3};
use util::assert_approx_matrix_eq;

const BLOCK: Id = 1;

fn temperature(groups: &[Id]) -> DofConfig {
    groups.iter().fold(DofConfig::default(), |config, &id| {
        config.with_group(id, GroupDofTypes::nodal(&[DofType::Temperature]))
    })
}

#[test]
fn block_group_lifecycle() {
    let mesh = create_rectangle_quad4([2, 2], [1.0, 1.0], BLOCK).build();
    let manager = DofManager::new(&mesh, temperature(&[BLOCK]));
    let group = Group::block(&mesh, &manager, BLOCK, GroupSettings::default()).unwrap();

    assert_eq!(group.state(), GroupState::Ready);
    assert_eq!(group.kind(), GroupKind::Block);
    assert_eq!(group.id(), BLOCK);
    assert_eq!(group.link_mode(), None);
    assert_eq!(group.element_type(), ElementType::Quad4);
    assert_eq!(group.measure(), Measure::Determinant);
    assert_eq!(group.elements().len(), 4);
    assert!(group.integration().is_populated());
    assert_eq!(group.integration().order(), Some(2));
    assert!(group.master_integration(0).is_err());
    assert!(GroupState::Uninitialized < GroupState::IntegrationDataPopulated);
    assert!(GroupState::ElementsLinked < GroupState::Ready);

    for element in group.elements() {
        assert_eq!(element.number_of_dofs(), 4);
    }
}

#[test]
fn jacobian_and_measure_of_scaled_quad() {
    let mesh = create_rectangle_quad4([1, 1], [2.0, 1.0], BLOCK).build();
    let manager = DofManager::new(&mesh, DofConfig::default());
    let group = Group::block(&mesh, &manager, BLOCK, GroupSettings::default()).unwrap();
    let expected = DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 0.0, 0.5]);
    for k in 0..group.integration().num_points() {
        assert_approx_matrix_eq!(group.jacobian(&mesh, 0, k), &expected, abstol = 1e-14);
    }
    assert!((group.element_measure(&mesh, 0) - 2.0).abs() < 1e-14);
}

#[test]
fn boundary_sideset_master_table() {
    let mut builder = create_rectangle_quad4([1, 1], [1.0, 1.0], BLOCK);
    builder.add_boundary_sideset(2, &[(0, 2)]).unwrap();
    let mesh = builder.build();
    let manager = DofManager::new(&mesh, temperature(&[BLOCK, 2]));
    let settings = GroupSettings {
        integration_order: Some(1),
        ..Default::default()
    };
    let group = Group::sideset(&mesh, &manager, 2, LinkMode::FacetAndMaster, settings).unwrap();

    assert_eq!(group.kind(), GroupKind::SideSet);
    assert_eq!(group.link_mode(), Some(LinkMode::FacetAndMaster));
    assert_eq!(group.element_type(), ElementType::Line2);
    assert_eq!(group.master_type(), Some(ElementType::Quad4));
    assert_eq!(group.slave_type(), None);
    assert_eq!(group.measure(), Measure::Length);
    assert_eq!(group.elements()[0].number_of_dofs(), 2 + 4);

    // Facet 2 is the top edge of the quad
    let table = group.master_integration(2).unwrap();
    assert_eq!(table.element_type(), ElementType::Quad4);
    assert_eq!(table.num_points(), 1);
    assert_eq!(table.points()[(1, 0)], 1.0);
    assert!(table.points()[(0, 0)].abs() < 1e-14);
    assert!((table.weights()[0] - 2.0).abs() < 1e-14);

    assert_eq!(
        group.master_integration(4).unwrap_err(),
        GroupError::NoIntegrationTable {
            facet: 4,
            orientation: None
        }
    );
    assert_eq!(
        group.slave_integration(0, 0).unwrap_err(),
        GroupError::NoIntegrationTable {
            facet: 0,
            orientation: Some(0)
        }
    );
    assert!((group.element_measure(&mesh, 0) - 1.0).abs() < 1e-14);
}

#[test]
fn interface_sideset_tables() {
    let mut builder = create_box_hex8([2, 1, 1], [2.0, 1.0, 1.0], BLOCK);
    builder.add_interface_sideset(4, &[(0, 1)]).unwrap();
    let mesh = builder.build();
    let manager = DofManager::new(&mesh, temperature(&[BLOCK, 4]));
    let group = Group::sideset(&mesh, &manager, 4, LinkMode::MasterAndSlave, GroupSettings::default()).unwrap();

    assert_eq!(group.state(), GroupState::Ready);
    assert_eq!(group.element_type(), ElementType::Quad4);
    assert_eq!(group.master_type(), Some(ElementType::Hex8));
    assert_eq!(group.slave_type(), Some(ElementType::Hex8));
    assert_eq!(group.measure(), Measure::Area);
    assert_eq!(group.elements()[0].number_of_dofs(), 16);

    for facet in 0..6 {
        let master = group.master_integration(facet).unwrap();
        for orientation in 0..4 {
            let slave = group.slave_integration(facet, orientation).unwrap();
            assert_eq!(slave.num_points(), master.num_points());
            assert_eq!(slave.weights(), master.weights());
        }
        assert!(group.slave_integration(facet, 4).is_err());
    }
    assert!(group.master_integration(6).is_err());

    // The slave sees the shared facet through its own facet and the orientation of the facet,
    // and both tables describe the same physical points
    let facet = mesh.facet(0);
    let master = group.master_integration(facet.master_index).unwrap();
    let slave = group
        .slave_integration(facet.slave_index, facet.orientation)
        .unwrap();
    let master_coordinates = mesh.element_coordinates(mesh.element(0));
    let slave_coordinates = mesh.element_coordinates(mesh.element(1));
    for k in 0..master.num_points() {
        let x_master = &master_coordinates * master.n(k).transpose();
        let x_slave = &slave_coordinates * slave.n(k).transpose();
        assert_approx_matrix_eq!(x_master, x_slave, abstol = 1e-13);
    }

    assert!((group.element_measure(&mesh, 0) - 1.0).abs() < 1e-14);
}

#[test]
fn shell_sidesets_are_shell_groups() {
    let mut builder = create_box_hex8([2, 1, 1], [2.0, 1.0, 1.0], BLOCK);
    builder.add_interface_sideset(4, &[(0, 1)]).unwrap();
    builder.add_ghost_layers(4, 1).unwrap();
    let mesh = builder.build();
    let config = DofConfig::default().with_group(
        4,
        GroupDofTypes {
            edge: vec![DofType::EdgeField],
            lambda: vec![DofType::Lambda],
            ..Default::default()
        },
    );
    let manager = DofManager::new(&mesh, config);
    let mode = LinkMode::Shell(ShellLink::FacetOnly);
    let group = Group::sideset(&mesh, &manager, 4, mode, GroupSettings::default()).unwrap();
    assert_eq!(group.kind(), GroupKind::Shell);
    assert_eq!(group.link_mode(), Some(mode));
    assert_eq!(group.elements()[0].number_of_dofs(), 4 + 4 + 1);
}

#[test]
fn impose_dirichlet_fixes_each_node_once() {
    let mut builder = create_rectangle_quad4([2, 2], [1.0, 1.0], BLOCK);
    builder.add_boundary_sideset(2, &[(0, 0), (1, 0)]).unwrap();
    let mut mesh = builder.build();
    let config = DofConfig::default()
        .with_group(BLOCK, GroupDofTypes::nodal(&[DofType::Ux, DofType::Temperature]))
        .with_group(2, GroupDofTypes::nodal(&[DofType::Temperature]));
    let mut manager = DofManager::new(&mesh, config);

    let block = Group::block(&mesh, &manager, BLOCK, GroupSettings::default()).unwrap();
    let boundary = Group::sideset(&mesh, &manager, 2, LinkMode::FacetOnly, GroupSettings::default()).unwrap();

    assert_eq!(boundary.impose_dirichlet(&mut mesh, &mut manager, DofType::Temperature, 3.0), 3);
    // Nodes are unflagged on every call
    assert_eq!(boundary.impose_dirichlet(&mut mesh, &mut manager, DofType::Temperature, 3.0), 3);
    assert_eq!(boundary.impose_dirichlet(&mut mesh, &mut manager, DofType::Uz, 1.0), 0);

    for id in [1, 2, 3] {
        let handle = manager
            .find(EntityKey::node(id), DofType::Temperature, 0)
            .unwrap();
        assert!(manager.get(handle).fixed);
        assert_eq!(manager.get(handle).value, 3.0);
    }
    let handle = manager.find(EntityKey::node(4), DofType::Temperature, 0).unwrap();
    assert!(!manager.get(handle).fixed);

    assert_eq!(block.impose_dirichlet(&mut mesh, &mut manager, DofType::Ux, 0.0), 9);
    let (num_free, num_fixed) = manager.index_dofs();
    assert_eq!((num_free, num_fixed), (6, 12));

    // Fixed dofs are indexed separately from free dofs
    let indices = block.elements()[0].dof_indices(&manager);
    assert!(indices.iter().all(Option::is_some));
}

#[test]
fn group_errors() {
    let mut builder = create_rectangle_quad4([1, 1], [1.0, 1.0], BLOCK);
    builder.add_boundary_sideset(2, &[]).unwrap();
    builder.add_boundary_sideset(3, &[(0, 0)]).unwrap();
    let mesh = builder.build();
    let manager = DofManager::new(&mesh, DofConfig::default());

    let err = Group::block(&mesh, &manager, 5, GroupSettings::default()).unwrap_err();
    assert_eq!(err.downcast_ref::<GroupError>(), Some(&GroupError::UnknownBlock(5)));
    let err = Group::sideset(&mesh, &manager, 5, LinkMode::FacetOnly, GroupSettings::default()).unwrap_err();
    assert_eq!(err.downcast_ref::<GroupError>(), Some(&GroupError::UnknownSideSet(5)));
    let err = Group::sideset(&mesh, &manager, 2, LinkMode::FacetOnly, GroupSettings::default()).unwrap_err();
    assert_eq!(err.downcast_ref::<GroupError>(), Some(&GroupError::EmptyGroup(2)));

    // Linking failures surface through group construction
    let err = Group::sideset(&mesh, &manager, 3, LinkMode::FacetAndSlave, GroupSettings::default()).unwrap_err();
    assert_eq!(
        err.downcast_ref::<LinkError>(),
        Some(&LinkError::MissingVolume { facet: 1, side: "slave" })
    );

    let config = DofConfig::default().with_group(
        BLOCK,
        GroupDofTypes {
            edge: vec![DofType::EdgeField, DofType::FaceField],
            ..Default::default()
        },
    );
    let manager = DofManager::new(&mesh, config);
    let err = Group::block(&mesh, &manager, BLOCK, GroupSettings::default()).unwrap_err();
    assert_eq!(
        err.downcast_ref::<LinkError>(),
        Some(&LinkError::MultipleEdgeDofTypes { group: BLOCK, count: 2 })
    );

    let settings = GroupSettings {
        integration_order: Some(1000),
        scheme: IntegrationScheme::Gauss,
        owned_only: false,
    };
    assert!(Group::block(&mesh, &manager, BLOCK, settings).is_err());
}

#[test]
fn prism_interfaces_have_no_slave_tables() {
    // Two prisms stacked along z, sharing the top triangle of the lower one
    let mut builder = MeshBuilder::new(3);
    let corners = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]];
    for level in 0..3 {
        for (i, [x, y]) in corners.iter().enumerate() {
            let id = (3 * level + i + 1) as Id;
            builder
                .add_node(id, Point3::new(*x, *y, level as f64))
                .unwrap();
        }
    }
    builder
        .add_element(BLOCK, ElementType::Penta6, &[1, 2, 3, 4, 5, 6])
        .unwrap();
    builder
        .add_element(BLOCK, ElementType::Penta6, &[4, 5, 6, 7, 8, 9])
        .unwrap();
    builder.add_interface_sideset(2, &[(0, 4)]).unwrap();
    let mesh = builder.build();
    assert_eq!(mesh.facet(0).slave_index, 3);

    let manager = DofManager::new(&mesh, temperature(&[BLOCK, 2]));
    let err = Group::sideset(&mesh, &manager, 2, LinkMode::FacetOnly, GroupSettings::default()).unwrap_err();
    assert_eq!(
        err.downcast_ref::<OrientationError>(),
        Some(&OrientationError::Unimplemented {
            element_type: ElementType::Penta6
        })
    );

    // Volume groups of prisms are fine
    let group = Group::block(&mesh, &manager, BLOCK, GroupSettings::default()).unwrap();
    assert_eq!(group.elements().len(), 2);
    assert!((group.element_measure(&mesh, 1) - 0.5).abs() < 1e-14);
}
