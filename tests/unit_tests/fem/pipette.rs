use crate::{embed, single_element_builder, single_element_mesh};
use fenlink::connectivity::{facet_corners, num_facets};
use fenlink::dof::DofManager;
use fenlink::element::ElementType;
use fenlink::error::GroupError;
use fenlink::fem::pipette::Pipette;
use fenlink::fem::{Group, GroupSettings, LinkMode};
use fenlink::mesh::procedural::{create_box_hex8, create_box_tet4, create_rectangle_tri3};
use fenlink::mesh::Mesh;
use fenlink::proptest::affine_map3;
use fenlink::quadrature::facet::{AxisSource, HEX_MASTER};
use fenlink::quadrature::IntegrationScheme;
use matrixcompare::assert_scalar_eq;
use nalgebra::{DVector, Matrix2, Vector2, Vector3};
use proptest::prelude::*;

#[test]
fn default_pipette() {
    let pipette = Pipette::default();
    assert_eq!(pipette.order, 6);
    assert_eq!(pipette.scheme, IntegrationScheme::Gauss);
    assert_eq!(Pipette::with_order(3).order, 3);

    let pipette: Pipette = serde_json::from_str(r#"{ "order": 4 }"#).unwrap();
    assert_eq!(pipette, Pipette::with_order(4));
}

#[test]
fn curved_hexahedron_volume() {
    // The top and bottom faces are paraboloids shifted along z, which leaves the volume at 8
    let mesh = single_element_mesh(ElementType::Hex27, 1, |xi| {
        Vector3::new(xi[0], xi[1], xi[2] + 0.1 * xi[0] * xi[0] + 0.1 * xi[1] * xi[1])
    });
    let element = mesh.element(0);
    let pipette = Pipette::with_order(8);
    let by_quadrature = pipette.element_measure(&mesh, element).unwrap();
    let by_boundary = pipette.measure_by_boundary(&mesh, element).unwrap();
    assert_scalar_eq!(by_quadrature, 8.0, comp = abs, tol = 1e-11);
    assert_scalar_eq!(by_boundary, 8.0, comp = abs, tol = 1e-11);

    // The curved top face is larger than its projection
    let top = pipette.facet_area(&mesh, element, 5).unwrap();
    assert!(top > 4.0);
}

const BOUNDARY: u64 = 2;

/// Boundary group of a single `HEX27` element with all six facets in one side set.
fn hexahedron_boundary(map: impl Fn(&[f64]) -> Vector3<f64>, order: usize) -> (Mesh, Group) {
    let mut builder = single_element_builder(ElementType::Hex27, 1, map);
    let facets: Vec<_> = (0..num_facets(ElementType::Hex27)).map(|f| (0, f)).collect();
    builder.add_boundary_sideset(BOUNDARY, &facets).unwrap();
    let mesh = builder.build();
    let manager = DofManager::new(&mesh, Default::default());
    let settings = GroupSettings {
        integration_order: Some(order),
        ..Default::default()
    };
    let group = Group::sideset(&mesh, &manager, BOUNDARY, LinkMode::FacetOnly, settings).unwrap();
    (mesh, group)
}

/// Reference tangents of facet `f` of a hexahedron along the facet coordinates `s` and `t`.
fn hexahedron_tangents(f: usize) -> (Vector3<f64>, Vector3<f64>) {
    let mut ds = Vector3::zeros();
    let mut dt = Vector3::zeros();
    for (i, source) in HEX_MASTER[f].iter().enumerate() {
        match source {
            AxisSource::S => ds[i] = 1.0,
            AxisSource::MinusS => ds[i] = -1.0,
            AxisSource::T => dt[i] = 1.0,
            AxisSource::MinusT => dt[i] = -1.0,
            AxisSource::One | AxisSource::MinusOne => {}
        }
    }
    (ds, dt)
}

/// Area of facet `f` integrated with the master table of the group in the volume element.
fn area_from_master_table(mesh: &Mesh, group: &Group, f: usize) -> f64 {
    let data = group.master_integration(f).unwrap();
    let coordinates = mesh.element_coordinates(mesh.element(0));
    let (ds, dt) = hexahedron_tangents(f);
    (0..data.num_points())
        .map(|k| {
            let jacobian = &coordinates * data.dn_dxi(k).transpose();
            let a = &jacobian * DVector::from_column_slice(ds.as_slice());
            let b = &jacobian * DVector::from_column_slice(dt.as_slice());
            let a = Vector3::new(a[0], a[1], a[2]);
            let b = Vector3::new(b[0], b[1], b[2]);
            data.weights()[k] * a.cross(&b).norm()
        })
        .sum()
}

#[test]
fn curved_hexahedron_facet_areas_from_master_tables() {
    let map = |xi: &[f64]| Vector3::new(xi[0], xi[1], xi[2] + 0.1 * xi[0] * xi[0] + 0.1 * xi[1] * xi[1]);
    let (mesh, group) = hexahedron_boundary(map, 8);
    let pipette = Pipette::with_order(8);
    let element = mesh.element(0);
    for f in 0..num_facets(ElementType::Hex27) {
        let expected = pipette.facet_area(&mesh, element, f).unwrap();
        let area = area_from_master_table(&mesh, &group, f);
        assert_scalar_eq!(area, expected, comp = abs, tol = 1e-12);
    }

    // The table points of the top facet lie on the curved surface
    let data = group.master_integration(5).unwrap();
    let coordinates = mesh.element_coordinates(element);
    for k in 0..data.num_points() {
        let x = &coordinates * data.n(k).transpose();
        assert_scalar_eq!(data.points()[(2, k)], 1.0, comp = abs, tol = 1e-14);
        let z = 1.0 + 0.1 * x[0] * x[0] + 0.1 * x[1] * x[1];
        assert_scalar_eq!(x[2], z, comp = abs, tol = 1e-13);
    }
}

#[test]
fn planar_element_areas() {
    let a = Matrix2::new(2.0, 0.5, -0.25, 1.5);
    let b = Vector2::new(0.3, -1.0);
    let map = |xi: &[f64]| {
        let x = a * Vector2::new(xi[0], xi[1]) + b;
        Vector3::new(x[0], x[1], 0.0)
    };
    let pipette = Pipette::default();
    for (element_type, reference_area) in [
        (ElementType::Quad4, 4.0),
        (ElementType::Quad9, 4.0),
        (ElementType::Tri3, 0.5),
        (ElementType::Tri6, 0.5),
    ] {
        let mesh = single_element_mesh(element_type, 1, map);
        let element = mesh.element(0);
        let expected = reference_area * a.determinant().abs();
        let area = pipette.element_measure(&mesh, element).unwrap();
        let by_boundary = pipette.measure_by_boundary(&mesh, element).unwrap();
        assert_scalar_eq!(area, expected, comp = abs, tol = 1e-12);
        assert_scalar_eq!(by_boundary, expected, comp = abs, tol = 1e-12);
    }

    // Edge lengths of the reference quad, stretched by the map
    let mesh = single_element_mesh(ElementType::Quad4, 1, embed);
    let lengths: Vec<f64> = (0..4)
        .map(|f| pipette.facet_area(&mesh, mesh.element(0), f).unwrap())
        .collect();
    for length in lengths {
        assert_scalar_eq!(length, 2.0, comp = abs, tol = 1e-14);
    }
    assert!(pipette.facet_area(&mesh, mesh.element(0), 4).is_err());
}

#[test]
fn block_and_group_measures_agree() {
    let pipette = Pipette::default();
    for (builder, volume) in [
        (create_box_hex8([2, 2, 2], [2.0, 1.0, 3.0], 1), 6.0),
        (create_box_tet4([1, 2, 1], [1.0, 1.0, 1.0], 1), 1.0),
        (create_rectangle_tri3([3, 2], [3.0, 0.5], 1), 1.5),
    ] {
        let mesh = builder.build();
        let block = pipette.block_measure(&mesh, 1).unwrap();
        assert_scalar_eq!(block, volume, comp = abs, tol = 1e-12);

        let manager = DofManager::new(&mesh, Default::default());
        let group = Group::block(&mesh, &manager, 1, GroupSettings::default()).unwrap();
        assert_scalar_eq!(pipette.group_measure(&mesh, &group), volume, comp = abs, tol = 1e-12);
    }

    let mesh = create_box_hex8([1, 1, 1], [1.0, 1.0, 1.0], 1).build();
    let err = pipette.block_measure(&mesh, 2).unwrap_err();
    assert_eq!(err.downcast_ref::<GroupError>(), Some(&GroupError::UnknownBlock(2)));
}

proptest! {
    #[test]
    fn affine_hexahedron_measures((a, b) in affine_map3()) {
        let mesh = single_element_mesh(ElementType::Hex27, 1, |xi| a * embed(xi) + b);
        let element = mesh.element(0);
        let pipette = Pipette::default();
        let volume = 8.0 * a.determinant().abs();
        prop_assert!((pipette.element_measure(&mesh, element).unwrap() - volume).abs() < 1e-11);
        prop_assert!((pipette.measure_by_boundary(&mesh, element).unwrap() - volume).abs() < 1e-11);

        // Facets of a parallelepiped are parallelograms
        for f in 0..num_facets(ElementType::Hex27) {
            let corners = facet_corners(ElementType::Hex27, f);
            let x = |i: usize| mesh.node(element.nodes[corners[i]]).coords;
            let expected = (x(1) - x(0)).cross(&(x(3) - x(0))).norm();
            let area = pipette.facet_area(&mesh, element, f).unwrap();
            prop_assert!((area - expected).abs() < 1e-11 * expected.max(1.0));
        }
    }

    #[test]
    fn affine_hexahedron_facet_areas_from_master_tables((a, b) in affine_map3()) {
        let (mesh, group) = hexahedron_boundary(|xi| a * embed(xi) + b, 2);
        let element = mesh.element(0);
        for f in 0..num_facets(ElementType::Hex27) {
            let corners = facet_corners(ElementType::Hex27, f);
            let x = |i: usize| mesh.node(element.nodes[corners[i]]).coords;
            let expected = (x(1) - x(0)).cross(&(x(3) - x(0))).norm();
            let area = area_from_master_table(&mesh, &group, f);
            prop_assert!((area - expected).abs() < 1e-11 * expected.max(1.0));
        }
    }

    #[test]
    fn affine_tetrahedron_volume((a, b) in affine_map3()) {
        let mesh = single_element_mesh(ElementType::Tet10, 1, |xi| a * embed(xi) + b);
        let element = mesh.element(0);
        let pipette = Pipette::with_order(2);
        let volume = a.determinant().abs() / 6.0;
        prop_assert!((pipette.element_measure(&mesh, element).unwrap() - volume).abs() < 1e-12);
        prop_assert!((pipette.measure_by_boundary(&mesh, element).unwrap() - volume).abs() < 1e-12);
    }
}
