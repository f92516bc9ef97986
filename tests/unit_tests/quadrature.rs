use fenlink::element::{ElementType, GeometryType};
use fenlink::quadrature::{default_order, intpoints, IntegrationScheme, QuadratureError};
use matrixcompare::assert_scalar_eq;
use nalgebra::{DMatrix, DVector};


const GEOMETRIES: [(GeometryType, f64); 6] = [
    (GeometryType::Line, 2.0),
    (GeometryType::Tri, 0.5),
    (GeometryType::Quad, 4.0),
    (GeometryType::Tet, 1.0 / 6.0),
    (GeometryType::Penta, 1.0),
    (GeometryType::Hex, 8.0),
];

fn factorial(n: usize) -> f64 {
    (1..=n).map(|i| i as f64).product()
}

fn rule(geometry: GeometryType, order: usize) -> (DVector<f64>, DMatrix<f64>) {
    intpoints(IntegrationScheme::Gauss, geometry, order).unwrap()
}

#[test]
fn weights_sum_to_reference_measure() {
    for (geometry, measure) in GEOMETRIES {
        for order in 0..8 {
            let (weights, points) = rule(geometry, order);
            assert_eq!(points.nrows(), geometry.dimension());
            assert_eq!(points.ncols(), weights.len());
            assert_scalar_eq!(weights.sum(), measure, comp = abs, tol = 1e-13);
        }
    }
}

#[test]
fn simplex_rules_integrate_monomials_exactly() {
    // The integral of x^a y^b over the reference triangle is a! b! / (a + b + 2)!,
    // and of x^a y^b z^c over the reference tetrahedron a! b! c! / (a + b + c + 3)!
    for order in 0..7 {
        let (weights, points) = rule(GeometryType::Tri, order);
        for a in 0..=order {
            let b = order - a;
            let approx: f64 = (0..weights.len())
                .map(|k| weights[k] * points[(0, k)].powi(a as i32) * points[(1, k)].powi(b as i32))
                .sum();
            let exact = factorial(a) * factorial(b) / factorial(a + b + 2);
            assert_scalar_eq!(approx, exact, comp = abs, tol = 1e-14);
        }

        let (weights, points) = rule(GeometryType::Tet, order);
        for a in 0..=order {
            for b in 0..=(order - a) {
                let c = order - a - b;
                let approx: f64 = (0..weights.len())
                    .map(|k| {
                        weights[k]
                            * points[(0, k)].powi(a as i32)
                            * points[(1, k)].powi(b as i32)
                            * points[(2, k)].powi(c as i32)
                    })
                    .sum();
                let exact = factorial(a) * factorial(b) * factorial(c) / factorial(a + b + c + 3);
                assert_scalar_eq!(approx, exact, comp = abs, tol = 1e-14);
            }
        }
    }
}

#[test]
fn tensor_rules_integrate_monomials_exactly() {
    let exact_1d = |p: usize| if p % 2 == 0 { 2.0 / (p as f64 + 1.0) } else { 0.0 };
    for order in 0..9 {
        let (weights, points) = rule(GeometryType::Hex, order);
        let approx: f64 = (0..weights.len())
            .map(|k| weights[k] * points[(0, k)].powi(order as i32) * points[(2, k)].powi(order as i32))
            .sum();
        assert_scalar_eq!(approx, exact_1d(order) * exact_1d(order) * 2.0, comp = abs, tol = 1e-13);
    }
}

#[test]
fn default_order_is_twice_the_degree() {
    assert_eq!(default_order(ElementType::Quad4), 2);
    assert_eq!(default_order(ElementType::Tet10), 4);
    assert_eq!(default_order(ElementType::Hex27), 4);
}

#[test]
fn too_high_orders_are_reported() {
    let result = intpoints::<f64>(IntegrationScheme::Gauss, GeometryType::Hex, 1000);
    assert_eq!(result, Err(QuadratureError::NoRuleAvailable));
}
