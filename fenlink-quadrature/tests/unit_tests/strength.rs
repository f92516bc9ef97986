use fenlink_quadrature::strength::{hexahedron, line, prism, tetrahedron, triangle, MAX_STRENGTH};
use fenlink_quadrature::{integrate, Error};
use matrixcompare::assert_scalar_eq;

#[test]
fn rules_by_strength_have_expected_sizes() {
    assert_eq!(line(0).unwrap().0.len(), 1);
    assert_eq!(line(1).unwrap().0.len(), 1);
    assert_eq!(line(2).unwrap().0.len(), 2);
    assert_eq!(line(3).unwrap().0.len(), 2);
    assert_eq!(hexahedron(3).unwrap().0.len(), 8);
    assert_eq!(triangle(2).unwrap().0.len(), 4);
    assert_eq!(tetrahedron(2).unwrap().0.len(), 27);
}

#[test]
fn rules_by_strength_measure_reference_domains() {
    for strength in 0..=8 {
        let tri = triangle(strength).unwrap();
        let tet = tetrahedron(strength).unwrap();
        let pri = prism(strength).unwrap();
        assert_scalar_eq!(integrate(&tri, |_| 1.0), 0.5, comp = abs, tol = 1e-14);
        assert_scalar_eq!(integrate(&tet, |_| 1.0), 1.0 / 6.0, comp = abs, tol = 1e-14);
        assert_scalar_eq!(integrate(&pri, |_| 1.0), 1.0, comp = abs, tol = 1e-14);
    }
}

#[test]
fn prism_rule_is_exact_for_its_strength() {
    // x^2 y z^2 over the prism (triangle x [-1, 1]): (2! 1! / 5!) * (2 / 3)
    let rule = prism(5).unwrap();
    let estimate = integrate(&rule, |&[x, y, z]| x * x * y * z * z);
    assert_scalar_eq!(estimate, (2.0 / 120.0) * (2.0 / 3.0), comp = abs, tol = 1e-14);
}

#[test]
fn excessive_strength_is_rejected() {
    assert_eq!(line(MAX_STRENGTH + 1).unwrap_err(), Error::NoRuleAvailable);
    assert_eq!(tetrahedron(MAX_STRENGTH + 1).unwrap_err(), Error::NoRuleAvailable);
}
