use nalgebra::DMatrix;

/// Poor man's approx assertion for matrices
#[macro_export]
macro_rules! assert_approx_matrix_eq {
    ($x:expr, $y:expr, abstol = $tol:expr) => {{
        let diff = $x.clone() - $y.clone();

        let max_absdiff = diff.abs().max();
        let approx_eq = max_absdiff <= $tol;

        if !approx_eq {
            println!("abstol: {:e}", $tol);
            println!("left: {}", $x);
            println!("right: {}", $y);
            println!("diff: {:e}", diff);
        }
        assert!(approx_eq);
    }};
}

#[macro_export]
macro_rules! assert_panics {
    ($e:expr) => {{
        use std::panic::catch_unwind;
        use std::stringify;
        let expr_string = stringify!($e);
        let result = catch_unwind(|| $e);
        if result.is_ok() {
            panic!("assert_panics!({}) failed.", expr_string);
        }
    }};
}

/// Central difference approximation of the derivatives of a vector-valued function.
///
/// Returns a `dim x m` matrix whose row `i` approximates the derivative of `f` along axis `i`,
/// where `f` maps a point of dimension `dim` to `m` values.
pub fn central_difference(f: impl Fn(&[f64]) -> Vec<f64>, x: &[f64], h: f64) -> DMatrix<f64> {
    let m = f(x).len();
    let mut result = DMatrix::zeros(x.len(), m);
    for i in 0..x.len() {
        let mut forward = x.to_vec();
        let mut backward = x.to_vec();
        forward[i] += h;
        backward[i] -= h;
        let (f_forward, f_backward) = (f(&forward), f(&backward));
        for j in 0..m {
            result[(i, j)] = (f_forward[j] - f_backward[j]) / (2.0 * h);
        }
    }
    result
}
