//! Numerical integration.
//!
//! Two fixed rules are provided:
//! - [`gauss_legendre_5`]: five-point Gauss-Legendre on a single interval,
//!   exact for polynomials up to degree 9. Used for the many narrow shells
//!   of a redshift grid.
//! - [`simpson`]: composite Simpson rule over an even number of panels,
//!   used for one-off integrals over a wide range.

/// Five-point Gauss-Legendre abscissae on [-1, 1].
const GL5_NODES: [f64; 5] = [
    -0.906_179_845_938_664,
    -0.538_469_310_105_683_1,
    0.0,
    0.538_469_310_105_683_1,
    0.906_179_845_938_664,
];

/// Five-point Gauss-Legendre weights on [-1, 1].
const GL5_WEIGHTS: [f64; 5] = [
    0.236_926_885_056_189_1,
    0.478_628_670_499_366_5,
    0.568_888_888_888_888_9,
    0.478_628_670_499_366_5,
    0.236_926_885_056_189_1,
];

/// Integrate `f` over `[a, b]` with the five-point Gauss-Legendre rule.
///
/// # Example
///
/// ```
/// use popsim_core::math::quadrature::gauss_legendre_5;
///
/// let integral = gauss_legendre_5(|x| x * x, 0.0, 3.0);
/// assert!((integral - 9.0).abs() < 1e-12);
/// ```
#[inline]
pub fn gauss_legendre_5<F: Fn(f64) -> f64>(f: F, a: f64, b: f64) -> f64 {
    let half = 0.5 * (b - a);
    let mid = 0.5 * (b + a);
    let sum: f64 = GL5_NODES
        .iter()
        .zip(GL5_WEIGHTS.iter())
        .map(|(&x, &w)| w * f(mid + half * x))
        .sum();
    half * sum
}

/// Integrate `f` over `[a, b]` with the composite Simpson rule.
///
/// `panels` is rounded up to the next even number and to at least 2.
///
/// # Example
///
/// ```
/// use popsim_core::math::quadrature::simpson;
///
/// let integral = simpson(|x: f64| x.sin(), 0.0, std::f64::consts::PI, 128);
/// assert!((integral - 2.0).abs() < 1e-7);
/// ```
pub fn simpson<F: Fn(f64) -> f64>(f: F, a: f64, b: f64, panels: usize) -> f64 {
    if a == b {
        return 0.0;
    }
    let n = panels.max(2);
    let n = if n % 2 == 0 { n } else { n + 1 };
    let h = (b - a) / n as f64;

    let mut sum = f(a) + f(b);
    for i in 1..n {
        let x = a + i as f64 * h;
        sum += if i % 2 == 1 { 4.0 * f(x) } else { 2.0 * f(x) };
    }
    sum * h / 3.0
}
