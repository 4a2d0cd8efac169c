//! Numerical integration.

/// Gauss-Legendre quadrature of order 13 over `[a, b]`.
///
/// Exact for polynomials up to degree 25; the speed of a cubic curve is
/// the square root of a quartic, which 13 nodes integrate to well below
/// single-precision error for typical segments.
pub fn gauss_legendre13<F>(f: F, a: f64, b: f64) -> f64
where
    F: Fn(f64) -> f64,
{
    // Roots of the Legendre polynomial P13 and their weights
    #[allow(clippy::unreadable_literal, clippy::excessive_precision)]
    const NODES: [f64; 13] = [
        -0.9841830547185881,
        -0.9175983992229779,
        -0.8015780907333099,
        -0.6423493394403403,
        -0.44849275103644687,
        -0.23045831595513483,
        0.0,
        0.23045831595513483,
        0.44849275103644687,
        0.6423493394403403,
        0.8015780907333099,
        0.9175983992229779,
        0.9841830547185881,
    ];
    #[allow(clippy::unreadable_literal, clippy::excessive_precision)]
    const WEIGHTS: [f64; 13] = [
        0.04048400476531615,
        0.0921214998377276,
        0.1388735102197876,
        0.17814598076194554,
        0.20781604753688862,
        0.2262831802628975,
        0.23255155323087406,
        0.2262831802628975,
        0.20781604753688862,
        0.17814598076194554,
        0.1388735102197876,
        0.0921214998377276,
        0.04048400476531615,
    ];
    let half_width = (b - a) * 0.5;
    let center = (a + b) * 0.5;
    let sum: f64 = NODES
        .iter()
        .zip(WEIGHTS.iter())
        .map(|(&x, &w)| w * f(half_width * x + center))
        .sum();
    half_width * sum
}
