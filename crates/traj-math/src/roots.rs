//! Scalar root finding.

/// Find a root of `f` in `[xmin, xmax]` by bisection.
///
/// Stops when the bracket is narrower than `xtol` or after `max_calls`
/// evaluations of `f`. If `f` has no sign change on the interval, the
/// bound whose function value is closer to zero is returned.
pub fn bisect<F>(f: F, mut xmin: f64, mut xmax: f64, xtol: f64, max_calls: usize) -> f64
where
    F: Fn(f64) -> f64,
{
    debug_assert!(xmin <= xmax);
    let mut fmin = f(xmin);
    if fmin == 0.0 {
        return xmin;
    }
    let mut fmax = f(xmax);
    if fmax == 0.0 {
        return xmax;
    }
    let mut calls = 2;
    if fmin * fmax < 0.0 {
        while calls < max_calls && (xmax - xmin) > xtol {
            let xmid = (xmin + xmax) * 0.5;
            if xmid <= xmin || xmid >= xmax {
                // No representable value left between the bounds
                return xmid;
            }
            let fmid = f(xmid);
            calls += 1;
            if fmid == 0.0 {
                return xmid;
            }
            if fmin * fmid < 0.0 {
                xmax = xmid;
                fmax = fmid;
            } else {
                xmin = xmid;
                fmin = fmid;
            }
        }
    }
    if fmin.abs() < fmax.abs() {
        xmin
    } else {
        xmax
    }
}
