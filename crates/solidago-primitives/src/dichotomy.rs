//! Bisection search for monotone functions.

/// Finds `x` in `[xmin, xmax]` with `f(x) ≈ target`, for `f` non-decreasing.
///
/// Runs `ceil(log2((xmax - xmin) / error))` halvings, so the returned point
/// is within `error` of the crossing. If `f` never reaches `target` on the
/// interval, the corresponding end is returned.
pub fn dichotomy_solve<F>(mut f: F, target: f64, xmin: f64, xmax: f64, error: f64) -> f64
where
    F: FnMut(f64) -> f64,
{
    let span = xmax - xmin;
    let n_iterations = if span > error {
        (span / error).log2().ceil() as usize
    } else {
        0
    };
    let (mut lo, mut hi) = (xmin, xmax);
    for _ in 0..n_iterations {
        let mid = (lo + hi) / 2.0;
        if f(mid) < target {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    (lo + hi) / 2.0
}
