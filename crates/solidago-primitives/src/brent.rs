//! Brent's root-finding method.
//!
//! Combines bisection, secant and inverse quadratic interpolation. The
//! iteration keeps a bracketing interval at all times, so it converges for
//! any continuous function with a sign change, and for monotone step
//! functions it converges to the jump.

use solidago_core::errors::NumericError;

/// Relative tolerance added to `xtol`.
const RTOL: f64 = 4.0 * f64::EPSILON;

const MAX_ITERATIONS: usize = 500;

/// Bracket expansion stops once either bound exceeds this magnitude.
const MAX_BRACKET: f64 = 1e30;

/// Finds a zero of `f` in `[a, b]`, within `xtol`.
///
/// Requires `f(a) * f(b) <= 0`, else fails with [`NumericError::NoBracket`].
pub fn brent_root<F>(mut f: F, a: f64, b: f64, xtol: f64) -> Result<f64, NumericError>
where
    F: FnMut(f64) -> f64,
{
    let (mut xpre, mut xcur) = (a, b);
    let (mut fpre, mut fcur) = (f(xpre), f(xcur));

    if fpre.is_nan() || fcur.is_nan() {
        return Err(NumericError::InvalidInput {
            operation: "brent_root",
            message: format!("f is NaN at a bracket end: f({a}) = {fpre}, f({b}) = {fcur}"),
        });
    }
    if fpre * fcur > 0.0 {
        return Err(NumericError::NoBracket {
            a,
            b,
            fa: fpre,
            fb: fcur,
        });
    }
    if fpre == 0.0 {
        return Ok(xpre);
    }
    if fcur == 0.0 {
        return Ok(xcur);
    }

    let (mut xblk, mut fblk) = (0.0, 0.0);
    let (mut spre, mut scur) = (0.0, 0.0);

    for _ in 0..MAX_ITERATIONS {
        if fpre != 0.0 && fcur != 0.0 && (fpre < 0.0) != (fcur < 0.0) {
            xblk = xpre;
            fblk = fpre;
            spre = xcur - xpre;
            scur = spre;
        }
        if fblk.abs() < fcur.abs() {
            xpre = xcur;
            xcur = xblk;
            xblk = xpre;

            fpre = fcur;
            fcur = fblk;
            fblk = fpre;
        }

        let delta = (xtol + RTOL * xcur.abs()) / 2.0;
        let sbis = (xblk - xcur) / 2.0;
        if fcur == 0.0 || sbis.abs() < delta {
            return Ok(xcur);
        }

        if spre.abs() > delta && fcur.abs() < fpre.abs() {
            let stry = if xpre == xblk {
                // interpolate
                -fcur * (xcur - xpre) / (fcur - fpre)
            } else {
                // extrapolate
                let dpre = (fpre - fcur) / (xpre - xcur);
                let dblk = (fblk - fcur) / (xblk - xcur);
                -fcur * (fblk * dblk - fpre * dpre) / (dblk * dpre * (fblk - fpre))
            };
            if 2.0 * stry.abs() < spre.abs().min(3.0 * sbis.abs() - delta) {
                // good short step
                spre = scur;
                scur = stry;
            } else {
                // bisect
                spre = sbis;
                scur = sbis;
            }
        } else {
            // bisect
            spre = sbis;
            scur = sbis;
        }

        xpre = xcur;
        fpre = fcur;
        if scur.abs() > delta {
            xcur += scur;
        } else {
            xcur += if sbis > 0.0 { delta } else { -delta };
        }
        fcur = f(xcur);
    }

    Err(NumericError::NonConvergence {
        solver: "brent",
        iterations: MAX_ITERATIONS,
    })
}

/// Like [`brent_root`], but first widens `[a, b]` until it brackets a root.
///
/// Each expansion pushes both ends outward by the current width. Fails
/// with [`NumericError::NoBracket`] once the bounds pass 1e30.
pub fn brent_root_expanding<F>(mut f: F, a: f64, b: f64, xtol: f64) -> Result<f64, NumericError>
where
    F: FnMut(f64) -> f64,
{
    let (mut lo, mut hi) = if a <= b { (a, b) } else { (b, a) };
    let (mut flo, mut fhi) = (f(lo), f(hi));
    while flo * fhi > 0.0 {
        if lo.abs() > MAX_BRACKET || hi.abs() > MAX_BRACKET {
            return Err(NumericError::NoBracket {
                a: lo,
                b: hi,
                fa: flo,
                fb: fhi,
            });
        }
        let width = (hi - lo).max(f64::EPSILON);
        lo -= width;
        hi += width;
        flo = f(lo);
        fhi = f(hi);
    }
    brent_root(f, lo, hi, xtol)
}
