/*! Scalar utilities shared by every other module: the epsilon knob,
real roots of a cubic, interval intersection, and monotonicity tests.

All epsilon-sensitive comparisons in this crate --- interval collapse,
monotonicity, cubic-coefficient zero tests, envelope tie-break rounding
--- go through [`EPSILON`] so that tightening or loosening tolerance is
a one-constant change. */

use crate::error::{Error, Result};

/// The process-wide tolerance. Two values within `EPSILON` of each
/// other are considered equal; an interval narrower than `EPSILON` is
/// considered empty.
pub const EPSILON: f64 = 1e-4;

/// `true` iff `a` and `b` are within [`EPSILON`] of each other.
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= EPSILON
}

/// `true` iff `a` is zero to within [`EPSILON`].
pub fn is_zero(a: f64) -> bool {
    a.abs() <= EPSILON
}

/// Round `value` to `floor(-log10(EPSILON))` decimal digits. Used only
/// as a secondary sort key when the envelope sweep breaks ties between
/// candidates whose values coincide up to tolerance; infinities pass
/// through unchanged.
pub fn eps_round(value: f64) -> f64 {
    if value.is_infinite() {
        return value;
    }
    let digits = (-EPSILON.log10()).floor();
    let scale = 10f64.powf(digits);
    (value * scale).round() / scale
}

/// Intersect two closed intervals. Returns an interval with
/// `lo > hi` (callers must check for emptiness, e.g. via
/// [`is_empty_interval`]) if the two do not overlap.
pub fn intersect(a: (f64, f64), b: (f64, f64)) -> (f64, f64) {
    (a.0.max(b.0), a.1.min(b.1))
}

/// `true` iff the interval `(lo, hi)` is empty or narrower than
/// [`EPSILON`].
pub fn is_empty_interval((lo, hi): (f64, f64)) -> bool {
    hi - lo <= EPSILON
}

/// Classify a sequence as ascending, descending, both (iff constant),
/// or neither.
pub fn monotonicity(seq: &[f64]) -> (bool, bool) {
    let mut ascending = true;
    let mut descending = true;
    for window in seq.windows(2) {
        ascending &= window[0] <= window[1];
        descending &= window[0] >= window[1];
    }
    (ascending, descending)
}

/// Real roots of `a*z^3 + b*z^2 + c*z + d = 0`, via the depressed-cubic
/// discriminant `delta = 4p^3 + 27q^2` where
/// `p = (3ac - b^2) / (3a^2)` and `q = (2b^3 - 9abc + 27a^2d) / (27a^3)`.
///
/// Dispatches on the sign of `delta` and `p`:
/// - `delta > 0, p > 0`: one real root via `sinh^-1`.
/// - `delta > 0, p < 0`: one real root via `cosh^-1`, sign-corrected by `sign(q)`.
/// - `delta <= 0, p < 0`: three real roots via `cos` with `k in {0, 1, 2}`.
/// - all other branches (including `p == 0` with `delta > 0`, and `p > 0`
///   with `delta <= 0`, which cannot occur for real coefficients) yield no
///   roots.
///
/// Fails with [`Error::InvalidCoefficient`] if any input is non-finite or
/// `a == 0`.
pub fn cubic_real_roots(a: f64, b: f64, c: f64, d: f64) -> Result<Vec<f64>> {
    if !(a.is_finite() && b.is_finite() && c.is_finite() && d.is_finite()) || a == 0.0 {
        return Err(Error::InvalidCoefficient { a, b, c, d });
    }

    let p = (3.0 * a * c - b * b) / (3.0 * a * a);
    let q = (2.0 * b * b * b - 9.0 * a * b * c + 27.0 * a * a * d) / (27.0 * a * a * a);
    let shift = |t: f64| t - b / (3.0 * a);
    let delta = 4.0 * p * p * p + 27.0 * q * q;

    let roots = if delta > 0.0 {
        if p > 0.0 {
            let t0 =
                -2.0 * (p / 3.0).sqrt() * ((3.0 * q / (2.0 * p) * (3.0 / p).sqrt()).asinh() / 3.0).sinh();
            vec![shift(t0)]
        } else if p < 0.0 {
            let t0 = -2.0
                * q.signum()
                * (-p / 3.0).sqrt()
                * ((-3.0 * q.abs() / (2.0 * p) * (-3.0 / p).sqrt()).acosh() / 3.0).cosh();
            vec![shift(t0)]
        } else {
            // p == 0, delta > 0: degenerate branch, carried over as-is from
            // the reference implementation (no closed form is evaluated here).
            vec![]
        }
    } else if p < 0.0 {
        let tk = |k: f64| {
            2.0 * (-p / 3.0).sqrt()
                * ((3.0 * q / (2.0 * p) * (-3.0 / p).sqrt()).acos() / 3.0 - 2.0 * k * std::f64::consts::PI / 3.0)
                    .cos()
        };
        vec![shift(tk(0.0)), shift(tk(1.0)), shift(tk(2.0))]
    } else if p > 0.0 {
        // delta <= 0 with p > 0 cannot happen for real coefficients; the
        // reference implementation treats it as a hard error rather than
        // silently returning a wrong answer.
        return Err(Error::InvalidCoefficient { a, b, c, d });
    } else {
        // delta <= 0, p == 0: triple real root.
        vec![shift(0.0)]
    };

    Ok(roots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn three_real_roots() {
        // z^3 - 15z - 4 = 0
        let mut roots = cubic_real_roots(1.0, 0.0, -15.0, -4.0).unwrap();
        roots.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(roots.len(), 3);
        assert_approx_eq!(roots[0], -3.7320508, 1e-6);
        assert_approx_eq!(roots[1], -0.2679492, 1e-6);
        assert_approx_eq!(roots[2], 4.0, 1e-6);
    }

    #[test]
    fn single_real_root() {
        // z^3 + 3z = 0 has only z = 0 as a real root (p=3>0, delta>0)
        let roots = cubic_real_roots(1.0, 0.0, 3.0, 0.0).unwrap();
        assert_eq!(roots.len(), 1);
        assert_approx_eq!(roots[0], 0.0, 1e-6);
    }

    #[test]
    fn repeated_root() {
        // (z - 3)^3 = z^3 - 9z^2 + 27z - 27 = 0
        let roots = cubic_real_roots(1.0, -9.0, 27.0, -27.0).unwrap();
        assert_eq!(roots.len(), 1);
        assert_approx_eq!(roots[0], 3.0, 1e-6);
    }

    #[test]
    fn rejects_non_finite() {
        // NaN never equals itself, so the NaN-carrying variant can't be
        // compared with assert_eq! -- check the shape instead.
        assert!(matches!(cubic_real_roots(f64::NAN, 0.0, 0.0, 0.0), Err(Error::InvalidCoefficient { .. })));
    }

    #[test]
    fn rejects_zero_leading_coefficient() {
        assert!(cubic_real_roots(0.0, 1.0, 1.0, 1.0).is_err());
    }

    #[test]
    fn intersect_intervals() {
        assert_eq!(intersect((0.0, 10.0), (5.0, 20.0)), (5.0, 10.0));
        assert!(is_empty_interval(intersect((0.0, 5.0), (6.0, 10.0))));
    }

    #[test]
    fn monotonicity_classifies() {
        assert_eq!(monotonicity(&[1.0, 2.0, 3.0]), (true, false));
        assert_eq!(monotonicity(&[3.0, 2.0, 1.0]), (false, true));
        assert_eq!(monotonicity(&[1.0, 1.0, 1.0]), (true, true));
        assert_eq!(monotonicity(&[1.0, 2.0, 1.0]), (false, false));
    }
}
