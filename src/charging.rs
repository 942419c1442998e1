/*! The charging link `⊗_M`: given a consumption tradeoff `f` and a
charging function `cf` with capacity `M`, find the jointly time-optimal
split between driving and dwelling to charge, and the resulting
combined tradeoff.

Ground truth for the candidate generation order below is the reference
implementation's `__link_charging`: for every hyperbolic piece of `f`,
try the interior witness against every linear piece of `cf` first, then
every `f`-piece's own left endpoint, then (in a second pass) the
"dwell-for-`x - d`" family built by chaining [`shift`]/[`clip`]/
[`multiply`]/[`offset`], and finally the straight-through "no charging"
family. The envelope sweep's tie-breaking depends on candidates arriving
in this order when several coincide. */

use crate::consumption::assemble;
use crate::envelope::Candidate;
use crate::error::Result;
use crate::function::{clip, invert_piecewise_linear, multiply, offset, shift, Evaluate, LinearPiece, PiecewiseFunction};
use crate::scalar::EPSILON;

/// Candidate witnesses `d`: every `x_min` of every piece of `f`, plus,
/// for each hyperbolic piece of `f` against each linear piece of `cf`
/// with positive slope, the interior crossover when it lies strictly
/// inside both the `f`-piece and the induced `cf`-piece domain.
fn candidate_witnesses(f: &PiecewiseFunction, cf: &PiecewiseFunction, cf_inv: &PiecewiseFunction, m: f64) -> Vec<f64> {
    let mut ds = Vec::new();
    for (x_min, x_max, sub_f) in f.intervals() {
        if let Some(hyp) = sub_f.as_hyplin() {
            for (z_min, z_max, sub_cf) in cf.intervals() {
                let linear_cf = match sub_cf.as_linear() {
                    Some(l) => l,
                    None => continue,
                };
                if linear_cf.a > EPSILON {
                    let x_i = hyp.b + (2.0 * hyp.a / linear_cf.a).cbrt();
                    if x_i > x_min && x_i < x_max {
                        let z = cf_inv.evaluate(m - sub_f.evaluate(x_i));
                        if z >= z_min && z <= z_max {
                            ds.push(x_i);
                        }
                    }
                }
            }
        }
        ds.push(x_min);
    }
    ds
}

/// Link a consumption tradeoff `f` with a charging function `cf` of
/// capacity `m`, returning `(opt_d, h)`.
pub fn link_charging(f: &PiecewiseFunction, cf: &PiecewiseFunction, m: f64) -> Result<(PiecewiseFunction, PiecewiseFunction)> {
    let cf_inv = invert_piecewise_linear(cf)?;
    let ds = candidate_witnesses(f, cf, &cf_inv, m);

    let mut candidates = Vec::new();

    // driving straight through, no charging at all
    for (x_min, x_max, sub_f) in f.intervals() {
        candidates.push(Candidate::new(x_min, x_max, LinearPiece::new(1.0, 0.0)?, sub_f.clone()));
    }

    for d in ds {
        let remaining = m - f.evaluate(d);
        if remaining <= EPSILON {
            continue;
        }
        let z0 = cf_inv.evaluate(remaining);
        let clipped = match clip(cf, z0) {
            Some(c) => c,
            None => continue,
        };
        // h(z) = M - cf(z0 + (z - d)): shift the clipped charging curve
        // so its origin sits at z0, then at d, negate and offset by M.
        let h = offset(&multiply(&shift(&shift(&clipped, z0)?, -d)?, -1.0)?, m)?;
        let witness = LinearPiece::new(0.0, d)?;
        for (z_min, z_max, sub_h) in h.intervals() {
            let z_min = z_min.max(d);
            if z_min < z_max {
                candidates.push(Candidate::new(z_min, z_max, witness, sub_h.clone()));
            }
        }
    }

    assemble(candidates)
}
