use super::combine::combine_consumption;
use super::hyp_lin::flip_witness;
use crate::envelope::Candidate;
use crate::error::{Error, Result};
use crate::function::{HypLinPiece, LinearPiece};
use crate::scalar::EPSILON;

/// Link two hyperbolic tradeoffs. Both are strictly convex and
/// decreasing, so their derivatives at the domain endpoints order the
/// three-way split: spend time on whichever one is steepest first, both
/// in the middle once their marginal costs cross, then the other one.
///
/// Always normalizes so `f`'s minimum-derivative endpoint is at least as
/// steep as `g`'s, recursing with the operands and the final witness
/// swapped otherwise.
pub fn link(
    x_f_min: f64,
    x_f_max: f64,
    x_g_min: f64,
    x_g_max: f64,
    f: &HypLinPiece,
    g: &HypLinPiece,
) -> Result<Vec<Candidate>> {
    let f_min_deriv = f.derivative_at(x_f_min);
    let g_min_deriv = g.derivative_at(x_g_min);

    if f_min_deriv > g_min_deriv {
        let swapped = link(x_g_min, x_g_max, x_f_min, x_f_max, g, f)?;
        return Ok(flip_witness(swapped));
    }

    let f_max_deriv = f.derivative_at(x_f_max);
    let g_max_deriv = g.derivative_at(x_g_max);

    let x_max = x_f_max + x_g_max;
    let x_min = x_f_min + x_g_min;

    let ratio_ga_fa = (g.a / f.a).cbrt();
    let ratio_fa_ga = (f.a / g.a).cbrt();

    let d_star_a = 1.0 / (1.0 + ratio_ga_fa);
    let d_star_b = (-g.b + f.b * ratio_ga_fa) * d_star_a;
    let d_star = LinearPiece::new(d_star_a, d_star_b)?;

    let x_f_max_star = x_f_max + g.b + ratio_ga_fa * (x_f_max - f.b);
    let x_g_min_star = x_g_min + f.b + ratio_fa_ga * (x_g_min - g.b);
    let x_g_max_star = x_g_max + f.b + ratio_fa_ga * (x_g_max - g.b);

    let mut out = Vec::new();
    if g_min_deriv <= f_max_deriv && f_max_deriv < g_max_deriv {
        if EPSILON + x_min < x_g_min_star {
            let d_first = LinearPiece::new(1.0, -x_g_min)?;
            out.push(Candidate::new(x_min, x_g_min_star, d_first, combine_consumption(f, g, &d_first)?));
        }
        if EPSILON + x_g_min_star < x_f_max_star {
            out.push(Candidate::new(x_g_min_star, x_f_max_star, d_star, combine_consumption(f, g, &d_star)?));
        }
        if EPSILON + x_f_max_star < x_max {
            let d_last = LinearPiece::new(0.0, x_f_max)?;
            out.push(Candidate::new(x_f_max_star, x_max, d_last, combine_consumption(f, g, &d_last)?));
        }
    } else if f_max_deriv <= g_min_deriv {
        if EPSILON + x_min < x_f_max + x_g_min {
            let d_first = LinearPiece::new(1.0, -x_g_min)?;
            out.push(Candidate::new(x_min, x_f_max + x_g_min, d_first, combine_consumption(f, g, &d_first)?));
        }
        if EPSILON + x_f_max + x_g_min < x_max {
            let d_last = LinearPiece::new(0.0, x_f_max)?;
            out.push(Candidate::new(x_f_max + x_g_min, x_max, d_last, combine_consumption(f, g, &d_last)?));
        }
    } else if g_max_deriv <= f_max_deriv {
        if EPSILON + x_min < x_g_min_star {
            let d_first = LinearPiece::new(1.0, -x_g_min)?;
            out.push(Candidate::new(x_min, x_g_min_star, d_first, combine_consumption(f, g, &d_first)?));
        }
        if EPSILON + x_g_min_star < x_g_max_star {
            out.push(Candidate::new(x_g_min_star, x_g_max_star, d_star, combine_consumption(f, g, &d_star)?));
        }
        if EPSILON + x_g_max_star < x_max {
            let d_last = LinearPiece::new(1.0, -x_g_max)?;
            out.push(Candidate::new(x_g_max_star, x_max, d_last, combine_consumption(f, g, &d_last)?));
        }
    } else {
        return Err(Error::UnhandledLinkCase { f_arity: 4, g_arity: 4 });
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::Evaluate;
    use crate::tests::hyp;

    #[test]
    fn steeper_operand_drives_first() {
        let f = hyp(1.0, -2.0, -0.5, 0.0); // TradeoffFunction(2, 4, 1, 1, -0.5) shifted
        let g = hyp(4.0, 1.0, 1.0, 0.0); // TradeoffFunction(5, 10, 4, 4, 1) shifted
        let out = link(2.0, 4.0, 5.0, 10.0, &f, &g).unwrap();
        assert!(!out.is_empty());
        for c in &out {
            assert!(c.xmin < c.xmax);
            assert!(c.value.evaluate((c.xmin + c.xmax.min(c.xmin + 1.0)) / 2.0).is_finite());
        }
    }
}
