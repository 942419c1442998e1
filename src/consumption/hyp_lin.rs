use crate::envelope::Candidate;
use crate::error::Result;
use crate::function::{HypLinPiece, LinearPiece};
use crate::scalar::{is_zero, EPSILON};

/// Link a hyperbolic tradeoff `f` with a linear one `g`. `d_star` is the
/// crossover point where `f`'s and `g`'s derivatives agree; outside the
/// domain it collapses to a single boundary witness, inside it splits
/// the domain into three pieces (`f`-only, crossover, `f`-only again is
/// impossible here since `f` is convex and `g` is flat or linear, so the
/// middle piece is always the crossover one).
pub fn link(
    x_f_min: f64,
    x_f_max: f64,
    x_g_min: f64,
    x_g_max: f64,
    f: &HypLinPiece,
    g: &LinearPiece,
) -> Result<Vec<Candidate>> {
    let x_max = x_f_max + x_g_max;
    let x_min = x_f_min + x_g_min;

    let d_star = if !is_zero(g.a) {
        f.b + (-2.0 * f.a / g.a).cbrt()
    } else {
        f64::INFINITY
    };

    let mut out = Vec::new();
    if d_star < x_f_min {
        if EPSILON + x_min < x_g_max + x_f_min {
            out.push(Candidate::new(
                x_min,
                x_g_max + x_f_min,
                LinearPiece::new(0.0, x_f_min)?,
                LinearPiece::new(g.a, g.b - g.a * x_f_min + f.evaluate(x_f_min))?,
            ));
        }
        if EPSILON + x_g_max + x_f_min < x_max {
            out.push(Candidate::new(
                x_g_max + x_f_min,
                x_max,
                LinearPiece::new(1.0, -x_g_max)?,
                HypLinPiece::new(f.a, f.b + x_g_max, f.c + g.evaluate(x_g_max), 0.0)?,
            ));
        }
    } else if d_star > x_f_max {
        if EPSILON + x_min < x_f_max + x_g_min {
            out.push(Candidate::new(
                x_min,
                x_f_max + x_g_min,
                LinearPiece::new(1.0, -x_g_min)?,
                HypLinPiece::new(f.a, f.b + x_g_min, f.c + g.evaluate(x_g_min), 0.0)?,
            ));
        }
        if EPSILON + x_f_max + x_g_min < x_max {
            out.push(Candidate::new(
                x_f_max + x_g_min,
                x_max,
                LinearPiece::new(0.0, x_f_max)?,
                LinearPiece::new(g.a, g.b - g.a * x_f_max + f.evaluate(x_f_max))?,
            ));
        }
    } else {
        if EPSILON + x_min < d_star + x_g_min {
            out.push(Candidate::new(
                x_min,
                d_star + x_g_min,
                LinearPiece::new(1.0, -x_g_min)?,
                HypLinPiece::new(f.a, f.b + x_g_min, f.c + g.evaluate(x_g_min), 0.0)?,
            ));
        }
        if EPSILON + d_star + x_g_min < d_star + x_g_max {
            out.push(Candidate::new(
                d_star + x_g_min,
                d_star + x_g_max,
                LinearPiece::new(0.0, d_star)?,
                LinearPiece::new(g.a, g.b - g.a * d_star + f.evaluate(d_star))?,
            ));
        }
        if EPSILON + d_star + x_g_max < x_max {
            out.push(Candidate::new(
                d_star + x_g_max,
                x_max,
                LinearPiece::new(1.0, -x_g_max)?,
                HypLinPiece::new(f.a, f.b + x_g_max, f.c + g.evaluate(x_g_max), 0.0)?,
            ));
        }
    }
    Ok(out)
}

/// `f` linear, `g` hyperbolic: solve the mirrored problem (`g`
/// hyperbolic in the first slot) and flip the witness back, since it
/// reports how much of the *first* argument's domain was consumed.
pub fn link_flipped(
    x_f_min: f64,
    x_f_max: f64,
    x_g_min: f64,
    x_g_max: f64,
    f: &LinearPiece,
    g: &HypLinPiece,
) -> Result<Vec<Candidate>> {
    let reversed = link(x_g_min, x_g_max, x_f_min, x_f_max, g, f)?;
    Ok(flip_witness(reversed))
}

/// `d(x) = x - d'(x)`, i.e. "whatever the reversed witness didn't
/// consume". Shared with the hyperbolic/hyperbolic case, which also
/// solves in swapped argument order and must flip its witness back.
pub(super) fn flip_witness(candidates: Vec<Candidate>) -> Vec<Candidate> {
    candidates
        .into_iter()
        .map(|c| {
            let witness = LinearPiece { a: 1.0 - c.witness.a, b: -c.witness.b };
            Candidate { witness, ..c }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::Evaluate;
    use crate::tests::{hyp, lin};

    #[test]
    fn crossover_past_domain_yields_single_boundary_witness() {
        // g completely flat: d_star is +inf, so f always dominates first
        let f = hyp(4.0, 0.0, 0.0, 0.0);
        let g = lin(0.0, 5.0);
        let out = link(0.0, 10.0, 0.0, 10.0, &f, &g).unwrap();
        assert!(!out.is_empty());
        for c in &out {
            assert!(c.value.evaluate(c.xmin).is_finite());
        }
    }
}
