use crate::error::Result;
use crate::function::{Evaluate, HypLinPiece, LinearPiece, SubFunction};
use crate::scalar::is_zero;

/// `f(d) + g(x - d)` collapsed back to a single hyperbolic (or, in the
/// degenerate case, linear) sub-function, for the two "spend time on
/// both" witnesses the hyperbolic/hyperbolic case split produces.
///
/// `d_a == 0` and `d_a == 1` are the two boundary witnesses (all time on
/// `g`, all time on `f`); anything else is the interior witness, where
/// the closed form for combining two convex hyperbolic tradeoffs under
/// an optimal split applies directly.
pub fn combine_consumption(f: &HypLinPiece, g: &HypLinPiece, d: &LinearPiece) -> Result<SubFunction> {
    let (a3, b3, c3) = if is_zero(d.a) {
        (g.a, g.b + d.b, g.c + f.evaluate(d.b))
    } else if is_zero(d.a - 1.0) {
        let flipped = LinearPiece::new(0.0, -d.b)?;
        return combine_consumption(g, f, &flipped);
    } else {
        let a3 = f.a + g.a + 3.0 * ((f.a * f.a * g.a).cbrt() + (f.a * g.a * g.a).cbrt());
        (a3, f.b + g.b, f.c + g.c)
    };

    if !is_zero(a3) {
        Ok(SubFunction::HypLin(HypLinPiece::new(a3, b3, c3, 0.0)?))
    } else {
        Ok(SubFunction::Linear(LinearPiece::new(0.0, c3)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::hyp;

    #[test]
    fn boundary_witness_reduces_to_shifted_g() {
        let f = hyp(1.0, 0.0, 0.0, 0.0);
        let g = hyp(1.0, 0.0, 0.0, 0.0);
        let d = LinearPiece::new(0.0, 3.0).unwrap();
        let combined = combine_consumption(&f, &g, &d).unwrap();
        // d(x) = 3 for all x, so f(d)+g(x-d) = f(3) + g(x-3)
        assert!((combined.evaluate(5.0) - (f.evaluate(3.0) + g.evaluate(2.0))).abs() < 1e-6);
    }

    #[test]
    fn flip_boundary_witness_reduces_to_shifted_f() {
        let f = hyp(1.0, 0.0, 0.0, 0.0);
        let g = hyp(2.0, 0.0, 0.0, 0.0);
        let d = LinearPiece::new(1.0, -3.0).unwrap();
        let combined = combine_consumption(&f, &g, &d).unwrap();
        // d(x) = x - 3, so f(d) + g(x-d) = f(x-3) + g(3)
        assert!((combined.evaluate(5.0) - (f.evaluate(2.0) + g.evaluate(3.0))).abs() < 1e-6);
    }
}
