use crate::envelope::Candidate;
use crate::error::Result;
use crate::function::LinearPiece;
use crate::scalar::EPSILON;

/// Link two linear tradeoffs. Whichever operand has the steeper decline
/// (larger slope, since both are non-increasing so both slopes are
/// `<= 0`) should be driven through first; the other one absorbs the
/// remaining time.
pub fn link(
    x_f_min: f64,
    x_f_max: f64,
    x_g_min: f64,
    x_g_max: f64,
    f: &LinearPiece,
    g: &LinearPiece,
) -> Result<Vec<Candidate>> {
    let x_max = x_f_max + x_g_max;
    let x_min = x_f_min + x_g_min;

    let mut out = Vec::new();
    if f.a >= g.a {
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
                LinearPiece::new(f.a, f.b - f.a * x_g_max + g.evaluate(x_g_max))?,
            ));
        }
    } else {
        if EPSILON + x_min < x_f_max + x_g_min {
            out.push(Candidate::new(
                x_min,
                x_f_max + x_g_min,
                LinearPiece::new(1.0, -x_g_min)?,
                LinearPiece::new(f.a, f.b - f.a * x_g_min + g.evaluate(x_g_min))?,
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
    }
    Ok(out)
}
