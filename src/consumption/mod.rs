/*! The consumption link `⊕`: given two driving legs' time-to-energy
tradeoffs, find the jointly time-optimal split of any total travel time
between them and the resulting combined tradeoff.

The case split on parameter arity (2 linear pieces, one-of-each, or 2
hyperbolic) lives in the sibling [`lin_lin`], [`hyp_lin`] and [`hyp_hyp`]
modules; [`combine`] holds the algebra for collapsing two hyperbolic
pieces linked through an interior witness back into one. */

mod combine;
mod hyp_hyp;
mod hyp_lin;
mod lin_lin;

use itertools::Itertools;

use crate::envelope::{lower_envelope, Candidate};
use crate::error::Result;
use crate::function::{Evaluate, LimitedSub, LinearPiece, PiecewiseFunction, SubFunction};
use crate::scalar::EPSILON;

fn link_pair(
    x_f_min: f64,
    x_f_max: f64,
    x_g_min: f64,
    x_g_max: f64,
    sub_f: &SubFunction,
    sub_g: &SubFunction,
) -> Result<Vec<Candidate>> {
    let x_max = x_f_max + x_g_max;
    let x_min = x_f_min + x_g_min;

    let mut out = Vec::new();
    if x_max.is_finite() {
        let y_min = sub_f.evaluate(x_f_max) + sub_g.evaluate(x_g_max);
        out.push(Candidate::new(x_max, f64::INFINITY, LinearPiece::new(0.0, x_f_max)?, LinearPiece::new(0.0, y_min)?));
    }

    if x_min < x_max {
        let more = match (sub_f, sub_g) {
            (SubFunction::Linear(f), SubFunction::Linear(g)) => lin_lin::link(x_f_min, x_f_max, x_g_min, x_g_max, f, g)?,
            (SubFunction::HypLin(f), SubFunction::Linear(g)) => hyp_lin::link(x_f_min, x_f_max, x_g_min, x_g_max, f, g)?,
            (SubFunction::Linear(f), SubFunction::HypLin(g)) => {
                hyp_lin::link_flipped(x_f_min, x_f_max, x_g_min, x_g_max, f, g)?
            }
            (SubFunction::HypLin(f), SubFunction::HypLin(g)) => hyp_hyp::link(x_f_min, x_f_max, x_g_min, x_g_max, f, g)?,
        };
        out.extend(more);
    }
    Ok(out)
}

/// Build `(opt_d, h)` from a bag of candidate pieces: drop the ones that
/// are infeasible at their own left endpoint, sweep the rest down to a
/// lower envelope, and prepend a `[0, first breakpoint)` infeasible
/// sentinel if the envelope doesn't already start at `x = 0`.
///
/// Shared with [`crate::charging::link_charging`], which assembles its
/// own differently-shaped candidate bag the same way.
pub(crate) fn assemble(candidates: Vec<Candidate>) -> Result<(PiecewiseFunction, PiecewiseFunction)> {
    let finite: Vec<Candidate> = candidates.into_iter().filter(|c| c.value.evaluate(c.xmin).is_finite()).collect();

    if finite.is_empty() {
        let sentinel = LinearPiece::infeasible();
        return Ok((
            PiecewiseFunction::from_pieces(vec![LimitedSub::new(0.0, f64::INFINITY, sentinel)])?,
            PiecewiseFunction::from_pieces(vec![LimitedSub::new(0.0, f64::INFINITY, sentinel)])?,
        ));
    }

    // re-normalise per the crate's lifecycle contract: consecutive envelope
    // pieces that kept the same winning candidate are the same underlying
    // function and collapse into one wider piece.
    let envelope: Vec<(f64, f64, usize)> = lower_envelope(&finite)?
        .into_iter()
        .coalesce(|a, b| if a.2 == b.2 { Ok((a.0, b.1, a.2)) } else { Err((a, b)) })
        .collect();

    let mut d_pieces = Vec::with_capacity(envelope.len());
    let mut h_pieces = Vec::with_capacity(envelope.len());
    for (xmin, xmax, idx) in &envelope {
        let c = &finite[*idx];
        d_pieces.push(LimitedSub::new(*xmin, *xmax, SubFunction::Linear(c.witness)));
        h_pieces.push(LimitedSub::new(*xmin, *xmax, c.value.clone()));
    }

    if d_pieces[0].xmin > EPSILON {
        let sentinel = LinearPiece::infeasible();
        d_pieces.insert(0, LimitedSub::new(0.0, d_pieces[0].xmin, sentinel));
        h_pieces.insert(0, LimitedSub::new(0.0, h_pieces[0].xmin, sentinel));
    } else if d_pieces[0].xmin > 0.0 {
        // within epsilon of zero: snap to zero rather than emit a
        // sliver sentinel piece narrower than the tolerance.
        d_pieces[0].xmin = 0.0;
        h_pieces[0].xmin = 0.0;
    }

    Ok((PiecewiseFunction::from_pieces(d_pieces)?, PiecewiseFunction::from_pieces(h_pieces)?))
}

/// Link two consumption tradeoffs `f` and `g`, returning `(opt_d, h)`:
/// `opt_d(t)` is how much of total time `t` the `f`-leg should get, and
/// `h(t)` is the resulting combined tradeoff.
pub fn link_consumption(f: &PiecewiseFunction, g: &PiecewiseFunction) -> Result<(PiecewiseFunction, PiecewiseFunction)> {
    let mut candidates = Vec::new();
    for (x_f_min, x_f_max, sub_f) in f.intervals() {
        if !sub_f.evaluate(x_f_min).is_finite() || !sub_f.evaluate(x_f_max).is_finite() {
            continue;
        }
        for (x_g_min, x_g_max, sub_g) in g.intervals() {
            if !sub_g.evaluate(x_g_min).is_finite() || !sub_g.evaluate(x_g_max).is_finite() {
                continue;
            }
            candidates.extend(link_pair(x_f_min, x_f_max, x_g_min, x_g_max, sub_f, sub_g)?);
        }
    }
    assemble(candidates)
}
