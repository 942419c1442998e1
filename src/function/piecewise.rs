use crate::error::{Error, Result};
use crate::function::hyplin::HypLinPiece;
use crate::function::linear::LinearPiece;
use crate::function::sub::{Evaluate, SubFunction};
use crate::scalar::{monotonicity, EPSILON};

/// `(xmin, xmax, SubFunction)`, with `0 <= xmin <= xmax <= +inf` and the
/// sub-function's natural domain containing `[xmin, xmax]`.
#[derive(Debug, Clone, PartialEq)]
pub struct LimitedSub {
    pub xmin: f64,
    pub xmax: f64,
    pub sub: SubFunction,
}

impl LimitedSub {
    pub fn new(xmin: f64, xmax: f64, sub: impl Into<SubFunction>) -> Self {
        LimitedSub { xmin, xmax, sub: sub.into() }
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        self.sub.evaluate(x)
    }
}

/// An ordered sequence of [`LimitedSub`] pieces tiling `[x0, +inf)`.
///
/// Breakpoints are strictly ascending (modulo [`EPSILON`]) and the last
/// piece always extends to `+inf`. Top-level results produced by the
/// linkers in [`crate::consumption`] and [`crate::charging`] additionally
/// start at `x0 = 0` and carry the left-sentinel/right-plateau shape
/// described in the crate's design notes; intermediate values used only
/// internally (e.g. an inverted charging function) need not.
#[derive(Debug, Clone, PartialEq)]
pub struct PiecewiseFunction {
    pieces: Vec<LimitedSub>,
}

impl PiecewiseFunction {
    /// Build a piecewise function from `n` breakpoints and `n`
    /// sub-functions: piece `i` spans `[xs[i], xs[i+1])`, and the last
    /// piece spans `[xs[n-1], +inf)`.
    pub fn new(xs: &[f64], subs: Vec<SubFunction>) -> Result<Self> {
        if xs.is_empty() || subs.is_empty() || xs.len() != subs.len() {
            return Err(Error::NonFiniteInput { what: "xs/subs length", value: xs.len() as f64 });
        }
        let mut pieces = Vec::with_capacity(xs.len());
        for i in 0..xs.len() {
            let xmin = xs[i];
            let xmax = if i + 1 < xs.len() { xs[i + 1] } else { f64::INFINITY };
            pieces.push(LimitedSub { xmin, xmax, sub: subs[i].clone() });
        }
        PiecewiseFunction::from_pieces(pieces)
    }

    /// Build directly from a list of already-computed pieces, validating
    /// ascending breakpoints and an infinite final piece.
    pub fn from_pieces(pieces: Vec<LimitedSub>) -> Result<Self> {
        if pieces.is_empty() {
            return Err(Error::NonFiniteInput { what: "pieces", value: 0.0 });
        }
        for w in pieces.windows(2) {
            if w[1].xmin <= w[0].xmin + EPSILON {
                return Err(Error::NonFiniteInput { what: "breakpoints not ascending", value: w[1].xmin });
            }
        }
        if !pieces.last().unwrap().xmax.is_infinite() {
            return Err(Error::NonFiniteInput {
                what: "last piece must extend to +inf",
                value: pieces.last().unwrap().xmax,
            });
        }
        Ok(PiecewiseFunction { pieces })
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        match self.piece_at(x) {
            Some(p) => p.evaluate(x),
            None => f64::INFINITY,
        }
    }

    fn piece_at(&self, x: f64) -> Option<&LimitedSub> {
        if x < self.pieces[0].xmin {
            return None;
        }
        // pieces are ascending, so the last piece whose xmin <= x wins
        self.pieces.iter().rev().find(|p| x + EPSILON >= p.xmin)
    }

    /// Lazily iterate `(xmin, xmax, sub)` in ascending order; the final
    /// piece reports `xmax = +inf`.
    pub fn intervals(&self) -> impl Iterator<Item = (f64, f64, &SubFunction)> {
        self.pieces.iter().map(|p| (p.xmin, p.xmax, &p.sub))
    }

    pub fn pieces(&self) -> &[LimitedSub] {
        &self.pieces
    }

    pub fn first_xmin(&self) -> f64 {
        self.pieces[0].xmin
    }
}

/// Build the piecewise-linear pieces through `(xs[i], ys[i])`, per the
/// reference `make_piecewise_linear`: a vertical segment (`dx == 0`)
/// collapses to a flat piece at the earlier `y`, matching how
/// [`ChargingFunction`] tolerates coincident breakpoints in its input.
fn make_piecewise_linear(xs: &[f64], ys: &[f64]) -> Result<Vec<LinearPiece>> {
    let mut out = Vec::with_capacity(xs.len() - 1);
    for i in 0..xs.len() - 1 {
        let dx = xs[i + 1] - xs[i];
        let dy = ys[i + 1] - ys[i];
        let (a, b) = if dx.abs() <= EPSILON {
            (0.0, ys[i])
        } else {
            let a = dy / dx;
            (a, ys[i] - a * xs[i])
        };
        out.push(LinearPiece::new(a, b)?);
    }
    Ok(out)
}

/// A convex non-increasing map from driving time to energy spent:
/// the infeasible sentinel on `[0, t_min)`, a [`HypLinPiece`] tradeoff
/// on `[t_min, t_max)`, and a constant plateau beyond `t_max`.
pub fn consumption_tradeoff(t_min: f64, t_max: f64, a: f64, b: f64, c: f64) -> Result<PiecewiseFunction> {
    let hyp = HypLinPiece::new(a, b, c, 0.0)?;
    let plateau = hyp.evaluate(t_max);
    PiecewiseFunction::new(
        &[0.0, t_min, t_max],
        vec![
            LinearPiece::infeasible().into(),
            SubFunction::HypLin(hyp),
            SubFunction::Linear(LinearPiece::new(0.0, plateau)?),
        ],
    )
}

/// A concave non-decreasing map from dwell time to state-of-charge,
/// bounded by `m`: piecewise-linear through `(ts[i], ys[i])`, with
/// `ys[0] == 0` and `ys[last] == m`, plus a constant plateau at `m`.
pub fn charging_function(ts: &[f64], ys: &[f64], m: f64) -> Result<PiecewiseFunction> {
    if ts.len() != ys.len() || ts.len() < 2 {
        return Err(Error::NonFiniteInput { what: "ts/ys length", value: ts.len() as f64 });
    }
    if (ys[0]).abs() > EPSILON {
        return Err(Error::NonFiniteInput { what: "ys[0] (must be 0)", value: ys[0] });
    }
    if (ys[ys.len() - 1] - m).abs() > EPSILON {
        return Err(Error::NonFiniteInput { what: "ys[last] (must equal m)", value: ys[ys.len() - 1] });
    }
    let mut subs: Vec<SubFunction> = make_piecewise_linear(ts, ys)?.into_iter().map(SubFunction::Linear).collect();
    subs.push(SubFunction::Linear(LinearPiece::new(0.0, m)?));
    let mut pieces = Vec::with_capacity(subs.len());
    for i in 0..ts.len() - 1 {
        pieces.push(LimitedSub::new(ts[i], ts[i + 1], subs[i].clone()));
    }
    pieces.push(LimitedSub::new(ts[ts.len() - 1], f64::INFINITY, subs[subs.len() - 1].clone()));
    PiecewiseFunction::from_pieces(pieces)
}

/// Invert a piecewise-linear function. Requires strict monotonicity
/// (ascending or descending) of piece values at their left endpoints;
/// the descending case reverses piece order. Fails with
/// [`Error::NotMonotone`] otherwise.
pub fn invert_piecewise_linear(f: &PiecewiseFunction) -> Result<PiecewiseFunction> {
    let ys: Vec<f64> = f.pieces().iter().map(|p| p.evaluate(p.xmin)).collect();
    let (ascending, descending) = monotonicity(&ys);
    if !ascending && !descending {
        return Err(Error::NotMonotone);
    }

    let mut inv_domains: Vec<(f64, SubFunction)> = Vec::with_capacity(f.pieces().len());
    if ascending {
        for (i, p) in f.pieces().iter().enumerate() {
            let linear = p.sub.as_linear().ok_or(Error::NotMonotone)?;
            let inv = linear.inverse((p.xmin, p.xmax))?;
            inv_domains.push((ys[i], SubFunction::Linear(inv)));
        }
    } else {
        for p in f.pieces().iter() {
            let linear = p.sub.as_linear().ok_or(Error::NotMonotone)?;
            let y_min = p.evaluate(p.xmax.min(f64::MAX));
            let inv = linear.inverse((p.xmin, p.xmax))?;
            inv_domains.push((y_min, SubFunction::Linear(inv)));
        }
        inv_domains.reverse();
    }

    let xs: Vec<f64> = inv_domains.iter().map(|(x, _)| *x).collect();
    let subs: Vec<SubFunction> = inv_domains.into_iter().map(|(_, f)| f).collect();
    PiecewiseFunction::new(&xs, subs)
}

/// Drop or truncate pieces left of `x0`. Returns `None` if nothing
/// remains.
pub fn clip(f: &PiecewiseFunction, x0: f64) -> Option<PiecewiseFunction> {
    let mut pieces = Vec::new();
    for p in f.pieces() {
        let new_xmin = p.xmin.max(x0);
        if new_xmin < p.xmax {
            pieces.push(LimitedSub { xmin: new_xmin, xmax: p.xmax, sub: p.sub.clone() });
        }
    }
    if pieces.is_empty() {
        None
    } else {
        PiecewiseFunction::from_pieces(pieces).ok()
    }
}

/// Shift the function by `delta`: breakpoints shift by `-delta`,
/// intercepts compensate so values are preserved. Only defined over
/// linear pieces.
pub fn shift(f: &PiecewiseFunction, delta: f64) -> Result<PiecewiseFunction> {
    let mut pieces = Vec::with_capacity(f.pieces().len());
    for p in f.pieces() {
        let shifted = p.sub.shift(delta)?;
        pieces.push(LimitedSub { xmin: p.xmin - delta, xmax: sub_inf_or(p.xmax, delta), sub: shifted });
    }
    PiecewiseFunction::from_pieces(pieces)
}

fn sub_inf_or(x: f64, delta: f64) -> f64 {
    if x.is_infinite() {
        x
    } else {
        x - delta
    }
}

/// Per-piece linear transform: scale every piece's output by `k`.
pub fn multiply(f: &PiecewiseFunction, k: f64) -> Result<PiecewiseFunction> {
    let mut pieces = Vec::with_capacity(f.pieces().len());
    for p in f.pieces() {
        pieces.push(LimitedSub { xmin: p.xmin, xmax: p.xmax, sub: p.sub.multiply(k)? });
    }
    PiecewiseFunction::from_pieces(pieces)
}

/// Per-piece linear transform: shift every piece's output by `k`.
pub fn offset(f: &PiecewiseFunction, k: f64) -> Result<PiecewiseFunction> {
    let mut pieces = Vec::with_capacity(f.pieces().len());
    for p in f.pieces() {
        pieces.push(LimitedSub { xmin: p.xmin, xmax: p.xmax, sub: p.sub.offset(k)? });
    }
    PiecewiseFunction::from_pieces(pieces)
}
