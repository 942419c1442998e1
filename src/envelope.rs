/*! The lower-envelope sweep: given a bag of `(xmin, xmax, witness, f)`
candidates, return the minimal partition of the x-axis into
`(xmin, xmax, winning-index)` pieces such that the winner is the
pointwise minimum of every candidate active at that `x`.

This is the component that both [`crate::consumption::link_consumption`]
and [`crate::charging::link_charging`] hand their generated candidates
to once the closed-form case-split has produced a bag of pieces wider
than the final answer. */

use crate::error::{Error, Result};
use crate::function::{HypLinPiece, LinearPiece, SubFunction};
use crate::scalar::{cubic_real_roots, eps_round, intersect, is_empty_interval, is_zero, EPSILON};

/// One candidate piece handed to the sweep: valid on `[xmin, xmax]`,
/// contributing value `value(x)` and witness `witness(x)` (how much of
/// `x` the first linked operand consumes).
#[derive(Debug, Clone)]
pub struct Candidate {
    pub xmin: f64,
    pub xmax: f64,
    pub witness: LinearPiece,
    pub value: SubFunction,
}

impl Candidate {
    pub fn new(xmin: f64, xmax: f64, witness: LinearPiece, value: impl Into<SubFunction>) -> Self {
        Candidate { xmin, xmax, witness, value: value.into() }
    }
}

#[derive(Clone, Copy, Debug)]
enum Event {
    Open(usize),
    Close(usize),
    Synthetic,
}

/// Compute the lower envelope of `candidates`. Returns a minimal
/// partition `(xmin, xmax, index)` where `index` refers back into
/// `candidates`.
///
/// Fails with [`Error::EnvelopeDegenerate`] if any candidate is
/// degenerate at entry: width `<= EPSILON`, or infinite value at its
/// own left endpoint.
pub fn lower_envelope(candidates: &[Candidate]) -> Result<Vec<(f64, f64, usize)>> {
    for c in candidates {
        if is_empty_interval((c.xmin, c.xmax)) {
            return Err(Error::EnvelopeDegenerate { x: c.xmin, reason: "candidate interval narrower than EPSILON" });
        }
        if !c.value.evaluate(c.xmin).is_finite() {
            return Err(Error::EnvelopeDegenerate { x: c.xmin, reason: "candidate value infinite at its own left endpoint" });
        }
    }

    let mut events: Vec<(f64, Event)> = Vec::with_capacity(candidates.len() * 2);
    for (i, c) in candidates.iter().enumerate() {
        events.push((c.xmin, Event::Open(i)));
        events.push((c.xmax, Event::Close(i)));
    }
    events.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());

    let mut active: Vec<usize> = Vec::new();
    let mut minimum: Vec<(f64, usize)> = Vec::new();

    while !events.is_empty() {
        let current_x = events[0].0;
        while !events.is_empty() && events[0].0 <= current_x + EPSILON {
            let (_, ev) = events.remove(0);
            match ev {
                Event::Open(i) => active.push(i),
                Event::Close(i) => active.retain(|&a| a != i),
                Event::Synthetic => {}
            }
        }

        if !active.is_empty() {
            let next_x = events.first().map(|e| e.0).unwrap_or(f64::INFINITY);

            let mut ranked: Vec<(f64, f64, usize)> = active
                .iter()
                .map(|&i| {
                    let c = &candidates[i];
                    (c.value.evaluate(current_x), c.value.evaluate(next_x), i)
                })
                .collect();
            ranked.sort_by(|a, b| {
                let ka = (eps_round(a.0), eps_round(a.1));
                let kb = (eps_round(b.0), eps_round(b.1));
                ka.partial_cmp(&kb).unwrap()
            });

            minimum.push((current_x, ranked[0].2));

            let mut new_events = Vec::new();
            for window in ranked.windows(2) {
                let (_, _, idx1) = window[0];
                let (_, _, idx2) = window[1];
                let c1 = &candidates[idx1];
                let c2 = &candidates[idx2];
                let (lo, hi) = intersect((c1.xmin, c1.xmax), (c2.xmin, c2.xmax));
                let lo = current_x.max(lo);
                if lo < hi {
                    let xs = intersect_functions(&c1.value, &c2.value, (lo, hi))?;
                    for x in xs {
                        log::trace!("synthetic intersection event at x={x} between candidates {idx1} and {idx2}");
                        new_events.push((x, Event::Synthetic));
                    }
                }
            }
            if !new_events.is_empty() {
                events.extend(new_events);
                events.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());
            }
        }
    }

    let mut xs: Vec<f64> = minimum.iter().map(|(x, _)| *x).collect();
    xs.push(f64::INFINITY);
    let idxs: Vec<usize> = minimum.into_iter().map(|(_, idx)| idx).collect();

    Ok(xs.windows(2).zip(idxs).map(|(w, idx)| (w[0], w[1], idx)).collect())
}

/// Closed-form intersection of two sub-functions over `domain`,
/// dispatched by parameter arity. Hyperbolic/hyperbolic intersection is
/// a known gap (see the crate's design notes): it returns no
/// intersections rather than silently producing a wrong envelope, and
/// logs a warning so the gap is observable.
pub fn intersect_functions(f1: &SubFunction, f2: &SubFunction, domain: (f64, f64)) -> Result<Vec<f64>> {
    match (f1, f2) {
        (SubFunction::Linear(l1), SubFunction::Linear(l2)) => Ok(intersect_linear_linear(l1, l2, domain)),
        (SubFunction::Linear(l), SubFunction::HypLin(h)) | (SubFunction::HypLin(h), SubFunction::Linear(l)) => {
            intersect_linear_hyperbolic(l, h, domain)
        }
        (SubFunction::HypLin(_), SubFunction::HypLin(_)) => {
            log::warn!(
                "hyperbolic/hyperbolic intersection on {:?} is unimplemented; treating as non-intersecting",
                domain
            );
            Ok(vec![])
        }
    }
}

fn intersect_linear_linear(l1: &LinearPiece, l2: &LinearPiece, (xmin, xmax): (f64, f64)) -> Vec<f64> {
    if is_zero(l1.a - l2.a) {
        return vec![];
    }
    let x = (l2.b - l1.b) / (l1.a - l2.a);
    if x > xmin && x < xmax {
        vec![x]
    } else {
        vec![]
    }
}

fn intersect_linear_hyperbolic(l: &LinearPiece, h: &HypLinPiece, (xmin, xmax): (f64, f64)) -> Result<Vec<f64>> {
    if !is_zero(l.a) {
        let roots = cubic_real_roots(-l.a, h.c - l.b - l.a * h.b, 0.0, h.a)?;
        Ok(roots.into_iter().map(|z| z + h.b).filter(|x| *x > xmin && *x < xmax).collect())
    } else if is_zero(l.b - h.c) {
        Ok(vec![])
    } else {
        let under_root = h.a / (h.c - l.b);
        if under_root < 0.0 {
            return Ok(vec![]);
        }
        let x = h.b + under_root.sqrt();
        if x > xmin && x < xmax {
            Ok(vec![x])
        } else {
            Ok(vec![])
        }
    }
}
