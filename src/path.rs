/*! Folding the consumption and charging linkers across a path: given a
sequence of driving/charging edges, produce the cumulative `(d*, h)`
history and, given a chosen total trip time, the per-edge durations
that attain it.

Ground truth is the reference implementation's `path.py`: `link_path`
and `get_times`. The crate exposes the edge tag as an [`Edge`] enum
rather than `path.py`'s `(is_charging, weight_function)` pair, following
the same tagged-variant style [`crate::function::SubFunction`] uses to
dispatch the function algebra. */

use crate::charging::link_charging;
use crate::consumption::link_consumption;
use crate::error::Result;
use crate::function::{LinearPiece, PiecewiseFunction};

/// One directed edge along a path, carrying either a driving
/// consumption tradeoff or a charging function.
#[derive(Debug, Clone)]
pub enum Edge {
    /// A driving leg's time-to-energy tradeoff.
    Drive(PiecewiseFunction),
    /// A dwell-to-charge leg's time-to-soc curve.
    Charge(PiecewiseFunction),
}

/// The initial cumulative consumption state before any edge has been
/// linked: a single piece spanning `[0, +inf)`, `f(x) = (M - initial_soc) * x`.
/// Collapses to the constant zero function when `initial_soc == M`.
fn initial_state(m: f64, initial_soc: f64) -> Result<PiecewiseFunction> {
    let deficit = LinearPiece::new(m - initial_soc, 0.0)?;
    PiecewiseFunction::new(&[0.0], vec![deficit.into()])
}

/// Fold `link_consumption`/`link_charging` across `edges`, starting
/// from `initial_soc` (defaulting to full capacity `m` when `None`).
///
/// Returns the per-edge witness functions `ds` (in path order) and the
/// final cumulative tradeoff `h`.
pub fn link_path(edges: &[Edge], m: f64, initial_soc: Option<f64>) -> Result<(Vec<PiecewiseFunction>, PiecewiseFunction)> {
    let mut state = initial_state(m, initial_soc.unwrap_or(m))?;
    let mut ds = Vec::with_capacity(edges.len());

    for edge in edges {
        let (d, h) = match edge {
            Edge::Drive(f) => link_consumption(&state, f)?,
            Edge::Charge(cf) => link_charging(&state, cf, m)?,
        };
        ds.push(d);
        state = h;
    }

    Ok((ds, state))
}

/// Given a total trip time `total_time` and the witness functions `ds`
/// produced by [`link_path`], back-substitute to find how much of
/// `total_time` each edge along the path consumed.
///
/// Walks `ds` in reverse, seeding `t_k = total_time` and folding
/// `t_{i-1} = d_i(t_i)`, then returns the forward per-edge durations
/// `t_i - t_{i-1}`.
pub fn times_from_total(total_time: f64, ds: &[PiecewiseFunction]) -> Vec<f64> {
    let mut times = vec![0.0; ds.len() + 1];
    times[ds.len()] = total_time;
    for i in (0..ds.len()).rev() {
        times[i] = ds[i].evaluate(times[i + 1]);
    }
    (0..ds.len()).map(|i| times[i + 1] - times[i]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::charging_function;
    use crate::tests::lin;

    fn constant(value: f64) -> PiecewiseFunction {
        PiecewiseFunction::new(&[0.0], vec![lin(0.0, value).into()]).unwrap()
    }

    #[test]
    fn times_from_total_matches_reference_doctest() {
        // path.py's get_times doctest: get_times(10, [L(0,0), L(0,2), L(1,0), L(0,3)]) == [2, 1, 0, 7]
        let ds = vec![
            PiecewiseFunction::new(&[0.0], vec![lin(0.0, 0.0).into()]).unwrap(),
            PiecewiseFunction::new(&[0.0], vec![lin(0.0, 2.0).into()]).unwrap(),
            PiecewiseFunction::new(&[0.0], vec![lin(1.0, 0.0).into()]).unwrap(),
            PiecewiseFunction::new(&[0.0], vec![lin(0.0, 3.0).into()]).unwrap(),
        ];
        let deltas = times_from_total(10.0, &ds);
        assert_eq!(deltas, vec![2.0, 1.0, 0.0, 7.0]);
    }

    #[test]
    fn path_of_one_drive_edge_matches_direct_link() {
        let edges = vec![Edge::Drive(constant(5.0))];
        let (ds, h) = link_path(&edges, 10.0, Some(10.0)).unwrap();
        assert_eq!(ds.len(), 1);
        // starting state is the zero function (initial_soc == M), so h == f
        assert_eq!(h.evaluate(20.0), 5.0);
    }

    #[test]
    fn path_of_drive_then_charge() {
        let edges = vec![Edge::Drive(constant(5.0)), Edge::Charge(charging_function(&[0.0, 10.0], &[0.0, 10.0], 10.0).unwrap())];
        let (ds, h) = link_path(&edges, 10.0, None).unwrap();
        assert_eq!(ds.len(), 2);
        assert!(h.evaluate(30.0).abs() < 1e-2);
    }

    #[test]
    fn partial_initial_soc_builds_a_finite_state() {
        let edges = vec![Edge::Drive(constant(0.0))];
        let (_, h) = link_path(&edges, 10.0, Some(6.0)).unwrap();
        // initial_soc < M seeds a nonzero-slope deficit state; linking it
        // with any edge must still produce a well-defined cumulative h.
        assert!(h.evaluate(1.0).is_finite());
    }
}
