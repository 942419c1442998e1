//! Dense-grid numeric cross-check against the analytic linkers.
//!
//! `numeric` below is a brute-force port of `original_source/src/python/numeric.py`'s
//! `link_consumption`/`link_charging`: instead of the closed-form case-split
//! the library uses, it samples both operands on a dense grid and takes the
//! pointwise minimum over every discrete split point. It exists purely to
//! confirm the analytic linkers agree with a naive reference; it is not part
//! of the library's public surface, hence living here rather than in `src/`.

use ev_charge_linking::charging::link_charging;
use ev_charge_linking::consumption::link_consumption;
use ev_charge_linking::function::{charging_function, consumption_tradeoff, LinearPiece, PiecewiseFunction};

mod numeric {
    use super::*;

    /// Brute-force `f ⊕ g` on `t`: for each grid point `x`, the minimum over
    /// every earlier grid point `d` of `f(d) + g(x - d)`. Mirrors
    /// `numeric.py::link_consumption`'s nested scan without the `np.roll`
    /// vectorisation trick, which is an implementation detail of the
    /// original rather than part of what it computes.
    pub fn link_consumption_numeric(t: &[f64], f: &PiecewiseFunction, g: &PiecewiseFunction) -> Vec<f64> {
        let l: Vec<f64> = t.iter().map(|&x| f.evaluate(x)).collect();
        let r: Vec<f64> = t.iter().map(|&x| g.evaluate(x)).collect();
        let n = t.len();
        let mut h = vec![f64::INFINITY; n];
        for d_idx in 0..n {
            if !l[d_idx].is_finite() {
                continue;
            }
            for x_idx in d_idx..n {
                let r_val = r[x_idx - d_idx];
                if !r_val.is_finite() {
                    continue;
                }
                let candidate = (l[d_idx] + r_val).max(0.0);
                if candidate < h[x_idx] {
                    h[x_idx] = candidate;
                }
            }
        }
        h
    }

    /// Brute-force `f ⊗_m cf` on `t`: for each grid point `x`, the minimum
    /// over every earlier grid point `d` of `m - cf(z0 + (x - d))`, where
    /// `z0` is the first grid point at which `cf` recovers the energy `f`
    /// spent driving to `d`. Mirrors `numeric.py::link_charging`.
    pub fn link_charging_numeric(t: &[f64], f: &PiecewiseFunction, cf: &PiecewiseFunction, m: f64) -> Vec<f64> {
        let l: Vec<f64> = t.iter().map(|&x| f.evaluate(x)).collect();
        let cfv: Vec<f64> = t.iter().map(|&x| cf.evaluate(x)).collect();
        let n = t.len();
        let mut h = vec![f64::INFINITY; n];
        for d_idx in 0..n {
            if !l[d_idx].is_finite() {
                continue;
            }
            let y = m - l[d_idx];
            if y < 0.0 {
                continue;
            }
            let t_idx = match cfv.iter().position(|&v| v > y) {
                Some(idx) => idx,
                None => continue,
            };
            for x_idx in d_idx..n {
                let shift = x_idx - d_idx;
                let cf_idx = t_idx + shift;
                let cf_val = if cf_idx < n { cfv[cf_idx] } else { *cfv.last().unwrap() };
                let candidate = (m - cf_val).max(0.0);
                if candidate < h[x_idx] {
                    h[x_idx] = candidate;
                }
            }
        }
        for v in h.iter_mut() {
            if *v > m {
                *v = f64::INFINITY;
            }
        }
        h
    }
}

fn dense_grid(t_max: f64, step: f64) -> Vec<f64> {
    let n = (t_max / step).round() as usize;
    (0..=n).map(|i| i as f64 * step).collect()
}

/// Per `original_source`'s own dense-grid cross-check: a grid of step `ε`
/// can disagree with the closed-form answer by up to `10ε` near kinks,
/// since it only samples the witness, never finds it exactly.
fn grid_tolerance(step: f64) -> f64 {
    10.0 * step
}

#[test]
fn consumption_link_matches_numeric_reference_on_dense_grid() {
    let f = consumption_tradeoff(2.0, 6.0, 5.0, 1.0, 1.0).unwrap();
    let g = PiecewiseFunction::new(
        &[0.0, 4.0, 9.0],
        vec![LinearPiece::infeasible().into(), LinearPiece::new(-1.0, 9.0).unwrap().into(), LinearPiece::new(0.0, 0.0).unwrap().into()],
    )
    .unwrap();

    let (_, h) = link_consumption(&f, &g).unwrap();

    let step = 0.05;
    let grid = dense_grid(20.0, step);
    let h_numeric = numeric::link_consumption_numeric(&grid, &f, &g);
    let tolerance = grid_tolerance(step);

    for (x, &h_num) in grid.iter().zip(&h_numeric) {
        let h_ana = h.evaluate(*x);
        if !h_ana.is_finite() || !h_num.is_finite() {
            assert_eq!(h_ana.is_finite(), h_num.is_finite(), "finiteness disagreement at x={x}");
            continue;
        }
        assert!(
            (h_ana - h_num).abs() <= tolerance,
            "analytic ({h_ana}) and numeric ({h_num}) consumption links disagree at x={x}"
        );
    }
}

#[test]
fn charging_link_matches_numeric_reference_on_dense_grid() {
    let f = consumption_tradeoff(5.0, 10.0, 4.0, 4.0, 0.0).unwrap();
    let cf = charging_function(&[0.0, 8.0, 16.0, 32.0], &[0.0, 5.0, 7.5, 10.0], 10.0).unwrap();

    let (_, h) = link_charging(&f, &cf, 10.0).unwrap();

    let step = 0.05;
    let grid = dense_grid(32.0, step);
    let h_numeric = numeric::link_charging_numeric(&grid, &f, &cf, 10.0);
    let tolerance = grid_tolerance(step);

    for (x, &h_num) in grid.iter().zip(&h_numeric) {
        let h_ana = h.evaluate(*x);
        if !h_ana.is_finite() || !h_num.is_finite() {
            assert_eq!(h_ana.is_finite(), h_num.is_finite(), "finiteness disagreement at x={x}");
            continue;
        }
        assert!(
            (h_ana - h_num).abs() <= tolerance,
            "analytic ({h_ana}) and numeric ({h_num}) charging links disagree at x={x}"
        );
    }
}
