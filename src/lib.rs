/*!
# EV charge-linking

This crate collects the algebraic engine used to compute energy-optimal
travel policies for an electric vehicle on a road network: given two
adjacent segment functions (a driving *consumption tradeoff* or a
*charging function*), it produces their pointwise-optimal composition
together with the witness that attains it.

## Scope

The crate does *not* perform graph search or routing --- the caller
supplies a path and walks it edge by edge. It does not read maps, render
results, or approximate; every piecewise function produced here is exact
up to a single tolerance [`scalar::EPSILON`].

## Layout

- [`scalar`] --- epsilon-aware scalar comparisons, cubic root finding.
- [`function`] --- the `Linear`/`HypLin` piece algebra and
  [`function::PiecewiseFunction`].
- [`envelope`] --- the lower-envelope sweep that collapses a bag of
  candidate pieces into a minimal partition.
- [`consumption`] --- the consumption link `⊕`.
- [`charging`] --- the charging link `⊗_M`.
- [`path`] --- folding the linkers along a path of edges.
- [`format`] --- textual (de)serialisation for regression fixtures.

## Citations

The linking algorithms implemented here follow the closed-form
derivation for piecewise consumption/charging tradeoff composition
originally developed for energy-optimal EV routing; see the crate's
design notes for the exact case-split this module follows.
*/

pub mod charging;
pub mod consumption;
pub mod envelope;
pub mod error;
pub mod format;
pub mod function;
pub mod path;
pub mod scalar;

pub use error::{Error, Result};
