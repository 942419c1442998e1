/*! The crate-wide error type.

Every fallible constructor and algebraic operation in this crate returns
[`Result`]. Numerical near-misses (intervals of width `<= eps`, values
within `eps` of zero) are not errors --- they are silently treated as
empty, per the tolerance policy documented on [`crate::scalar::EPSILON`].
What *is* an error is a malformed input, a provably non-monotone
piecewise function being inverted, or a linking case the closed form
does not cover (which signals a bug in the case-split, not bad input). */

use thiserror::Error;

/// All error kinds surfaced by this crate. None are swallowed silently.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// A constructor was given a non-finite parameter where one is required.
    #[error("non-finite input: {what} = {value}")]
    NonFiniteInput {
        /// Name of the offending parameter, for diagnostics.
        what: &'static str,
        /// The non-finite value that was rejected.
        value: f64,
    },

    /// [`crate::function::invert_piecewise_linear`] was applied to a
    /// piecewise function whose piece values are neither ascending nor
    /// descending at their left endpoints.
    #[error("piecewise function is not monotone, cannot invert")]
    NotMonotone,

    /// Inversion was attempted on a [`crate::function::HypLinPiece`] with
    /// a nonzero linear slope `d` and nonzero `a`; the closed-form
    /// inverse is only defined for `d == 0`.
    #[error("hyperbolic piece with nonzero linear term has no closed-form inverse")]
    NonInvertible,

    /// [`crate::scalar::cubic_real_roots`] was given a degenerate or
    /// non-finite coefficient set.
    #[error("invalid cubic coefficient: a={a}, b={b}, c={c}, d={d}")]
    InvalidCoefficient {
        a: f64,
        b: f64,
        c: f64,
        d: f64,
    },

    /// The lower-envelope sweep could not make progress, e.g. a candidate
    /// interval reported `+inf` at its own left endpoint.
    #[error("envelope sweep degenerate at x={x}: {reason}")]
    EnvelopeDegenerate { x: f64, reason: &'static str },

    /// A linker reached a combination of piece shapes that the closed
    /// form does not enumerate. This always signals a bug in the
    /// case-split, never bad caller input, and must never be silenced.
    #[error("unhandled link case: f has {f_arity} parameters, g has {g_arity}")]
    UnhandledLinkCase { f_arity: u8, g_arity: u8 },
}

/// Convenience alias for this crate's fallible operations.
pub type Result<T> = std::result::Result<T, Error>;
