use auto_impl::auto_impl;
use derive_more::From;

use crate::error::Result;
use crate::function::hyplin::HypLinPiece;
use crate::function::linear::LinearPiece;

/// Tagged choice of the two piece shapes this crate's algebra works
/// with. The variant's *parameter arity* (2 for [`LinearPiece`], 4 for
/// [`HypLinPiece`]) is the only dispatch key the linkers in
/// [`crate::consumption`] and [`crate::charging`] use downstream.
#[derive(Debug, Clone, Copy, PartialEq, From)]
pub enum SubFunction {
    Linear(LinearPiece),
    HypLin(HypLinPiece),
}

/// Common evaluation interface shared by every piece shape and by
/// [`super::PiecewiseFunction`] itself.
#[auto_impl(&, Box)]
pub trait Evaluate {
    fn evaluate(&self, x: f64) -> f64;
}

impl Evaluate for SubFunction {
    fn evaluate(&self, x: f64) -> f64 {
        match self {
            SubFunction::Linear(f) => f.evaluate(x),
            SubFunction::HypLin(f) => f.evaluate(x),
        }
    }
}

impl Evaluate for LinearPiece {
    fn evaluate(&self, x: f64) -> f64 {
        LinearPiece::evaluate(self, x)
    }
}

impl Evaluate for HypLinPiece {
    fn evaluate(&self, x: f64) -> f64 {
        HypLinPiece::evaluate(self, x)
    }
}

impl SubFunction {
    /// The number of free parameters (2 or 4), used as the dispatch key
    /// for the linker case-splits.
    pub fn arity(&self) -> u8 {
        match self {
            SubFunction::Linear(_) => 2,
            SubFunction::HypLin(_) => 4,
        }
    }

    pub fn as_linear(&self) -> Option<&LinearPiece> {
        match self {
            SubFunction::Linear(f) => Some(f),
            SubFunction::HypLin(_) => None,
        }
    }

    pub fn as_hyplin(&self) -> Option<&HypLinPiece> {
        match self {
            SubFunction::HypLin(f) => Some(f),
            SubFunction::Linear(_) => None,
        }
    }

    pub fn shift(&self, delta: f64) -> Result<SubFunction> {
        // Only defined over linear pieces, per `function::shift`'s
        // contract; hyperbolic pieces never appear in a shift call site.
        self.as_linear()
            .expect("shift is only defined over linear pieces")
            .shift(delta)
            .map(SubFunction::Linear)
    }

    pub fn multiply(&self, k: f64) -> Result<SubFunction> {
        self.as_linear()
            .expect("multiply is only defined over linear pieces")
            .multiply(k)
            .map(SubFunction::Linear)
    }

    pub fn offset(&self, k: f64) -> Result<SubFunction> {
        self.as_linear()
            .expect("offset is only defined over linear pieces")
            .offset(k)
            .map(SubFunction::Linear)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{hyp, lin};

    #[test]
    fn arity_dispatches_on_variant() {
        let l: SubFunction = lin(1.0, 2.0).into();
        let h: SubFunction = hyp(1.0, 0.0, 0.0, 0.0).into();
        assert_eq!(l.arity(), 2);
        assert_eq!(h.arity(), 4);
    }

    #[test]
    fn evaluate_dispatches_through_trait() {
        let l: SubFunction = lin(2.0, 1.0).into();
        assert_eq!(l.evaluate(3.0), 7.0);
    }
}
