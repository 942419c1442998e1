/*! The piecewise function algebra: [`LinearPiece`] and [`HypLinPiece`]
sub-functions, tagged together as [`SubFunction`], tiled into a
[`PiecewiseFunction`]. This module provides evaluation, inversion,
shift, clip, multiply, offset, and the two domain-specific constructors
([`consumption_tradeoff`], [`charging_function`]) that the linkers in
[`crate::consumption`] and [`crate::charging`] consume. */

mod hyplin;
mod linear;
mod piecewise;
mod sub;

pub use hyplin::{HypLinPiece, InvHypPiece};
pub use linear::LinearPiece;
pub use piecewise::{
    charging_function, clip, consumption_tradeoff, invert_piecewise_linear, multiply, offset, shift,
    LimitedSub, PiecewiseFunction,
};
pub use sub::{Evaluate, SubFunction};
