use ndarray::{NdFloat, ScalarOperand};

use num_traits::{FromPrimitive, NumCast, Signed};
use rand::distr::uniform::SampleUniform;

use std::iter::Sum;
use std::ops::{AddAssign, DivAssign, MulAssign, SubAssign};

// Include submodules
mod frame;
pub mod metrics;
mod split;
pub mod stats;

// Re-export types from submodules
pub use frame::{Frame, FrameError};
pub use split::{train_test_split, SplitError};

/// The float bound shared by every crate in the workspace.
///
/// Bundles the ndarray float requirements with the casts and assign
/// operators the numeric code needs, so signatures can stay generic over
/// `f32`/`f64` without repeating the bound list everywhere.
pub trait Float:
    NdFloat
    + FromPrimitive
    + Default
    + Signed
    + Sum
    + for<'a> AddAssign<&'a Self>
    + for<'a> MulAssign<&'a Self>
    + for<'a> SubAssign<&'a Self>
    + for<'a> DivAssign<&'a Self>
    + SampleUniform
    + ScalarOperand
    + std::marker::Unpin
{
    fn cast<T: NumCast>(x: T) -> Option<Self> {
        NumCast::from(x)
    }
}

impl Float for f32 {}

impl Float for f64 {}
