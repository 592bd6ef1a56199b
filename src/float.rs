//! Float trait

use std::fmt;

use cast::From;
use num_traits::float;

/// This is an extension of `num_traits::float::Float` that adds safe
/// casting, Sync + Send, and a round trip through `f64` for the special
/// functions, which are always evaluated in double precision.
pub trait Float:
    float::Float
    + From<usize, Output = Self>
    + From<f32, Output = Self>
    + fmt::Debug
    + Sync
    + Send
    + 'static
{
    /// Converts `self` to `f64` without loss
    fn widen(self) -> f64;

    /// Converts an `f64` back into `Self`, rounding if `Self` is narrower
    fn narrow(x: f64) -> Self;
}

impl Float for f32 {
    fn widen(self) -> f64 {
        self as f64
    }

    fn narrow(x: f64) -> f32 {
        x as f32
    }
}

impl Float for f64 {
    fn widen(self) -> f64 {
        self
    }

    fn narrow(x: f64) -> f64 {
        x
    }
}
