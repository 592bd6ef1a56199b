//! Batched ordinary least squares regression.
//!
//! Regresses many series (the columns of an `n x m` matrix `Y`) against one shared regressor `x`
//! of length `n`, for example many spatial points sharing the same time axis. For every series
//! the result holds the slope, the intercept, Pearson's correlation coefficient, the two-sided
//! p-value of the hypothesis test whose null hypothesis is that the slope is zero, and the
//! standard error of the slope.
//!
//! The normal equations `(X'ᵗX') β = X'ᵗY`, with `X' = [x | 1]`, share the same `2 x 2` matrix
//! for every series, so it is factorized once and reused for all of them.
//!
//! ```
//! use ndarray::array;
//!
//! let x: [f64; 5] = [1., 2., 3., 4., 5.];
//! let y = array![[2., 5.], [4., 4.], [6., 3.], [8., 2.], [10., 1.]];
//!
//! let stats = fastreg::fit(&x, y.view()).unwrap();
//!
//! assert_eq!(stats.as_array().dim(), (5, 2));
//! assert!((stats.slope()[1] + 1.).abs() < 1e-10);
//! assert!(stats.p_value()[0] < 1e-6);
//! ```
//!
//! Numerically degenerate inputs (fewer than three observations, a constant regressor) propagate
//! as `NaN`s and infinities by default; see [`DegeneratePolicy`] to reject them instead.

#![warn(missing_docs)]
#![allow(clippy::just_underscores_and_digits, clippy::manual_range_contains)]

#[cfg(test)]
mod test;

pub mod design;
pub mod distribution;
mod error;
mod float;
mod regression;

use ndarray::ArrayView1;

pub use crate::design::{add_constant, add_constant_columns};
pub use crate::error::{Error, Result};
pub use crate::float::Float;
pub use crate::regression::{fit, DegeneratePolicy, Fit, Regression, Statistic, Stats};

fn dot<A>(xs: ArrayView1<'_, A>, ys: ArrayView1<'_, A>) -> A
where
    A: Float,
{
    xs.iter()
        .zip(ys.iter())
        .fold(A::cast(0), |acc, (&x, &y)| acc + x * y)
}

fn sum<A>(xs: ArrayView1<'_, A>) -> A
where
    A: Float,
{
    use std::ops::Add;

    xs.iter().cloned().fold(A::cast(0), Add::add)
}
