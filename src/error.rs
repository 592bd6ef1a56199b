//! Errors reported by the regression routines

/// What went wrong while validating the inputs of a regression
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// `Y` does not have one row per element of `x`
    #[error("shape mismatch: x has {x_len} elements but y has {y_rows} rows")]
    ShapeMismatch {
        /// Length of the independent variable
        x_len: usize,
        /// Number of rows of the dependent matrix
        y_rows: usize,
    },

    /// Fewer than three observations leave no degrees of freedom for the t-test
    #[error("insufficient data: {n} observations, at least 3 are required")]
    InsufficientData {
        /// Number of observations
        n: usize,
    },

    /// An input contains `NaN` or an infinity
    #[error("non-finite value in {input}")]
    NonFinite {
        /// Which input was rejected, `"x"` or `"y"`
        input: &'static str,
    },

    /// Every element of `x` is the same, so the slope is undefined
    #[error("the independent variable has zero variance")]
    ZeroVariance,
}

/// Result type used throughout the crate
pub type Result<T> = ::std::result::Result<T, Error>;
