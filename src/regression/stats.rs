//! Output of a batched regression

use ndarray::{Array2, ArrayView1, Axis};
use serde_derive::{Deserialize, Serialize};

use crate::float::Float;

/// The statistics computed for every series, in output row order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Statistic {
    /// Slope of the fitted line
    Slope,
    /// Intercept of the fitted line
    Intercept,
    /// Pearson's correlation coefficient
    PearsonR,
    /// Two-sided p-value of the hypothesis test whose null hypothesis is that the slope is zero
    PValue,
    /// Standard error of the slope estimate
    StdErr,
}

impl Statistic {
    /// Every statistic, in output row order
    pub const ALL: [Statistic; 5] = [
        Statistic::Slope,
        Statistic::Intercept,
        Statistic::PearsonR,
        Statistic::PValue,
        Statistic::StdErr,
    ];

    /// Row of this statistic in the output matrix
    pub fn row(self) -> usize {
        match self {
            Statistic::Slope => 0,
            Statistic::Intercept => 1,
            Statistic::PearsonR => 2,
            Statistic::PValue => 3,
            Statistic::StdErr => 4,
        }
    }
}

/// Regression statistics of a single series
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fit<A> {
    /// Slope of the fitted line
    pub slope: A,
    /// Intercept of the fitted line
    pub intercept: A,
    /// Pearson's correlation coefficient
    pub pearson_r: A,
    /// Two-sided p-value for a zero slope
    pub p_value: A,
    /// Standard error of the slope estimate
    pub stderr: A,
}

impl<A> Fit<A>
where
    A: Float,
{
    fn get(&self, statistic: Statistic) -> A {
        match statistic {
            Statistic::Slope => self.slope,
            Statistic::Intercept => self.intercept,
            Statistic::PearsonR => self.pearson_r,
            Statistic::PValue => self.p_value,
            Statistic::StdErr => self.stderr,
        }
    }
}

/// The `5 x m` matrix of regression statistics, one column per dependent series
///
/// Rows follow `Statistic::ALL`: slope, intercept, pearson r, p-value, standard error.
#[derive(Clone, Debug, PartialEq)]
pub struct Stats<A>(Array2<A>);

impl<A> Stats<A>
where
    A: Float,
{
    pub(crate) fn from_fits(fits: &[Fit<A>]) -> Stats<A> {
        let rows = Statistic::ALL.len();

        Stats(Array2::from_shape_fn((rows, fits.len()), |(i, j)| {
            fits[j].get(Statistic::ALL[i])
        }))
    }

    /// Returns the underlying `5 x m` matrix
    pub fn as_array(&self) -> &Array2<A> {
        &self.0
    }

    /// Consumes the statistics, returning the `5 x m` matrix
    pub fn into_array(self) -> Array2<A> {
        self.0
    }

    /// Number of series
    pub fn ncols(&self) -> usize {
        self.0.ncols()
    }

    /// One statistic across all series
    pub fn row(&self, statistic: Statistic) -> ArrayView1<'_, A> {
        self.0.index_axis(Axis(0), statistic.row())
    }

    /// Slopes of every series
    pub fn slope(&self) -> ArrayView1<'_, A> {
        self.row(Statistic::Slope)
    }

    /// Intercepts of every series
    pub fn intercept(&self) -> ArrayView1<'_, A> {
        self.row(Statistic::Intercept)
    }

    /// Correlation coefficients of every series
    pub fn pearson_r(&self) -> ArrayView1<'_, A> {
        self.row(Statistic::PearsonR)
    }

    /// Two-sided p-values of every series
    pub fn p_value(&self) -> ArrayView1<'_, A> {
        self.row(Statistic::PValue)
    }

    /// Standard errors of the slopes of every series
    pub fn stderr(&self) -> ArrayView1<'_, A> {
        self.row(Statistic::StdErr)
    }

    /// Statistics of the `j`-th series, `None` if out of bounds
    pub fn column(&self, j: usize) -> Option<Fit<A>> {
        if j >= self.ncols() {
            return None;
        }

        let c = self.0.column(j);

        Some(Fit {
            slope: c[Statistic::Slope.row()],
            intercept: c[Statistic::Intercept.row()],
            pearson_r: c[Statistic::PearsonR.row()],
            p_value: c[Statistic::PValue.row()],
            stderr: c[Statistic::StdErr.row()],
        })
    }

    /// Iterates over the statistics of every series, in input order
    pub fn iter(&self) -> impl Iterator<Item = Fit<A>> + '_ {
        (0..self.ncols()).filter_map(move |j| self.column(j))
    }
}
