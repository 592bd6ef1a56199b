//! Batched straight line regression
//!
//! Every column of `Y` is regressed against the same regressor `x`. The normal matrix `X'ᵗX'`
//! is factorized once and the remaining per series work is independent, so with the `rayon`
//! feature enabled the series are fitted in parallel.

mod stats;

pub use self::stats::{Fit, Statistic, Stats};

use log::{debug, warn};
use ndarray::{Array2, ArrayView1, ArrayView2, Axis};
#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::design::{self, NormalEquations};
use crate::distribution::StudentT;
use crate::error::{Error, Result};
use crate::float::Float;

/// How numerically degenerate inputs are handled
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DegeneratePolicy {
    /// Let `NaN`s and infinities flow through IEEE-754 arithmetic
    ///
    /// Fewer than three observations leave a `NaN` p-value, a constant regressor leaves every
    /// statistic non-finite.
    Propagate,
    /// Reject fewer than three observations, non-finite values and a constant regressor
    Reject,
}

/// Configuration of a batched regression
///
/// ```
/// use fastreg::{DegeneratePolicy, Regression};
/// use ndarray::array;
///
/// let x: [f64; 5] = [1., 2., 3., 4., 5.];
/// let y = array![[2., 5.], [4., 4.], [6., 3.], [8., 2.], [10., 1.]];
///
/// let stats = Regression::default()
///     .policy(DegeneratePolicy::Reject)
///     .fit(&x, y.view())
///     .unwrap();
///
/// assert!((stats.slope()[0] - 2.).abs() < 1e-10);
/// assert!((stats.intercept()[1] - 6.).abs() < 1e-10);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Regression<A>
where
    A: Float,
{
    tiny: A,
    policy: DegeneratePolicy,
}

impl<A> Default for Regression<A>
where
    A: Float,
{
    /// `tiny` of `1e-20`, `DegeneratePolicy::Propagate`
    fn default() -> Regression<A> {
        Regression {
            tiny: A::cast(1e-20),
            policy: DegeneratePolicy::Propagate,
        }
    }
}

impl<A> Regression<A>
where
    A: Float,
{
    /// Changes the small number added to `1 - r` and `1 + r` in the denominator of the
    /// t-statistic, which keeps a perfect correlation from dividing by zero
    ///
    /// # Panics
    ///
    /// Panics if `tiny` is negative or `NaN`
    pub fn tiny(mut self, tiny: A) -> Regression<A> {
        assert!(tiny >= A::cast(0));

        self.tiny = tiny;
        self
    }

    /// Changes how numerically degenerate inputs are handled
    pub fn policy(mut self, policy: DegeneratePolicy) -> Regression<A> {
        self.policy = policy;
        self
    }

    /// Regresses every column of `y` (`n x m`) against `x` (length `n`)
    ///
    /// Returns the `5 x m` matrix of slope, intercept, pearson r, p-value and standard error,
    /// with columns in the order of `y`.
    ///
    /// - Multi-threaded
    /// - Time: `O(n * m)`
    /// - Memory: `O(n + m)`
    pub fn fit(&self, x: &[A], y: ArrayView2<'_, A>) -> Result<Stats<A>> {
        let (n, m) = y.dim();

        if n != x.len() {
            return Err(Error::ShapeMismatch {
                x_len: x.len(),
                y_rows: n,
            });
        }

        debug!("fitting {} series of {} observations", m, n);

        let shared = Shared::new(x);
        self.check(x, &shared, y)?;

        let augmented = design::add_constant(x);
        let normal = NormalEquations::new(augmented.view());
        let rhs = design::cross_products(augmented.view(), y);
        let beta: Array2<A> = normal.solve(rhs.view());

        #[cfg(feature = "rayon")]
        let columns = (0..m).into_par_iter();
        #[cfg(not(feature = "rayon"))]
        let columns = 0..m;

        let fits = columns
            .map(|j| {
                self.fit_column(
                    &shared,
                    y.index_axis(Axis(1), j),
                    beta[[0, j]],
                    beta[[1, j]],
                )
            })
            .collect::<Vec<_>>();

        Ok(Stats::from_fits(&fits))
    }

    /// Regresses a single series `y` against `x`
    pub fn fit_series(&self, x: &[A], y: &[A]) -> Result<Fit<A>> {
        let y = ArrayView1::from(y).insert_axis(Axis(1));

        Ok(self
            .fit(x, y)?
            .column(0)
            .expect("one input column yields one column of statistics"))
    }

    /// Validates the inputs according to the policy
    fn check(&self, x: &[A], shared: &Shared<A>, y: ArrayView2<'_, A>) -> Result<()> {
        let _0 = A::cast(0);
        let degenerate_x = shared.ss_x == _0 || !shared.ss_x.is_finite();

        match self.policy {
            DegeneratePolicy::Propagate => {
                if shared.n < 3 {
                    warn!(
                        "{} observations leave no degrees of freedom, p-values will be NaN",
                        shared.n
                    );
                }
                if degenerate_x && shared.n > 0 {
                    warn!("the regressor is constant or non-finite, statistics will be NaN");
                }
            }
            DegeneratePolicy::Reject => {
                if shared.n < 3 {
                    return Err(Error::InsufficientData { n: shared.n });
                }
                if x.iter().any(|x| !x.is_finite()) {
                    return Err(Error::NonFinite { input: "x" });
                }
                if y.iter().any(|y| !y.is_finite()) {
                    return Err(Error::NonFinite { input: "y" });
                }
                if degenerate_x {
                    return Err(Error::ZeroVariance);
                }
            }
        }

        Ok(())
    }

    /// Steps that only involve one series: correlation, t-test and standard error
    fn fit_column(
        &self,
        shared: &Shared<A>,
        y: ArrayView1<'_, A>,
        slope: A,
        intercept: A,
    ) -> Fit<A> {
        let _0 = A::cast(0);
        let _1 = A::cast(1);
        let tiny = self.tiny;
        let df = shared.df;

        let y_bar = crate::sum(y) / A::cast(shared.n);

        let (mut xy, mut ss_y) = (_0, _0);
        for (&xm, &y) in shared.xm.iter().zip(y.iter()) {
            let ym = y - y_bar;

            xy = xy + xm * ym;
            ss_y = ss_y + ym * ym;
        }

        // A constant series has no correlation: 0 / 0 = NaN
        let pearson_r = clamp_unit(xy / (shared.ss_x * ss_y).sqrt());

        let t = pearson_r * (df / ((_1 - pearson_r + tiny) * (_1 + pearson_r + tiny))).sqrt();
        let p_value = StudentT::new(df).two_sided_p(t);

        // Rounding can push the residual sum of squares of a perfect fit below zero
        let ss_res = ss_y - slope * slope * shared.ss_x;
        let ss_res = if ss_res < _0 { _0 } else { ss_res };
        let stderr = (ss_res / df).sqrt() / shared.ss_x.sqrt();

        Fit {
            slope,
            intercept,
            pearson_r,
            p_value,
            stderr,
        }
    }
}

/// Quantities that depend on the regressor only
struct Shared<A>
where
    A: Float,
{
    n: usize,
    df: A,
    // Centered regressor
    xm: Vec<A>,
    // Sum of squares of the centered regressor
    ss_x: A,
}

impl<A> Shared<A>
where
    A: Float,
{
    fn new(x: &[A]) -> Shared<A> {
        let n = x.len();
        let x_bar = crate::sum(ArrayView1::from(x)) / A::cast(n);
        let xm = x.iter().map(|&x| x - x_bar).collect::<Vec<_>>();
        let ss_x = crate::dot(ArrayView1::from(&xm), ArrayView1::from(&xm));

        Shared {
            n,
            df: A::cast(n) - A::cast(2),
            xm,
            ss_x,
        }
    }
}

/// Clamps `r` into `[-1, 1]`, keeping `NaN`
fn clamp_unit<A>(r: A) -> A
where
    A: Float,
{
    let _1 = A::cast(1);

    if r > _1 {
        _1
    } else if r < -_1 {
        -_1
    } else {
        r
    }
}

/// Regresses every column of `y` against `x` with the default configuration
///
/// See [`Regression::fit`].
pub fn fit<A>(x: &[A], y: ArrayView2<'_, A>) -> Result<Stats<A>>
where
    A: Float,
{
    Regression::default().fit(x, y)
}

#[cfg(test)]
macro_rules! test {
    ($ty:ident, $tol:expr) => {
        mod $ty {
            use approx::relative_eq;
            use ndarray::{Array2, Axis};
            use quickcheck::quickcheck;
            use quickcheck::TestResult;
            use rand::seq::SliceRandom;
            use rand::SeedableRng;
            use rand::rngs::StdRng;

            use crate::regression::{fit, Fit, Regression, Stats};

            const TOL: $ty = $tol;

            fn close(a: $ty, b: $ty) -> bool {
                (a.is_nan() && b.is_nan()) || relative_eq!(a, b, epsilon = TOL, max_relative = TOL)
            }

            fn same(a: &Fit<$ty>, b: &Fit<$ty>) -> bool {
                close(a.slope, b.slope)
                    && close(a.intercept, b.intercept)
                    && close(a.pearson_r, b.pearson_r)
                    && close(a.p_value, b.p_value)
                    && close(a.stderr, b.stderr)
            }

            fn stats(n: u8, m: u8) -> Option<(Vec<$ty>, Array2<$ty>, Stats<$ty>)> {
                let n = usize::from(n % 30) + 3;
                let m = usize::from(m % 8) + 1;
                let (x, y) = crate::test::series::<$ty>(n, m);
                let stats = fit(&x, y.view()).ok()?;

                Some((x, y, stats))
            }

            quickcheck! {
                fn shape(n: u8, m: u8) -> TestResult {
                    match stats(n, m) {
                        Some((_, y, stats)) => {
                            TestResult::from_bool(stats.as_array().dim() == (5, y.ncols()))
                        }
                        None => TestResult::failed(),
                    }
                }
            }

            quickcheck! {
                fn bounded(n: u8, m: u8) -> TestResult {
                    match stats(n, m) {
                        Some((_, _, stats)) => {
                            let ok = stats.iter().all(|f| {
                                f.pearson_r >= -1. && f.pearson_r <= 1.
                                    && f.p_value >= 0. && f.p_value <= 1.
                                    && f.stderr >= 0.
                            });

                            TestResult::from_bool(ok)
                        }
                        None => TestResult::failed(),
                    }
                }
            }

            quickcheck! {
                fn columns_are_independent(n: u8, m: u8, k: u8) -> TestResult {
                    let (x, mut y, before) = match stats(n, m) {
                        Some(s) => s,
                        None => return TestResult::failed(),
                    };
                    let k = usize::from(k) % y.ncols();

                    for v in y.column_mut(k).iter_mut() {
                        *v = *v * 3. - 1.;
                    }
                    let after = fit(&x, y.view()).unwrap();
                    let ok = before
                        .iter()
                        .zip(after.iter())
                        .enumerate()
                        .all(|(j, (b, a))| j == k || b == a);

                    TestResult::from_bool(ok)
                }
            }

            quickcheck! {
                fn columns_follow_input_order(n: u8, m: u8) -> TestResult {
                    let (x, y, before) = match stats(n, m) {
                        Some(s) => s,
                        None => return TestResult::failed(),
                    };
                    let mut order = (0..y.ncols()).collect::<Vec<_>>();
                    order.reverse();

                    let reversed = y.select(Axis(1), &order);
                    let after = fit(&x, reversed.view()).unwrap();
                    let ok = order
                        .iter()
                        .enumerate()
                        .all(|(j, &k)| same(&after.column(j).unwrap(), &before.column(k).unwrap()));

                    TestResult::from_bool(ok)
                }
            }

            quickcheck! {
                fn rows_can_be_reordered(n: u8, m: u8) -> TestResult {
                    let (x, y, before) = match stats(n, m) {
                        Some(s) => s,
                        None => return TestResult::failed(),
                    };
                    let mut order = (0..x.len()).collect::<Vec<_>>();
                    order.shuffle(&mut StdRng::from_entropy());

                    let x = order.iter().map(|&i| x[i]).collect::<Vec<_>>();
                    let y = y.select(Axis(0), &order);
                    let after = fit(&x, y.view()).unwrap();
                    let ok = before.iter().zip(after.iter()).all(|(b, a)| same(&b, &a));

                    TestResult::from_bool(ok)
                }
            }

            quickcheck! {
                fn recovers_noiseless_lines(n: u8, a: i8, b: i8) -> TestResult {
                    if a == 0 {
                        return TestResult::discard();
                    }

                    // Needs df > 1: with a single degree of freedom the p-value of a fit that is
                    // perfect up to rounding is only of the order of the rounding error
                    let n = usize::from(n % 29) + 4;
                    let (a, b) = (<$ty>::from(a) / 4., <$ty>::from(b) / 4.);
                    let (x, _) = crate::test::series::<$ty>(n, 1);
                    let y = x.iter().map(|&x| a * x + b).collect::<Vec<_>>();
                    let f = Regression::default().fit_series(&x, &y).unwrap();

                    TestResult::from_bool(
                        relative_eq!(f.slope, a, epsilon = TOL, max_relative = TOL)
                            && relative_eq!(f.intercept, b, epsilon = 10. * TOL, max_relative = TOL)
                            && relative_eq!(f.pearson_r.abs(), 1., epsilon = TOL)
                            && f.pearson_r.signum() == a.signum()
                            && f.p_value < TOL
                            && f.stderr < TOL.sqrt() * a.abs().max(1.),
                    )
                }
            }

            #[test]
            fn single_series_matches_batch() {
                let (x, y) = crate::test::series::<$ty>(12, 3);
                let batch = fit(&x, y.view()).unwrap();

                for j in 0..3 {
                    let column = y.column(j).to_vec();
                    let single = Regression::default().fit_series(&x, &column).unwrap();

                    assert_eq!(single, batch.column(j).unwrap());
                }
            }

            #[test]
            fn no_series() {
                let x: [$ty; 4] = [1., 2., 3., 4.];
                let y = Array2::<$ty>::zeros((4, 0));

                assert_eq!(fit(&x, y.view()).unwrap().as_array().dim(), (5, 0));
            }

            #[test]
            fn tiny_only_moves_perfect_fits() {
                let x: [$ty; 5] = [1., 2., 3., 4., 5.];
                let y: [$ty; 5] = [2., 1., 4., 3., 5.];

                let default = Regression::default().fit_series(&x, &y).unwrap();
                let zero = Regression::default().tiny(0.).fit_series(&x, &y).unwrap();

                assert!(same(&default, &zero));
            }

            #[test]
            #[should_panic]
            fn negative_tiny() {
                let _ = Regression::<$ty>::default().tiny(-1.);
            }
        }
    };
}


#[cfg(test)]
mod precision {
    use approx::relative_eq;

    use crate::regression::Regression;

    // A calendar year regressor has large raw sums, single precision must still agree with double
    #[test]
    fn single_precision_offset_regressor() {
        let x = (1980..2020).map(|year| year as f32).collect::<Vec<_>>();
        let y = (0..x.len())
            .map(|i| {
                let noise = 0.05 * (((i * 7) % 11) as f32 / 5. - 1.);

                0.02 * i as f32 + 1. + noise
            })
            .collect::<Vec<_>>();

        let single = Regression::default().fit_series(&x, &y).unwrap();

        let x = x.iter().map(|&x| f64::from(x)).collect::<Vec<_>>();
        let y = y.iter().map(|&y| f64::from(y)).collect::<Vec<_>>();
        let double = Regression::default().fit_series(&x, &y).unwrap();

        assert!(relative_eq!(f64::from(single.slope), double.slope, max_relative = 1e-5));
        assert!(relative_eq!(
            f64::from(single.intercept),
            double.intercept,
            max_relative = 1e-5
        ));
        assert!(relative_eq!(
            f64::from(single.pearson_r),
            double.pearson_r,
            max_relative = 1e-5
        ));
        assert!(relative_eq!(
            f64::from(single.stderr),
            double.stderr,
            max_relative = 1e-3
        ));
        assert!(relative_eq!(
            f64::from(single.p_value),
            double.p_value,
            epsilon = 1e-6
        ));
    }
}
