//! Design matrix and the normal equations shared by every series

use ndarray::{Array2, ArrayView1, ArrayView2, Axis};

use crate::float::Float;

/// Appends a column of ones to the regressor `x`, producing the `n x 2` design matrix `[x | 1]`
///
/// - Time: `O(length)`
/// - Memory: `O(length)`
pub fn add_constant<A>(x: &[A]) -> Array2<A>
where
    A: Float,
{
    add_constant_columns(ArrayView1::from(x).insert_axis(Axis(1)))
}

/// Appends a column of ones to every row of `x`, producing an `n x (k + 1)` matrix
///
/// The input is left untouched.
pub fn add_constant_columns<A>(x: ArrayView2<'_, A>) -> Array2<A>
where
    A: Float,
{
    let (n, k) = x.dim();
    let _1 = A::cast(1);

    Array2::from_shape_fn((n, k + 1), |(i, j)| if j < k { x[[i, j]] } else { _1 })
}

/// The normal equations `(X'ᵗX') β = X'ᵗY` of a straight line fit
///
/// `X'ᵗX'` only depends on the regressor, so it is factorized once (LU with partial pivoting) and
/// the factorization is reused for every right hand side. The sums of an uncentered regressor
/// cancel badly in single precision, so the system is always built and solved in `f64`.
#[derive(Clone, Copy, Debug)]
pub struct NormalEquations {
    // Row order of the factorization, `true` if the rows were swapped
    swapped: bool,
    l10: f64,
    u00: f64,
    u01: f64,
    u11: f64,
}

impl NormalEquations {
    /// Builds and factorizes `X'ᵗX'` from an `n x 2` design matrix
    ///
    /// # Panics
    ///
    /// Panics if `design` doesn't have exactly two columns
    pub fn new<A>(design: ArrayView2<'_, A>) -> NormalEquations
    where
        A: Float,
    {
        assert_eq!(design.ncols(), 2);

        let (mut sxx, mut sx1, mut s11) = (0., 0., 0.);
        for row in design.rows() {
            let (x, one) = (row[0].widen(), row[1].widen());

            sxx += x * x;
            sx1 += x * one;
            s11 += one * one;
        }

        NormalEquations::factorize([[sxx, sx1], [sx1, s11]])
    }

    /// LU factorization with partial pivoting of a 2 x 2 matrix
    ///
    /// A zero pivot is kept as is: solving then yields infinities or `NaN`s.
    fn factorize(m: [[f64; 2]; 2]) -> NormalEquations {
        let swapped = m[1][0].abs() > m[0][0].abs();
        let (top, bottom) = if swapped { (m[1], m[0]) } else { (m[0], m[1]) };

        let l10 = bottom[0] / top[0];

        NormalEquations {
            swapped,
            l10,
            u00: top[0],
            u01: top[1],
            u11: bottom[1] - l10 * top[1],
        }
    }

    /// Solves the system for one right hand side `[sum(x * y), sum(y)]`
    pub fn solve_one(&self, rhs: [f64; 2]) -> [f64; 2] {
        let (b0, b1) = if self.swapped {
            (rhs[1], rhs[0])
        } else {
            (rhs[0], rhs[1])
        };

        // Forward substitution
        let z1 = b1 - self.l10 * b0;

        // Back substitution
        let intercept = z1 / self.u11;
        let slope = (b0 - self.u01 * intercept) / self.u00;

        [slope, intercept]
    }

    /// Solves the system for a `2 x m` matrix of right hand sides `X'ᵗY`
    ///
    /// Row 0 of the output holds the slopes, row 1 the intercepts, rounded to `A`.
    ///
    /// # Panics
    ///
    /// Panics if `rhs` doesn't have exactly two rows
    pub fn solve<A>(&self, rhs: ArrayView2<'_, f64>) -> Array2<A>
    where
        A: Float,
    {
        assert_eq!(rhs.nrows(), 2);

        let mut beta = Array2::zeros(rhs.raw_dim());
        for (mut out, b) in beta
            .axis_iter_mut(Axis(1))
            .zip(rhs.axis_iter(Axis(1)))
        {
            let [slope, intercept] = self.solve_one([b[0], b[1]]);

            out[0] = A::narrow(slope);
            out[1] = A::narrow(intercept);
        }

        beta
    }
}

/// Computes `X'ᵗY`, accumulated in `f64`, for an `n x 2` design matrix and an `n x m` dependent
/// matrix
pub fn cross_products<A>(design: ArrayView2<'_, A>, y: ArrayView2<'_, A>) -> Array2<f64>
where
    A: Float,
{
    assert_eq!(design.nrows(), y.nrows());

    let mut rhs = Array2::<f64>::zeros((design.ncols(), y.ncols()));
    for (d, y) in design.rows().into_iter().zip(y.rows()) {
        for (r, &dr) in d.iter().enumerate() {
            let dr = dr.widen();

            for (acc, &yj) in rhs.row_mut(r).iter_mut().zip(y.iter()) {
                *acc += dr * yj.widen();
            }
        }
    }

    rhs
}

#[cfg(test)]
macro_rules! test {
    ($ty:ident) => {
        mod $ty {
            use approx::relative_eq;
            use ndarray::{array, Array2};

            use crate::design::{add_constant, add_constant_columns, cross_products, NormalEquations};

            #[test]
            fn appends_ones() {
                let x: [$ty; 3] = [1., 2., 3.];
                let before = x;
                let design = add_constant(&x);
                let expected: Array2<$ty> = array![[1., 1.], [2., 1.], [3., 1.]];

                assert_eq!(design, expected);
                // Input untouched
                assert_eq!(x, before);
            }

            #[test]
            fn appends_ones_to_matrix() {
                let x: Array2<$ty> = array![[1., 4.], [2., 5.]];
                let design = add_constant_columns(x.view());
                let expected: Array2<$ty> = array![[1., 4., 1.], [2., 5., 1.]];

                assert_eq!(design, expected);
            }

            #[test]
            fn empty_regressor() {
                let x: [$ty; 0] = [];

                assert_eq!(add_constant(&x).dim(), (0, 2));
            }

            #[test]
            fn solves_exact_lines() {
                let x: [$ty; 5] = [1., 2., 3., 4., 5.];
                let y: Array2<$ty> = array![
                    [2., 5., 3.],
                    [4., 4., 3.],
                    [6., 3., 3.],
                    [8., 2., 3.],
                    [10., 1., 3.]
                ];
                let design = add_constant(&x);
                let rhs = cross_products(design.view(), y.view());
                let beta: Array2<$ty> = NormalEquations::new(design.view()).solve(rhs.view());

                assert_eq!(beta.dim(), (2, 3));
                let expected: [($ty, $ty); 3] = [(2., 0.), (-1., 6.), (0., 3.)];
                for (j, &(slope, intercept)) in expected.iter().enumerate() {
                    assert!(relative_eq!(beta[[0, j]], slope, epsilon = 1e-4));
                    assert!(relative_eq!(beta[[1, j]], intercept, epsilon = 1e-4));
                }
            }

            #[test]
            fn pivots_on_small_leading_entry() {
                // Regressor near zero makes sum(x^2) smaller than n
                let x: [$ty; 4] = [-0.1, 0., 0.1, 0.2];
                let y: Array2<$ty> = array![[0.7], [1.], [1.3], [1.6]];
                let design = add_constant(&x);
                let rhs = cross_products(design.view(), y.view());
                let beta: Array2<$ty> = NormalEquations::new(design.view()).solve(rhs.view());

                assert!(relative_eq!(beta[[0, 0]], 3., epsilon = 1e-3));
                assert!(relative_eq!(beta[[1, 0]], 1., epsilon = 1e-4));
            }

            #[test]
            fn constant_regressor_is_not_finite() {
                let x: [$ty; 3] = [2., 2., 2.];
                let y: Array2<$ty> = array![[1.], [2.], [3.]];
                let design = add_constant(&x);
                let rhs = cross_products(design.view(), y.view());
                let beta: Array2<$ty> = NormalEquations::new(design.view()).solve(rhs.view());

                assert!(beta.iter().any(|b| !b.is_finite()));
            }
        }
    };
}

#[cfg(test)]
mod test {
    test!(f32);
    test!(f64);
}
