//! Student's t distribution

pub mod special;

use crate::float::Float;

/// Student's t distribution with `df` degrees of freedom
///
/// Non-positive or `NaN` degrees of freedom are accepted, every probability computed from such a
/// distribution is `NaN`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StudentT<A>
where
    A: Float,
{
    df: A,
}

impl<A> StudentT<A>
where
    A: Float,
{
    /// Creates a t distribution with `df` degrees of freedom
    pub fn new(df: A) -> StudentT<A> {
        StudentT { df }
    }

    /// Returns the degrees of freedom
    pub fn df(&self) -> A {
        self.df
    }

    /// Probability of drawing a value less than or equal to `t`
    pub fn cdf(&self, t: A) -> A {
        let tail = self.tail(t);

        if t > A::cast(0) {
            A::narrow(1. - tail)
        } else {
            A::narrow(tail)
        }
    }

    /// Survival function, the probability of drawing a value greater than `t`
    pub fn sf(&self, t: A) -> A {
        let tail = self.tail(t);

        if t > A::cast(0) {
            A::narrow(tail)
        } else {
            A::narrow(1. - tail)
        }
    }

    /// Two-sided p-value of the statistic `t`: `2 * sf(|t|)`
    pub fn two_sided_p(&self, t: A) -> A {
        let p = 2. * self.tail(t);

        A::narrow(if p > 1. { 1. } else { p })
    }

    /// Mass of one tail beyond `|t|`, in double precision
    fn tail(&self, t: A) -> f64 {
        let df = self.df.widen();
        let t = t.widen();

        if df.is_nan() || df <= 0. || t.is_nan() {
            return f64::NAN;
        }

        let x = df / (df + t * t);

        0.5 * special::beta_inc(0.5 * df, 0.5, x)
    }
}

#[cfg(test)]
macro_rules! test {
    ($ty:ident) => {
        mod $ty {
            use std::$ty::consts::PI;

            use approx::relative_eq;
            use quickcheck::quickcheck;
            use quickcheck::TestResult;

            use crate::distribution::StudentT;

            // df = 1 is the standard Cauchy distribution
            #[test]
            fn cauchy() {
                let t = StudentT::<$ty>::new(1.);

                for &x in &[-20., -3., -1., -0.25, 0., 0.5, 1., 4., 50.] {
                    let x: $ty = x;
                    let expected = 0.5 + x.atan() / PI;

                    assert!(relative_eq!(t.cdf(x), expected, epsilon = 1e-6));
                }
            }

            #[test]
            fn two_degrees_of_freedom() {
                let t = StudentT::<$ty>::new(2.);

                for &x in &[-10., -2., -0.5, 0., 0.75, 3., 25.] {
                    let x: $ty = x;
                    let expected = 0.5 + x / (2. * (2. + x * x).sqrt());

                    assert!(relative_eq!(t.cdf(x), expected, epsilon = 1e-6));
                }
            }

            // Two-sided 5% critical values from the t table
            #[test]
            fn critical_values() {
                let table: [($ty, $ty); 7] = [
                    (1., 12.706_205),
                    (2., 4.302_653),
                    (3., 3.182_446),
                    (5., 2.570_582),
                    (10., 2.228_139),
                    (30., 2.042_272),
                    (120., 1.979_930),
                ];

                for &(df, t) in table.iter() {
                    let p = StudentT::new(df).two_sided_p(t);

                    assert!(relative_eq!(p, 0.05, epsilon = 1e-5), "df = {}: p = {}", df, p);
                }
            }

            #[test]
            fn invalid_degrees_of_freedom() {
                assert!(StudentT::<$ty>::new(0.).sf(1.).is_nan());
                assert!(StudentT::<$ty>::new(-1.).cdf(1.).is_nan());
                assert!(StudentT::<$ty>::new(<$ty>::NAN).two_sided_p(1.).is_nan());
                assert!(StudentT::<$ty>::new(3.).two_sided_p(<$ty>::NAN).is_nan());
            }

            #[test]
            fn infinite_statistic() {
                let t = StudentT::<$ty>::new(4.);

                assert_eq!(t.two_sided_p(<$ty>::INFINITY), 0.);
                assert_eq!(t.sf(<$ty>::INFINITY), 0.);
                assert_eq!(t.cdf(<$ty>::NEG_INFINITY), 0.);
            }

            quickcheck! {
                fn cdf_and_sf_are_complementary(df: u8, t: i16) -> TestResult {
                    if df == 0 {
                        return TestResult::discard();
                    }

                    let dist = StudentT::new(df as $ty);
                    let t = t as $ty / 100.;

                    TestResult::from_bool(relative_eq!(
                        dist.cdf(t) + dist.sf(t),
                        1.,
                        epsilon = 1e-5
                    ))
                }
            }

            quickcheck! {
                fn symmetric(df: u8, t: i16) -> TestResult {
                    if df == 0 {
                        return TestResult::discard();
                    }

                    let dist = StudentT::new(df as $ty);
                    let t = t as $ty / 100.;

                    TestResult::from_bool(relative_eq!(dist.cdf(-t), dist.sf(t), epsilon = 1e-5))
                }
            }

            quickcheck! {
                fn p_value_is_a_probability(df: u8, t: i16) -> TestResult {
                    if df == 0 {
                        return TestResult::discard();
                    }

                    let p = StudentT::new(df as $ty).two_sided_p(t as $ty / 100.);

                    TestResult::from_bool(p >= 0. && p <= 1.)
                }
            }
        }
    };
}
