//! Special functions backing the t distribution
//!
//! Both functions work in `f64` regardless of the float type of the caller.

use std::f64::consts::PI;

use log::debug;

/// Lanczos approximation parameter
const LANCZOS_G: f64 = 7.;

/// Lanczos coefficients for `g = 7`, `n = 9`
const LANCZOS_COEFFICIENTS: [f64; 9] = [
    0.999_999_999_999_809_9,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_1,
    -176.615_029_162_140_6,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_571_6e-6,
    1.505_632_735_149_311_6e-7,
];

const MAX_ITERATIONS: usize = 5_000;
const TOLERANCE: f64 = 1e-15;
const TINY: f64 = 1e-300;

/// Natural logarithm of the absolute value of the gamma function
///
/// Poles (zero and the negative integers) map to `+inf`.
pub fn ln_gamma(x: f64) -> f64 {
    if x.is_nan() {
        return x;
    }

    if x <= 0. && x == x.floor() {
        return f64::INFINITY;
    }

    if x < 0.5 {
        // Reflection formula
        let sin = (PI * x).sin().abs();

        return (PI / sin).ln() - ln_gamma(1. - x);
    }

    let x = x - 1.;
    let (head, tail) = LANCZOS_COEFFICIENTS.split_at(1);
    let series = tail
        .iter()
        .enumerate()
        .fold(head[0], |acc, (i, &c)| acc + c / (x + (i + 1) as f64));
    let t = x + LANCZOS_G + 0.5;

    0.5 * (2. * PI).ln() + (x + 0.5) * t.ln() - t + series.ln()
}

/// Regularized incomplete beta function `I_x(a, b)`
///
/// Returns `NaN` when any argument is `NaN` or when `a` or `b` is not positive. `x` is clamped
/// into `[0, 1]`.
pub fn beta_inc(a: f64, b: f64, x: f64) -> f64 {
    if a.is_nan() || b.is_nan() || x.is_nan() || a <= 0. || b <= 0. {
        return f64::NAN;
    }

    if x <= 0. {
        return 0.;
    }

    if x >= 1. {
        return 1.;
    }

    let ln_front = ln_gamma(a + b) - ln_gamma(a) - ln_gamma(b) + a * x.ln() + b * (-x).ln_1p();
    let front = ln_front.exp();

    // The continued fraction converges quickly only on this side of the mean
    if x < (a + 1.) / (a + b + 2.) {
        front * continued_fraction(a, b, x) / a
    } else {
        1. - front * continued_fraction(b, a, 1. - x) / b
    }
}

/// Continued fraction for the incomplete beta function, evaluated with the modified Lentz method
fn continued_fraction(a: f64, b: f64, x: f64) -> f64 {
    fn nonzero(v: f64) -> f64 {
        if v.abs() < TINY {
            TINY
        } else {
            v
        }
    }

    let qab = a + b;
    let qap = a + 1.;
    let qam = a - 1.;

    let mut c = 1.;
    let mut d = 1. / nonzero(1. - qab * x / qap);
    let mut h = d;

    for m in 1..=MAX_ITERATIONS {
        let m = m as f64;
        let m2 = 2. * m;

        // Even step
        let aa = m * (b - m) * x / ((qam + m2) * (a + m2));
        d = 1. / nonzero(1. + aa * d);
        c = nonzero(1. + aa / c);
        h *= d * c;

        // Odd step
        let aa = -(a + m) * (qab + m) * x / ((a + m2) * (qap + m2));
        d = 1. / nonzero(1. + aa * d);
        c = nonzero(1. + aa / c);
        let delta = d * c;
        h *= delta;

        if (delta - 1.).abs() < TOLERANCE {
            return h;
        }
    }

    debug!(
        "incomplete beta continued fraction did not converge (a = {}, b = {}, x = {})",
        a, b, x
    );

    h
}

#[cfg(test)]
mod test {
    use std::f64::consts::PI;

    use approx::relative_eq;
    use quickcheck::quickcheck;
    use quickcheck::TestResult;

    use super::{beta_inc, ln_gamma};

    #[test]
    fn ln_gamma_known_values() {
        assert!(relative_eq!(ln_gamma(1.), 0., epsilon = 1e-13));
        assert!(relative_eq!(ln_gamma(2.), 0., epsilon = 1e-13));
        assert!(relative_eq!(ln_gamma(5.), 24f64.ln(), max_relative = 1e-12));
        assert!(relative_eq!(ln_gamma(10.), 362_880f64.ln(), max_relative = 1e-12));
        assert!(relative_eq!(ln_gamma(0.5), PI.sqrt().ln(), max_relative = 1e-12));
        assert!(relative_eq!(ln_gamma(1.5), (PI.sqrt() / 2.).ln(), max_relative = 1e-12));
        assert!(relative_eq!(
            ln_gamma(-0.5),
            (2. * PI.sqrt()).ln(),
            max_relative = 1e-12
        ));
    }

    #[test]
    fn ln_gamma_poles() {
        assert_eq!(ln_gamma(0.), f64::INFINITY);
        assert_eq!(ln_gamma(-3.), f64::INFINITY);
        assert!(ln_gamma(f64::NAN).is_nan());
    }

    #[test]
    fn beta_inc_edges() {
        assert_eq!(beta_inc(2., 3., 0.), 0.);
        assert_eq!(beta_inc(2., 3., -1.), 0.);
        assert_eq!(beta_inc(2., 3., 1.), 1.);
        assert_eq!(beta_inc(2., 3., 2.), 1.);
        assert!(beta_inc(0., 3., 0.5).is_nan());
        assert!(beta_inc(2., -1., 0.5).is_nan());
        assert!(beta_inc(2., 3., f64::NAN).is_nan());
    }

    #[test]
    fn beta_inc_closed_forms() {
        for &x in &[0.01, 0.1, 0.25, 0.5, 0.75, 0.9, 0.99] {
            // I_x(1, 1) = x
            assert!(relative_eq!(beta_inc(1., 1., x), x, max_relative = 1e-12));
            // I_x(a, 1) = x^a
            assert!(relative_eq!(beta_inc(3., 1., x), x.powi(3), max_relative = 1e-12));
            // I_x(1, b) = 1 - (1 - x)^b
            assert!(relative_eq!(
                beta_inc(1., 4., x),
                1. - (1. - x).powi(4),
                max_relative = 1e-12
            ));
            // I_x(1/2, 1/2) = 2 / pi * asin(sqrt(x))
            assert!(relative_eq!(
                beta_inc(0.5, 0.5, x),
                2. / PI * x.sqrt().asin(),
                max_relative = 1e-10
            ));
        }
    }

    #[test]
    fn beta_inc_symmetric_midpoint() {
        for &a in &[0.5, 1., 2.5, 10., 150.] {
            assert!(relative_eq!(beta_inc(a, a, 0.5), 0.5, epsilon = 1e-10));
        }
    }

    quickcheck! {
        fn beta_inc_is_a_probability(a: u8, b: u8, x: u16) -> TestResult {
            if a == 0 || b == 0 {
                return TestResult::discard();
            }

            let a = f64::from(a) / 4.;
            let b = f64::from(b) / 4.;
            let x = f64::from(x) / f64::from(u16::max_value());
            let i = beta_inc(a, b, x);

            TestResult::from_bool(i >= 0. && i <= 1.)
        }
    }

    quickcheck! {
        fn beta_inc_reflection(a: u8, b: u8, x: u16) -> TestResult {
            if a == 0 || b == 0 {
                return TestResult::discard();
            }

            let a = f64::from(a) / 4.;
            let b = f64::from(b) / 4.;
            let x = f64::from(x) / f64::from(u16::max_value());

            TestResult::from_bool(relative_eq!(
                beta_inc(a, b, x),
                1. - beta_inc(b, a, 1. - x),
                epsilon = 1e-10
            ))
        }
    }
}
