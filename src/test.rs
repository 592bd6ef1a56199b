use ndarray::Array2;
use rand::distributions::{Distribution, Standard};
use rand::prelude::*;
use rand::rngs::StdRng;

use crate::float::Float;

/// A strictly increasing regressor of length `n` (unit spacing plus jitter) and `m` uniformly
/// distributed series
pub fn series<T>(n: usize, m: usize) -> (Vec<T>, Array2<T>)
where
    T: Float,
    Standard: Distribution<T>,
{
    let mut rng = StdRng::from_entropy();
    let half = T::cast(0.5);

    let x = (0..n)
        .map(|i| T::cast(i) + half * rng.gen::<T>())
        .collect();
    let y = Array2::from_shape_fn((n, m), |_| rng.gen());

    (x, y)
}
