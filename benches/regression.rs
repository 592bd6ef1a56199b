use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::Array2;
use rand::distributions::{Distribution, Standard};
use rand::prelude::*;
use rand::rngs::StdRng;

const NTIM: usize = 120;

fn data<T>(nspat: usize) -> (Vec<T>, Array2<T>)
where
    Standard: Distribution<T>,
{
    let mut rng = StdRng::from_entropy();
    let x = (0..NTIM).map(|_| rng.gen()).collect();
    let y = Array2::from_shape_fn((NTIM, nspat), |_| rng.gen());

    (x, y)
}

fn reduced_samples() -> Criterion {
    Criterion::default().sample_size(20)
}

macro_rules! bench {
    ($ty:ident) => {
        pub mod $ty {
            use criterion::{BenchmarkId, Criterion};

            pub fn fit(c: &mut Criterion) {
                let mut group = c.benchmark_group(format!("fit_{}", stringify!($ty)));

                for &nspat in &[1, 100, 10_000] {
                    let (x, y) = super::super::data::<$ty>(nspat);

                    group.bench_with_input(BenchmarkId::from_parameter(nspat), &nspat, |b, _| {
                        b.iter(|| fastreg::fit(&x, y.view()))
                    });
                }

                group.finish();
            }

            pub fn fit_series(c: &mut Criterion) {
                let (x, y) = super::super::data::<$ty>(1);
                let y = y.column(0).to_vec();
                let regression = fastreg::Regression::default();

                c.bench_function(&format!("fit_series_{}", stringify!($ty)), move |b| {
                    b.iter(|| regression.fit_series(&x, &y))
                });
            }
        }
    };
}

mod bench {
    bench!(f32);
    bench!(f64);
}

// Baseline for the batched solve: one independent fit per series
fn independent(c: &mut Criterion) {
    let (x, y) = data::<f64>(10_000);
    let columns = y.columns().into_iter().map(|c| c.to_vec()).collect::<Vec<_>>();
    let regression = fastreg::Regression::default();

    c.bench_with_input(
        BenchmarkId::new("independent_f64", 10_000),
        &columns,
        |b, columns| {
            b.iter(|| {
                columns
                    .iter()
                    .map(|y| regression.fit_series(&x, y))
                    .collect::<Vec<_>>()
            })
        },
    );
}

criterion_group!(
    name = benches;
    config = reduced_samples();
    targets = bench::f32::fit, bench::f32::fit_series,
              bench::f64::fit, bench::f64::fit_series,
              independent);
criterion_main!(benches);
