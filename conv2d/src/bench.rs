//! Benchmark module for convolution.
//! Run with: cargo bench -p conv2d --features bench --bench convolution

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput};
use rand::prelude::*;

use crate::{
    convolve_parallel, convolve_serial, random_matrix, Matrix, ParallelConfig, RowPartition,
};

/// Register convolution benchmarks with Criterion.
pub fn benchmarks(c: &mut Criterion) {
    benchmark_serial_vs_parallel(c);
    benchmark_partitions(c);
}

fn fixture(size: usize, kernel_size: usize) -> (Matrix, Matrix) {
    let mut rng = StdRng::seed_from_u64(42);
    let input = random_matrix(size, size, &mut rng).expect("fixture allocation");
    let kernel = random_matrix(kernel_size, kernel_size, &mut rng).expect("fixture allocation");
    (input, kernel)
}

/// Serial engine against the parallel engine on the global pool.
fn benchmark_serial_vs_parallel(c: &mut Criterion) {
    let mut group = c.benchmark_group("convolve");

    for (size, kernel_size) in [(256, 3), (256, 8), (1024, 5)] {
        let (input, kernel) = fixture(size, kernel_size);
        let label = format!("{size}x{size}_k{kernel_size}");

        group.throughput(Throughput::Elements((size * size) as u64));

        group.bench_function(BenchmarkId::new("serial", &label), |b| {
            b.iter(|| black_box(convolve_serial(black_box(&input), black_box(&kernel))))
        });

        let config = ParallelConfig::default();
        group.bench_function(BenchmarkId::new("parallel", &label), |b| {
            b.iter(|| {
                black_box(convolve_parallel(
                    black_box(&input),
                    black_box(&kernel),
                    &config,
                ))
            })
        });
    }

    group.finish();
}

/// Load balance of the row partition strategies.
fn benchmark_partitions(c: &mut Criterion) {
    let mut group = c.benchmark_group("partition");
    let (input, kernel) = fixture(1024, 5);

    for partition in [
        RowPartition::Auto,
        RowPartition::Static,
        RowPartition::Chunked(1),
        RowPartition::Chunked(16),
    ] {
        let config = ParallelConfig::default().with_partition(partition);
        group.bench_function(BenchmarkId::from_parameter(partition), |b| {
            b.iter(|| {
                black_box(convolve_parallel(
                    black_box(&input),
                    black_box(&kernel),
                    &config,
                ))
            })
        });
    }

    group.finish();
}
