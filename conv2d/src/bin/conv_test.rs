//! Runs the parallel and serial convolution engines on the same data and
//! reports their timings.
//!
//! # Usage
//!
//! ```bash
//! # Convolve two matrix files and save the result
//! conv_test --f input.txt --g kernel.txt --o output.txt
//!
//! # Random 1000x1000 input with a 5x5 kernel, saving the generated matrices
//! conv_test --height 1000 --width 1000 --kH 5 --kW 5 --f input.txt --g kernel.txt --o output.txt
//! ```

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context};
use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use conv2d::{
    convolve_parallel, convolve_serial, random_matrix, read_matrix, write_matrix, Matrix,
    ParallelConfig, RowPartition,
};

/// Largest serial/parallel difference accepted as rounding noise.
const MAX_ENGINE_DIFF: f32 = 1e-4;

#[derive(Debug, Parser)]
#[command(about = "Same-size 2D convolution: parallel vs serial")]
struct Args {
    /// Input matrix file (read, or written when generating)
    #[arg(long = "f")]
    input: Option<PathBuf>,

    /// Kernel matrix file (read, or written when generating)
    #[arg(long = "g")]
    kernel: Option<PathBuf>,

    /// Output file for the convolution result
    #[arg(long = "o")]
    output: Option<PathBuf>,

    /// Height of the generated input
    #[arg(long = "height", short = 'H')]
    height: Option<usize>,

    /// Width of the generated input
    #[arg(long = "width", short = 'W')]
    width: Option<usize>,

    /// Height of the generated kernel
    #[arg(long = "kH")]
    kernel_height: Option<usize>,

    /// Width of the generated kernel
    #[arg(long = "kW")]
    kernel_width: Option<usize>,

    /// Worker threads for the parallel engine (default: all cores)
    #[arg(long = "threads")]
    threads: Option<NonZeroUsize>,

    /// Row partitioning: 'static', 'auto', or a number of rows per chunk
    #[arg(long = "partition", default_value_t = RowPartition::Auto)]
    partition: RowPartition,

    /// Seed for generated matrices (random if omitted)
    #[arg(long = "seed")]
    seed: Option<u64>,

    /// Log level, overridden by RUST_LOG
    #[arg(long = "log-level", default_value = "info")]
    log_level: String,

    /// Also write logs to daily-rolling files in this directory
    #[arg(long = "log-dir")]
    log_dir: Option<PathBuf>,
}

impl Args {
    fn generates(&self) -> bool {
        self.height.is_some()
            || self.width.is_some()
            || self.kernel_height.is_some()
            || self.kernel_width.is_some()
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    common::log_setup::setup_logging(&args.log_level, args.log_dir.as_deref());

    let (input, kernel) = load_inputs(&args)?;
    tracing::info!(
        rows = input.rows(),
        cols = input.cols(),
        kernel_rows = kernel.rows(),
        kernel_cols = kernel.cols(),
        "Inputs ready"
    );

    let config = ParallelConfig {
        threads: args.threads,
        partition: args.partition,
    };

    let start = Instant::now();
    let parallel = convolve_parallel(&input, &kernel, &config).context("Parallel convolution")?;
    let parallel_secs = start.elapsed().as_secs_f64();
    println!("Parallel convolution time: {:.6}s", parallel_secs);

    let start = Instant::now();
    let serial = convolve_serial(&input, &kernel).context("Serial convolution")?;
    let serial_secs = start.elapsed().as_secs_f64();
    println!("Serial convolution time: {:.6}s", serial_secs);

    let max_diff = parallel.max_abs_diff(&serial);
    tracing::info!(
        parallel_secs,
        serial_secs,
        speedup = serial_secs / parallel_secs.max(f64::EPSILON),
        max_diff,
        "Convolution finished"
    );
    if max_diff >= MAX_ENGINE_DIFF {
        tracing::warn!(
            max_diff,
            tolerance = MAX_ENGINE_DIFF,
            "Parallel and serial results differ"
        );
    }

    if let Some(path) = &args.output {
        save(path, &parallel)?;
        tracing::info!(path = %path.display(), "Result written");
    }

    Ok(())
}

/// Reads both matrices from file, or generates them when dimensions are given.
fn load_inputs(args: &Args) -> anyhow::Result<(Matrix, Matrix)> {
    if let (Some(input_path), Some(kernel_path), false) =
        (&args.input, &args.kernel, args.generates())
    {
        let input = read_matrix(input_path)
            .with_context(|| format!("Loading input '{}'", input_path.display()))?;
        let kernel = read_matrix(kernel_path)
            .with_context(|| format!("Loading kernel '{}'", kernel_path.display()))?;
        return Ok((input, kernel));
    }

    if !args.generates() {
        bail!(
            "Either pass --f and --g to read matrices, or --height, --width, --kH and --kW to generate them"
        );
    }

    let (Some(height), Some(width), Some(kernel_height), Some(kernel_width)) = (
        args.height,
        args.width,
        args.kernel_height,
        args.kernel_width,
    ) else {
        bail!("Generating matrices needs all of --height, --width, --kH and --kW");
    };

    let seed = args.seed.unwrap_or_else(rand::random);
    tracing::info!(seed, "Generating random matrices");
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let input = random_matrix(height, width, &mut rng).context("Generating input")?;
    let kernel =
        random_matrix(kernel_height, kernel_width, &mut rng).context("Generating kernel")?;

    if let Some(path) = &args.input {
        save(path, &input)?;
    }
    if let Some(path) = &args.kernel {
        save(path, &kernel)?;
    }

    Ok((input, kernel))
}

fn save(path: &Path, matrix: &Matrix) -> anyhow::Result<()> {
    write_matrix(path, matrix).with_context(|| format!("Saving '{}'", path.display()))
}
