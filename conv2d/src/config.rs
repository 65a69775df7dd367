//! Execution mode configuration.

use std::num::NonZeroUsize;

pub use common::parallel::RowPartition;

/// Settings for the parallel engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParallelConfig {
    /// Worker count. `None` uses the global rayon pool, which is sized to the
    /// available hardware concurrency (or `RAYON_NUM_THREADS`).
    pub threads: Option<NonZeroUsize>,
    /// How output rows are split between workers.
    pub partition: RowPartition,
}

impl ParallelConfig {
    pub fn with_threads(threads: usize) -> Self {
        Self {
            threads: NonZeroUsize::new(threads),
            ..Self::default()
        }
    }

    pub fn with_partition(mut self, partition: RowPartition) -> Self {
        self.partition = partition;
        self
    }

    pub fn validate(&self) {
        if let RowPartition::Chunked(rows) = self.partition {
            assert!(rows > 0, "Chunked partition needs at least 1 row per chunk");
        }
    }
}

/// Which engine computes the convolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Single-threaded reference engine, bit-for-bit deterministic.
    Serial,
    /// Data-parallel engine.
    Parallel(ParallelConfig),
}

impl Default for Mode {
    fn default() -> Self {
        Self::Parallel(ParallelConfig::default())
    }
}
