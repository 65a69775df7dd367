//! Row-partitioned parallel iteration over 2D buffers.
//!
//! A row-major buffer of `width`-wide rows is split into disjoint, row-aligned
//! mutable chunks that rayon workers process independently. Each chunk is
//! yielded together with the index of its first row.

use std::fmt;
use std::str::FromStr;

use rayon::iter::plumbing::{Consumer, ProducerCallback, UnindexedConsumer};
use rayon::prelude::*;


/// Multiplier for number of chunks relative to worker threads.
/// Using 3x threads provides good load balancing when some chunks finish faster.
const CHUNKS_PER_THREAD: usize = 3;

/// Strategy for splitting rows into chunks.
///
/// The choice only affects load balance. Every row belongs to exactly one chunk
/// whatever the strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowPartition {
    /// One contiguous block of rows per worker thread.
    Static,
    /// Fixed number of rows per chunk, handed out dynamically by work stealing.
    Chunked(usize),
    /// About three chunks per worker thread.
    #[default]
    Auto,
}

impl RowPartition {
    /// Number of rows in each chunk (the last chunk may be shorter).
    pub fn chunk_rows(self, height: usize, threads: usize) -> usize {
        let threads = threads.max(1);
        match self {
            RowPartition::Static => height.div_ceil(threads).max(1),
            RowPartition::Chunked(rows) => rows.max(1),
            RowPartition::Auto => (height / (threads * CHUNKS_PER_THREAD)).max(1),
        }
    }
}

impl fmt::Display for RowPartition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowPartition::Static => write!(f, "static"),
            RowPartition::Chunked(rows) => write!(f, "{rows}"),
            RowPartition::Auto => write!(f, "auto"),
        }
    }
}

impl FromStr for RowPartition {
    type Err = String;

    /// Parses `static`, `auto`, or a positive number of rows per chunk.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "static" => Ok(RowPartition::Static),
            "auto" => Ok(RowPartition::Auto),
            other => match other.parse::<usize>() {
                Ok(0) => Err("rows per chunk must be at least 1".to_string()),
                Ok(rows) => Ok(RowPartition::Chunked(rows)),
                Err(_) => Err(format!(
                    "invalid partition '{s}', expected 'static', 'auto' or a row count"
                )),
            },
        }
    }
}

/// Parallel iterator over row-aligned mutable chunks that yields `(chunk_start_row, chunk)` pairs.
pub struct RowChunksMut<'a, T: Send> {
    inner: rayon::slice::ChunksMut<'a, T>,
    chunk_rows: usize,
}

impl<'a, T: Send + 'a> ParallelIterator for RowChunksMut<'a, T> {
    type Item = (usize, &'a mut [T]);

    fn drive_unindexed<C>(self, consumer: C) -> C::Result
    where
        C: UnindexedConsumer<Self::Item>,
    {
        let chunk_rows = self.chunk_rows;
        self.inner
            .enumerate()
            .map(move |(idx, chunk)| (idx * chunk_rows, chunk))
            .drive_unindexed(consumer)
    }

    fn opt_len(&self) -> Option<usize> {
        Some(self.inner.len())
    }
}

impl<'a, T: Send + 'a> IndexedParallelIterator for RowChunksMut<'a, T> {
    fn len(&self) -> usize {
        self.inner.len()
    }

    fn drive<C>(self, consumer: C) -> C::Result
    where
        C: Consumer<Self::Item>,
    {
        let chunk_rows = self.chunk_rows;
        self.inner
            .enumerate()
            .map(move |(idx, chunk)| (idx * chunk_rows, chunk))
            .drive(consumer)
    }

    fn with_producer<CB>(self, callback: CB) -> CB::Output
    where
        CB: ProducerCallback<Self::Item>,
    {
        let chunk_rows = self.chunk_rows;
        self.inner
            .enumerate()
            .map(move |(idx, chunk)| (idx * chunk_rows, chunk))
            .with_producer(callback)
    }
}

/// Extension trait for splitting a row-major slice into parallel row chunks.
pub trait ParRowsMut<'a, T: Send + 'a> {
    /// Split into mutable parallel chunks aligned to row boundaries.
    ///
    /// Chunk sizes are derived from `partition` and the thread count of the
    /// rayon pool the call runs in, so call it inside `ThreadPool::install`
    /// when using a dedicated pool.
    ///
    /// # Panics
    ///
    /// Panics if `width` is 0 or the slice length is not a multiple of `width`.
    fn par_rows_mut(&'a mut self, width: usize, partition: RowPartition) -> RowChunksMut<'a, T>;
}

impl<'a, T: Send + 'a> ParRowsMut<'a, T> for [T] {
    fn par_rows_mut(&'a mut self, width: usize, partition: RowPartition) -> RowChunksMut<'a, T> {
        assert!(width > 0, "width must be > 0");
        assert_eq!(
            self.len() % width,
            0,
            "slice length must be a multiple of width"
        );
        let height = self.len() / width;
        let chunk_rows = partition.chunk_rows(height, rayon::current_num_threads());
        RowChunksMut {
            inner: self.par_chunks_mut(width * chunk_rows),
            chunk_rows,
        }
    }
}
