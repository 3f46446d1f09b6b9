use std::{fmt, ops::Range, str::FromStr};

use rayon::prelude::*;
use thiserror::Error;

/// Errors that can occur during parallel execution.
#[derive(Error, Debug, PartialEq)]
pub enum ParallelError {
    /// The thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    BuildError(String),

    /// The requested thread count is invalid.
    #[error("thread count must be > 0, got {0}")]
    InvalidThreadCount(usize),

    /// The row stride must be valid.
    #[error("row stride must be > 0 and divide the buffer length, got {0}")]
    InvalidRowStride(usize),

    /// The strategy name is not recognized.
    #[error("unknown execution strategy: {0} (expected serial, pool or parallel)")]
    UnknownStrategy(String),
}

/// Controls how a row-wise operation is executed.
///
/// All variants produce the same output; they only differ in how the rows are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStrategy {
    /// Run sequentially on the current thread, rows then columns then channels.
    Serial,

    /// Split the rows into `n` bands and run each band as a task on a dedicated pool of
    /// `n` worker threads.
    ///
    /// # Warning
    /// Creates a new thread pool on every call, which has significant overhead.
    FixedThreadPool(usize),

    /// Split the rows into `n` bands and let the global Rayon thread pool process them
    /// with a parallel iterator.
    DataParallel(usize),
}

impl Default for ExecutionStrategy {
    fn default() -> Self {
        ExecutionStrategy::DataParallel(rayon::current_num_threads())
    }
}

impl ExecutionStrategy {
    /// Short name of the strategy, as accepted by [`FromStr`].
    pub fn name(&self) -> &'static str {
        match self {
            ExecutionStrategy::Serial => "serial",
            ExecutionStrategy::FixedThreadPool(_) => "pool",
            ExecutionStrategy::DataParallel(_) => "parallel",
        }
    }

    /// Number of row bands the strategy splits the image into.
    pub fn num_partitions(&self) -> usize {
        match self {
            ExecutionStrategy::Serial => 1,
            ExecutionStrategy::FixedThreadPool(n) | ExecutionStrategy::DataParallel(n) => *n,
        }
    }

    /// Return the same strategy with `n` partitions. [`ExecutionStrategy::Serial`] is unchanged.
    pub fn with_threads(self, n: usize) -> Self {
        match self {
            ExecutionStrategy::Serial => ExecutionStrategy::Serial,
            ExecutionStrategy::FixedThreadPool(_) => ExecutionStrategy::FixedThreadPool(n),
            ExecutionStrategy::DataParallel(_) => ExecutionStrategy::DataParallel(n),
        }
    }
}

impl fmt::Display for ExecutionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionStrategy::Serial => write!(f, "serial"),
            ExecutionStrategy::FixedThreadPool(n) => write!(f, "pool({n})"),
            ExecutionStrategy::DataParallel(n) => write!(f, "parallel({n})"),
        }
    }
}

impl FromStr for ExecutionStrategy {
    type Err = ParallelError;

    /// Parse `serial`, `pool` or `parallel`. Parallel strategies get the size of the
    /// global Rayon pool as their thread count.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let threads = rayon::current_num_threads();
        match s {
            "serial" => Ok(ExecutionStrategy::Serial),
            "pool" => Ok(ExecutionStrategy::FixedThreadPool(threads)),
            "parallel" => Ok(ExecutionStrategy::DataParallel(threads)),
            _ => Err(ParallelError::UnknownStrategy(s.to_string())),
        }
    }
}

/// Partition of the row range `[0, rows)` into contiguous, disjoint bands.
///
/// Every band but the last has `rows / n` rows; the last band absorbs the remainder.
/// When `n > rows` the leading bands are empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionPlan {
    rows: usize,
    partitions: Vec<Range<usize>>,
}

impl ExecutionPlan {
    /// Build a plan splitting `rows` into `num_partitions` bands.
    ///
    /// # Errors
    ///
    /// Returns [`ParallelError::InvalidThreadCount`] if `num_partitions` is zero.
    pub fn new(rows: usize, num_partitions: usize) -> Result<Self, ParallelError> {
        if num_partitions == 0 {
            return Err(ParallelError::InvalidThreadCount(num_partitions));
        }

        let block_size = rows / num_partitions;
        let partitions = (0..num_partitions)
            .map(|i| {
                let start = i * block_size;
                let end = if i + 1 == num_partitions {
                    rows
                } else {
                    start + block_size
                };
                start..end
            })
            .collect();

        Ok(Self { rows, partitions })
    }

    /// Total number of rows covered by the plan.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// The row bands, in increasing order.
    pub fn partitions(&self) -> &[Range<usize>] {
        &self.partitions
    }

    /// Number of bands in the plan.
    pub fn len(&self) -> usize {
        self.partitions.len()
    }

    /// Whether the plan has no bands. Never true for a plan built with [`ExecutionPlan::new`].
    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }

    /// Split a row-major buffer into one mutable band per partition.
    fn split_rows_mut<'a, T>(
        &self,
        data: &'a mut [T],
        row_stride: usize,
    ) -> Vec<(Range<usize>, &'a mut [T])> {
        let mut rest = data;
        self.partitions
            .iter()
            .map(|range| {
                let remaining = std::mem::take(&mut rest);
                let (band, tail) = remaining.split_at_mut(range.len() * row_stride);
                rest = tail;
                (range.clone(), band)
            })
            .collect()
    }
}

/// Run `f` over disjoint bands of rows of `dst` with the given strategy.
///
/// `dst` is a row-major buffer of `row_stride` elements per row. `f` receives the range of
/// rows of a band together with the mutable slice holding exactly those rows. Bands never
/// overlap, so `f` needs no synchronization to write them. The call returns once every
/// band has been processed.
///
/// # Errors
///
/// Returns an error if the row stride does not describe `dst`, the strategy asks for zero
/// threads, or the thread pool cannot be built. Nothing is written in that case.
pub fn par_iter_row_bands<T, F>(
    strategy: ExecutionStrategy,
    dst: &mut [T],
    row_stride: usize,
    f: F,
) -> Result<(), ParallelError>
where
    T: Send,
    F: Fn(Range<usize>, &mut [T]) + Send + Sync,
{
    if row_stride == 0 || dst.len() % row_stride != 0 {
        return Err(ParallelError::InvalidRowStride(row_stride));
    }

    let rows = dst.len() / row_stride;

    match strategy {
        ExecutionStrategy::Serial => {
            f(0..rows, dst);
        }
        ExecutionStrategy::FixedThreadPool(n) => {
            let plan = ExecutionPlan::new(rows, n)?;
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| ParallelError::BuildError(e.to_string()))?;

            let bands = plan.split_rows_mut(dst, row_stride);
            let f = &f;
            pool.scope(|s| {
                for (range, band) in bands {
                    s.spawn(move |_| f(range, band));
                }
            });
        }
        ExecutionStrategy::DataParallel(n) => {
            let plan = ExecutionPlan::new(rows, n)?;

            plan.split_rows_mut(dst, row_stride)
                .into_par_iter()
                .for_each(|(range, band)| f(range, band));
        }
    }

    Ok(())
}
