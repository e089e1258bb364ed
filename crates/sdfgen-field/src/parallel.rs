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
}

/// Controls how the per-pixel map is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Use the global Rayon thread pool to process rows in parallel.
    #[default]
    ParallelRows,

    /// Run sequentially on the current thread.
    ///
    /// Useful for small images, debugging, or when the overhead of
    /// parallelization outweighs the benefits.
    Serial,

    /// Run on a local thread pool with `n` threads.
    ///
    /// # Warning
    /// Creates a new thread pool on every call, which has significant
    /// overhead. Use this primarily for benchmarking or specific isolation
    /// needs.
    Fixed(usize),
}

/// Evaluate a function over every cell of a `width` x `height` grid.
///
/// The grid is materialized as a flat row-major buffer where each cell holds
/// `f(x, y)`. Rows are distributed over worker threads; no two workers touch
/// the same row, and `f` sees only immutable captures, so the result is
/// identical for every [`ExecutionStrategy`].
///
/// # Arguments
///
/// * `width` - The number of grid columns.
/// * `height` - The number of grid rows.
/// * `strategy` - The execution strategy.
/// * `f` - The function evaluated at each `(x, y)` cell.
///
/// # Returns
///
/// The evaluated grid as a flat buffer of `width * height` values.
pub fn map_rows<T, F>(
    width: usize,
    height: usize,
    strategy: ExecutionStrategy,
    f: F,
) -> Result<Vec<T>, ParallelError>
where
    T: Copy + Default + Send + Sync,
    F: Fn(usize, usize) -> T + Send + Sync,
{
    let mut out = vec![T::default(); width * height];

    match strategy {
        ExecutionStrategy::Serial => {
            out.chunks_exact_mut(width)
                .enumerate()
                .for_each(|(y, row)| fill_row(y, row, &f));
        }
        ExecutionStrategy::ParallelRows => {
            out.par_chunks_exact_mut(width)
                .enumerate()
                .for_each(|(y, row)| fill_row(y, row, &f));
        }
        ExecutionStrategy::Fixed(n) => {
            if n == 0 {
                return Err(ParallelError::InvalidThreadCount(n));
            }
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| ParallelError::BuildError(e.to_string()))?;

            pool.install(|| {
                out.par_chunks_exact_mut(width)
                    .enumerate()
                    .for_each(|(y, row)| fill_row(y, row, &f));
            });
        }
    }

    Ok(out)
}

fn fill_row<T, F>(y: usize, row: &mut [T], f: &F)
where
    F: Fn(usize, usize) -> T,
{
    row.iter_mut()
        .enumerate()
        .for_each(|(x, cell)| *cell = f(x, y));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_rows_serial() -> Result<(), ParallelError> {
        let grid = map_rows(3, 2, ExecutionStrategy::Serial, |x, y| (y * 3 + x) as u8)?;
        assert_eq!(grid, vec![0, 1, 2, 3, 4, 5]);
        Ok(())
    }

    #[test]
    fn test_map_rows_parallel() -> Result<(), ParallelError> {
        let grid = map_rows(3, 2, ExecutionStrategy::ParallelRows, |x, y| {
            (y * 3 + x) as u8
        })?;
        assert_eq!(grid, vec![0, 1, 2, 3, 4, 5]);
        Ok(())
    }

    #[test]
    fn test_map_rows_fixed() -> Result<(), ParallelError> {
        let grid = map_rows(4, 4, ExecutionStrategy::Fixed(2), |x, y| (x * y) as u16)?;
        let serial = map_rows(4, 4, ExecutionStrategy::Serial, |x, y| (x * y) as u16)?;
        assert_eq!(grid, serial);
        Ok(())
    }

    #[test]
    fn test_map_rows_fixed_invalid() {
        let res = map_rows(2, 2, ExecutionStrategy::Fixed(0), |_, _| 0u8);
        assert!(matches!(res, Err(ParallelError::InvalidThreadCount(0))));
    }
}
