use std::ops::Range;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, warn};
use rayon::prelude::*;

use crate::error::InterpolationError;

/// Controls how the lines of a pass are distributed over threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExecutionStrategy {
    /// Run every line on the calling thread, without partitioning.
    #[default]
    Serial,

    /// Run on a local thread pool with `n` threads, one line range per thread.
    ///
    /// `Fixed(0)` and `Fixed(1)` behave like [`ExecutionStrategy::Serial`].
    ///
    /// # Warning
    /// Creates a new thread pool on every pass, which has significant overhead
    /// for small grids.
    Fixed(usize),

    /// Use the global Rayon thread pool, one line range per pool thread.
    Global,
}

impl ExecutionStrategy {
    /// Strategy for a caller supplied thread count; `0` and `1` run serially.
    pub fn from_threads(threads: usize) -> Self {
        if threads <= 1 {
            ExecutionStrategy::Serial
        } else {
            ExecutionStrategy::Fixed(threads)
        }
    }

    /// Number of line ranges a pass is split into.
    pub fn num_workers(&self) -> usize {
        match self {
            ExecutionStrategy::Serial => 1,
            ExecutionStrategy::Fixed(n) => (*n).max(1),
            ExecutionStrategy::Global => rayon::current_num_threads(),
        }
    }
}

/// Split `[0, total)` into `threads` contiguous, disjoint ranges.
///
/// Range lengths differ by at most one, the longer ones first. When there are
/// more threads than lines the trailing ranges are empty. A thread count of
/// zero is treated as one.
///
/// # Examples
///
/// ```rust
/// use splinterp_interp::parallel::partition;
///
/// assert_eq!(partition(10, 3), vec![0..4, 4..7, 7..10]);
/// assert_eq!(partition(2, 3), vec![0..1, 1..2, 2..2]);
/// ```
pub fn partition(total: usize, threads: usize) -> Vec<Range<usize>> {
    let workers = threads.max(1);
    let base = total / workers;
    let extra = total % workers;

    let mut start = 0;
    (0..workers)
        .map(|w| {
            let len = base + usize::from(w < extra);
            let range = start..start + len;
            start += len;
            range
        })
        .collect()
}

/// Run `op` over `[0, total)` split according to `strategy`.
///
/// Every worker receives one range from [`partition`] and a shared abort
/// flag. A worker that fails raises the flag so the others can stop at their
/// next line boundary; the failure is returned wrapped in
/// [`InterpolationError::WorkerFailure`]. Returns only once every worker has
/// finished, so consecutive calls are separated by a full barrier.
///
/// With [`ExecutionStrategy::Serial`] the whole range runs on the calling
/// thread and errors are returned unwrapped.
pub fn execute_partitioned<F>(
    strategy: ExecutionStrategy,
    total: usize,
    op: F,
) -> Result<(), InterpolationError>
where
    F: Fn(Range<usize>, &AtomicBool) -> Result<(), InterpolationError> + Sync,
{
    let abort = AtomicBool::new(false);

    let workers = strategy.num_workers();
    if workers <= 1 {
        return op(0..total, &abort);
    }

    let ranges = partition(total, workers);
    debug!("partitioned {total} lines into {workers} ranges: {ranges:?}");

    let run = |(worker, range): (usize, Range<usize>)| {
        let (start, end) = (range.start, range.end);
        op(range, &abort).map_err(|e| {
            abort.store(true, Ordering::Relaxed);
            InterpolationError::WorkerFailure {
                worker,
                start,
                end,
                source: Box::new(e),
            }
        })
    };

    match strategy {
        ExecutionStrategy::Fixed(n) => {
            if n > total {
                warn!("{n} threads requested for {total} lines, some workers stay idle");
            }
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| InterpolationError::ThreadPoolBuild(e.to_string()))?;
            pool.install(|| ranges.into_par_iter().enumerate().try_for_each(run))
        }
        _ => ranges.into_par_iter().enumerate().try_for_each(run),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_partition_covers_and_balances() {
        for total in [0, 1, 7, 100, 101] {
            for threads in [0, 1, 2, 3, 8, 200] {
                let ranges = partition(total, threads);
                assert_eq!(ranges.len(), threads.max(1));

                // contiguous and covering
                let mut next = 0;
                for r in &ranges {
                    assert_eq!(r.start, next);
                    next = r.end;
                }
                assert_eq!(next, total);

                let lens = ranges.iter().map(|r| r.len()).collect::<Vec<_>>();
                let (min, max) = (lens.iter().min(), lens.iter().max());
                if let (Some(min), Some(max)) = (min, max) {
                    assert!(max - min <= 1);
                }
            }
        }
    }

    #[test]
    fn test_partition_more_threads_than_lines() {
        let ranges = partition(3, 5);
        assert_eq!(ranges, vec![0..1, 1..2, 2..3, 3..3, 3..3]);
    }

    #[test]
    fn test_strategy_from_threads() {
        assert_eq!(ExecutionStrategy::from_threads(0), ExecutionStrategy::Serial);
        assert_eq!(ExecutionStrategy::from_threads(1), ExecutionStrategy::Serial);
        assert_eq!(
            ExecutionStrategy::from_threads(4),
            ExecutionStrategy::Fixed(4)
        );
        assert_eq!(ExecutionStrategy::Fixed(0).num_workers(), 1);
        assert_eq!(ExecutionStrategy::default(), ExecutionStrategy::Serial);
    }

    #[test]
    fn test_execute_visits_every_line_once() -> Result<(), InterpolationError> {
        let strategies = [
            ExecutionStrategy::Serial,
            ExecutionStrategy::Fixed(1),
            ExecutionStrategy::Fixed(3),
            ExecutionStrategy::Fixed(64),
            ExecutionStrategy::Global,
        ];
        for strategy in strategies {
            let hits = (0..50).map(|_| AtomicUsize::new(0)).collect::<Vec<_>>();
            execute_partitioned(strategy, hits.len(), |range, _| {
                for i in range {
                    hits[i].fetch_add(1, Ordering::Relaxed);
                }
                Ok(())
            })?;
            assert!(hits.iter().all(|h| h.load(Ordering::Relaxed) == 1));
        }
        Ok(())
    }

    #[test]
    fn test_execute_wraps_worker_error() {
        let _ = env_logger::builder().is_test(true).try_init();

        let res = execute_partitioned(ExecutionStrategy::Fixed(4), 8, |range, abort| {
            if range.start == 4 {
                return Err(InterpolationError::DegenerateAxis { len: 2 });
            }
            for _ in range {
                if abort.load(Ordering::Relaxed) {
                    break;
                }
            }
            Ok(())
        });
        assert_eq!(
            res,
            Err(InterpolationError::WorkerFailure {
                worker: 2,
                start: 4,
                end: 6,
                source: Box::new(InterpolationError::DegenerateAxis { len: 2 }),
            })
        );
    }

    #[test]
    fn test_execute_serial_error_unwrapped() {
        let res = execute_partitioned(ExecutionStrategy::Serial, 8, |_, _| {
            Err(InterpolationError::NonMonotonicAxis { index: 1 })
        });
        assert_eq!(res, Err(InterpolationError::NonMonotonicAxis { index: 1 }));
    }
}
