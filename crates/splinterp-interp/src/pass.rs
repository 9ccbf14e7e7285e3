use std::ops::Range;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use log::debug;
use splinterp_buffer::StridedView;

use crate::{
    error::InterpolationError,
    grid::Grid1D,
    parallel::{execute_partitioned, ExecutionStrategy},
    spline::SplineAxis1D,
};

/// The dimension a pass interpolates along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassAxis {
    /// Interpolate along the row index: one line per column.
    Rows,
    /// Interpolate along the column index: one line per row.
    Cols,
}

impl PassAxis {
    /// Split a `[rows, cols]` shape into `(samples per line, number of lines)`.
    #[inline]
    pub fn split(&self, shape: [usize; 2]) -> (usize, usize) {
        match self {
            PassAxis::Rows => (shape[0], shape[1]),
            PassAxis::Cols => (shape[1], shape[0]),
        }
    }

    /// `(row, col)` of sample `k` in line `line`.
    #[inline]
    fn index(&self, line: usize, k: usize) -> (usize, usize) {
        match self {
            PassAxis::Rows => (k, line),
            PassAxis::Cols => (line, k),
        }
    }
}

/// One separable interpolation pass from `input` to `output`.
///
/// Every line of `input` is gathered into a private scratch vector, fitted
/// with a natural cubic spline over `input_axis` and evaluated at each
/// coordinate of `query_axis` into the matching line of `output`. Lines are
/// independent; since a line is fully read before any of its outputs are
/// written, `input` and `output` may share memory as long as distinct lines
/// do not overlap.
#[derive(Debug, Clone, Copy)]
pub struct SeparablePass<'a> {
    input: StridedView<'a>,
    input_axis: &'a Grid1D,
    output: StridedView<'a>,
    query_axis: &'a Grid1D,
    axis: PassAxis,
}

impl<'a> SeparablePass<'a> {
    /// Create a pass, checking the view shapes against the axes.
    ///
    /// # Arguments
    ///
    /// * `input` - The samples to read.
    /// * `input_axis` - Coordinates of the input samples along `axis`.
    /// * `output` - Where the interpolated samples are written.
    /// * `query_axis` - Coordinates to evaluate along `axis`.
    /// * `axis` - The dimension walked by each line.
    ///
    /// # Errors
    ///
    /// Returns [`InterpolationError::LengthMismatch`] if the walked extent of
    /// `input` or `output` differs from its axis, or if they do not have the
    /// same number of lines.
    pub fn new(
        input: StridedView<'a>,
        input_axis: &'a Grid1D,
        output: StridedView<'a>,
        query_axis: &'a Grid1D,
        axis: PassAxis,
    ) -> Result<Self, InterpolationError> {
        let (in_samples, in_lines) = axis.split(input.shape());
        let (out_samples, out_lines) = axis.split(output.shape());

        if in_samples != input_axis.len() {
            return Err(InterpolationError::LengthMismatch {
                expected: input_axis.len(),
                actual: in_samples,
            });
        }
        if out_samples != query_axis.len() {
            return Err(InterpolationError::LengthMismatch {
                expected: query_axis.len(),
                actual: out_samples,
            });
        }
        if out_lines != in_lines {
            return Err(InterpolationError::LengthMismatch {
                expected: in_lines,
                actual: out_lines,
            });
        }

        Ok(Self {
            input,
            input_axis,
            output,
            query_axis,
            axis,
        })
    }

    /// Number of independent lines in the pass.
    #[inline]
    pub fn num_lines(&self) -> usize {
        self.axis.split(self.input.shape()).1
    }

    /// The dimension walked by each line.
    #[inline]
    pub fn axis(&self) -> PassAxis {
        self.axis
    }

    /// Interpolate the lines in `lines` on the calling thread.
    ///
    /// The scratch line and the spline fitter are allocated once and reused
    /// for every line of the range. The `abort` flag is checked before each
    /// line; once raised the remaining lines are skipped.
    pub fn run_lines(
        &self,
        lines: Range<usize>,
        abort: &AtomicBool,
    ) -> Result<(), InterpolationError> {
        let n = self.input_axis.len();
        let mut spline = SplineAxis1D::with_capacity(n);
        let mut line = vec![0.0f64; n];

        for i in lines {
            if abort.load(Ordering::Relaxed) {
                break;
            }

            for (k, v) in line.iter_mut().enumerate() {
                let (r, c) = self.axis.index(i, k);
                *v = self.input.get(r, c);
            }

            let state = spline.fit(self.input_axis, &line)?;

            for (k, &q) in self.query_axis.as_slice().iter().enumerate() {
                let (r, c) = self.axis.index(i, k);
                self.output.set(r, c, state.eval(q));
            }
        }

        Ok(())
    }

    /// Interpolate every line, distributed according to `strategy`.
    ///
    /// Returns after all workers have joined.
    pub fn run(&self, strategy: ExecutionStrategy) -> Result<(), InterpolationError> {
        let start = Instant::now();
        execute_partitioned(strategy, self.num_lines(), |range, abort| {
            self.run_lines(range, abort)
        })?;
        debug!(
            "{:?} pass: {} lines, {} -> {} samples, {:?} in {:?}",
            self.axis,
            self.num_lines(),
            self.input_axis.len(),
            self.query_axis.len(),
            strategy,
            start.elapsed()
        );
        Ok(())
    }
}
