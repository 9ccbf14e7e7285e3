use log::debug;
use num_traits::Zero;
use splinterp_buffer::{Precision, Sample, SampleStorage, StridedView};

use crate::{
    error::InterpolationError,
    grid::Grid1D,
    parallel::ExecutionStrategy,
    pass::{PassAxis, SeparablePass},
};

/// The four coordinate axes of a 2D resampling.
///
/// Axis 1 indexes rows and axis 2 indexes columns. All grids are validated
/// when built, so a malformed axis is reported before any buffer is touched.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResampleGrids {
    /// Row coordinates of the input samples.
    pub in_axis1: Grid1D,
    /// Column coordinates of the input samples.
    pub in_axis2: Grid1D,
    /// Row coordinates to evaluate.
    pub out_axis1: Grid1D,
    /// Column coordinates to evaluate.
    pub out_axis2: Grid1D,
}

impl ResampleGrids {
    /// Build and validate the four axes from raw coordinates.
    pub fn new(
        in_axis1: &[f64],
        in_axis2: &[f64],
        out_axis1: &[f64],
        out_axis2: &[f64],
    ) -> Result<Self, InterpolationError> {
        Ok(Self {
            in_axis1: Grid1D::from_slice(in_axis1)?,
            in_axis2: Grid1D::from_slice(in_axis2)?,
            out_axis1: Grid1D::from_slice(out_axis1)?,
            out_axis2: Grid1D::from_slice(out_axis2)?,
        })
    }

    /// Resample with the same axes on the input and output side.
    pub fn identity(axis1: Grid1D, axis2: Grid1D) -> Self {
        Self {
            in_axis1: axis1.clone(),
            in_axis2: axis2.clone(),
            out_axis1: axis1,
            out_axis2: axis2,
        }
    }

    /// `[rows, cols]` of the input.
    pub fn input_shape(&self) -> [usize; 2] {
        [self.in_axis1.len(), self.in_axis2.len()]
    }

    /// `[rows, cols]` of the intermediate buffer between the two passes.
    pub fn intermediate_shape(&self) -> [usize; 2] {
        [self.out_axis1.len(), self.in_axis2.len()]
    }

    /// `[rows, cols]` of the output.
    pub fn output_shape(&self) -> [usize; 2] {
        [self.out_axis1.len(), self.out_axis2.len()]
    }
}

/// Resample `input` onto the output axes of `grids`, writing into `output`.
///
/// The first pass interpolates along axis 1 (rows) from `input` into
/// `intermediate`; the second interpolates along axis 2 (columns) from
/// `intermediate` into `output`. The second pass starts only after every
/// worker of the first has finished.
///
/// `input` and `output` may alias each other: the input is fully consumed by
/// the first pass before the output is written. The intermediate buffer must
/// be disjoint from both.
///
/// # Arguments
///
/// * `input` - View of shape `grids.input_shape()`, any precision.
/// * `output` - View of shape `grids.output_shape()`, any precision.
/// * `intermediate` - `f64` view of shape `grids.intermediate_shape()`.
/// * `grids` - The input and output axes.
/// * `strategy` - How the lines of each pass are spread over threads.
///
/// # Errors
///
/// Shape, precision and aliasing problems are reported before the first
/// pass runs, in which case no buffer is modified.
///
/// # Examples
///
/// ```rust
/// use splinterp_buffer::{SampleStorage, StridedView};
/// use splinterp_interp::{interpolate, ExecutionStrategy, Grid1D, ResampleGrids};
///
/// let grids = ResampleGrids {
///     in_axis1: Grid1D::uniform(0.0, 1.0, 4).unwrap(),
///     in_axis2: Grid1D::uniform(0.0, 1.0, 4).unwrap(),
///     out_axis1: Grid1D::uniform(0.0, 0.5, 7).unwrap(),
///     out_axis2: Grid1D::uniform(0.0, 0.5, 7).unwrap(),
/// };
///
/// let mut src = vec![1.0f32; 16];
/// let mut tmp = vec![0.0f64; 7 * 4];
/// let mut dst = vec![0.0f32; 7 * 7];
///
/// let input = StridedView::contiguous(SampleStorage::from_f32_mut(&mut src).unwrap(), [4, 4]).unwrap();
/// let inter = StridedView::contiguous(SampleStorage::from_f64_mut(&mut tmp).unwrap(), [7, 4]).unwrap();
/// let output = StridedView::contiguous(SampleStorage::from_f32_mut(&mut dst).unwrap(), [7, 7]).unwrap();
///
/// interpolate(input, output, inter, &grids, ExecutionStrategy::Serial).unwrap();
/// assert!(dst.iter().all(|&v| (v - 1.0).abs() < 1e-6));
/// ```
pub fn interpolate(
    input: StridedView<'_>,
    output: StridedView<'_>,
    intermediate: StridedView<'_>,
    grids: &ResampleGrids,
    strategy: ExecutionStrategy,
) -> Result<(), InterpolationError> {
    if intermediate.precision() != Precision::F64 {
        return Err(InterpolationError::IntermediatePrecision(
            intermediate.precision(),
        ));
    }
    if intermediate.overlaps(&input) {
        return Err(InterpolationError::IntermediateAliasing("input"));
    }
    if intermediate.overlaps(&output) {
        return Err(InterpolationError::IntermediateAliasing("output"));
    }

    let first = SeparablePass::new(
        input,
        &grids.in_axis1,
        intermediate,
        &grids.out_axis1,
        PassAxis::Rows,
    )?;
    let second = SeparablePass::new(
        intermediate,
        &grids.in_axis2,
        output,
        &grids.out_axis2,
        PassAxis::Cols,
    )?;

    debug!(
        "resampling {:?} ({}) -> {:?} ({}) through {:?}",
        grids.input_shape(),
        input.precision(),
        grids.output_shape(),
        output.precision(),
        grids.intermediate_shape()
    );

    first.run(strategy)?;
    second.run(strategy)
}

/// Resample a row-major buffer, allocating the intermediate and output.
///
/// `data` must hold `grids.input_shape()` samples in row-major order. It is
/// borrowed mutably only because sample storage requires exclusive access;
/// it is not modified. The result is row-major with `grids.output_shape()`.
pub fn resample<T>(
    data: &mut [T],
    grids: &ResampleGrids,
    strategy: ExecutionStrategy,
) -> Result<Vec<T>, InterpolationError>
where
    T: Sample + Zero,
{
    let in_shape = grids.input_shape();
    if data.len() != in_shape[0] * in_shape[1] {
        return Err(InterpolationError::LengthMismatch {
            expected: in_shape[0] * in_shape[1],
            actual: data.len(),
        });
    }

    let tmp_shape = grids.intermediate_shape();
    let out_shape = grids.output_shape();
    let mut tmp = vec![0.0f64; tmp_shape[0] * tmp_shape[1]];
    let mut out = vec![T::zero(); out_shape[0] * out_shape[1]];

    let input = StridedView::contiguous(SampleStorage::from_slice_mut(data)?, in_shape)?;
    let intermediate = StridedView::contiguous(SampleStorage::from_f64_mut(&mut tmp)?, tmp_shape)?;
    let output = StridedView::contiguous(SampleStorage::from_slice_mut(&mut out)?, out_shape)?;

    interpolate(input, output, intermediate, grids, strategy)?;

    Ok(out)
}

/// Resampling entry point bound to an execution strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InterpolationEngine {
    strategy: ExecutionStrategy,
}

impl InterpolationEngine {
    /// Create an engine with the given strategy.
    pub fn new(strategy: ExecutionStrategy) -> Self {
        Self { strategy }
    }

    /// Create an engine from a thread count; `0` and `1` run serially.
    pub fn with_threads(threads: usize) -> Self {
        Self::new(ExecutionStrategy::from_threads(threads))
    }

    /// The strategy used for both passes.
    pub fn strategy(&self) -> ExecutionStrategy {
        self.strategy
    }

    /// See [`interpolate`].
    pub fn interpolate(
        &self,
        input: StridedView<'_>,
        output: StridedView<'_>,
        intermediate: StridedView<'_>,
        grids: &ResampleGrids,
    ) -> Result<(), InterpolationError> {
        interpolate(input, output, intermediate, grids, self.strategy)
    }

    /// See [`resample`].
    pub fn resample<T: Sample + Zero>(
        &self,
        data: &mut [T],
        grids: &ResampleGrids,
    ) -> Result<Vec<T>, InterpolationError> {
        resample(data, grids, self.strategy)
    }
}
