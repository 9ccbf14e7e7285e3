use splinterp_buffer::{BufferError, Precision};
use thiserror::Error;

/// Errors that can occur while building axes or running the interpolation.
///
/// All of them are structural: retrying the same call yields the same error.
#[derive(Debug, Error, PartialEq)]
pub enum InterpolationError {
    /// A coordinate sequence is too short to support a natural cubic spline.
    #[error("Axis has {len} points, a natural cubic spline needs at least 4")]
    DegenerateAxis {
        /// Number of points in the axis.
        len: usize,
    },

    /// A coordinate sequence is not strictly increasing.
    ///
    /// `index` is the first position whose value is not greater than its
    /// predecessor. NaN coordinates are reported the same way.
    #[error("Axis is not strictly increasing at index {index}")]
    NonMonotonicAxis {
        /// First offending index.
        index: usize,
    },

    /// A line or buffer extent does not match the axis it is paired with.
    #[error("Length mismatch: expected {expected} samples, got {actual}")]
    LengthMismatch {
        /// Length required by the axis.
        expected: usize,
        /// Length actually supplied.
        actual: usize,
    },

    /// A worker failed while processing its line range.
    #[error("Worker {worker} failed on lines [{start}, {end}): {source}")]
    WorkerFailure {
        /// Index of the failing worker.
        worker: usize,
        /// First line of the worker's range.
        start: usize,
        /// One past the last line of the worker's range.
        end: usize,
        /// The error raised inside the worker.
        source: Box<InterpolationError>,
    },

    /// The intermediate buffer must hold 64-bit samples.
    #[error("Intermediate buffer must be f64, got {0}")]
    IntermediatePrecision(Precision),

    /// The intermediate buffer shares memory with the input or the output.
    #[error("Intermediate buffer overlaps the {0} buffer")]
    IntermediateAliasing(&'static str),

    /// The worker thread pool failed to build.
    #[error("Failed to build thread pool: {0}")]
    ThreadPoolBuild(String),

    /// A buffer or view could not be constructed.
    #[error(transparent)]
    Buffer(#[from] BufferError),
}
