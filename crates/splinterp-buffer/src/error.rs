use thiserror::Error;

/// An error type for sample buffer construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BufferError {
    /// The backing memory is not aligned for the element type.
    ///
    /// Element access goes through atomic integers of the same width as the
    /// sample, which may require a stricter alignment than the float type.
    #[error("Buffer address is not aligned to {align} bytes")]
    Misaligned {
        /// Required alignment in bytes.
        align: usize,
    },

    /// The byte length is not a whole number of elements.
    #[error("Buffer length of {len} bytes is not a multiple of the element size ({elem_size})")]
    InvalidByteLength {
        /// Length of the raw buffer in bytes.
        len: usize,
        /// Size of one element in bytes.
        elem_size: usize,
    },

    /// A byte offset or stride does not land on an element boundary.
    #[error("Byte stride {stride} is not a multiple of the element size ({elem_size})")]
    UnalignedStride {
        /// The offending byte offset or stride.
        stride: isize,
        /// Size of one element in bytes.
        elem_size: usize,
    },

    /// The view addresses elements outside of its storage.
    #[error("View reaches element offsets [{min}, {max}] but the storage holds {len} elements")]
    OutOfBounds {
        /// Smallest reachable element offset.
        min: isize,
        /// Largest reachable element offset.
        max: isize,
        /// Number of elements in the storage.
        len: usize,
    },

    /// A window does not fit inside the view it is taken from.
    #[error("Window at {origin:?} with shape {shape:?} exceeds the view shape {parent:?}")]
    InvalidWindow {
        /// Top-left corner of the window as (row, col).
        origin: [usize; 2],
        /// Shape of the window as (rows, cols).
        shape: [usize; 2],
        /// Shape of the parent view as (rows, cols).
        parent: [usize; 2],
    },
}
