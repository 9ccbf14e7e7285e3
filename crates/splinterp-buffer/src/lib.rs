#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Overview
//!
//! `splinterp-buffer` describes where samples live and how to reach them:
//!
//! - **Precision**: runtime tag for the element width (`f32` or `f64`).
//! - **SampleStorage**: borrowed memory that reads `f64` and writes `f64`
//!   whatever the element width is.
//! - **StridedView**: a 2D window over a storage with arbitrary element strides.
//!
//! Views never own memory and may alias each other; every element access is
//! an atomic relaxed load or store, so aliasing views can be used from
//! several threads at once.

/// Error types for buffer construction.
pub mod error;

/// Element precision tag.
pub mod precision;

/// Precision-agnostic sample storage.
pub mod storage;

/// Strided 2D views.
pub mod view;

pub use crate::error::BufferError;
pub use crate::precision::Precision;
pub use crate::storage::{Sample, SampleStorage};
pub use crate::view::StridedView;
