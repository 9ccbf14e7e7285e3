#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Overview
//!
//! A 2D grid sampled on irregular but strictly increasing coordinates is
//! resampled onto another such grid with natural cubic splines, one axis at a
//! time:
//!
//! 1. every column is interpolated along the row axis into an `f64`
//!    intermediate buffer,
//! 2. every row of the intermediate is interpolated along the column axis
//!    into the output.
//!
//! Each pass is a set of independent lines, split into contiguous ranges and
//! run on worker threads; each worker owns its own spline scratch.

/// Error types for the interpolation module.
pub mod error;

/// Strictly increasing coordinate axes.
pub mod grid;

/// Line partitioning and parallel execution.
pub mod parallel;

/// One separable interpolation pass.
pub mod pass;

/// Two-pass 2D resampling.
pub mod resample;

/// Natural cubic spline fitting and evaluation.
pub mod spline;

pub use crate::error::InterpolationError;
pub use crate::grid::Grid1D;
pub use crate::parallel::{partition, ExecutionStrategy};
pub use crate::pass::{PassAxis, SeparablePass};
pub use crate::resample::{interpolate, resample, InterpolationEngine, ResampleGrids};
pub use crate::spline::{InterpState, SplineAxis1D};
