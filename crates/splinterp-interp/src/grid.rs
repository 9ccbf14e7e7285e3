use std::cmp::Ordering;

use crate::error::InterpolationError;

/// Minimum number of knots accepted for a natural cubic spline axis.
pub const MIN_SPLINE_POINTS: usize = 4;

/// A strictly increasing sequence of sample coordinates along one axis.
///
/// The grid is immutable once built and is shared read-only by every line
/// fit of a pass, across all workers.
///
/// # Examples
///
/// ```rust
/// use splinterp_interp::grid::Grid1D;
///
/// let grid = Grid1D::linspace(0.0, 4.0, 9).unwrap();
/// assert_eq!(grid.len(), 9);
/// assert_eq!(grid.as_slice()[1], 0.5);
///
/// assert!(Grid1D::new(vec![0.0, 1.0, 1.0, 2.0]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<f64>", into = "Vec<f64>")
)]
pub struct Grid1D {
    coords: Vec<f64>,
}

impl Grid1D {
    /// Create a grid from coordinates.
    ///
    /// # Errors
    ///
    /// * [`InterpolationError::DegenerateAxis`] if there are fewer than
    ///   [`MIN_SPLINE_POINTS`] coordinates.
    /// * [`InterpolationError::NonMonotonicAxis`] if any coordinate is not
    ///   strictly greater than the previous one (NaN included).
    pub fn new(coords: Vec<f64>) -> Result<Self, InterpolationError> {
        if coords.len() < MIN_SPLINE_POINTS {
            return Err(InterpolationError::DegenerateAxis { len: coords.len() });
        }
        if let Some(pos) = coords
            .windows(2)
            .position(|w| w[1].partial_cmp(&w[0]) != Some(Ordering::Greater))
        {
            return Err(InterpolationError::NonMonotonicAxis { index: pos + 1 });
        }
        // a NaN in front is caught by the pairwise test, a lone infinity is not
        if let Some(index) = coords.iter().position(|x| !x.is_finite()) {
            return Err(InterpolationError::NonMonotonicAxis { index });
        }
        Ok(Self { coords })
    }

    /// Create a grid by copying a slice of coordinates.
    pub fn from_slice(coords: &[f64]) -> Result<Self, InterpolationError> {
        Self::new(coords.to_vec())
    }

    /// `len` evenly spaced coordinates from `start` to `end` inclusive.
    pub fn linspace(start: f64, end: f64, len: usize) -> Result<Self, InterpolationError> {
        let step = (end - start) / (len as f64 - 1.0);
        let coords = (0..len)
            .map(|i| {
                if i + 1 == len {
                    end
                } else {
                    start + step * i as f64
                }
            })
            .collect();
        Self::new(coords)
    }

    /// `len` coordinates `start, start + step, ...`.
    pub fn uniform(start: f64, step: f64, len: usize) -> Result<Self, InterpolationError> {
        Self::new((0..len).map(|i| start + step * i as f64).collect())
    }

    /// Number of coordinates.
    #[inline]
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    /// Always `false`; a grid has at least [`MIN_SPLINE_POINTS`] coordinates.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// The coordinates as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.coords
    }

    /// The smallest coordinate.
    #[inline]
    pub fn first(&self) -> f64 {
        self.coords[0]
    }

    /// The largest coordinate.
    #[inline]
    pub fn last(&self) -> f64 {
        self.coords[self.coords.len() - 1]
    }

    /// Whether `x` lies inside `[first, last]`.
    #[inline]
    pub fn contains(&self, x: f64) -> bool {
        self.first() <= x && x <= self.last()
    }
}

impl AsRef<[f64]> for Grid1D {
    fn as_ref(&self) -> &[f64] {
        &self.coords
    }
}

impl TryFrom<Vec<f64>> for Grid1D {
    type Error = InterpolationError;

    fn try_from(coords: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(coords)
    }
}

impl From<Grid1D> for Vec<f64> {
    fn from(grid: Grid1D) -> Self {
        grid.coords
    }
}
