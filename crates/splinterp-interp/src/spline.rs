use crate::{
    error::InterpolationError,
    grid::{Grid1D, MIN_SPLINE_POINTS},
};

/// Natural cubic spline fitter for one axis.
///
/// The fitter owns the scratch memory of the tridiagonal solve and reuses it
/// for every line it fits, so a worker allocates once per pass rather than
/// once per line. Each worker owns its own instance.
#[derive(Debug, Clone, Default)]
pub struct SplineAxis1D {
    second_derivs: Vec<f64>,
    sweep: Vec<f64>,
}

/// A fitted spline for one line, borrowing the fitter's scratch.
///
/// Lives only as long as the line is being evaluated; fitting the next line
/// requires the state to be dropped first.
#[derive(Debug, Clone, Copy)]
pub struct InterpState<'a> {
    knots: &'a [f64],
    values: &'a [f64],
    second_derivs: &'a [f64],
}

impl SplineAxis1D {
    /// Create a fitter with no preallocated scratch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fitter with scratch preallocated for `len` knots.
    pub fn with_capacity(len: usize) -> Self {
        Self {
            second_derivs: Vec::with_capacity(len),
            sweep: Vec::with_capacity(len),
        }
    }

    /// Fit a natural cubic spline through `(knots[i], values[i])`.
    ///
    /// # Arguments
    ///
    /// * `knots` - The strictly increasing coordinates of the samples.
    /// * `values` - The samples, one per knot.
    ///
    /// # Errors
    ///
    /// * [`InterpolationError::LengthMismatch`] if `values` and `knots` differ in length.
    /// * [`InterpolationError::DegenerateAxis`] if there are fewer than four knots.
    pub fn fit<'a>(
        &'a mut self,
        knots: &'a Grid1D,
        values: &'a [f64],
    ) -> Result<InterpState<'a>, InterpolationError> {
        let n = knots.len();
        if values.len() != n {
            return Err(InterpolationError::LengthMismatch {
                expected: n,
                actual: values.len(),
            });
        }
        if n < MIN_SPLINE_POINTS {
            return Err(InterpolationError::DegenerateAxis { len: n });
        }

        let xs = knots.as_slice();
        let ys = values;

        let Self {
            second_derivs: y2,
            sweep: u,
        } = self;
        y2.clear();
        y2.resize(n, 0.0);
        u.clear();
        u.resize(n, 0.0);

        // forward elimination, natural boundary y2[0] = 0
        for i in 1..n - 1 {
            let sig = (xs[i] - xs[i - 1]) / (xs[i + 1] - xs[i - 1]);
            let p = sig * y2[i - 1] + 2.0;
            y2[i] = (sig - 1.0) / p;
            let slope_diff =
                (ys[i + 1] - ys[i]) / (xs[i + 1] - xs[i]) - (ys[i] - ys[i - 1]) / (xs[i] - xs[i - 1]);
            u[i] = (6.0 * slope_diff / (xs[i + 1] - xs[i - 1]) - sig * u[i - 1]) / p;
        }

        // back substitution, natural boundary y2[n - 1] = 0
        y2[n - 1] = 0.0;
        for k in (0..n - 1).rev() {
            y2[k] = y2[k] * y2[k + 1] + u[k];
        }

        Ok(InterpState {
            knots: xs,
            values: ys,
            second_derivs: y2,
        })
    }
}

impl InterpState<'_> {
    /// Evaluate the spline at `x`.
    ///
    /// Outside of the knot range the cubic of the first or last segment is
    /// continued as is; there is no clamping.
    #[inline]
    pub fn eval(&self, x: f64) -> f64 {
        let (xs, ys, y2) = (self.knots, self.values, self.second_derivs);
        let n = xs.len();

        let hi = xs.partition_point(|&k| k < x).clamp(1, n - 1);
        let lo = hi - 1;

        let h = xs[hi] - xs[lo];
        let a = (xs[hi] - x) / h;
        let b = (x - xs[lo]) / h;

        a * ys[lo] + b * ys[hi] + ((a * a * a - a) * y2[lo] + (b * b * b - b) * y2[hi]) * h * h / 6.0
    }

    /// Evaluate the spline at every query, writing into `out`.
    pub fn eval_into(&self, queries: &[f64], out: &mut [f64]) -> Result<(), InterpolationError> {
        if queries.len() != out.len() {
            return Err(InterpolationError::LengthMismatch {
                expected: queries.len(),
                actual: out.len(),
            });
        }
        queries
            .iter()
            .zip(out.iter_mut())
            .for_each(|(&x, y)| *y = self.eval(x));
        Ok(())
    }

    /// The knot coordinates of the fit.
    pub fn knots(&self) -> &[f64] {
        self.knots
    }

    /// Second derivative of the spline at each knot.
    pub fn second_derivatives(&self) -> &[f64] {
        self.second_derivs
    }
}
