use crate::{error::BufferError, precision::Precision, storage::SampleStorage};

/// A non-owning 2D view into sample storage.
///
/// The element at `(row, col)` lives at `offset + row * strides[0] + col * strides[1]`
/// (in elements, not bytes). Strides may be negative, zero or overlapping, so
/// row-major, column-major, flipped and broadcast layouts are all expressible.
///
/// All reachable offsets are validated once at construction; element access
/// afterwards only debug-asserts the logical row/column bounds.
///
/// Views are `Copy`. Two views built from copies of the same storage address
/// the same memory, which is how in-place resampling into a sub-region is set up.
///
/// # Examples
///
/// ```rust
/// use splinterp_buffer::{SampleStorage, StridedView};
///
/// let mut data = vec![1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0];
/// let storage = SampleStorage::from_f64_mut(&mut data).unwrap();
///
/// // 2x3 row-major view and its 3x2 transpose over the same memory
/// let view = StridedView::contiguous(storage, [2, 3]).unwrap();
/// let transposed = view.transpose();
///
/// assert_eq!(view.get(1, 0), 4.0);
/// assert_eq!(transposed.get(0, 1), 4.0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct StridedView<'a> {
    storage: SampleStorage<'a>,
    offset: usize,
    shape: [usize; 2],
    strides: [isize; 2],
}

/// Smallest and largest element offset reachable from `offset`, if any element is.
fn reach(offset: usize, shape: [usize; 2], strides: [isize; 2]) -> Option<(isize, isize)> {
    if shape[0] == 0 || shape[1] == 0 {
        return None;
    }
    let base = offset as isize;
    let (mut min, mut max) = (base, base);
    for (&n, &s) in shape.iter().zip(strides.iter()) {
        let extent = (n as isize - 1).saturating_mul(s);
        if extent < 0 {
            min = min.saturating_add(extent);
        } else {
            max = max.saturating_add(extent);
        }
    }
    Some((min, max))
}

impl<'a> StridedView<'a> {
    /// Create a view with explicit element offset, shape and strides.
    ///
    /// # Arguments
    ///
    /// * `storage` - The memory the view reads from and writes to.
    /// * `offset` - Element offset of `(0, 0)` inside the storage.
    /// * `shape` - `[rows, cols]` of the logical array.
    /// * `strides` - `[row_stride, col_stride]` in elements.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::OutOfBounds`] if any element of the view falls
    /// outside of the storage.
    pub fn new(
        storage: SampleStorage<'a>,
        offset: usize,
        shape: [usize; 2],
        strides: [isize; 2],
    ) -> Result<Self, BufferError> {
        if let Some((min, max)) = reach(offset, shape, strides) {
            let len = storage.len();
            if min < 0 || max >= len as isize {
                return Err(BufferError::OutOfBounds { min, max, len });
            }
        }
        Ok(Self {
            storage,
            offset,
            shape,
            strides,
        })
    }

    /// Create a row-major view starting at the beginning of the storage.
    pub fn contiguous(storage: SampleStorage<'a>, shape: [usize; 2]) -> Result<Self, BufferError> {
        Self::new(storage, 0, shape, [shape[1] as isize, 1])
    }

    /// Create a view from a byte offset and byte strides.
    ///
    /// This matches how strided array libraries usually describe their
    /// layout. Offset and strides must be multiples of the element size.
    pub fn with_byte_strides(
        storage: SampleStorage<'a>,
        byte_offset: usize,
        shape: [usize; 2],
        byte_strides: [isize; 2],
    ) -> Result<Self, BufferError> {
        let elem_size = storage.precision().size_of();
        let to_elements = |bytes: isize| {
            if bytes % elem_size as isize != 0 {
                Err(BufferError::UnalignedStride {
                    stride: bytes,
                    elem_size,
                })
            } else {
                Ok(bytes / elem_size as isize)
            }
        };
        let offset = to_elements(byte_offset as isize)? as usize;
        let strides = [to_elements(byte_strides[0])?, to_elements(byte_strides[1])?];
        Self::new(storage, offset, shape, strides)
    }

    /// Swap the two axes without touching memory.
    pub fn transpose(&self) -> Self {
        Self {
            storage: self.storage,
            offset: self.offset,
            shape: [self.shape[1], self.shape[0]],
            strides: [self.strides[1], self.strides[0]],
        }
    }

    /// A sub-region of this view sharing the same memory.
    ///
    /// # Arguments
    ///
    /// * `origin` - `(row, col)` of the window's top-left element in this view.
    /// * `shape` - `[rows, cols]` of the window.
    pub fn window(&self, origin: [usize; 2], shape: [usize; 2]) -> Result<Self, BufferError> {
        let fits = origin[0] + shape[0] <= self.shape[0] && origin[1] + shape[1] <= self.shape[1];
        if !fits {
            return Err(BufferError::InvalidWindow {
                origin,
                shape,
                parent: self.shape,
            });
        }
        let offset = self.offset as isize
            + origin[0] as isize * self.strides[0]
            + origin[1] as isize * self.strides[1];
        if offset < 0 {
            let len = self.storage.len();
            return Err(BufferError::OutOfBounds {
                min: offset,
                max: offset,
                len,
            });
        }
        Self::new(self.storage, offset as usize, shape, self.strides)
    }

    /// The storage the view addresses.
    #[inline]
    pub fn storage(&self) -> SampleStorage<'a> {
        self.storage
    }

    /// Element precision of the underlying storage.
    #[inline]
    pub fn precision(&self) -> Precision {
        self.storage.precision()
    }

    /// `[rows, cols]` of the view.
    #[inline]
    pub fn shape(&self) -> [usize; 2] {
        self.shape
    }

    /// `[row_stride, col_stride]` in elements.
    #[inline]
    pub fn strides(&self) -> [isize; 2] {
        self.strides
    }

    /// Element offset of `(0, 0)`.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.shape[0]
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.shape[1]
    }

    /// Number of logical elements.
    #[inline]
    pub fn numel(&self) -> usize {
        self.shape[0] * self.shape[1]
    }

    /// Storage offset of `(row, col)`.
    #[inline]
    pub fn offset_of(&self, row: usize, col: usize) -> usize {
        debug_assert!(
            row < self.shape[0] && col < self.shape[1],
            "index ({row}, {col}) out of range for shape {:?}",
            self.shape
        );
        (self.offset as isize + row as isize * self.strides[0] + col as isize * self.strides[1])
            as usize
    }

    /// Read `(row, col)` widened to `f64`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.storage.read(self.offset_of(row, col))
    }

    /// Write `value` at `(row, col)`, narrowing to the storage precision.
    #[inline]
    pub fn set(&self, row: usize, col: usize, value: f64) {
        self.storage.write(self.offset_of(row, col), value)
    }

    /// Set every element of the view to `value`.
    pub fn fill(&self, value: f64) {
        for r in 0..self.shape[0] {
            for c in 0..self.shape[1] {
                self.set(r, c, value);
            }
        }
    }

    /// Smallest and largest storage offset touched by the view.
    ///
    /// Returns `None` for an empty view.
    pub fn span(&self) -> Option<(usize, usize)> {
        reach(self.offset, self.shape, self.strides).map(|(min, max)| (min as usize, max as usize))
    }

    /// Whether the memory spans of the two views intersect.
    ///
    /// The test is on address ranges, so interleaved views that never touch
    /// the same element are still reported as overlapping.
    pub fn overlaps(&self, other: &StridedView<'_>) -> bool {
        let byte_range = |view: &StridedView<'_>| {
            view.span().map(|(min, max)| {
                let size = view.precision().size_of();
                let base = view.storage.base_addr();
                (base + min * size, base + (max + 1) * size)
            })
        };
        match (byte_range(self), byte_range(other)) {
            (Some((a0, a1)), Some((b0, b1))) => a0 < b1 && b0 < a1,
            _ => false,
        }
    }

    /// Copy the view into a row-major `Vec<f64>`.
    pub fn to_vec(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.numel());
        for r in 0..self.shape[0] {
            for c in 0..self.shape[1] {
                out.push(self.get(r, c));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_contiguous() -> Result<(), BufferError> {
        let mut data = (0..6).map(|x| x as f64).collect::<Vec<_>>();
        let storage = SampleStorage::from_f64_mut(&mut data)?;
        let view = StridedView::contiguous(storage, [2, 3])?;
        assert_eq!(view.shape(), [2, 3]);
        assert_eq!(view.strides(), [3, 1]);
        assert_eq!(view.get(0, 2), 2.0);
        assert_eq!(view.get(1, 1), 4.0);
        assert_eq!(view.to_vec(), vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        Ok(())
    }

    #[test]
    fn test_view_column_major_and_transpose() -> Result<(), BufferError> {
        // column-major 2x3: columns are contiguous
        let mut data = vec![1.0f32, 4.0, 2.0, 5.0, 3.0, 6.0];
        let storage = SampleStorage::from_f32_mut(&mut data)?;
        let view = StridedView::new(storage, 0, [2, 3], [1, 2])?;
        assert_eq!(view.to_vec(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);

        let t = view.transpose();
        assert_eq!(t.shape(), [3, 2]);
        assert_eq!(t.to_vec(), vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);

        t.set(2, 1, 60.0);
        assert_eq!(view.get(1, 2), 60.0);
        Ok(())
    }

    #[test]
    fn test_view_negative_stride() -> Result<(), BufferError> {
        let mut data = (0..6).map(|x| x as f64).collect::<Vec<_>>();
        let storage = SampleStorage::from_f64_mut(&mut data)?;
        // vertically flipped 2x3
        let view = StridedView::new(storage, 3, [2, 3], [-3, 1])?;
        assert_eq!(view.to_vec(), vec![3.0, 4.0, 5.0, 0.0, 1.0, 2.0]);
        assert_eq!(view.span(), Some((0, 5)));
        Ok(())
    }

    #[test]
    fn test_view_out_of_bounds() -> Result<(), BufferError> {
        let mut data = vec![0.0f64; 6];
        let storage = SampleStorage::from_f64_mut(&mut data)?;
        let res = StridedView::contiguous(storage, [3, 3]);
        assert_eq!(
            res.err(),
            Some(BufferError::OutOfBounds {
                min: 0,
                max: 8,
                len: 6
            })
        );

        let res = StridedView::new(storage, 0, [2, 3], [-3, 1]);
        assert!(matches!(res, Err(BufferError::OutOfBounds { min: -3, .. })));

        // empty views address nothing
        let empty = StridedView::new(storage, 100, [0, 3], [3, 1])?;
        assert_eq!(empty.span(), None);
        Ok(())
    }

    #[test]
    fn test_view_byte_strides() -> Result<(), BufferError> {
        let mut data = (0..8).map(|x| x as f64).collect::<Vec<_>>();
        let storage = SampleStorage::from_f64_mut(&mut data)?;
        let view = StridedView::with_byte_strides(storage, 8, [2, 2], [32, 16])?;
        assert_eq!(view.to_vec(), vec![1.0, 3.0, 5.0, 7.0]);

        let res = StridedView::with_byte_strides(storage, 0, [2, 2], [12, 8]);
        assert_eq!(
            res.err(),
            Some(BufferError::UnalignedStride {
                stride: 12,
                elem_size: 8
            })
        );
        Ok(())
    }

    #[test]
    fn test_view_window_and_overlap() -> Result<(), BufferError> {
        let mut data = (0..16).map(|x| x as f64).collect::<Vec<_>>();
        let storage = SampleStorage::from_f64_mut(&mut data)?;
        let full = StridedView::contiguous(storage, [4, 4])?;

        let top = full.window([0, 0], [2, 4])?;
        let bottom = full.window([2, 1], [2, 3])?;
        assert_eq!(bottom.to_vec(), vec![9.0, 10.0, 11.0, 13.0, 14.0, 15.0]);
        assert!(!top.overlaps(&bottom));
        assert!(full.overlaps(&bottom));

        let res = full.window([3, 0], [2, 2]);
        assert!(matches!(res, Err(BufferError::InvalidWindow { .. })));

        bottom.fill(-1.0);
        assert_eq!(full.get(3, 3), -1.0);
        assert_eq!(full.get(3, 0), 12.0);
        Ok(())
    }

    #[test]
    fn test_view_overlap_distinct_buffers() -> Result<(), BufferError> {
        let mut a = vec![0.0f64; 4];
        let mut b = vec![0.0f64; 4];
        let va = StridedView::contiguous(SampleStorage::from_f64_mut(&mut a)?, [2, 2])?;
        let vb = StridedView::contiguous(SampleStorage::from_f64_mut(&mut b)?, [2, 2])?;
        assert!(!va.overlaps(&vb));
        assert!(va.overlaps(&va));
        Ok(())
    }
}
