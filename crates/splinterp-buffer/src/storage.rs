//! Precision-agnostic element storage.
//!
//! Samples are kept as their IEEE 754 bit patterns inside atomic integers of
//! the same width. Relaxed loads and stores compile to plain moves, but let
//! several views over the same memory (including views handed to different
//! worker threads) read and write without a data race.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use crate::{error::BufferError, precision::Precision};

/// Borrowed sample memory tagged with its element precision.
///
/// Reads always widen to `f64` and writes always take `f64`, narrowing with
/// a standard `as` conversion when the storage holds `f32` elements.
#[derive(Debug, Clone, Copy)]
pub enum SampleStorage<'a> {
    /// Storage of 32-bit floats.
    F32(&'a [AtomicU32]),
    /// Storage of 64-bit floats.
    F64(&'a [AtomicU64]),
}

fn check_alignment<A>(ptr: *const u8) -> Result<(), BufferError> {
    let align = std::mem::align_of::<A>();
    if ptr.align_offset(align) != 0 {
        return Err(BufferError::Misaligned { align });
    }
    Ok(())
}

impl<'a> SampleStorage<'a> {
    /// Borrow a mutable `f32` slice as sample storage.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::Misaligned`] if the slice is not aligned for `AtomicU32`.
    pub fn from_f32_mut(data: &'a mut [f32]) -> Result<Self, BufferError> {
        let ptr = data.as_mut_ptr();
        check_alignment::<AtomicU32>(ptr as *const u8)?;
        // SAFETY: AtomicU32 has the size and bit validity of u32 (and so of f32),
        // the alignment was checked above and the exclusive borrow rules out any
        // non-atomic access to the memory for 'a.
        let atoms = unsafe { std::slice::from_raw_parts(ptr as *const AtomicU32, data.len()) };
        Ok(SampleStorage::F32(atoms))
    }

    /// Borrow a mutable `f64` slice as sample storage.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::Misaligned`] if the slice is not aligned for `AtomicU64`.
    /// This can only happen on targets where `f64` is less aligned than `u64`.
    pub fn from_f64_mut(data: &'a mut [f64]) -> Result<Self, BufferError> {
        let ptr = data.as_mut_ptr();
        check_alignment::<AtomicU64>(ptr as *const u8)?;
        // SAFETY: same reasoning as `from_f32_mut` for the 64-bit pair.
        let atoms = unsafe { std::slice::from_raw_parts(ptr as *const AtomicU64, data.len()) };
        Ok(SampleStorage::F64(atoms))
    }

    /// Borrow a mutable slice of any [`Sample`] type as sample storage.
    pub fn from_slice_mut<T: Sample>(data: &'a mut [T]) -> Result<Self, BufferError> {
        T::storage(data)
    }

    /// Reinterpret raw bytes as samples of the given precision.
    ///
    /// This is the entry point for callers that only hold an untyped buffer
    /// and a precision tag describing what is stored in it.
    ///
    /// # Errors
    ///
    /// Fails if the byte length is not a whole number of elements or if the
    /// address is not aligned for the element width.
    pub fn from_bytes_mut(bytes: &'a mut [u8], precision: Precision) -> Result<Self, BufferError> {
        let elem_size = precision.size_of();
        if bytes.len() % elem_size != 0 {
            return Err(BufferError::InvalidByteLength {
                len: bytes.len(),
                elem_size,
            });
        }
        let len = bytes.len() / elem_size;
        let ptr = bytes.as_mut_ptr();
        match precision {
            Precision::F32 => {
                check_alignment::<AtomicU32>(ptr)?;
                // SAFETY: every bit pattern is a valid u32, alignment and length
                // were checked above and the memory is exclusively borrowed for 'a.
                let atoms = unsafe { std::slice::from_raw_parts(ptr as *const AtomicU32, len) };
                Ok(SampleStorage::F32(atoms))
            }
            Precision::F64 => {
                check_alignment::<AtomicU64>(ptr)?;
                // SAFETY: see the F32 branch.
                let atoms = unsafe { std::slice::from_raw_parts(ptr as *const AtomicU64, len) };
                Ok(SampleStorage::F64(atoms))
            }
        }
    }

    /// The element precision of the storage.
    #[inline]
    pub fn precision(&self) -> Precision {
        match self {
            SampleStorage::F32(_) => Precision::F32,
            SampleStorage::F64(_) => Precision::F64,
        }
    }

    /// Number of elements in the storage.
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            SampleStorage::F32(data) => data.len(),
            SampleStorage::F64(data) => data.len(),
        }
    }

    /// Whether the storage holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Address of the first element, used to compare memory regions.
    #[inline]
    pub fn base_addr(&self) -> usize {
        match self {
            SampleStorage::F32(data) => data.as_ptr() as usize,
            SampleStorage::F64(data) => data.as_ptr() as usize,
        }
    }

    /// Read the element at `offset` widened to `f64`.
    ///
    /// # Panics
    ///
    /// Panics if `offset` is out of range.
    #[inline]
    pub fn read(&self, offset: usize) -> f64 {
        match self {
            SampleStorage::F32(data) => f32::from_bits(data[offset].load(Ordering::Relaxed)) as f64,
            SampleStorage::F64(data) => f64::from_bits(data[offset].load(Ordering::Relaxed)),
        }
    }

    /// Write `value` at `offset`, narrowing to `f32` if needed.
    ///
    /// # Panics
    ///
    /// Panics if `offset` is out of range.
    #[inline]
    pub fn write(&self, offset: usize, value: f64) {
        match self {
            SampleStorage::F32(data) => {
                data[offset].store((value as f32).to_bits(), Ordering::Relaxed)
            }
            SampleStorage::F64(data) => data[offset].store(value.to_bits(), Ordering::Relaxed),
        }
    }
}

/// Scalar element types a [`SampleStorage`] can be built from.
pub trait Sample: Copy + Send + Sync + 'static {
    /// The precision tag of the type.
    const PRECISION: Precision;

    /// Borrow a slice of this type as sample storage.
    fn storage(data: &mut [Self]) -> Result<SampleStorage<'_>, BufferError>;
}

impl Sample for f32 {
    const PRECISION: Precision = Precision::F32;

    fn storage(data: &mut [Self]) -> Result<SampleStorage<'_>, BufferError> {
        SampleStorage::from_f32_mut(data)
    }
}

impl Sample for f64 {
    const PRECISION: Precision = Precision::F64;

    fn storage(data: &mut [Self]) -> Result<SampleStorage<'_>, BufferError> {
        SampleStorage::from_f64_mut(data)
    }
}
