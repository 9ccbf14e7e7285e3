/// Element width of the samples stored in a buffer.
///
/// The tag is fixed for the lifetime of a buffer. All arithmetic happens in
/// `f64` regardless of the tag; `F32` only halves the memory footprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Precision {
    /// 32-bit IEEE 754 floating point.
    F32,
    /// 64-bit IEEE 754 floating point.
    F64,
}

impl Precision {
    /// Size of one element in bytes.
    #[inline]
    pub const fn size_of(&self) -> usize {
        match self {
            Precision::F32 => std::mem::size_of::<f32>(),
            Precision::F64 => std::mem::size_of::<f64>(),
        }
    }
}

impl std::fmt::Display for Precision {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Precision::F32 => write!(f, "f32"),
            Precision::F64 => write!(f, "f64"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Precision;

    #[test]
    fn test_precision_size() {
        assert_eq!(Precision::F32.size_of(), 4);
        assert_eq!(Precision::F64.size_of(), 8);
        assert_eq!(Precision::F32.to_string(), "f32");
        assert_eq!(Precision::F64.to_string(), "f64");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_precision_serde() -> Result<(), serde_json::Error> {
        let json = serde_json::to_string(&Precision::F32)?;
        assert_eq!(json, "\"F32\"");
        let back: Precision = serde_json::from_str(&json)?;
        assert_eq!(back, Precision::F32);
        Ok(())
    }
}
