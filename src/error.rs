use alloc::string::String;

use crate::codec::Capability;
use crate::pixel::ColorModel;

/// Errors from format negotiation, buffer access, and row streaming.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RowError {
    /// A transform the image needs is not available in this codec build.
    #[error("{}", .0.message())]
    Capability(Capability),

    /// A conversion no codec build can perform.
    #[error("unsupported conversion: {0}")]
    UnsupportedConversion(&'static str),

    /// The codec's output format still disagrees with the destination pixel
    /// format after negotiation. Indicates a negotiation bug, not bad input.
    #[error(
        "color model and/or bit depth mismatch: expected {expected_model:?}/{expected_depth}, got {actual_model:?}/{actual_depth}"
    )]
    FormatMismatch {
        expected_model: ColorModel,
        expected_depth: u8,
        actual_model: ColorModel,
        actual_depth: u8,
    },

    /// Stream or codec failure reported by the codec session.
    #[error("i/o error: {0}")]
    Io(String),

    #[error("index {index} out of range (len {len})")]
    OutOfRange { index: usize, len: usize },

    #[error("row length mismatch: expected {expected}, got {actual}")]
    RowLength { expected: usize, actual: usize },

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),
}

impl RowError {
    /// Wrap a codec-side failure message.
    pub fn io(message: impl Into<String>) -> Self {
        RowError::Io(message.into())
    }

    /// Whether this error names a missing codec capability.
    pub fn is_capability(&self) -> bool {
        matches!(self, RowError::Capability(_))
    }
}

impl From<Capability> for RowError {
    fn from(c: Capability) -> Self {
        RowError::Capability(c)
    }
}
