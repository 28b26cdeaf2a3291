//! Error type for the single-image pipeline.

use thiserror::Error;

use crate::decode::DecodeError;
use crate::encode::EncodeError;

/// Errors produced by the single-image pipeline and its stages.
///
/// A `ProcessError` is fatal only to the invocation that raised it; the batch
/// orchestrator records it against the failing item and moves on.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The input bytes could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A stage was handed a buffer with zero width or height.
    #[error("Image has zero width or height")]
    EmptyImage,

    /// The pixel data length does not match the buffer dimensions.
    #[error("Pixel data has {actual} bytes, expected {expected}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// A numeric setting is outside its documented range.
    #[error("Invalid parameter {name}: {value} (expected {expected})")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        expected: &'static str,
    },

    /// The encoder rejected the buffer.
    #[error(transparent)]
    Encode(EncodeError),
}

impl ProcessError {
    pub(crate) fn invalid(name: &'static str, value: f64, expected: &'static str) -> Self {
        ProcessError::InvalidParameter {
            name,
            value,
            expected,
        }
    }
}

impl From<EncodeError> for ProcessError {
    fn from(err: EncodeError) -> Self {
        match err {
            EncodeError::EmptyImage { .. } => ProcessError::EmptyImage,
            EncodeError::InvalidPixelData { expected, actual } => {
                ProcessError::InvalidPixelData { expected, actual }
            }
            other => ProcessError::Encode(other),
        }
    }
}

/// Reject `value` unless it lies in `[min, max]`. NaN is always rejected.
pub(crate) fn check_range(
    name: &'static str,
    value: f64,
    min: f64,
    max: f64,
    expected: &'static str,
) -> Result<(), ProcessError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ProcessError::invalid(name, value, expected))
    }
}
