//! Encoding of RGBA pixel buffers into export formats.
//!
//! Three formats are supported:
//! - JPEG with configurable quality (alpha flattened over black)
//! - PNG, always lossless
//! - WebP through the pure-Rust lossless encoder, with quality-driven
//!   quantization below quality 1.0
//!
//! All encoders are synchronous and single-threaded so they run the same way
//! natively and inside WASM.
//!
//! # Examples
//!
//! ```ignore
//! use imgpress_core::encode::{encode, ExportFormat};
//!
//! let buffer = PixelBuffer::transparent(100, 100);
//! let bytes = encode(&buffer, ExportFormat::Png, 1.0).unwrap();
//! println!("Encoded {} bytes", bytes.len());
//! ```

mod jpeg;
mod png;
mod webp;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::{PixelBuffer, CHANNELS};

pub use jpeg::encode_jpeg;
pub use png::encode_png;
pub use webp::encode_webp;

/// Errors that can occur while encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Width or height is zero
    #[error("Cannot encode empty image ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// The underlying codec failed
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}

/// Output format of an export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Jpeg,
    Png,
    #[serde(rename = "webp")]
    WebP,
}

impl ExportFormat {
    /// File extension used for output names.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Jpeg => "jpeg",
            ExportFormat::Png => "png",
            ExportFormat::WebP => "webp",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Jpeg => "image/jpeg",
            ExportFormat::Png => "image/png",
            ExportFormat::WebP => "image/webp",
        }
    }

    /// True when the format discards detail according to quality.
    pub fn is_lossy(&self) -> bool {
        !matches!(self, ExportFormat::Png)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Error returned when parsing an unknown format name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown export format: {0} (expected jpeg, png or webp)")]
pub struct UnknownFormat(pub String);

impl FromStr for ExportFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(ExportFormat::Jpeg),
            "png" => Ok(ExportFormat::Png),
            "webp" => Ok(ExportFormat::WebP),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

/// Encode a buffer in the requested format.
///
/// `quality` is in 0.1 to 1.0 and is ignored for PNG.
pub fn encode(
    buffer: &PixelBuffer,
    format: ExportFormat,
    quality: f32,
) -> Result<Vec<u8>, EncodeError> {
    validate_buffer(buffer)?;

    let bytes = match format {
        ExportFormat::Jpeg => encode_jpeg(buffer, jpeg_quality(quality))?,
        ExportFormat::Png => encode_png(buffer)?,
        ExportFormat::WebP => encode_webp(buffer, quality)?,
    };

    tracing::debug!(
        format = %format,
        width = buffer.width,
        height = buffer.height,
        bytes = bytes.len(),
        "encoded image"
    );
    Ok(bytes)
}

/// Map a 0.0 to 1.0 quality onto the JPEG 1 to 100 scale.
pub fn jpeg_quality(quality: f32) -> u8 {
    if quality.is_nan() {
        return 1;
    }
    (quality * 100.0).round().clamp(1.0, 100.0) as u8
}

pub(crate) fn validate_buffer(buffer: &PixelBuffer) -> Result<(), EncodeError> {
    if buffer.width == 0 || buffer.height == 0 {
        return Err(EncodeError::EmptyImage {
            width: buffer.width,
            height: buffer.height,
        });
    }

    let expected = buffer.width as usize * buffer.height as usize * CHANNELS;
    if buffer.pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: buffer.pixels.len(),
        });
    }
    Ok(())
}
