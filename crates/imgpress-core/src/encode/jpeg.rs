//! JPEG encoding using the `image` crate's baseline encoder.
//!
//! JPEG has no alpha channel. Transparent areas left by rotation or
//! zoom-out are composited over black before encoding, which matches what a
//! browser canvas produces for `image/jpeg`.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};

use super::{validate_buffer, EncodeError};
use crate::decode::PixelBuffer;

/// Encode a buffer to JPEG bytes.
///
/// `quality` is on the 1 to 100 scale and is clamped into it.
///
/// # Quality Guidelines
///
/// * 90-100: High quality, suitable for archival or further editing
/// * 70-90: Good quality, recommended for most uses
/// * Below 60: Low quality, visible artifacts
///
/// # Example
///
/// ```
/// use imgpress_core::decode::PixelBuffer;
/// use imgpress_core::encode::encode_jpeg;
///
/// let buffer = PixelBuffer::new(4, 4, vec![128u8; 4 * 4 * 4]);
/// let jpeg = encode_jpeg(&buffer, 90).unwrap();
/// assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
/// ```
pub fn encode_jpeg(buffer: &PixelBuffer, quality: u8) -> Result<Vec<u8>, EncodeError> {
    validate_buffer(buffer)?;

    let quality = quality.clamp(1, 100);
    let rgb = flatten_over_black(&buffer.pixels);

    let mut output = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut output, quality);
    encoder
        .write_image(&rgb, buffer.width, buffer.height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(output.into_inner())
}

/// Composite RGBA over an opaque black background, producing packed RGB.
fn flatten_over_black(rgba: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(rgba.len() / 4 * 3);
    for px in rgba.chunks_exact(4) {
        let alpha = px[3] as u32;
        for &channel in &px[..3] {
            // Rounded channel * alpha / 255
            rgb.push(((channel as u32 * alpha + 127) / 255) as u8);
        }
    }
    rgb
}


// ============================================================================
// Property-Based Tests
// ============================================================================
