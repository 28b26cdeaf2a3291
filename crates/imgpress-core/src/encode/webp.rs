//! WebP encoding through the pure-Rust lossless encoder.
//!
//! The encoder has no lossy mode, so quality below 1.0 is honored by
//! quantizing the color channels first: fewer distinct values compress
//! better, and the palette gets coarser as quality drops.

use std::io::Cursor;

use image::codecs::webp::WebPEncoder;
use image::ExtendedColorType;

use super::{validate_buffer, EncodeError};
use crate::decode::PixelBuffer;

/// Encode a buffer to WebP bytes. `quality` is in 0.0 to 1.0; 1.0 is lossless.
pub fn encode_webp(buffer: &PixelBuffer, quality: f32) -> Result<Vec<u8>, EncodeError> {
    validate_buffer(buffer)?;

    let levels = quantization_levels(quality);
    let mut output = Cursor::new(Vec::new());
    let encoder = WebPEncoder::new_lossless(&mut output);

    let result = if levels >= 256 {
        encoder.encode(&buffer.pixels, buffer.width, buffer.height, ExtendedColorType::Rgba8)
    } else {
        let mut pixels = buffer.pixels.clone();
        quantize_rgb(&mut pixels, levels);
        encoder.encode(&pixels, buffer.width, buffer.height, ExtendedColorType::Rgba8)
    };
    result.map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(output.into_inner())
}

/// Number of distinct values kept per color channel.
///
/// Grows with the square of quality so high settings stay close to the
/// source while low settings shrink output aggressively.
fn quantization_levels(quality: f32) -> u16 {
    if quality.is_nan() {
        return 2;
    }
    if quality >= 1.0 {
        return 256;
    }
    let q = quality.clamp(0.01, 1.0);
    (2.0 + q * q * 254.0).round().clamp(2.0, 256.0) as u16
}

/// Snap RGB channels onto `levels` evenly spaced values. Alpha is untouched.
fn quantize_rgb(pixels: &mut [u8], levels: u16) {
    let step = 255.0 / (levels as f32 - 1.0);
    for px in pixels.chunks_exact_mut(4) {
        for channel in px.iter_mut().take(3) {
            let bucket = (f32::from(*channel) / step).round();
            *channel = (bucket * step).round().clamp(0.0, 255.0) as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::test_support::noisy_image;

    fn decode_rgba(bytes: &[u8]) -> Vec<u8> {
        image::load_from_memory(bytes).unwrap().to_rgba8().into_raw()
    }

    #[test]
    fn test_webp_riff_header() {
        let bytes = encode_webp(&noisy_image(8, 8), 0.8).unwrap();
        assert_eq!(&bytes[..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WEBP");
    }

    #[test]
    fn test_full_quality_is_lossless() {
        let img = noisy_image(10, 10);
        let bytes = encode_webp(&img, 1.0).unwrap();
        assert_eq!(decode_rgba(&bytes), img.pixels);
    }

    #[test]
    fn test_levels_from_quality() {
        assert_eq!(quantization_levels(1.0), 256);
        assert_eq!(quantization_levels(0.5), 66);
        assert_eq!(quantization_levels(0.1), 5);
        assert_eq!(quantization_levels(f32::NAN), 2);
    }

    #[test]
    fn test_quantize_keeps_extremes_and_alpha() {
        let mut px = vec![0, 255, 130, 42];
        quantize_rgb(&mut px, 3);
        assert_eq!(px, vec![0, 255, 128, 42]);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: levels never decrease as quality rises.
        #[test]
        fn prop_levels_monotonic(a in 0.0f32..=1.0, b in 0.0f32..=1.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(quantization_levels(lo) <= quantization_levels(hi));
        }

        /// Property: quantization error stays within half a step.
        #[test]
        fn prop_quantize_error_bounded(value in any::<u8>(), levels in 2u16..=255) {
            let mut px = vec![value, value, value, 255];
            quantize_rgb(&mut px, levels);
            let step = 255.0 / (levels as f32 - 1.0);
            prop_assert!((px[0] as f32 - value as f32).abs() <= step / 2.0 + 1.0);
            prop_assert_eq!(px[3], 255);
        }
    }
}
