//! Image decoding WASM bindings.
//!
//! # Functions
//!
//! - [`decode_image`] - Decode a JPEG, PNG or WebP file
//! - [`resize_to_fit`] - Shrink an image to fit export bounds
//!
//! # Example
//!
//! ```typescript
//! import { decode_image, resize_to_fit } from '@imgpress/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const image = decode_image(bytes);
//! const bounded = resize_to_fit(image, 1920, 1080, 1);
//! ```

use crate::types::{filter_from_u8, JsPixelBuffer};
use imgpress_core::decode;
use wasm_bindgen::prelude::*;

/// Decode an image from bytes, correcting EXIF orientation.
///
/// # Errors
///
/// Returns an error if the bytes are not a supported format or are corrupt.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsPixelBuffer, JsValue> {
    decode::decode_image(bytes)
        .map(JsPixelBuffer::from_buffer)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Shrink an image to fit within `max_width` x `max_height`, preserving
/// aspect ratio. Images that already fit are returned unchanged.
///
/// `filter`: 0 = Nearest, 1 = Bilinear, 2 = Lanczos3.
#[wasm_bindgen]
pub fn resize_to_fit(
    image: &JsPixelBuffer,
    max_width: u32,
    max_height: u32,
    filter: u8,
) -> Result<JsPixelBuffer, JsValue> {
    let buffer = image
        .to_checked_buffer()
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    decode::fit_within(&buffer, max_width, max_height, filter_from_u8(filter))
        .map(JsPixelBuffer::from_buffer)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use imgpress_core::decode::PixelBuffer;
    use imgpress_core::encode::encode_png;

    // Core paths behind the bindings; JsValue errors need wasm32.

    #[test]
    fn test_decode_png_bytes() {
        let bytes = encode_png(&PixelBuffer::new(3, 2, vec![10u8; 3 * 2 * 4])).unwrap();
        let image = decode::decode_image(&bytes).map(JsPixelBuffer::from_buffer).unwrap();
        assert_eq!((image.width(), image.height()), (3, 2));
        assert_eq!(image.byte_length(), 24);
    }

    #[test]
    fn test_fit_keeps_aspect() {
        let image = JsPixelBuffer::new(400, 200, vec![0u8; 400 * 200 * 4]);
        let fitted = decode::fit_within(&image.to_buffer(), 100, 100, filter_from_u8(1)).unwrap();
        assert_eq!((fitted.width, fitted.height), (100, 50));
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_decode_invalid_bytes() {
        assert!(decode_image(&[0, 1, 2, 3]).is_err());
    }

    #[wasm_bindgen_test]
    fn test_resize_to_fit() {
        let image = JsPixelBuffer::new(400, 200, vec![0u8; 400 * 200 * 4]);
        let fitted = resize_to_fit(&image, 100, 100, 2).unwrap();
        assert_eq!((fitted.width(), fitted.height()), (100, 50));
    }

    #[wasm_bindgen_test]
    fn test_resize_to_fit_zero_bounds() {
        let image = JsPixelBuffer::new(4, 4, vec![0u8; 64]);
        assert!(resize_to_fit(&image, 0, 100, 1).is_err());
    }

    #[wasm_bindgen_test]
    fn test_resize_to_fit_wrong_length() {
        let image = JsPixelBuffer::new(400, 200, vec![0u8; 1000]);
        assert!(resize_to_fit(&image, 100, 100, 1).is_err());
    }
}
