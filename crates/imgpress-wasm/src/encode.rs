//! Image encoding WASM bindings.
//!
//! # Example
//!
//! ```typescript
//! import { encode_image } from '@imgpress/wasm';
//!
//! const webp = encode_image(image, "webp", 0.8);
//! const blob = new Blob([webp], { type: "image/webp" });
//! ```

use crate::types::JsPixelBuffer;
use imgpress_core::encode::{self, ExportFormat};
use wasm_bindgen::prelude::*;

/// Encode an image as `"jpeg"`, `"png"` or `"webp"`.
///
/// `quality` is 0.1 to 1.0 and ignored for PNG. Transparent pixels become
/// black in JPEG output.
///
/// # Errors
///
/// Returns an error for an unknown format or an empty image.
#[wasm_bindgen]
pub fn encode_image(image: &JsPixelBuffer, format: &str, quality: f32) -> Result<Vec<u8>, JsValue> {
    let format = parse_format(format)?;
    encode::encode(&image.to_buffer(), format, quality).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// MIME type for a format name, e.g. for building a `Blob`.
#[wasm_bindgen]
pub fn mime_type(format: &str) -> Result<String, JsValue> {
    Ok(parse_format(format)?.mime_type().to_string())
}

pub(crate) fn parse_format(format: &str) -> Result<ExportFormat, JsValue> {
    format
        .parse::<ExportFormat>()
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_wrapped_image() {
        let img = JsPixelBuffer::new(10, 10, vec![128u8; 10 * 10 * 4]);
        let jpeg = encode::encode(&img.to_buffer(), "jpg".parse().unwrap(), 0.9).unwrap();
        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_encode_each_format() {
        let img = JsPixelBuffer::new(8, 8, vec![128u8; 8 * 8 * 4]);
        assert_eq!(&encode_image(&img, "jpeg", 0.8).unwrap()[0..2], &[0xFF, 0xD8]);
        assert_eq!(&encode_image(&img, "png", 0.8).unwrap()[1..4], b"PNG");
        assert_eq!(&encode_image(&img, "webp", 0.8).unwrap()[0..4], b"RIFF");
    }

    #[wasm_bindgen_test]
    fn test_encode_unknown_format() {
        let img = JsPixelBuffer::new(1, 1, vec![0u8; 4]);
        assert!(encode_image(&img, "gif", 0.8).is_err());
    }

    #[wasm_bindgen_test]
    fn test_encode_empty_image() {
        let img = JsPixelBuffer::new(0, 0, Vec::new());
        assert!(encode_image(&img, "png", 1.0).is_err());
    }

    #[wasm_bindgen_test]
    fn test_mime_type() {
        assert_eq!(mime_type("webp").unwrap(), "image/webp");
    }
}
