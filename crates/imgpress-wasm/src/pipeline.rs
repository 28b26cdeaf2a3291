//! Export and preview bindings.
//!
//! Export settings cross the boundary as a plain object deserialized with
//! serde_wasm_bindgen; missing keys fall back to the defaults:
//!
//! ```typescript
//! const out = process_image(image, crop, filters, transform, {
//!   quality: 0.8,
//!   format: "webp",
//!   maxWidth: 1920,
//!   maxHeight: 1080,
//! });
//! const blob = new Blob([out.bytes()], { type: out.mime_type });
//! ```

use crate::filter::JsFilterParams;
use crate::transform::JsTransform;
use crate::types::{JsCropRegion, JsPixelBuffer};
use imgpress_core::encode::ExportFormat;
use imgpress_core::pipeline::{self, ExportSettings, ProcessedImage};
use imgpress_core::ProcessError;
use wasm_bindgen::prelude::*;

/// An encoded export
#[wasm_bindgen]
pub struct JsProcessedImage {
    inner: ProcessedImage,
}

#[wasm_bindgen]
impl JsProcessedImage {
    /// Encoded file bytes as Uint8Array (a copy)
    pub fn bytes(&self) -> Vec<u8> {
        self.inner.bytes.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn byte_size(&self) -> usize {
        self.inner.byte_size
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Format name: "jpeg", "png" or "webp"
    #[wasm_bindgen(getter)]
    pub fn format(&self) -> String {
        self.inner.format.to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn mime_type(&self) -> String {
        self.inner.format.mime_type().to_string()
    }
}

/// Run the export pipeline: crop, filter, rotate/scale, fit to bounds, encode.
///
/// `export` may be `undefined` to use the default settings
/// (JPEG, quality 0.8, 1920x1080).
///
/// # Errors
///
/// Returns an error for malformed or out-of-range settings, or an empty image.
#[wasm_bindgen]
pub fn process_image(
    image: &JsPixelBuffer,
    crop: &JsCropRegion,
    filters: &JsFilterParams,
    transform: &JsTransform,
    export: JsValue,
) -> Result<JsProcessedImage, JsValue> {
    let export = export_settings(export)?;
    process(image, crop, filters, transform, &export).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Render the on-screen preview, at most `max_width` wide. The crop is not
/// applied; draw it as an overlay with `crop_to_preview`.
#[wasm_bindgen]
pub fn render_preview(
    image: &JsPixelBuffer,
    filters: &JsFilterParams,
    transform: &JsTransform,
    max_width: u32,
) -> Result<JsPixelBuffer, JsValue> {
    pipeline::render_preview(&image.to_buffer(), filters.params(), transform.params(), max_width)
        .map(JsPixelBuffer::from_buffer)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Percentage saved by compression, 0 when either size is 0.
#[wasm_bindgen]
pub fn compression_ratio(original_size: f64, processed_size: f64) -> f64 {
    pipeline::compression_ratio(byte_count(original_size), byte_count(processed_size))
}

/// Human-readable byte count, e.g. "1.5 KB".
#[wasm_bindgen]
pub fn format_file_size(bytes: f64) -> String {
    pipeline::format_file_size(byte_count(bytes))
}

/// Download name for an export, e.g. `processed-photo.webp`.
#[wasm_bindgen]
pub fn output_file_name(source_name: &str, format: &str) -> Result<String, JsValue> {
    let format: ExportFormat = crate::encode::parse_format(format)?;
    Ok(pipeline::output_file_name(source_name, format))
}

fn process(
    image: &JsPixelBuffer,
    crop: &JsCropRegion,
    filters: &JsFilterParams,
    transform: &JsTransform,
    export: &ExportSettings,
) -> Result<JsProcessedImage, ProcessError> {
    let inner = pipeline::process_image(
        &image.to_buffer(),
        &(*crop).into(),
        filters.params(),
        transform.params(),
        export,
    )?;
    Ok(JsProcessedImage { inner })
}

fn export_settings(value: JsValue) -> Result<ExportSettings, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(ExportSettings::default());
    }
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Invalid export settings: {}", e)))
}

// JS numbers; negative and NaN sizes count as zero.
fn byte_count(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value as u64
    } else {
        0
    }
}
