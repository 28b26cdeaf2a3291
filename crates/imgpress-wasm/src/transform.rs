//! WASM bindings for rotation and zoom.
//!
//! [`JsTransform`] holds the editor's zoom and rotation state and applies it
//! about the canvas center the same way the export pipeline does.

use crate::types::{filter_from_u8, JsPixelBuffer};
use imgpress_core::transform::{apply_transform as core_transform, TransformParams};
use wasm_bindgen::prelude::*;

/// Zoom and rotation state for JavaScript
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsTransform {
    inner: TransformParams,
}

#[wasm_bindgen]
impl JsTransform {
    /// Identity transform (scale 1, no rotation)
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uniform scale (0.1 to 3.0)
    #[wasm_bindgen(getter)]
    pub fn scale(&self) -> f64 {
        self.inner.scale
    }

    #[wasm_bindgen(setter)]
    pub fn set_scale(&mut self, value: f64) {
        self.inner.scale = value;
    }

    /// Rotation in degrees, clockwise
    #[wasm_bindgen(getter)]
    pub fn rotation(&self) -> f64 {
        self.inner.rotation
    }

    #[wasm_bindgen(setter)]
    pub fn set_rotation(&mut self, value: f64) {
        self.inner.rotation = value;
    }

    pub fn zoom_in(&mut self) {
        self.inner.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.inner.zoom_out();
    }

    /// Turn 90 degrees clockwise
    pub fn rotate_clockwise(&mut self) {
        self.inner.rotate_clockwise();
    }

    pub fn reset(&mut self) {
        self.inner = TransformParams::default();
    }

    pub fn is_identity(&self) -> bool {
        self.inner.is_identity()
    }
}

impl JsTransform {
    pub(crate) fn params(&self) -> &TransformParams {
        &self.inner
    }
}

/// Rotate and scale an image about the center of a canvas of the given size.
///
/// The image is stretched onto the canvas before the transform; uncovered
/// canvas pixels are transparent.
///
/// `filter`: 0 = Nearest, 1 = Bilinear, 2 = Lanczos3.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const t = new JsTransform();
/// t.rotate_clockwise();
/// const rotated = apply_transform(image, t, image.width, image.height, 1);
/// ```
#[wasm_bindgen]
pub fn apply_transform(
    image: &JsPixelBuffer,
    transform: &JsTransform,
    canvas_width: u32,
    canvas_height: u32,
    filter: u8,
) -> Result<JsPixelBuffer, JsValue> {
    transform
        .inner
        .validate()
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let buffer = image
        .to_checked_buffer()
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let result = core_transform(
        &buffer,
        &transform.inner,
        (canvas_width, canvas_height),
        filter_from_u8(filter),
    );
    Ok(JsPixelBuffer::from_buffer(result))
}
