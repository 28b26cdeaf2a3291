//! Filter WASM bindings.
//!
//! [`JsFilterParams`] mirrors the editor's filter sliders. Values are stored as
//! given and range-checked when the filters are applied.

use crate::types::JsPixelBuffer;
use imgpress_core::filter::FilterParams;
use wasm_bindgen::prelude::*;

/// Filter slider values for JavaScript
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsFilterParams {
    inner: FilterParams,
}

#[wasm_bindgen]
impl JsFilterParams {
    /// Create filter parameters at their identity values
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Brightness percent (0 to 200)
    #[wasm_bindgen(getter)]
    pub fn brightness(&self) -> f32 {
        self.inner.brightness
    }

    #[wasm_bindgen(setter)]
    pub fn set_brightness(&mut self, value: f32) {
        self.inner.brightness = value;
    }

    /// Contrast percent (0 to 200)
    #[wasm_bindgen(getter)]
    pub fn contrast(&self) -> f32 {
        self.inner.contrast
    }

    #[wasm_bindgen(setter)]
    pub fn set_contrast(&mut self, value: f32) {
        self.inner.contrast = value;
    }

    /// Saturation percent (0 to 200)
    #[wasm_bindgen(getter)]
    pub fn saturation(&self) -> f32 {
        self.inner.saturation
    }

    #[wasm_bindgen(setter)]
    pub fn set_saturation(&mut self, value: f32) {
        self.inner.saturation = value;
    }

    /// Blur radius in pixels (0 to 10)
    #[wasm_bindgen(getter)]
    pub fn blur(&self) -> f32 {
        self.inner.blur
    }

    #[wasm_bindgen(setter)]
    pub fn set_blur(&mut self, value: f32) {
        self.inner.blur = value;
    }

    /// Sepia percent (0 to 100)
    #[wasm_bindgen(getter)]
    pub fn sepia(&self) -> f32 {
        self.inner.sepia
    }

    #[wasm_bindgen(setter)]
    pub fn set_sepia(&mut self, value: f32) {
        self.inner.sepia = value;
    }

    /// Grayscale percent (0 to 100)
    #[wasm_bindgen(getter)]
    pub fn grayscale(&self) -> f32 {
        self.inner.grayscale
    }

    #[wasm_bindgen(setter)]
    pub fn set_grayscale(&mut self, value: f32) {
        self.inner.grayscale = value;
    }

    /// Hue rotation in degrees (0 to 360)
    #[wasm_bindgen(getter, js_name = hueRotate)]
    pub fn hue_rotate(&self) -> f32 {
        self.inner.hue_rotate
    }

    #[wasm_bindgen(setter, js_name = hueRotate)]
    pub fn set_hue_rotate(&mut self, value: f32) {
        self.inner.hue_rotate = value;
    }

    /// Invert percent (0 to 100)
    #[wasm_bindgen(getter)]
    pub fn invert(&self) -> f32 {
        self.inner.invert
    }

    #[wasm_bindgen(setter)]
    pub fn set_invert(&mut self, value: f32) {
        self.inner.invert = value;
    }

    /// Return every slider to its identity value
    pub fn reset(&mut self) {
        self.inner.reset();
    }

    pub fn is_identity(&self) -> bool {
        self.inner.is_identity()
    }

    /// The active chain in CSS filter syntax, or "none".
    pub fn css(&self) -> String {
        self.inner.chain().to_string()
    }
}

impl JsFilterParams {
    pub(crate) fn params(&self) -> &FilterParams {
        &self.inner
    }
}

/// Apply the filter chain to an image.
///
/// # Errors
///
/// Returns an error if any slider is outside its range, or if the pixel data
/// does not match the image dimensions.
#[wasm_bindgen]
pub fn apply_filters(image: &JsPixelBuffer, params: &JsFilterParams) -> Result<JsPixelBuffer, JsValue> {
    params
        .inner
        .validate()
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let buffer = image
        .to_checked_buffer()
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(JsPixelBuffer::from_buffer(params.inner.chain().apply(&buffer)))
}
