//! Preview geometry bindings: drag-to-crop and preview sizing.

use crate::types::JsCropRegion;
use imgpress_core::geometry::{self, Point};
use wasm_bindgen::prelude::*;

/// Display size of the preview for an image, as `[width, height]`.
#[wasm_bindgen]
pub fn preview_dimensions(image_width: u32, image_height: u32, max_width: u32) -> Vec<u32> {
    let (w, h) = geometry::preview_dimensions(image_width, image_height, max_width);
    vec![w, h]
}

/// Convert a pointer drag on the preview into a crop region in image pixels.
///
/// Drag direction does not matter and points outside the preview are clamped.
#[wasm_bindgen]
#[allow(clippy::too_many_arguments)]
pub fn crop_from_drag(
    start_x: f64,
    start_y: f64,
    current_x: f64,
    current_y: f64,
    preview_width: u32,
    preview_height: u32,
    image_width: u32,
    image_height: u32,
) -> JsCropRegion {
    geometry::crop_from_drag(
        Point::new(start_x, start_y),
        Point::new(current_x, current_y),
        (preview_width, preview_height),
        (image_width, image_height),
    )
    .into()
}

/// Map a crop region into preview space for drawing the overlay, as
/// `[x, y, width, height]`.
#[wasm_bindgen]
pub fn crop_to_preview(
    crop: &JsCropRegion,
    preview_width: u32,
    preview_height: u32,
    image_width: u32,
    image_height: u32,
) -> Vec<f64> {
    let (x, y, w, h) = geometry::crop_to_preview(
        &(*crop).into(),
        (preview_width, preview_height),
        (image_width, image_height),
    );
    vec![x, y, w, h]
}
