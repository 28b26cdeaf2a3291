//! Aspect-preserving resize to export bounds.
//!
//! All functions return new `PixelBuffer` instances without modifying the input.

use super::{FilterType, PixelBuffer};
use crate::error::ProcessError;

/// Resize an image to exact dimensions.
///
/// # Errors
///
/// Returns `ProcessError::InvalidParameter` if either target dimension is zero.
pub fn resize(
    image: &PixelBuffer,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<PixelBuffer, ProcessError> {
    if width == 0 {
        return Err(ProcessError::invalid("width", 0.0, "a positive pixel count"));
    }
    if height == 0 {
        return Err(ProcessError::invalid("height", 0.0, "a positive pixel count"));
    }
    if image.is_empty() {
        return Err(ProcessError::EmptyImage);
    }

    // Fast path: if dimensions match, just clone
    if image.width == width && image.height == height {
        return Ok(image.clone());
    }

    let rgba = image.to_rgba_image().ok_or(ProcessError::EmptyImage)?;
    let resized = image::imageops::resize(&rgba, width, height, filter.to_image_filter());

    Ok(PixelBuffer::from_rgba_image(resized))
}

/// Shrink an image to fit within `max_width` x `max_height`, preserving aspect ratio.
///
/// Images that already fit are returned unchanged; images are never upscaled.
///
/// # Errors
///
/// Returns `ProcessError::InvalidParameter` if either bound is zero.
pub fn fit_within(
    image: &PixelBuffer,
    max_width: u32,
    max_height: u32,
    filter: FilterType,
) -> Result<PixelBuffer, ProcessError> {
    if max_width == 0 {
        return Err(ProcessError::invalid("max_width", 0.0, "a positive pixel count"));
    }
    if max_height == 0 {
        return Err(ProcessError::invalid("max_height", 0.0, "a positive pixel count"));
    }

    let (width, height) = fit_dimensions(image.width, image.height, max_width, max_height);
    if (width, height) == (image.width, image.height) {
        return Ok(image.clone());
    }

    tracing::debug!(
        from_width = image.width,
        from_height = image.height,
        width,
        height,
        "resizing to export bounds"
    );
    resize(image, width, height, filter)
}

/// Calculate the dimensions that fit `width` x `height` within the bounds.
///
/// When the source already fits it is returned as-is. Otherwise both sides are
/// scaled by `min(max_width / width, max_height / height)` and rounded, never
/// dropping below 1 or exceeding a bound.
pub fn fit_dimensions(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (0, 0);
    }
    if width <= max_width && height <= max_height {
        return (width, height);
    }

    let ratio = (max_width as f64 / width as f64).min(max_height as f64 / height as f64);
    let new_width = ((width as f64 * ratio).round() as u32).clamp(1, max_width.max(1));
    let new_height = ((height as f64 * ratio).round() as u32).clamp(1, max_height.max(1));
    (new_width, new_height)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
