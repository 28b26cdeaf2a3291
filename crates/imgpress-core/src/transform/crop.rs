//! Extraction of a crop region in pixel coordinates.
//!
//! # Coordinate System
//!
//! - (0, 0) = top-left pixel
//! - `x`, `y`, `width`, `height` are whole pixels of the source image
//!
//! # Example
//!
//! ```ignore
//! // Keep the 400x300 block starting at (100, 100)
//! let cropped = extract_region(&image, &CropRegion::new(100, 100, 400, 300));
//! ```

use crate::decode::{PixelBuffer, CHANNELS};
use crate::geometry::CropRegion;

/// Copy the pixels selected by `region` into a new buffer.
///
/// The region is first resolved against the image: it is clamped to the image
/// bounds, and an empty region selects the whole image. A buffer whose pixel
/// data does not match its dimensions is returned unchanged.
///
/// # Example
///
/// ```
/// use imgpress_core::decode::PixelBuffer;
/// use imgpress_core::geometry::CropRegion;
/// use imgpress_core::transform::extract_region;
///
/// let image = PixelBuffer::transparent(800, 600);
/// let cropped = extract_region(&image, &CropRegion::new(100, 100, 400, 300));
/// assert_eq!((cropped.width, cropped.height), (400, 300));
/// ```
pub fn extract_region(image: &PixelBuffer, region: &CropRegion) -> PixelBuffer {
    if image.is_empty() || !image.has_valid_len() {
        return image.clone();
    }

    let region = region.resolve(image.width, image.height);

    // Fast path: full region returns a clone
    if region == CropRegion::full(image.width, image.height) {
        return image.clone();
    }

    let src_stride = image.width as usize * CHANNELS;
    let row_len = region.width as usize * CHANNELS;
    let mut output = Vec::with_capacity(row_len * region.height as usize);

    // Copy pixel data row by row
    for y in region.y..region.y + region.height {
        let start = y as usize * src_stride + region.x as usize * CHANNELS;
        output.extend_from_slice(&image.pixels[start..start + row_len]);
    }

    PixelBuffer::new(region.width, region.height, output)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
