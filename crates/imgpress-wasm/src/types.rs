//! WASM-compatible wrapper types for image data.
//!
//! These wrap the core imgpress types and handle conversion between Rust and
//! JavaScript data representations.

use imgpress_core::decode::{FilterType, PixelBuffer};
use imgpress_core::geometry::CropRegion;
use imgpress_core::pipeline::validate_image;
use imgpress_core::ProcessError;
use wasm_bindgen::prelude::*;

/// An RGBA image held in WASM memory.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. `pixels()` copies it into a
/// JavaScript `Uint8Array`, which can be handed straight to `ImageData` for
/// drawing on a canvas.
#[wasm_bindgen]
pub struct JsPixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsPixelBuffer {
    /// Create an image from dimensions and RGBA pixel data
    /// (4 bytes per pixel, row-major order).
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> JsPixelBuffer {
        JsPixelBuffer {
            width,
            height,
            pixels,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of bytes in the pixel buffer (width * height * 4)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns RGBA pixel data as Uint8Array (a copy).
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// Explicitly free WASM memory.
    ///
    /// Optional; wasm-bindgen's finalizer also releases it.
    pub fn free(self) {}
}

impl JsPixelBuffer {
    pub(crate) fn from_buffer(buffer: PixelBuffer) -> Self {
        Self {
            width: buffer.width,
            height: buffer.height,
            pixels: buffer.pixels,
        }
    }

    /// Convert back to a core PixelBuffer. Clones the pixel data.
    pub(crate) fn to_buffer(&self) -> PixelBuffer {
        PixelBuffer {
            width: self.width,
            height: self.height,
            pixels: self.pixels.clone(),
        }
    }

    /// Like [`to_buffer`](Self::to_buffer), but rejects zero-sized images and
    /// pixel arrays whose length does not match the dimensions.
    pub(crate) fn to_checked_buffer(&self) -> Result<PixelBuffer, ProcessError> {
        let buffer = self.to_buffer();
        validate_image(&buffer)?;
        Ok(buffer)
    }
}

/// A crop rectangle in image pixels. Zero width or height means no crop.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsCropRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[wasm_bindgen]
impl JsCropRegion {
    #[wasm_bindgen(constructor)]
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> JsCropRegion {
        JsCropRegion {
            x,
            y,
            width,
            height,
        }
    }

    /// The region covering a whole image, used to reset the crop.
    pub fn full(width: u32, height: u32) -> JsCropRegion {
        CropRegion::full(width, height).into()
    }

    pub fn is_empty(&self) -> bool {
        CropRegion::from(*self).is_empty()
    }
}

impl From<CropRegion> for JsCropRegion {
    fn from(region: CropRegion) -> Self {
        Self::new(region.x, region.y, region.width, region.height)
    }
}

impl From<JsCropRegion> for CropRegion {
    fn from(region: JsCropRegion) -> Self {
        CropRegion::new(region.x, region.y, region.width, region.height)
    }
}

/// Convert a u8 filter value to the core FilterType enum.
///
/// Values:
/// - 0 = Nearest (fastest, lowest quality)
/// - 1 = Bilinear (good balance of speed and quality)
/// - 2 = Lanczos3 (best quality, slowest)
///
/// Any other value defaults to Bilinear.
pub(crate) fn filter_from_u8(value: u8) -> FilterType {
    match value {
        0 => FilterType::Nearest,
        2 => FilterType::Lanczos3,
        _ => FilterType::Bilinear,
    }
}
