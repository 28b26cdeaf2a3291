//! imgpress WASM - WebAssembly bindings for the imgpress pipeline
//!
//! Exposes imgpress-core to the browser front end. All work is synchronous;
//! run heavy calls from a Web Worker to keep the page responsive.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrappers for images and crop regions
//! - `decode` - Decoding and bounded resize
//! - `filter` - Filter sliders and the filter chain
//! - `transform` - Zoom and rotation
//! - `geometry` - Drag-to-crop and preview sizing
//! - `pipeline` - Preview rendering, export and size helpers
//! - `encode` - Direct encoding to JPEG, PNG or WebP
//!
//! # Usage
//!
//! ```typescript
//! import init, { decode_image, render_preview, JsFilterParams, JsTransform } from '@imgpress/wasm';
//!
//! await init();
//!
//! const image = decode_image(new Uint8Array(await file.arrayBuffer()));
//! const filters = new JsFilterParams();
//! filters.sepia = 40;
//! const preview = render_preview(image, filters, new JsTransform(), 600);
//! ```

use wasm_bindgen::prelude::*;

mod decode;
mod encode;
mod filter;
mod geometry;
mod pipeline;
mod transform;
mod types;

pub use decode::{decode_image, resize_to_fit};
pub use encode::{encode_image, mime_type};
pub use filter::{apply_filters, JsFilterParams};
pub use geometry::{crop_from_drag, crop_to_preview, preview_dimensions};
pub use pipeline::{
    compression_ratio, format_file_size, output_file_name, process_image, render_preview,
    JsProcessedImage,
};
pub use transform::{apply_transform, JsTransform};
pub use types::{JsCropRegion, JsPixelBuffer};

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
