//! Pixel buffers, decoding and the resize stage.
//!
//! This module provides:
//! - The [`PixelBuffer`] type every pipeline stage consumes and produces
//! - The [`Decoder`] capability and its default `image`-crate implementation
//! - Aspect-preserving resize to export bounds
//!
//! # Examples
//!
//! ```ignore
//! use imgpress_core::decode::{decode_image, fit_within, FilterType};
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let image = decode_image(&bytes).unwrap();
//! let bounded = fit_within(&image, 1920, 1080, FilterType::Bilinear).unwrap();
//! println!("{}x{}", bounded.width, bounded.height);
//! ```

mod reader;
mod resize;
mod types;

pub use reader::{decode_image, get_orientation, Decoder, ImageDecoder};
pub use resize::{fit_dimensions, fit_within, resize};
pub use types::{DecodeError, FilterType, Orientation, PixelBuffer, CHANNELS};
