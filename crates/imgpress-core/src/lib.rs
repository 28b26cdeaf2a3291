//! imgpress core - image compression and editing pipeline
//!
//! This crate holds everything the imgpress front ends share: decoding,
//! the CSS-style filter chain, crop and rotate/scale geometry, resizing to
//! export bounds and encoding to JPEG, PNG or WebP. With the default `batch`
//! feature it also provides the async orchestrator for processing many files
//! with one set of settings.
//!
//! The library logs through `tracing` and installs no subscriber.

#[cfg(feature = "batch")]
pub mod batch;
pub mod config;
pub mod decode;
pub mod encode;
pub mod error;
pub mod filter;
pub mod geometry;
pub mod pipeline;
pub mod transform;

pub use config::{BatchSettings, ConfigError, ProcessorConfig};
pub use decode::{decode_image, Decoder, FilterType, ImageDecoder, PixelBuffer};
pub use encode::{encode, EncodeError, ExportFormat};
pub use error::ProcessError;
pub use filter::{FilterChain, FilterOp, FilterParams};
pub use geometry::{crop_from_drag, preview_dimensions, CropRegion, Point};
pub use pipeline::{
    compression_ratio, format_file_size, output_file_name, process_image, render_preview,
    validate_image, ExportSettings, ProcessedImage,
};
pub use transform::TransformParams;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_then_process() {
        let source = PixelBuffer::new(300, 200, [30, 60, 90, 255].repeat(300 * 200));
        let bytes = encode(&source, ExportFormat::Png, 1.0).unwrap();
        let image = decode_image(&bytes).unwrap();

        let config = ProcessorConfig::from_toml_str(
            "[export]\nformat = \"jpeg\"\nquality = 0.6\nmaxWidth = 150\n",
        )
        .unwrap();
        let crop = crop_from_drag(
            Point::new(0.0, 0.0),
            Point::new(300.0, 100.0),
            preview_dimensions(image.width, image.height, 600),
            (image.width, image.height),
        );
        assert_eq!(crop, CropRegion::new(0, 0, 300, 100));

        let out = process_image(&image, &crop, &config.filters, &config.transform, &config.export)
            .unwrap();
        assert_eq!((out.width, out.height), (150, 50));
        assert_eq!(&out.bytes[0..2], &[0xFF, 0xD8]);
        assert_eq!(
            output_file_name("scan.tiff", out.format),
            "processed-scan.jpeg"
        );
    }
}
