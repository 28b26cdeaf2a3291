//! Single-image pipeline: crop, filter, transform, resize, encode.
//!
//! Every function here is pure. The same input and settings always give the
//! same bytes, which is what lets the batch orchestrator run items on a
//! blocking pool without coordination.

use serde::{Deserialize, Serialize};

use crate::decode::{fit_within, resize, FilterType, PixelBuffer};
use crate::encode::{encode, ExportFormat};
use crate::error::{check_range, ProcessError};
use crate::filter::FilterParams;
use crate::geometry::{preview_dimensions, CropRegion};
use crate::transform::{apply_transform, extract_region, TransformParams};

/// Output options for an export.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportSettings {
    /// Encoder quality, 0.1 to 1.0. Ignored for PNG.
    pub quality: f32,
    pub format: ExportFormat,
    /// Output bound in pixels; larger results are scaled down to fit.
    pub max_width: u32,
    pub max_height: u32,
    /// Interpolation used by the geometry and resize stages.
    pub filter: FilterType,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            quality: 0.8,
            format: ExportFormat::Jpeg,
            max_width: 1920,
            max_height: 1080,
            filter: FilterType::Bilinear,
        }
    }
}

impl ExportSettings {
    pub fn validate(&self) -> Result<(), ProcessError> {
        check_range("quality", self.quality as f64, 0.1, 1.0, "0.1 to 1.0")?;
        if self.max_width == 0 {
            return Err(ProcessError::invalid("max_width", 0.0, "a positive pixel count"));
        }
        if self.max_height == 0 {
            return Err(ProcessError::invalid("max_height", 0.0, "a positive pixel count"));
        }
        Ok(())
    }
}

/// An encoded export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedImage {
    pub bytes: Vec<u8>,
    /// Length of `bytes`.
    pub byte_size: usize,
    pub width: u32,
    pub height: u32,
    pub format: ExportFormat,
}

/// Run the full export pipeline on a decoded image.
///
/// Stages, in order:
/// 1. Validate every settings struct (out-of-range values are rejected, never clamped)
/// 2. Extract `crop` (the whole image when the region is empty)
/// 3. Apply the filter chain
/// 4. Rotate and scale onto a canvas the size of the crop
/// 5. Scale down to the export bounds
/// 6. Encode
///
/// # Errors
///
/// - `ProcessError::InvalidParameter` for any setting outside its range
/// - `ProcessError::EmptyImage` if `image` has zero width or height
/// - `ProcessError::InvalidPixelData` if `image.pixels` does not match its dimensions
/// - `ProcessError::Encode` if the codec fails
pub fn process_image(
    image: &PixelBuffer,
    crop: &CropRegion,
    filters: &FilterParams,
    transform: &TransformParams,
    export: &ExportSettings,
) -> Result<ProcessedImage, ProcessError> {
    filters.validate()?;
    transform.validate()?;
    export.validate()?;
    validate_image(image)?;

    let cropped = extract_region(image, crop);
    let chain = filters.chain();
    let filtered = chain.apply(&cropped);
    let canvas = (filtered.width, filtered.height);
    let transformed = apply_transform(&filtered, transform, canvas, export.filter);
    let fitted = fit_within(&transformed, export.max_width, export.max_height, export.filter)?;
    let bytes = encode(&fitted, export.format, export.quality)?;

    tracing::debug!(
        source_width = image.width,
        source_height = image.height,
        canvas_width = canvas.0,
        canvas_height = canvas.1,
        width = fitted.width,
        height = fitted.height,
        filters = %chain,
        bytes = bytes.len(),
        "processed image"
    );

    Ok(ProcessedImage {
        byte_size: bytes.len(),
        width: fitted.width,
        height: fitted.height,
        format: export.format,
        bytes,
    })
}

/// Render the on-screen preview of an image.
///
/// The image is scaled to [`preview_dimensions`] first, so blur radii are
/// measured in preview pixels the same way they are measured in export
/// pixels. The crop is not applied; the preview always shows the full image.
pub fn render_preview(
    image: &PixelBuffer,
    filters: &FilterParams,
    transform: &TransformParams,
    max_preview_width: u32,
) -> Result<PixelBuffer, ProcessError> {
    filters.validate()?;
    transform.validate()?;
    if max_preview_width == 0 {
        return Err(ProcessError::invalid(
            "max_preview_width",
            0.0,
            "a positive pixel count",
        ));
    }
    validate_image(image)?;

    let (width, height) = preview_dimensions(image.width, image.height, max_preview_width);
    let display = resize(image, width, height, FilterType::Bilinear)?;
    let filtered = filters.chain().apply(&display);
    Ok(apply_transform(
        &filtered,
        transform,
        (width, height),
        FilterType::Bilinear,
    ))
}

/// Percentage saved by compression: `(original - processed) / original * 100`.
///
/// Negative when the output grew. Zero when either size is zero: a zero
/// `processed` means no export has been measured yet, not a 100% saving.
/// See the `compression_ratio` entry in DESIGN.md.
pub fn compression_ratio(original: u64, processed: u64) -> f64 {
    if original == 0 || processed == 0 {
        return 0.0;
    }
    (original as f64 - processed as f64) / original as f64 * 100.0
}

/// Check that a decoded image can enter the pipeline.
///
/// Rejects zero-sized images and buffers whose pixel data length does not
/// match `width * height * 4`.
pub fn validate_image(image: &PixelBuffer) -> Result<(), ProcessError> {
    if image.width == 0 || image.height == 0 {
        return Err(ProcessError::EmptyImage);
    }
    if !image.has_valid_len() {
        return Err(ProcessError::InvalidPixelData {
            expected: image.expected_len(),
            actual: image.pixels.len(),
        });
    }
    Ok(())
}

/// Human-readable byte count using base 1024 ("0 Bytes", "1.5 KB", "2 MB").
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rendered = format!("{value:.2}");
    let trimmed = rendered.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", UNITS[unit])
}

/// Download name for an export: `processed-<stem>.<ext>`.
///
/// The stem is everything before the first `.` of the source name, so
/// `photo.final.png` becomes `processed-photo.jpeg` for a JPEG export.
pub fn output_file_name(source_name: &str, format: ExportFormat) -> String {
    let stem = source_name.split('.').next().unwrap_or_default();
    format!("processed-{stem}.{}", format.extension())
}


// ============================================================================
// Property-Based Tests
// ============================================================================
