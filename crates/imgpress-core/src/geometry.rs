//! Mapping between preview coordinates and image pixels.
//!
//! The interactive shell shows a scaled-down preview of the source image and
//! reports pointer positions in preview space. Everything here converts those
//! positions into a [`CropRegion`] in image-pixel space and back.

use serde::{Deserialize, Serialize};

/// Default maximum preview width in display pixels.
pub const DEFAULT_PREVIEW_WIDTH: u32 = 600;

/// A point in some 2D coordinate space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A rectangle in image-pixel space selecting the sub-image to keep.
///
/// A region with zero width or height means "no crop".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CropRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRegion {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The region covering a whole `width` x `height` image.
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// True for the zero-area "no crop" region.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// True when the region lies entirely inside a `width` x `height` image.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.x as u64 + self.width as u64 <= width as u64
            && self.y as u64 + self.height as u64 <= height as u64
    }

    /// Clamp the region so it lies inside a `width` x `height` image.
    pub fn clamp_to(&self, width: u32, height: u32) -> Self {
        let x = self.x.min(width);
        let y = self.y.min(height);
        Self {
            x,
            y,
            width: self.width.min(width - x),
            height: self.height.min(height - y),
        }
    }

    /// Resolve the region actually drawn: the region itself, or the whole
    /// image when it is empty. The result always fits the image.
    pub fn resolve(&self, width: u32, height: u32) -> Self {
        let clamped = self.clamp_to(width, height);
        if clamped.is_empty() {
            Self::full(width, height)
        } else {
            clamped
        }
    }
}

/// Compute the preview surface size for an image.
///
/// The preview is at most `max_width` wide and never wider than the image;
/// height follows the image aspect ratio.
pub fn preview_dimensions(image_width: u32, image_height: u32, max_width: u32) -> (u32, u32) {
    if image_width == 0 || image_height == 0 {
        return (0, 0);
    }
    let display_width = max_width.min(image_width).max(1);
    let display_height =
        ((image_height as f64 * display_width as f64) / image_width as f64).round() as u32;
    (display_width, display_height.max(1))
}

/// Map a point from preview space into image space.
pub fn preview_to_image(
    point: Point,
    preview: (u32, u32),
    image: (u32, u32),
) -> Point {
    let scale_x = image.0 as f64 / preview.0 as f64;
    let scale_y = image.1 as f64 / preview.1 as f64;
    Point::new(point.x * scale_x, point.y * scale_y)
}

/// Turn a drag gesture on the preview into a crop region on the image.
///
/// Both points are scaled into image space, normalized so the rectangle has
/// non-negative size regardless of drag direction, and clamped to the image
/// bounds (the pointer may leave the preview mid-drag).
///
/// # Example
///
/// ```
/// use imgpress_core::geometry::{crop_from_drag, CropRegion, Point};
///
/// // 300x200 preview of a 600x400 image, dragged up-left.
/// let crop = crop_from_drag(Point::new(150.0, 100.0), Point::new(50.0, 50.0), (300, 200), (600, 400));
/// assert_eq!(crop, CropRegion::new(100, 100, 200, 100));
/// ```
pub fn crop_from_drag(
    start: Point,
    current: Point,
    preview: (u32, u32),
    image: (u32, u32),
) -> CropRegion {
    if preview.0 == 0 || preview.1 == 0 || image.0 == 0 || image.1 == 0 {
        return CropRegion::default();
    }

    let a = clamp_point(preview_to_image(start, preview, image), image);
    let b = clamp_point(preview_to_image(current, preview, image), image);

    let x0 = a.x.min(b.x).round() as u32;
    let y0 = a.y.min(b.y).round() as u32;
    let x1 = a.x.max(b.x).round() as u32;
    let y1 = a.y.max(b.y).round() as u32;

    CropRegion::new(x0, y0, x1 - x0, y1 - y0).clamp_to(image.0, image.1)
}

/// Map a crop region back into preview space for overlay drawing.
///
/// Returns `(x, y, width, height)` in preview pixels.
pub fn crop_to_preview(
    crop: &CropRegion,
    preview: (u32, u32),
    image: (u32, u32),
) -> (f64, f64, f64, f64) {
    if image.0 == 0 || image.1 == 0 {
        return (0.0, 0.0, 0.0, 0.0);
    }
    let scale_x = preview.0 as f64 / image.0 as f64;
    let scale_y = preview.1 as f64 / image.1 as f64;
    (
        crop.x as f64 * scale_x,
        crop.y as f64 * scale_y,
        crop.width as f64 * scale_x,
        crop.height as f64 * scale_y,
    )
}

fn clamp_point(p: Point, image: (u32, u32)) -> Point {
    let x = if p.x.is_nan() { 0.0 } else { p.x };
    let y = if p.y.is_nan() { 0.0 } else { p.y };
    Point::new(x.clamp(0.0, image.0 as f64), y.clamp(0.0, image.1 as f64))
}


// ============================================================================
// Property-Based Tests
// ============================================================================
