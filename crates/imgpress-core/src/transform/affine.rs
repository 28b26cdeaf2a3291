//! Rotation and uniform scale about the canvas center.
//!
//! The source is stretched onto a canvas of the requested size, and the canvas
//! transform `T(c) · R(θ) · S(s) · T(-c)` is applied around its center `c`.
//! Rotation is clockwise on screen (y axis points down).
//!
//! # Algorithm
//!
//! Inverse mapping: for each output pixel center `q` we compute the canvas
//! point it came from
//! ```text
//! p = c + S(1/s) · R(-θ) · (q - c)
//! ```
//! and, if `p` lies on the drawn rectangle, sample the source there. Canvas
//! points outside the rectangle stay fully transparent.

use crate::decode::{FilterType, PixelBuffer};

use super::TransformParams;

/// Draw `source` onto a `canvas` sized buffer under `transform`.
///
/// With an identity transform and a canvas equal to the source size this is
/// a plain copy. A source whose pixel data does not match its dimensions
/// draws nothing.
pub fn apply_transform(
    source: &PixelBuffer,
    transform: &TransformParams,
    canvas: (u32, u32),
    filter: FilterType,
) -> PixelBuffer {
    let (dst_w, dst_h) = canvas;
    if source.is_empty() || !source.has_valid_len() || dst_w == 0 || dst_h == 0 {
        return PixelBuffer::transparent(dst_w, dst_h);
    }

    // Fast path: nothing to do
    if transform.is_identity() && (source.width, source.height) == canvas {
        return source.clone();
    }

    let angle_rad = transform.normalized_rotation().to_radians();
    let (sin, cos) = angle_rad.sin_cos();
    let inv_scale = 1.0 / transform.scale;

    let cx = dst_w as f64 / 2.0;
    let cy = dst_h as f64 / 2.0;

    // Canvas units to source pixels
    let to_src_x = source.width as f64 / dst_w as f64;
    let to_src_y = source.height as f64 / dst_h as f64;

    let mut output = vec![0u8; dst_w as usize * dst_h as usize * 4];

    for dst_y in 0..dst_h {
        for dst_x in 0..dst_w {
            let dx = dst_x as f64 + 0.5 - cx;
            let dy = dst_y as f64 + 0.5 - cy;

            // Inverse rotation, then inverse scale
            let px = (dx * cos + dy * sin) * inv_scale + cx;
            let py = (-dx * sin + dy * cos) * inv_scale + cy;

            if px < 0.0 || py < 0.0 || px > dst_w as f64 || py > dst_h as f64 {
                continue;
            }

            let src_x = px * to_src_x - 0.5;
            let src_y = py * to_src_y - 0.5;

            let pixel = match filter {
                FilterType::Nearest => sample_nearest(source, src_x, src_y),
                FilterType::Bilinear => sample_bilinear(source, src_x, src_y),
                FilterType::Lanczos3 => sample_lanczos3(source, src_x, src_y),
            };

            let dst_idx = (dst_y as usize * dst_w as usize + dst_x as usize) * 4;
            output[dst_idx..dst_idx + 4].copy_from_slice(&pixel);
        }
    }

    PixelBuffer::new(dst_w, dst_h, output)
}

/// Get a pixel as [f64; 4] from an image at the given coordinates.
#[inline]
fn get_pixel_f64(image: &PixelBuffer, px: usize, py: usize) -> [f64; 4] {
    let idx = (py * image.width as usize + px) * 4;
    [
        image.pixels[idx] as f64,
        image.pixels[idx + 1] as f64,
        image.pixels[idx + 2] as f64,
        image.pixels[idx + 3] as f64,
    ]
}

fn sample_nearest(image: &PixelBuffer, x: f64, y: f64) -> [u8; 4] {
    let px = (x.round().max(0.0) as u32).min(image.width - 1);
    let py = (y.round().max(0.0) as u32).min(image.height - 1);
    image.pixel(px, py)
}

/// Sample a pixel using bilinear interpolation.
///
/// Coordinates are clamped to the image so edge pixels extend outward
/// instead of fading to transparent.
fn sample_bilinear(image: &PixelBuffer, x: f64, y: f64) -> [u8; 4] {
    let max_x = (image.width - 1) as f64;
    let max_y = (image.height - 1) as f64;
    let x = x.clamp(0.0, max_x);
    let y = y.clamp(0.0, max_y);

    let x0 = x.floor() as usize;
    let y0 = y.floor() as usize;
    let x1 = (x0 + 1).min(image.width as usize - 1);
    let y1 = (y0 + 1).min(image.height as usize - 1);

    // Fractional distances
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = get_pixel_f64(image, x0, y0);
    let p10 = get_pixel_f64(image, x1, y0);
    let p01 = get_pixel_f64(image, x0, y1);
    let p11 = get_pixel_f64(image, x1, y1);

    let mut result = [0u8; 4];
    for i in 0..4 {
        let v = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
        result[i] = v.clamp(0.0, 255.0).round() as u8;
    }

    result
}

/// Sample a pixel using Lanczos3 interpolation over a 6x6 neighborhood.
///
/// Neighbors beyond the image edge reuse the nearest edge pixel.
fn sample_lanczos3(image: &PixelBuffer, x: f64, y: f64) -> [u8; 4] {
    let (w, h) = (image.width as i64, image.height as i64);
    let x = x.clamp(0.0, (w - 1) as f64);
    let y = y.clamp(0.0, (h - 1) as f64);

    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;

    let mut sum = [0.0f64; 4];
    let mut weight_sum = 0.0;

    for ky in -2..=3 {
        for kx in -2..=3 {
            let px = x0 + kx;
            let py = y0 + ky;

            let weight = lanczos_weight(x - px as f64, 3.0) * lanczos_weight(y - py as f64, 3.0);
            if weight == 0.0 {
                continue;
            }

            let pixel = get_pixel_f64(image, px.clamp(0, w - 1) as usize, py.clamp(0, h - 1) as usize);
            for i in 0..4 {
                sum[i] += pixel[i] * weight;
            }
            weight_sum += weight;
        }
    }

    let mut result = [0u8; 4];
    if weight_sum > 0.0 {
        for i in 0..4 {
            result[i] = (sum[i] / weight_sum).clamp(0.0, 255.0).round() as u8;
        }
    }

    result
}

/// Lanczos kernel weight function.
///
/// ```text
/// L(x) = sinc(x) * sinc(x/a)  for |x| < a
/// L(x) = 0                     for |x| >= a
/// ```
fn lanczos_weight(x: f64, a: f64) -> f64 {
    if x.abs() < f64::EPSILON {
        return 1.0;
    }
    if x.abs() >= a {
        return 0.0;
    }

    let pi_x = std::f64::consts::PI * x;
    let pi_x_a = pi_x / a;

    (a * pi_x.sin() * pi_x_a.sin()) / (pi_x * pi_x)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
