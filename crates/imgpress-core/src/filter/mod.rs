//! Filter chain: eight independent color parameters composed into an ordered
//! list of operations.
//!
//! ## Operation Order
//! 1. Brightness
//! 2. Contrast
//! 3. Saturate
//! 4. Blur
//! 5. Sepia
//! 6. Grayscale
//! 7. Hue rotate
//! 8. Invert
//!
//! Operations whose parameter is at its identity value are left out of the
//! chain, so identity parameters produce an empty chain and applying it
//! returns the input pixels unchanged.

mod color;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::decode::PixelBuffer;
use crate::error::{check_range, ProcessError};

/// Filter parameters as exposed to the user.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterParams {
    /// Brightness percent (0 to 200, identity 100)
    pub brightness: f32,
    /// Contrast percent (0 to 200, identity 100)
    pub contrast: f32,
    /// Saturation percent (0 to 200, identity 100)
    pub saturation: f32,
    /// Gaussian blur radius in pixels (0 to 10, identity 0)
    pub blur: f32,
    /// Sepia percent (0 to 100, identity 0)
    pub sepia: f32,
    /// Grayscale percent (0 to 100, identity 0)
    pub grayscale: f32,
    /// Hue rotation in degrees (0 to 360, identity 0)
    pub hue_rotate: f32,
    /// Invert percent (0 to 100, identity 0)
    pub invert: f32,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            brightness: 100.0,
            contrast: 100.0,
            saturation: 100.0,
            blur: 0.0,
            sepia: 0.0,
            grayscale: 0.0,
            hue_rotate: 0.0,
            invert: 0.0,
        }
    }
}

impl FilterParams {
    /// Create filter parameters at their identity values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return every field to its identity value.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Check if all values are at their identity values.
    pub fn is_identity(&self) -> bool {
        self.chain().is_identity()
    }

    /// Reject any field outside its documented range.
    pub fn validate(&self) -> Result<(), ProcessError> {
        check_range("brightness", self.brightness as f64, 0.0, 200.0, "0 to 200 percent")?;
        check_range("contrast", self.contrast as f64, 0.0, 200.0, "0 to 200 percent")?;
        check_range("saturation", self.saturation as f64, 0.0, 200.0, "0 to 200 percent")?;
        check_range("blur", self.blur as f64, 0.0, 10.0, "0 to 10 pixels")?;
        check_range("sepia", self.sepia as f64, 0.0, 100.0, "0 to 100 percent")?;
        check_range("grayscale", self.grayscale as f64, 0.0, 100.0, "0 to 100 percent")?;
        check_range("hue_rotate", self.hue_rotate as f64, 0.0, 360.0, "0 to 360 degrees")?;
        check_range("invert", self.invert as f64, 0.0, 100.0, "0 to 100 percent")?;
        Ok(())
    }

    /// Compose the parameters into the ordered filter chain.
    pub fn chain(&self) -> FilterChain {
        let candidates = [
            (self.brightness != 100.0).then_some(FilterOp::Brightness(self.brightness)),
            (self.contrast != 100.0).then_some(FilterOp::Contrast(self.contrast)),
            (self.saturation != 100.0).then_some(FilterOp::Saturate(self.saturation)),
            (self.blur != 0.0).then_some(FilterOp::Blur(self.blur)),
            (self.sepia != 0.0).then_some(FilterOp::Sepia(self.sepia)),
            (self.grayscale != 0.0).then_some(FilterOp::Grayscale(self.grayscale)),
            (self.hue_rotate % 360.0 != 0.0).then_some(FilterOp::HueRotate(self.hue_rotate)),
            (self.invert != 0.0).then_some(FilterOp::Invert(self.invert)),
        ];
        FilterChain {
            ops: candidates.into_iter().flatten().collect(),
        }
    }
}

/// A single parametric operation, carrying the value in its user-facing unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "value", rename_all = "kebab-case")]
pub enum FilterOp {
    Brightness(f32),
    Contrast(f32),
    Saturate(f32),
    Blur(f32),
    Sepia(f32),
    Grayscale(f32),
    HueRotate(f32),
    Invert(f32),
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterOp::Brightness(v) => write!(f, "brightness({v}%)"),
            FilterOp::Contrast(v) => write!(f, "contrast({v}%)"),
            FilterOp::Saturate(v) => write!(f, "saturate({v}%)"),
            FilterOp::Blur(v) => write!(f, "blur({v}px)"),
            FilterOp::Sepia(v) => write!(f, "sepia({v}%)"),
            FilterOp::Grayscale(v) => write!(f, "grayscale({v}%)"),
            FilterOp::HueRotate(v) => write!(f, "hue-rotate({v}deg)"),
            FilterOp::Invert(v) => write!(f, "invert({v}%)"),
        }
    }
}

/// Ordered list of operations built by [`FilterParams::chain`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterChain {
    ops: Vec<FilterOp>,
}

impl FilterChain {
    /// The operations in application order.
    pub fn ops(&self) -> &[FilterOp] {
        &self.ops
    }

    /// True when the chain contains no operations.
    pub fn is_identity(&self) -> bool {
        self.ops.is_empty()
    }

    /// Apply the chain, returning a new buffer.
    ///
    /// Consecutive color operations are evaluated together in floating point
    /// and rounded once; blur splits the chain into separate runs.
    pub fn apply(&self, image: &PixelBuffer) -> PixelBuffer {
        if self.is_identity() || image.is_empty() {
            return image.clone();
        }

        let mut out = image.clone();
        let mut run_start = 0;
        for (i, op) in self.ops.iter().enumerate() {
            if let FilterOp::Blur(sigma) = op {
                color::apply_color_ops(&mut out.pixels, &self.ops[run_start..i]);
                out = gaussian_blur(&out, *sigma);
                run_start = i + 1;
            }
        }
        color::apply_color_ops(&mut out.pixels, &self.ops[run_start..]);

        tracing::debug!(chain = %self, "applied filter chain");
        out
    }
}

impl fmt::Display for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ops.is_empty() {
            return f.write_str("none");
        }
        for (i, op) in self.ops.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{op}")?;
        }
        Ok(())
    }
}

fn gaussian_blur(image: &PixelBuffer, sigma: f32) -> PixelBuffer {
    match image.to_rgba_image() {
        Some(rgba) => PixelBuffer::from_rgba_image(image::imageops::blur(&rgba, sigma)),
        None => image.clone(),
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn buffer_strategy() -> impl Strategy<Value = PixelBuffer> {
        (1u32..=12, 1u32..=12).prop_flat_map(|(w, h)| {
            let len = (w * h * 4) as usize;
            prop::collection::vec(any::<u8>(), len..=len)
                .prop_map(move |pixels| PixelBuffer::new(w, h, pixels))
        })
    }

    fn params_strategy() -> impl Strategy<Value = FilterParams> {
        (
            0.0f32..=200.0,
            0.0f32..=200.0,
            0.0f32..=200.0,
            0.0f32..=10.0,
            0.0f32..=100.0,
            0.0f32..=100.0,
            0.0f32..=360.0,
            0.0f32..=100.0,
        )
            .prop_map(
                |(brightness, contrast, saturation, blur, sepia, grayscale, hue_rotate, invert)| {
                    FilterParams {
                        brightness,
                        contrast,
                        saturation,
                        blur,
                        sepia,
                        grayscale,
                        hue_rotate,
                        invert,
                    }
                },
            )
    }

    proptest! {
        /// Property: identity parameters return the input bit for bit.
        #[test]
        fn prop_identity_passthrough(img in buffer_strategy()) {
            let out = FilterParams::default().chain().apply(&img);
            prop_assert_eq!(out, img);
        }

        /// Property: the chain never changes dimensions.
        #[test]
        fn prop_dimensions_preserved(img in buffer_strategy(), params in params_strategy()) {
            let out = params.chain().apply(&img);
            prop_assert_eq!((out.width, out.height), (img.width, img.height));
            prop_assert_eq!(out.pixels.len(), img.pixels.len());
        }

        /// Property: in-range parameters always validate.
        #[test]
        fn prop_in_range_params_validate(params in params_strategy()) {
            prop_assert!(params.validate().is_ok());
        }

        /// Property: applying the chain is deterministic.
        #[test]
        fn prop_deterministic(img in buffer_strategy(), params in params_strategy()) {
            prop_assert_eq!(params.chain().apply(&img), params.chain().apply(&img));
        }
    }
}
