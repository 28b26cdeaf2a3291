//! Geometric stage: crop extraction plus rotation and scale about the canvas
//! center.
//!
//! # Transform Order
//!
//! Within the single-image pipeline the geometric work happens in this order:
//! 1. Crop region extraction (full image when the region is empty)
//! 2. Filter chain on the extracted pixels
//! 3. Rotation and scale onto the working canvas
//!
//! # Coordinate System
//!
//! - Rotation angles are in degrees, positive = clockwise on screen
//! - Crop coordinates are whole image pixels
//! - Origin is top-left corner

mod affine;
mod crop;

use serde::{Deserialize, Serialize};

use crate::error::{check_range, ProcessError};

pub use affine::apply_transform;
pub use crop::extract_region;

/// Smallest allowed uniform scale.
pub const MIN_SCALE: f64 = 0.1;
/// Largest allowed uniform scale.
pub const MAX_SCALE: f64 = 3.0;
/// Step applied by [`TransformParams::zoom_in`] and [`TransformParams::zoom_out`].
pub const SCALE_STEP: f64 = 0.1;

/// Rotation and uniform scale applied about the canvas center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformParams {
    /// Uniform scale (0.1 to 3.0, identity 1.0)
    pub scale: f64,
    /// Rotation in degrees, taken mod 360
    pub rotation: f64,
}

impl Default for TransformParams {
    fn default() -> Self {
        Self {
            scale: 1.0,
            rotation: 0.0,
        }
    }
}

impl TransformParams {
    /// Rotation reduced into `[0, 360)`.
    pub fn normalized_rotation(&self) -> f64 {
        self.rotation.rem_euclid(360.0)
    }

    /// True when the transform leaves the canvas unchanged.
    pub fn is_identity(&self) -> bool {
        self.scale == 1.0 && self.normalized_rotation() == 0.0
    }

    /// Reject a scale outside 0.1 to 3.0 or a non-finite rotation.
    pub fn validate(&self) -> Result<(), ProcessError> {
        check_range("scale", self.scale, MIN_SCALE, MAX_SCALE, "0.1 to 3.0")?;
        if !self.rotation.is_finite() {
            return Err(ProcessError::invalid("rotation", self.rotation, "a finite angle in degrees"));
        }
        Ok(())
    }

    /// Increase scale by one step, capped at the maximum.
    pub fn zoom_in(&mut self) {
        self.scale = round_step(self.scale + SCALE_STEP).min(MAX_SCALE);
    }

    /// Decrease scale by one step, floored at the minimum.
    pub fn zoom_out(&mut self) {
        self.scale = round_step(self.scale - SCALE_STEP).max(MIN_SCALE);
    }

    /// Turn a quarter clockwise.
    pub fn rotate_clockwise(&mut self) {
        self.rotation = (self.normalized_rotation() + 90.0).rem_euclid(360.0);
    }
}

// Keep repeated 0.1 steps from drifting (1.0 + 0.1 + 0.1 != 1.2 in binary).
fn round_step(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
