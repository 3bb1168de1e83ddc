//! Value types shared by the editor, the transform stage and the composer.
//!
//! # Coordinate System
//!
//! - Crop rectangles are percentages (0 to 100) of the displayed, rotated
//!   image's bounding box, not raw pixels
//! - Rotation is in degrees, positive = clockwise on screen (y axis down)
//! - Origin is top-left corner

use serde::{Deserialize, Serialize};

use crate::config::MIN_CROP_PERCENT;

/// A crop rectangle in percent of the container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for CropRect {
    fn default() -> Self {
        Self::FULL
    }
}

impl CropRect {
    /// The whole container; the state of every freshly loaded image.
    pub const FULL: CropRect = CropRect {
        x: 0.0,
        y: 0.0,
        width: 100.0,
        height: 100.0,
    };

    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge, `x + width`.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge, `y + height`.
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Check if the rect is the untouched full-container default.
    pub fn is_full(&self) -> bool {
        *self == Self::FULL
    }

    /// Both dimensions are at least [`MIN_CROP_PERCENT`].
    pub fn meets_minimum(&self) -> bool {
        self.width >= MIN_CROP_PERCENT && self.height >= MIN_CROP_PERCENT
    }

    /// The rect lies entirely inside the 0..100 container.
    pub fn is_contained(&self) -> bool {
        self.x >= 0.0 && self.y >= 0.0 && self.right() <= 100.0 && self.bottom() <= 100.0
    }
}

/// Direction for the step rotation controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotateDirection {
    Left,
    Right,
}

impl RotateDirection {
    fn sign(self) -> f64 {
        match self {
            RotateDirection::Left => -1.0,
            RotateDirection::Right => 1.0,
        }
    }
}

/// Signed rotation angle in degrees.
///
/// Only the 90° step control normalizes the angle; fine-tune and exact
/// entry keep whatever value they produce, including values beyond ±360.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rotation {
    degrees: f64,
}

impl Rotation {
    /// Degrees added or removed by one fine-tune step.
    pub const FINE_STEP: f64 = 1.0;

    pub fn new(degrees: f64) -> Self {
        Self { degrees }
    }

    pub fn degrees(&self) -> f64 {
        self.degrees
    }

    pub fn radians(&self) -> f64 {
        self.degrees.to_radians()
    }

    /// Rotate by a quarter turn, keeping the result in (-360, 360).
    ///
    /// The remainder keeps the sign of the dividend, so a left turn from 0
    /// stays at -90 rather than wrapping to 270.
    pub fn rotate_quarter(self, direction: RotateDirection) -> Self {
        Self::new((self.degrees + 90.0 * direction.sign()) % 360.0)
    }

    /// Fine-tune by one degree without normalizing.
    pub fn nudge(self, direction: RotateDirection) -> Self {
        Self::new(self.degrees + Self::FINE_STEP * direction.sign())
    }

    /// Exact entry. Non-finite input leaves the rotation unchanged.
    pub fn set_exact(self, degrees: f64) -> Self {
        if degrees.is_finite() {
            Self::new(degrees)
        } else {
            self
        }
    }

    pub fn reset(self) -> Self {
        Self::default()
    }

    /// True when drawing at this angle is a no-op.
    pub fn is_identity(&self) -> bool {
        let normalized = self.degrees % 360.0;
        normalized.abs() < 0.001 || (360.0 - normalized.abs()).abs() < 0.001
    }
}

/// Scale and offset for drawing a source into a frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Placement {
    /// Pixel size of a `width × height` source drawn at this scale.
    pub fn scaled_size(&self, width: u32, height: u32) -> (u32, u32) {
        (
            (width as f64 * self.scale).round() as u32,
            (height as f64 * self.scale).round() as u32,
        )
    }

    /// Offset rounded to the pixel grid.
    pub fn pixel_offset(&self) -> (i64, i64) {
        (self.offset_x.round() as i64, self.offset_y.round() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crop_rect_default_is_full() {
        let rect = CropRect::default();
        assert!(rect.is_full());
        assert!(rect.meets_minimum());
        assert!(rect.is_contained());
    }

    #[test]
    fn test_crop_rect_edges() {
        let rect = CropRect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(rect.right(), 40.0);
        assert_eq!(rect.bottom(), 60.0);
        assert!(!rect.is_full());
    }

    #[test]
    fn test_crop_rect_overflow_not_contained() {
        assert!(!CropRect::new(50.0, 0.0, 80.0, 100.0).is_contained());
    }

    #[test]
    fn test_rotate_quarter_normalizes() {
        let mut rotation = Rotation::default();
        for _ in 0..4 {
            rotation = rotation.rotate_quarter(RotateDirection::Right);
        }
        assert_eq!(rotation.degrees(), 0.0);
    }

    #[test]
    fn test_rotate_quarter_left_keeps_sign() {
        let rotation = Rotation::default().rotate_quarter(RotateDirection::Left);
        assert_eq!(rotation.degrees(), -90.0);

        let rotation = Rotation::new(-270.0).rotate_quarter(RotateDirection::Left);
        assert_eq!(rotation.degrees(), 0.0);
    }

    #[test]
    fn test_nudge_is_not_normalized() {
        let rotation = Rotation::new(359.0).nudge(RotateDirection::Right);
        assert_eq!(rotation.degrees(), 360.0);
        let rotation = rotation.nudge(RotateDirection::Right);
        assert_eq!(rotation.degrees(), 361.0);
    }

    #[test]
    fn test_set_exact_accepts_out_of_range() {
        let rotation = Rotation::default().set_exact(-725.0);
        assert_eq!(rotation.degrees(), -725.0);
        assert!(!rotation.is_identity());
    }

    #[test]
    fn test_set_exact_rejects_nan() {
        let rotation = Rotation::new(15.0).set_exact(f64::NAN);
        assert_eq!(rotation.degrees(), 15.0);
        assert_eq!(rotation.reset().degrees(), 0.0);
    }

    #[test]
    fn test_identity_rotation() {
        assert!(Rotation::new(0.0).is_identity());
        assert!(Rotation::new(720.0).is_identity());
        assert!(Rotation::new(-360.0).is_identity());
        assert!(!Rotation::new(90.0).is_identity());
    }

    #[test]
    fn test_placement_scaled_size() {
        let placement = Placement {
            scale: 1.65,
            offset_x: -30.0,
            offset_y: -195.0,
        };
        assert_eq!(placement.scaled_size(400, 600), (660, 990));
        assert_eq!(placement.pixel_offset(), (-30, -195));
    }
}
