//! Rotate-then-crop applied when the user confirms the editor.
//!
//! # Transform Order
//!
//! 1. Rotation about the image center, on a surface the size of the
//!    unrotated image (corners that swing outside are lost, uncovered
//!    areas become transparent)
//! 2. Crop, with the rectangle read as percentages of that rotated surface
//!
//! # Coordinate System
//!
//! - Rotation angles are in degrees, positive = clockwise on screen
//! - Crop coordinates are percentages (0 to 100) of the rotated surface
//! - Origin is top-left corner

mod crop;
mod rotation;

use thiserror::Error;
use tracing::debug;

use crate::geometry::{CropRect, Rotation};
use crate::raster::Raster;

pub use crop::crop_percent;
pub use rotation::rotate_about_center;

/// Errors from the transform stage.
#[derive(Debug, Error, PartialEq)]
pub enum TransformError {
    /// The crop rounds to an empty region or contains non-finite values.
    #[error("Invalid crop: {width}x{height} px from {rect:?}")]
    InvalidCrop {
        rect: CropRect,
        width: i64,
        height: i64,
    },

    /// The output surface could not be allocated.
    #[error("Cannot allocate a {width}x{height} surface")]
    SurfaceUnavailable { width: i64, height: i64 },
}

/// Rotate `image` by `rotation`, then crop to `crop`.
pub fn apply_edits(
    image: &Raster,
    rotation: &Rotation,
    crop: &CropRect,
) -> Result<Raster, TransformError> {
    let rotated = rotate_about_center(image, rotation);
    let cropped = crop_percent(&rotated, crop)?;
    debug!(
        degrees = rotation.degrees(),
        source_width = image.width,
        source_height = image.height,
        width = cropped.width,
        height = cropped.height,
        "applied edits"
    );
    Ok(cropped)
}
