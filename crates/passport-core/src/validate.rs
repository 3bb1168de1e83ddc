//! Post-hoc checks on a composed photo.
//!
//! Validation is observational only. A failing check never blocks output,
//! it is surfaced to the user next to the photo.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::PassportSpec;
use crate::raster::Raster;

/// Side of the square block sampled for the background check.
const SAMPLE_SIZE: u32 = 20;

/// Minimum value for each of R, G and B to count as a white background.
const WHITE_THRESHOLD: u8 = 250;

/// Outcome of [`validate_photo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub dimensions_ok: bool,
    pub background_ok: bool,
    /// Always true; head position is not measured.
    pub positioning_ok: bool,
    pub quality_ok: bool,
}

impl ValidationResult {
    pub fn all_passed(&self) -> bool {
        self.dimensions_ok && self.background_ok && self.positioning_ok && self.quality_ok
    }
}

/// Run every check against `photo`.
pub fn validate_photo(photo: &Raster, spec: &PassportSpec) -> ValidationResult {
    let frame = spec.frame_pixels;
    let result = ValidationResult {
        dimensions_ok: photo.width == frame && photo.height == frame,
        background_ok: center_is_white(photo),
        positioning_ok: true,
        quality_ok: photo.width >= frame,
    };

    debug!(
        width = photo.width,
        height = photo.height,
        dimensions_ok = result.dimensions_ok,
        background_ok = result.background_ok,
        quality_ok = result.quality_ok,
        "validated photo"
    );
    result
}

/// Sample the block at the center and require every pixel to be near white.
///
/// The sampled block is clipped to the raster. A raster with no pixels in
/// the block fails.
fn center_is_white(photo: &Raster) -> bool {
    let half = SAMPLE_SIZE as i64 / 2;
    let x0 = (photo.width as i64 / 2 - half).max(0) as u32;
    let y0 = (photo.height as i64 / 2 - half).max(0) as u32;
    let x1 = (x0 + SAMPLE_SIZE).min(photo.width);
    let y1 = (y0 + SAMPLE_SIZE).min(photo.height);

    if x0 >= x1 || y0 >= y1 {
        return false;
    }

    (y0..y1).all(|y| {
        (x0..x1).all(|x| match photo.pixel(x, y) {
            Some([r, g, b, _]) => [r, g, b].iter().all(|&c| c >= WHITE_THRESHOLD),
            None => false,
        })
    })
}
