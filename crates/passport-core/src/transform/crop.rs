//! Percent-based cropping.
//!
//! The crop rectangle is read against the surface it is applied to:
//! `x = round(x% × width)`, `w = round(width% × width)`, and likewise for
//! the vertical axis. The output is always exactly `w × h` pixels. Any part
//! of the rectangle lying outside the surface is transparent, which can
//! happen when a handle has grown the rect past the container edge.

use super::TransformError;
use crate::geometry::CropRect;
use crate::raster::Raster;

/// Largest surface edge we are willing to allocate.
const MAX_EDGE: i64 = 1 << 15;

/// Crop `image` to a rectangle given in percent of its dimensions.
///
/// # Errors
///
/// `TransformError::InvalidCrop` when the pixel width or height rounds to
/// zero (or below) or any field is not finite.
pub fn crop_percent(image: &Raster, rect: &CropRect) -> Result<Raster, TransformError> {
    if rect.is_full() {
        return Ok(image.clone());
    }

    let to_px = |percent: f64, extent: u32| (percent / 100.0 * extent as f64).round();

    let fields = [
        to_px(rect.x, image.width),
        to_px(rect.y, image.height),
        to_px(rect.width, image.width),
        to_px(rect.height, image.height),
    ];
    if fields.iter().any(|v| !v.is_finite()) {
        return Err(TransformError::InvalidCrop {
            rect: *rect,
            width: 0,
            height: 0,
        });
    }
    let [px_left, px_top, px_width, px_height] = fields.map(|v| v as i64);

    if px_width <= 0 || px_height <= 0 {
        return Err(TransformError::InvalidCrop {
            rect: *rect,
            width: px_width,
            height: px_height,
        });
    }
    if px_width > MAX_EDGE || px_height > MAX_EDGE {
        return Err(TransformError::SurfaceUnavailable {
            width: px_width,
            height: px_height,
        });
    }

    let out_width = px_width as usize;
    let out_height = px_height as usize;
    let mut output = vec![0u8; out_width * out_height * Raster::CHANNELS];

    // Horizontal overlap with the source, in output coordinates. The origin
    // may be arbitrarily far off the surface.
    let copy_start = 0i64.saturating_sub(px_left).clamp(0, px_width) as usize;
    let copy_end = (image.width as i64).saturating_sub(px_left).clamp(0, px_width) as usize;

    if copy_start < copy_end {
        let src_x = (px_left + copy_start as i64) as usize;
        let span = (copy_end - copy_start) * Raster::CHANNELS;

        for y in 0..out_height {
            let src_y = px_top.saturating_add(y as i64);
            if src_y < 0 || src_y >= image.height as i64 {
                continue;
            }
            let src_idx = (src_y as usize * image.width as usize + src_x) * Raster::CHANNELS;
            let dst_idx = (y * out_width + copy_start) * Raster::CHANNELS;
            output[dst_idx..dst_idx + span].copy_from_slice(&image.pixels[src_idx..src_idx + span]);
        }
    }

    Ok(Raster::new(px_width as u32, px_height as u32, output))
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: output dimensions equal the rounded percent of the input.
        #[test]
        fn prop_output_is_exact_rounded_size(
            (width, height) in (4u32..=120, 4u32..=120),
            x in 0.0f64..=80.0,
            y in 0.0f64..=80.0,
            w in 20.0f64..=100.0,
            h in 20.0f64..=100.0,
        ) {
            let img = Raster::filled(width, height, [1, 1, 1, 255]);
            let rect = CropRect::new(x, y, w, h);
            let result = crop_percent(&img, &rect).unwrap();

            prop_assert_eq!(result.width, (w / 100.0 * width as f64).round() as u32);
            prop_assert_eq!(result.height, (h / 100.0 * height as f64).round() as u32);
            prop_assert_eq!(result.pixels.len(), (result.width * result.height * 4) as usize);
        }

        /// Property: cropping is deterministic.
        #[test]
        fn prop_crop_is_deterministic(
            (width, height) in (4u32..=60, 4u32..=60),
            x in 0.0f64..=50.0,
            w in 20.0f64..=50.0,
        ) {
            let img = Raster::filled(width, height, [9, 9, 9, 255]);
            let rect = CropRect::new(x, x, w, w);
            prop_assert_eq!(crop_percent(&img, &rect), crop_percent(&img, &rect));
        }
    }
}
