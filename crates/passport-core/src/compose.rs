//! Final composition of the frame-exact passport photo.
//!
//! The segmented foreground is scaled with the fill placement from
//! [`positioning`](crate::positioning) and alpha-composited onto a square
//! surface that is either filled with a solid color or left transparent.

use std::fmt;
use std::str::FromStr;

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::PassportSpec;
use crate::positioning::{optimal_position, PositionError};
use crate::raster::Raster;

/// Largest intermediate buffer (in bytes) the composer will allocate.
const MAX_SURFACE_BYTES: u64 = 1 << 28;

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const WHITE: Rgb = Rgb([0xFF, 0xFF, 0xFF]);

    /// Lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.0;
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }
}

/// Returned for a malformed hex color.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid hex color: {0:?}")]
pub struct ColorParseError(pub String);

impl FromStr for Rgb {
    type Err = ColorParseError;

    /// Accepts `#RRGGBB`, `RRGGBB` and the `#RGB` shorthand.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ColorParseError(s.to_string());
        let trimmed = s.trim();
        let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(err());
        }

        let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| err());
        match hex.len() {
            6 => Ok(Rgb([
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            ])),
            3 => {
                let expand = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
                Ok(Rgb([expand(0)?, expand(1)?, expand(2)?]))
            }
            _ => Err(err()),
        }
    }
}

/// What appears behind the segmented subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "color", rename_all = "kebab-case")]
pub enum BackgroundMode {
    /// Leave the surface transparent; the foreground's own pixels are the
    /// final background.
    Original,
    /// Fill the whole frame before drawing the subject.
    SolidColor(Rgb),
}

impl Default for BackgroundMode {
    fn default() -> Self {
        BackgroundMode::SolidColor(Rgb::WHITE)
    }
}

impl BackgroundMode {
    /// Whether a white-background check on the output means anything.
    ///
    /// Only a near-white fill qualifies; otherwise the validator's
    /// background flag is informational.
    pub fn background_is_representative(&self) -> bool {
        match self {
            BackgroundMode::Original => false,
            BackgroundMode::SolidColor(Rgb(channels)) => channels.iter().all(|&c| c >= 250),
        }
    }

    fn fill(&self) -> Rgba<u8> {
        match self {
            BackgroundMode::Original => Rgba([0, 0, 0, 0]),
            BackgroundMode::SolidColor(Rgb([r, g, b])) => Rgba([*r, *g, *b, 255]),
        }
    }
}

impl FromStr for BackgroundMode {
    type Err = ColorParseError;

    /// An empty string or `original` selects [`BackgroundMode::Original`];
    /// anything else must be a hex color.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("original") {
            return Ok(BackgroundMode::Original);
        }
        trimmed.parse().map(BackgroundMode::SolidColor)
    }
}

impl fmt::Display for BackgroundMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackgroundMode::Original => f.write_str("original"),
            BackgroundMode::SolidColor(rgb) => f.write_str(&rgb.to_hex()),
        }
    }
}

/// Errors from composing the passport photo.
#[derive(Debug, Error)]
pub enum CompositionError {
    /// A drawing surface could not be acquired.
    #[error("Drawing surface unavailable: {width}x{height}")]
    SurfaceUnavailable { width: u64, height: u64 },

    /// The foreground raster's buffer does not match its dimensions.
    #[error("Foreground raster is malformed ({width}x{height}, {len} bytes)")]
    InvalidForeground { width: u32, height: u32, len: usize },

    #[error(transparent)]
    Position(#[from] PositionError),
}

/// Byte size of a `width × height` surface, if it may be allocated.
fn surface_bytes(width: u32, height: u32) -> Result<u64, CompositionError> {
    (width as u64)
        .checked_mul(height as u64)
        .and_then(|n| n.checked_mul(Raster::CHANNELS as u64))
        .filter(|&n| n > 0 && n <= MAX_SURFACE_BYTES)
        .ok_or(CompositionError::SurfaceUnavailable {
            width: width as u64,
            height: height as u64,
        })
}

/// Allocate a `width × height` surface filled with `fill`.
pub(crate) fn acquire_surface(
    width: u32,
    height: u32,
    fill: Rgba<u8>,
) -> Result<RgbaImage, CompositionError> {
    let bytes = surface_bytes(width, height)?;

    let mut buffer = Vec::with_capacity(bytes as usize);
    for _ in 0..bytes / Raster::CHANNELS as u64 {
        buffer.extend_from_slice(&fill.0);
    }
    RgbaImage::from_raw(width, height, buffer).ok_or(CompositionError::SurfaceUnavailable {
        width: width as u64,
        height: height as u64,
    })
}

/// Compose `foreground` into a frame of `spec.frame_pixels` square.
///
/// # Errors
///
/// `CompositionError::SurfaceUnavailable` if the frame or the scaled
/// foreground cannot be allocated, `InvalidForeground` for a malformed
/// raster. Nothing is retried.
pub fn compose_passport(
    foreground: &Raster,
    background: &BackgroundMode,
    spec: &PassportSpec,
    overscan: f64,
) -> Result<Raster, CompositionError> {
    if !foreground.is_well_formed() {
        return Err(CompositionError::InvalidForeground {
            width: foreground.width,
            height: foreground.height,
            len: foreground.pixels.len(),
        });
    }

    let size = spec.frame_pixels;
    let mut surface = acquire_surface(size, size, background.fill())?;

    let placement = optimal_position(
        foreground.width as f64,
        foreground.height as f64,
        size as f64,
        overscan,
    )?;
    let (scaled_w, scaled_h) = placement.scaled_size(foreground.width, foreground.height);
    let (offset_x, offset_y) = placement.pixel_offset();

    debug!(
        scale = placement.scale,
        scaled_w, scaled_h, offset_x, offset_y, "placing foreground"
    );

    // The scaled copy is a second work surface
    surface_bytes(scaled_w, scaled_h)?;

    let source = foreground
        .to_rgba_image()
        .ok_or(CompositionError::InvalidForeground {
            width: foreground.width,
            height: foreground.height,
            len: foreground.pixels.len(),
        })?;
    let scaled = imageops::resize(&source, scaled_w, scaled_h, FilterType::Triangle);
    imageops::overlay(&mut surface, &scaled, offset_x, offset_y);

    info!(frame = size, %background, "composed passport photo");
    Ok(Raster::from_rgba_image(surface))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_OVERSCAN;

    fn gradient(width: u32, height: u32) -> Raster {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&[(x % 256) as u8, (y % 256) as u8, 77, 255]);
            }
        }
        Raster::new(width, height, pixels)
    }

    #[test]
    fn test_output_is_frame_exact() {
        for (w, h) in [(400, 600), (1000, 300), (600, 600), (3, 5)] {
            let out = compose_passport(
                &gradient(w, h),
                &BackgroundMode::default(),
                &PassportSpec::STANDARD,
                DEFAULT_OVERSCAN,
            )
            .unwrap();
            assert_eq!((out.width, out.height), (600, 600), "source {}x{}", w, h);
        }
    }

    #[test]
    fn test_original_mode_border_matches_scaled_foreground() {
        let fg = gradient(400, 600);
        let out = compose_passport(
            &fg,
            &BackgroundMode::Original,
            &PassportSpec::STANDARD,
            DEFAULT_OVERSCAN,
        )
        .unwrap();

        // 400x600 at 1.65 is 660x990 drawn at (-30, -195)
        let scaled = imageops::resize(
            &fg.to_rgba_image().unwrap(),
            660,
            990,
            FilterType::Triangle,
        );
        for (x, y) in [(0, 0), (599, 0), (0, 599), (599, 599), (300, 0), (0, 300)] {
            assert_eq!(
                out.pixel(x, y),
                Some(scaled.get_pixel(x + 30, y + 195).0),
                "pixel ({}, {})",
                x,
                y
            );
        }
    }

    #[test]
    fn test_transparent_foreground_shows_solid_fill() {
        let fg = Raster::filled(300, 300, [10, 10, 10, 0]);
        let bg = BackgroundMode::SolidColor(Rgb([0, 0, 255]));

        let out = compose_passport(&fg, &bg, &PassportSpec::STANDARD, 1.0).unwrap();
        assert_eq!(out.pixel(300, 300), Some([0, 0, 255, 255]));
    }

    #[test]
    fn test_transparent_foreground_in_original_mode_stays_transparent() {
        let fg = Raster::filled(300, 300, [10, 10, 10, 0]);
        let out =
            compose_passport(&fg, &BackgroundMode::Original, &PassportSpec::STANDARD, 1.0)
                .unwrap();
        assert_eq!(out.pixel(0, 0).map(|p| p[3]), Some(0));
    }

    #[test]
    fn test_malformed_foreground() {
        let fg = Raster {
            width: 10,
            height: 10,
            pixels: vec![0; 7],
        };
        let err = compose_passport(&fg, &BackgroundMode::default(), &PassportSpec::STANDARD, 1.1)
            .unwrap_err();
        assert!(matches!(err, CompositionError::InvalidForeground { .. }));
    }

    #[test]
    fn test_extreme_aspect_is_surface_error() {
        // 1x40000 filling a 600 frame would need a 600x24M intermediate
        let fg = Raster::filled(1, 40_000, [0, 0, 0, 255]);
        let err = compose_passport(&fg, &BackgroundMode::default(), &PassportSpec::STANDARD, 1.0)
            .unwrap_err();
        assert!(matches!(err, CompositionError::SurfaceUnavailable { .. }));
    }

    #[test]
    fn test_bad_overscan_propagates() {
        let err = compose_passport(
            &gradient(10, 10),
            &BackgroundMode::default(),
            &PassportSpec::STANDARD,
            0.5,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CompositionError::Position(PositionError::InvalidOverscan(_))
        ));
    }

    #[test]
    fn test_hex_parsing() {
        assert_eq!("#FFFFFF".parse::<Rgb>(), Ok(Rgb::WHITE));
        assert_eq!("1a2B3c".parse::<Rgb>(), Ok(Rgb([0x1a, 0x2b, 0x3c])));
        assert_eq!("#0f8".parse::<Rgb>(), Ok(Rgb([0x00, 0xff, 0x88])));
        assert!("#12345".parse::<Rgb>().is_err());
        assert!("#gg0000".parse::<Rgb>().is_err());
        assert!("#ééé".parse::<Rgb>().is_err());
    }

    #[test]
    fn test_hex_rejects_signs_and_repeated_hash() {
        assert!("#+f+f+f".parse::<Rgb>().is_err());
        assert!("+fffff".parse::<Rgb>().is_err());
        assert!("##fff".parse::<Rgb>().is_err());
        assert!("#".parse::<Rgb>().is_err());
    }

    #[test]
    fn test_background_mode_parsing_and_display() {
        assert_eq!("".parse::<BackgroundMode>(), Ok(BackgroundMode::Original));
        assert_eq!(
            "Original".parse::<BackgroundMode>(),
            Ok(BackgroundMode::Original)
        );
        let mode: BackgroundMode = crate::config::DEFAULT_BACKGROUND_HEX.parse().unwrap();
        assert_eq!(mode, BackgroundMode::default());
        assert_eq!(mode.to_string(), "#ffffff");
    }

    #[test]
    fn test_background_representativeness() {
        assert!(BackgroundMode::default().background_is_representative());
        assert!(BackgroundMode::SolidColor(Rgb([250, 251, 255])).background_is_representative());
        assert!(!BackgroundMode::SolidColor(Rgb([200, 220, 255])).background_is_representative());
        assert!(!BackgroundMode::Original.background_is_representative());
    }
}
