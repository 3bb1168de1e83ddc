//! Compile-time configuration for the passport frame and the print sheet.
//!
//! Every size in the pipeline derives from [`DPI`]. The frame is a 2×2 inch
//! square and the print sheet is a 4×6 inch page, so at 300 DPI a passport
//! photo is 600×600 px and the sheet is 1200×1800 px.
//!
//! None of these values are user-editable.

use serde::{Deserialize, Serialize};

/// Dots per inch shared by the frame and the print sheet.
pub const DPI: u32 = 300;

/// Physical frame edge in inches (USA and India both use 2×2).
pub const FRAME_INCHES: u32 = 2;

/// Edge length of the square output frame in pixels.
pub const FRAME_PIXELS: u32 = FRAME_INCHES * DPI;

/// Multiplier applied on top of the minimum fill scale.
pub const DEFAULT_OVERSCAN: f64 = 1.10;

/// Smallest crop width/height, as a percentage of the container.
pub const MIN_CROP_PERCENT: f64 = 20.0;

/// Print grid columns.
pub const PRINT_COLUMNS: u32 = 2;

/// Print grid rows.
pub const PRINT_ROWS: u32 = 3;

pub const PAGE_WIDTH_INCHES: u32 = 4;
pub const PAGE_HEIGHT_INCHES: u32 = 6;

/// Background used when the user has not picked one.
pub const DEFAULT_BACKGROUND_HEX: &str = "#FFFFFF";

/// Number of history entries kept before the oldest is evicted.
pub const HISTORY_CAPACITY: usize = 10;

/// Download name of the single composed photo.
pub const PHOTO_FILE_NAME: &str = "passport-photo.png";

/// Download name of the printable sheet.
pub const PRINT_SHEET_FILE_NAME: &str = "passport-photos-printable.png";

/// Head and eye-level targets for a compliant portrait.
///
/// These record the compliance policy only. Nothing in the engine measures
/// the subject against them; they become useful once a face-detection
/// collaborator exists.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeadPolicy {
    /// Minimum head height in pixels (0.8 in).
    pub min_head_px: u32,
    /// Maximum head height in pixels (1.3 in).
    pub max_head_px: u32,
    /// Target head height in pixels (1.1 in).
    pub target_head_px: u32,
    /// Eye line distance from the bottom edge in pixels (1.25 in).
    pub eye_level_from_bottom_px: u32,
    /// Head height as a fraction of the frame: minimum.
    pub min_head_ratio: f64,
    /// Head height as a fraction of the frame: target.
    pub target_head_ratio: f64,
    /// Head height as a fraction of the frame: maximum.
    pub max_head_ratio: f64,
}

/// The fixed square output frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PassportSpec {
    /// Edge length of the square frame in pixels.
    pub frame_pixels: u32,
    /// Resolution the frame was derived from.
    pub dpi: u32,
    pub head: HeadPolicy,
}

impl PassportSpec {
    /// The 2×2 inch, 300 DPI frame used everywhere in the pipeline.
    pub const STANDARD: PassportSpec = PassportSpec::standard();

    pub const fn standard() -> Self {
        Self {
            frame_pixels: FRAME_PIXELS,
            dpi: DPI,
            head: HeadPolicy {
                min_head_px: DPI * 8 / 10,
                max_head_px: DPI * 13 / 10,
                target_head_px: DPI * 11 / 10,
                eye_level_from_bottom_px: DPI * 5 / 4,
                min_head_ratio: 0.50,
                target_head_ratio: 0.65,
                max_head_ratio: 0.75,
            },
        }
    }
}

impl Default for PassportSpec {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Stroke used for the cut guides on a print sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CutLineStyle {
    /// RGB stroke color.
    pub color: [u8; 3],
    /// Stroke thickness in pixels, centered on the tile boundary.
    pub width_px: u32,
    /// Length of each dash. Zero draws a solid line.
    pub dash_px: u32,
    /// Gap between dashes.
    pub gap_px: u32,
}

impl Default for CutLineStyle {
    fn default() -> Self {
        Self {
            color: [0xCC, 0xCC, 0xCC],
            width_px: 1,
            dash_px: 10,
            gap_px: 5,
        }
    }
}

/// Derived layout constants for the printable sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintSheetSpec {
    pub page_width_px: u32,
    pub page_height_px: u32,
    /// Edge of one square tile; always equal to the frame size.
    pub tile_px: u32,
    pub columns: u32,
    pub rows: u32,
    pub cut_line: CutLineStyle,
}

impl PrintSheetSpec {
    /// A 4×6 inch sheet at the same DPI as `passport`.
    pub fn for_passport(passport: &PassportSpec) -> Self {
        Self {
            page_width_px: PAGE_WIDTH_INCHES * passport.dpi,
            page_height_px: PAGE_HEIGHT_INCHES * passport.dpi,
            tile_px: passport.frame_pixels,
            columns: PRINT_COLUMNS,
            rows: PRINT_ROWS,
            cut_line: CutLineStyle::default(),
        }
    }

    /// Total grid size in pixels, `(width, height)`.
    pub fn grid_size(&self) -> (u32, u32) {
        (self.columns * self.tile_px, self.rows * self.tile_px)
    }
}

impl Default for PrintSheetSpec {
    fn default() -> Self {
        Self::for_passport(&PassportSpec::STANDARD)
    }
}
