//! Tiling a composed photo onto a printable sheet.
//!
//! The sheet holds a fixed `columns × rows` grid of frame-sized tiles,
//! centered on the page. Cut guides are drawn only on the boundaries
//! between tiles, never around the outside of the grid:
//!
//! ```text
//!   +------+------+
//!   |      :      |
//!   |......:......|   2 × 3 grid: one vertical guide,
//!   |      :      |   two horizontal guides
//!   |......:......|
//!   |      :      |
//!   +------+------+
//! ```

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::compose::acquire_surface;
use crate::config::{CutLineStyle, PrintSheetSpec};
use crate::raster::Raster;

/// Errors from rendering a print sheet.
#[derive(Debug, Error)]
pub enum PrintSheetError {
    /// The photo raster could not be read.
    #[error("Photo raster is malformed ({width}x{height}, {len} bytes)")]
    InvalidPhoto { width: u32, height: u32, len: usize },

    /// The page surface could not be allocated.
    #[error("Drawing surface unavailable: {width}x{height}")]
    SurfaceUnavailable { width: u32, height: u32 },
}

/// Placement of one photo on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRect {
    pub column: u32,
    pub row: u32,
    pub x: i64,
    pub y: i64,
    pub size: u32,
}

/// A cut guide on an internal tile boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "orientation", rename_all = "lowercase")]
pub enum CutLine {
    Vertical { x: i64, y_start: i64, y_end: i64 },
    Horizontal { y: i64, x_start: i64, x_end: i64 },
}

/// Pixel geometry of a print sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetLayout {
    pub page_width: u32,
    pub page_height: u32,
    /// Top-left corner of the grid; negative if the grid exceeds the page.
    pub grid_origin: (i64, i64),
    /// Tiles in row-major order.
    pub tiles: Vec<TileRect>,
    pub cut_lines: Vec<CutLine>,
}

impl SheetLayout {
    pub fn compute(spec: &PrintSheetSpec) -> Self {
        let (grid_w, grid_h) = spec.grid_size();
        let tile = spec.tile_px as i64;

        let origin_x = (spec.page_width_px as i64 - grid_w as i64).div_euclid(2);
        let origin_y = (spec.page_height_px as i64 - grid_h as i64).div_euclid(2);

        let tiles = (0..spec.rows)
            .flat_map(|row| {
                (0..spec.columns).map(move |column| TileRect {
                    column,
                    row,
                    x: origin_x + column as i64 * tile,
                    y: origin_y + row as i64 * tile,
                    size: spec.tile_px,
                })
            })
            .collect();

        let vertical = (1..spec.columns).map(|column| CutLine::Vertical {
            x: origin_x + column as i64 * tile,
            y_start: origin_y,
            y_end: origin_y + grid_h as i64,
        });
        let horizontal = (1..spec.rows).map(|row| CutLine::Horizontal {
            y: origin_y + row as i64 * tile,
            x_start: origin_x,
            x_end: origin_x + grid_w as i64,
        });

        Self {
            page_width: spec.page_width_px,
            page_height: spec.page_height_px,
            grid_origin: (origin_x, origin_y),
            tiles,
            cut_lines: vertical.chain(horizontal).collect(),
        }
    }
}

/// Render `photo` into every tile of a white page and draw the cut guides.
///
/// A photo whose size differs from the tile is resampled to fit the tile.
pub fn render_print_sheet(photo: &Raster, spec: &PrintSheetSpec) -> Result<Raster, PrintSheetError> {
    let invalid = || PrintSheetError::InvalidPhoto {
        width: photo.width,
        height: photo.height,
        len: photo.pixels.len(),
    };
    if !photo.is_well_formed() {
        return Err(invalid());
    }
    let mut tile = photo.to_rgba_image().ok_or_else(invalid)?;
    if tile.dimensions() != (spec.tile_px, spec.tile_px) {
        tile = imageops::resize(&tile, spec.tile_px, spec.tile_px, FilterType::Triangle);
    }

    let mut page = acquire_surface(
        spec.page_width_px,
        spec.page_height_px,
        Rgba([255, 255, 255, 255]),
    )
    .map_err(|_| PrintSheetError::SurfaceUnavailable {
        width: spec.page_width_px,
        height: spec.page_height_px,
    })?;

    let layout = SheetLayout::compute(spec);
    for placed in &layout.tiles {
        imageops::overlay(&mut page, &tile, placed.x, placed.y);
    }
    for line in &layout.cut_lines {
        draw_cut_line(&mut page, line, &spec.cut_line);
    }

    debug!(
        tiles = layout.tiles.len(),
        cut_lines = layout.cut_lines.len(),
        width = spec.page_width_px,
        height = spec.page_height_px,
        "rendered print sheet"
    );
    Ok(Raster::from_rgba_image(page))
}

/// Dash segments `(start, length)` covering `start..end`.
fn dash_segments(start: i64, end: i64, style: &CutLineStyle) -> Vec<(i64, u32)> {
    if end <= start {
        return Vec::new();
    }
    if style.dash_px == 0 {
        return vec![(start, (end - start) as u32)];
    }

    let period = style.dash_px as i64 + style.gap_px as i64;
    let mut segments = Vec::new();
    let mut pos = start;
    while pos < end {
        let len = (style.dash_px as i64).min(end - pos);
        segments.push((pos, len as u32));
        pos += period;
    }
    segments
}

fn draw_cut_line(page: &mut RgbaImage, line: &CutLine, style: &CutLineStyle) {
    if style.width_px == 0 {
        return;
    }
    let [r, g, b] = style.color;
    let color = Rgba([r, g, b, 255]);
    let half = (style.width_px / 2) as i64;

    match *line {
        CutLine::Vertical { x, y_start, y_end } => {
            for (y, len) in dash_segments(y_start, y_end, style) {
                let rect = Rect::at((x - half) as i32, y as i32).of_size(style.width_px, len);
                draw_filled_rect_mut(page, rect, color);
            }
        }
        CutLine::Horizontal { y, x_start, x_end } => {
            for (x, len) in dash_segments(x_start, x_end, style) {
                let rect = Rect::at(x as i32, (y - half) as i32).of_size(len, style.width_px);
                draw_filled_rect_mut(page, rect, color);
            }
        }
    }
}
