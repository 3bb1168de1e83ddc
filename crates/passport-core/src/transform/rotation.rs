//! Rotation about the image center with bilinear sampling.
//!
//! The output keeps the source dimensions, the same as drawing a rotated
//! image onto a canvas sized to the original. Corners that rotate out of
//! the surface are clipped; areas no source pixel reaches are transparent.
//!
//! # Algorithm
//!
//! Inverse mapping: for each destination pixel center `d`, relative to the
//! surface center `c`, the source position is
//! ```text
//! src_x =  (d_x - c_x) * cos(θ) + (d_y - c_y) * sin(θ) + c_x
//! src_y = -(d_x - c_x) * sin(θ) + (d_y - c_y) * cos(θ) + c_y
//! ```
//! which undoes a clockwise (y-down) rotation by θ.

use crate::geometry::Rotation;
use crate::raster::Raster;

/// Rotate `image` about its center, keeping its dimensions.
pub fn rotate_about_center(image: &Raster, rotation: &Rotation) -> Raster {
    if rotation.is_identity() || image.is_empty() {
        return image.clone();
    }

    let (w, h) = (image.width, image.height);
    let theta = rotation.radians();
    let (sin, cos) = theta.sin_cos();

    let cx = w as f64 / 2.0;
    let cy = h as f64 / 2.0;

    let mut output = vec![0u8; w as usize * h as usize * Raster::CHANNELS];

    for dst_y in 0..h {
        for dst_x in 0..w {
            let dx = dst_x as f64 + 0.5 - cx;
            let dy = dst_y as f64 + 0.5 - cy;

            // Back to pixel-index space (centers at integer coordinates)
            let src_x = dx * cos + dy * sin + cx - 0.5;
            let src_y = -dx * sin + dy * cos + cy - 0.5;

            let dst_idx = (dst_y as usize * w as usize + dst_x as usize) * Raster::CHANNELS;
            output[dst_idx..dst_idx + Raster::CHANNELS]
                .copy_from_slice(&sample_bilinear(image, src_x, src_y));
        }
    }

    Raster::new(w, h, output)
}

#[inline]
fn get_pixel_f64(image: &Raster, px: usize, py: usize) -> [f64; 4] {
    let idx = (py * image.width as usize + px) * Raster::CHANNELS;
    let p = &image.pixels[idx..idx + Raster::CHANNELS];
    [p[0] as f64, p[1] as f64, p[2] as f64, p[3] as f64]
}

/// Sample with bilinear interpolation in premultiplied alpha.
///
/// Points more than half a pixel outside the source are transparent; the
/// half-pixel border reuses the edge pixels.
fn sample_bilinear(image: &Raster, x: f64, y: f64) -> [u8; 4] {
    let (w, h) = (image.width as f64, image.height as f64);
    if !(x >= -0.5 && x <= w - 0.5 && y >= -0.5 && y <= h - 0.5) {
        return [0, 0, 0, 0];
    }

    let max_x = image.width as i64 - 1;
    let max_y = image.height as i64 - 1;

    let (xf, yf) = (x.floor(), y.floor());
    let fx = x - xf;
    let fy = y - yf;
    // Taps outside the raster collapse onto the nearest edge pixel
    let tap = |v: i64, max: i64| v.clamp(0, max) as usize;
    let (x0, x1) = (tap(xf as i64, max_x), tap(xf as i64 + 1, max_x));
    let (y0, y1) = (tap(yf as i64, max_y), tap(yf as i64 + 1, max_y));

    let taps = [
        (get_pixel_f64(image, x0, y0), (1.0 - fx) * (1.0 - fy)),
        (get_pixel_f64(image, x1, y0), fx * (1.0 - fy)),
        (get_pixel_f64(image, x0, y1), (1.0 - fx) * fy),
        (get_pixel_f64(image, x1, y1), fx * fy),
    ];

    let mut premul = [0.0f64; 3];
    let mut alpha = 0.0f64;
    for (px, weight) in taps {
        let a = px[3] / 255.0;
        for c in 0..3 {
            premul[c] += px[c] * a * weight;
        }
        alpha += a * weight;
    }

    if alpha <= f64::EPSILON {
        return [0, 0, 0, 0];
    }

    let mut result = [0u8; 4];
    for c in 0..3 {
        result[c] = (premul[c] / alpha).clamp(0.0, 255.0).round() as u8;
    }
    result[3] = (alpha * 255.0).clamp(0.0, 255.0).round() as u8;
    result
}
