//! WASM-compatible wrapper for RGBA rasters.

use passport_core::raster::Raster;
use wasm_bindgen::prelude::*;

use crate::error::{make_error, INVALID_INPUT};

/// An RGBA raster held in WASM memory.
///
/// The layout matches `ImageData.data` on a 2D canvas: 4 bytes per pixel,
/// row-major, so `new ImageData(new Uint8ClampedArray(r.pixels()), r.width)`
/// displays it directly.
#[wasm_bindgen]
pub struct JsRaster {
    inner: Raster,
}

#[wasm_bindgen]
impl JsRaster {
    /// Wrap RGBA pixels, e.g. the output of the segmentation call.
    ///
    /// Fails if `pixels.length != width * height * 4`.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<JsRaster, JsValue> {
        let inner = Raster {
            width,
            height,
            pixels,
        };
        if !inner.is_well_formed() {
            return Err(make_error(
                INVALID_INPUT,
                &format!(
                    "expected {} bytes for a {}x{} RGBA raster, got {}",
                    width as u64 * height as u64 * 4,
                    width,
                    height,
                    inner.pixels.len()
                ),
            ));
        }
        Ok(JsRaster { inner })
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.pixels.len()
    }

    /// Returns RGBA pixel data as Uint8Array.
    ///
    /// Note: This creates a copy of the pixel data.
    pub fn pixels(&self) -> Vec<u8> {
        self.inner.pixels.clone()
    }
}

impl JsRaster {
    pub(crate) fn from_raster(inner: Raster) -> Self {
        Self { inner }
    }

    pub(crate) fn raster(&self) -> &Raster {
        &self.inner
    }
}
