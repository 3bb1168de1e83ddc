//! Image decoding WASM bindings.
//!
//! # Example
//!
//! ```typescript
//! import { decode_image } from '@passport-studio/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const source = decode_image(bytes);
//! console.log(`Decoded ${source.width}x${source.height}`);
//! ```

use crate::error::to_js_error;
use crate::types::JsRaster;
use passport_core::decode;
use wasm_bindgen::prelude::*;

/// Decode a JPEG, PNG or WebP upload into an RGBA raster.
///
/// EXIF orientation is applied, so the result matches what the browser
/// shows for the same file.
///
/// # Errors
///
/// Throws an `Error` with code `DECODE_ERROR` for unsupported, corrupted or
/// empty input.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsRaster, JsValue> {
    decode::decode_image(bytes)
        .map(JsRaster::from_raster)
        .map_err(to_js_error)
}
