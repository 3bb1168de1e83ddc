//! PNG export WASM bindings.

use crate::error::to_js_error;
use crate::types::JsRaster;
use passport_core::config::{PHOTO_FILE_NAME, PRINT_SHEET_FILE_NAME};
use passport_core::encode;
use wasm_bindgen::prelude::*;

/// Encode a raster as PNG bytes for download.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const png = encode_png(photo);
/// const blob = new Blob([png], { type: 'image/png' });
/// ```
#[wasm_bindgen]
pub fn encode_png(image: &JsRaster) -> Result<Vec<u8>, JsValue> {
    encode::encode_png(image.raster()).map_err(to_js_error)
}

/// Suggested download name for a single photo.
#[wasm_bindgen]
pub fn photo_file_name() -> String {
    PHOTO_FILE_NAME.to_string()
}

/// Suggested download name for a print sheet.
#[wasm_bindgen]
pub fn print_sheet_file_name() -> String {
    PRINT_SHEET_FILE_NAME.to_string()
}
