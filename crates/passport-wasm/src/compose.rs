//! WASM bindings for composing and checking the passport photo.
//!
//! Background removal runs in JavaScript. Its RGBA output is wrapped in a
//! [`JsRaster`] and handed to [`compose_passport`].

use crate::error::{make_error, to_js_error, INVALID_INPUT};
use crate::types::JsRaster;
use passport_core::compose::{self, BackgroundMode};
use passport_core::config::{PassportSpec, DEFAULT_OVERSCAN};
use passport_core::validate;
use wasm_bindgen::prelude::*;

/// Compose `foreground` into the standard 600×600 frame.
///
/// `background_hex` is `#RRGGBB`, `RRGGBB` or `#RGB`. An empty string keeps
/// the foreground's own pixels as the background.
///
/// # Errors
///
/// Throws with code `INVALID_INPUT` for a malformed color and
/// `SURFACE_UNAVAILABLE` when the frame cannot be allocated.
#[wasm_bindgen]
pub fn compose_passport(foreground: &JsRaster, background_hex: &str) -> Result<JsRaster, JsValue> {
    let background: BackgroundMode = background_hex
        .parse()
        .map_err(|e: compose::ColorParseError| make_error(INVALID_INPUT, &e.to_string()))?;

    compose::compose_passport(
        foreground.raster(),
        &background,
        &PassportSpec::STANDARD,
        DEFAULT_OVERSCAN,
    )
    .map(JsRaster::from_raster)
    .map_err(to_js_error)
}

/// Check a composed photo.
///
/// Returns `{ dimensionsOk, backgroundOk, positioningOk, qualityOk }`.
#[wasm_bindgen]
pub fn validate_photo(photo: &JsRaster) -> Result<JsValue, JsValue> {
    let result = validate::validate_photo(photo.raster(), &PassportSpec::STANDARD);
    serde_wasm_bindgen::to_value(&result).map_err(|e| make_error(INVALID_INPUT, &e.to_string()))
}

/// Default background color for the color picker.
#[wasm_bindgen]
pub fn default_background_hex() -> String {
    passport_core::config::DEFAULT_BACKGROUND_HEX.to_string()
}
