//! WASM binding for the rotate-then-crop step.

use crate::editor::JsEditor;
use crate::error::to_js_error;
use crate::types::JsRaster;
use passport_core::transform;
use wasm_bindgen::prelude::*;

/// Apply the editor's rotation and crop to `image`.
///
/// The rotated image keeps the source dimensions; the crop is read as
/// percentages of that surface. The result is what gets sent to
/// segmentation.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const edited = apply_edits(source, editor);
/// const foreground = await removeBackground(toBlob(edited));
/// ```
#[wasm_bindgen]
pub fn apply_edits(image: &JsRaster, editor: &JsEditor) -> Result<JsRaster, JsValue> {
    let state = editor.state();
    transform::apply_edits(image.raster(), &state.rotation, &state.crop)
        .map(JsRaster::from_raster)
        .map_err(to_js_error)
}
