//! WASM bindings for the printable sheet.

use crate::error::{make_error, to_js_error, INVALID_INPUT};
use crate::types::JsRaster;
use passport_core::config::PrintSheetSpec;
use passport_core::print_sheet::{self, SheetLayout};
use wasm_bindgen::prelude::*;

/// Tile `photo` onto a 4×6 inch sheet at 300 DPI with dashed cut guides.
#[wasm_bindgen]
pub fn render_print_sheet(photo: &JsRaster) -> Result<JsRaster, JsValue> {
    print_sheet::render_print_sheet(photo.raster(), &PrintSheetSpec::default())
        .map(JsRaster::from_raster)
        .map_err(to_js_error)
}

/// Tile and cut-guide geometry of the standard sheet, for previews.
#[wasm_bindgen]
pub fn print_sheet_layout() -> Result<JsValue, JsValue> {
    let layout = SheetLayout::compute(&PrintSheetSpec::default());
    serde_wasm_bindgen::to_value(&layout).map_err(|e| make_error(INVALID_INPUT, &e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use passport_core::raster::Raster;

    #[test]
    fn test_render_standard_sheet() {
        let photo = JsRaster::from_raster(Raster::filled(600, 600, [0, 0, 0, 255]));
        let sheet = render_print_sheet(&photo).unwrap();
        assert_eq!((sheet.width(), sheet.height()), (1200, 1800));
    }
}
