//! Passport WASM - WebAssembly bindings for Passport Studio
//!
//! This crate exposes the passport-core engine to the browser front-end.
//! The front-end keeps the background-removal call and the UI; everything
//! geometric happens here.
//!
//! # Module Structure
//!
//! - `types` - `JsRaster`, the RGBA image wrapper
//! - `decode` / `encode` - upload decoding and PNG export
//! - `editor` - `JsEditor`, the crop/rotation editor state
//! - `transform` - rotate-then-crop
//! - `compose` - frame composition and validation
//! - `print_sheet` - printable sheet rendering
//! - `request` - `JsRequestTracker` for discarding stale segmentation results
//!
//! # Usage
//!
//! ```typescript
//! import init, { decode_image, JsEditor, apply_edits, compose_passport } from '@passport-studio/wasm';
//!
//! await init();
//!
//! const source = decode_image(new Uint8Array(await file.arrayBuffer()));
//! const editor = new JsEditor();
//! const edited = apply_edits(source, editor);
//! // ... segmentation in JS, wrap the result in `new JsRaster(w, h, rgba)` ...
//! const photo = compose_passport(foreground, '#FFFFFF');
//! ```

use wasm_bindgen::prelude::*;

mod compose;
mod decode;
mod editor;
mod encode;
mod error;
mod print_sheet;
mod request;
mod transform;
mod types;

// Re-export public types
pub use compose::{compose_passport, default_background_hex, validate_photo};
pub use decode::decode_image;
pub use editor::JsEditor;
pub use encode::{encode_png, photo_file_name, print_sheet_file_name};
pub use print_sheet::{print_sheet_layout, render_print_sheet};
pub use request::{JsRequestToken, JsRequestTracker};
pub use transform::apply_edits;
pub use types::JsRaster;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
