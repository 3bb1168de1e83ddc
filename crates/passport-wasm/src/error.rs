//! Conversion of core errors into JavaScript `Error` objects.
//!
//! Every error thrown across the boundary is a JS `Error` whose `message` is
//! the Rust `Display` text and whose `code` property is a stable
//! machine-readable string, so the UI can tell a superseded request apart
//! from a real failure without parsing messages.

use passport_core::compose::CompositionError;
use passport_core::print_sheet::PrintSheetError;
use passport_core::transform::TransformError;
use passport_core::PipelineError;
use wasm_bindgen::prelude::*;

pub(crate) const INVALID_INPUT: &str = "INVALID_INPUT";

/// Create a JS `Error` with a `code` property.
pub(crate) fn make_error(code: &str, message: &str) -> JsValue {
    let err = js_sys::Error::new(message);
    let _ = js_sys::Reflect::set(&err, &"code".into(), &JsValue::from_str(code));
    JsValue::from(err)
}

/// Machine-readable code for a core error.
pub(crate) fn error_code(e: &PipelineError) -> &'static str {
    match e {
        PipelineError::Decode(_) => "DECODE_ERROR",
        PipelineError::Transform(TransformError::InvalidCrop { .. }) => "INVALID_CROP",
        PipelineError::Transform(TransformError::SurfaceUnavailable { .. })
        | PipelineError::Composition(CompositionError::SurfaceUnavailable { .. })
        | PipelineError::PrintSheet(PrintSheetError::SurfaceUnavailable { .. }) => {
            "SURFACE_UNAVAILABLE"
        }
        PipelineError::Composition(_) | PipelineError::PrintSheet(_) => "INVALID_IMAGE",
        PipelineError::Segmentation(_) => "SEGMENTATION_ERROR",
        PipelineError::Encode(_) => "ENCODE_ERROR",
        PipelineError::Superseded => "SUPERSEDED",
    }
}

/// Convert any core stage error into a JS `Error`.
pub(crate) fn to_js_error(e: impl Into<PipelineError>) -> JsValue {
    let e = e.into();
    make_error(error_code(&e), &e.to_string())
}
