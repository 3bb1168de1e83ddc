#![cfg(target_arch = "wasm32")]

use passport_core::encode::encode_png as core_encode_png;
use passport_core::raster::Raster;
use passport_wasm::{
    apply_edits, compose_passport, decode_image, encode_png, print_sheet_layout,
    render_print_sheet, validate_photo, JsEditor, JsRaster, JsRequestTracker,
};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

fn make_test_png(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    core_encode_png(&Raster::filled(width, height, rgba)).unwrap()
}

fn error_code(err: &JsValue) -> String {
    js_sys::Reflect::get(err, &"code".into())
        .unwrap()
        .as_string()
        .unwrap()
}

fn flag(obj: &JsValue, name: &str) -> bool {
    js_sys::Reflect::get(obj, &name.into())
        .unwrap()
        .as_bool()
        .unwrap()
}

#[wasm_bindgen_test]
fn full_flow_with_synthetic_png() {
    let source = decode_image(&make_test_png(400, 600, [255, 255, 255, 255])).unwrap();
    let editor = JsEditor::new(None);
    let edited = apply_edits(&source, &editor).unwrap();

    let photo = compose_passport(&edited, "#FFFFFF").unwrap();
    assert_eq!((photo.width(), photo.height()), (600, 600));

    let result = validate_photo(&photo).unwrap();
    assert!(flag(&result, "dimensionsOk"));
    assert!(flag(&result, "backgroundOk"));
    assert!(flag(&result, "positioningOk"));
    assert!(flag(&result, "qualityOk"));

    let sheet = render_print_sheet(&photo).unwrap();
    let png = encode_png(&sheet).unwrap();
    assert_eq!(&png[..4], &[0x89, b'P', b'N', b'G']);
}

#[wasm_bindgen_test]
fn decode_garbage_has_error_code() {
    let err = decode_image(b"definitely not an image").err().unwrap();
    assert_eq!(error_code(&err), "DECODE_ERROR");
}

#[wasm_bindgen_test]
fn malformed_raster_rejected() {
    let err = JsRaster::new(10, 10, vec![0; 7]).err().unwrap();
    assert_eq!(error_code(&err), "INVALID_INPUT");
}

#[wasm_bindgen_test]
fn bad_color_and_handle_rejected() {
    let fg = JsRaster::new(2, 2, vec![0; 16]).unwrap();
    let err = compose_passport(&fg, "#GGGGGG").err().unwrap();
    assert_eq!(error_code(&err), "INVALID_INPUT");

    let mut editor = JsEditor::new(None);
    let err = editor.begin_drag("middle", 0.0, 0.0).err().unwrap();
    assert_eq!(error_code(&err), "INVALID_INPUT");
}

#[wasm_bindgen_test]
fn layout_exposes_three_cut_lines() {
    let layout = print_sheet_layout().unwrap();
    let lines = js_sys::Reflect::get(&layout, &"cut_lines".into()).unwrap();
    assert_eq!(js_sys::Array::from(&lines).length(), 3);
}

#[wasm_bindgen_test]
fn stale_request_is_not_current() {
    let mut tracker = JsRequestTracker::new();
    let stale = tracker.begin();
    let fresh = tracker.begin();
    assert!(!stale.is_current());
    assert!(fresh.is_current());
}
