//! WASM bindings for the crop/rotation editor.
//!
//! `JsEditor` owns the [`EditorState`] so that the UI holds exactly one
//! mutable reference to it. Pointer coordinates are passed in percent of
//! the editor container; use the `_px` variants to pass raw pixels plus the
//! container size.
//!
//! # Example (TypeScript)
//!
//! ```typescript
//! const editor = new JsEditor();
//! el.onpointerdown = (e) => editor.begin_drag_px('bottom-right', e.offsetX, e.offsetY, w, h);
//! document.onpointermove = (e) => { editor.drag_to_px(e.offsetX, e.offsetY, w, h); redraw(editor.crop()); };
//! document.onpointerup = () => editor.end_drag();
//! ```

use passport_core::editor::{ClampPolicy, CropField, EditorState, Handle, PointerPosition};
use passport_core::geometry::RotateDirection;
use wasm_bindgen::prelude::*;

use crate::error::{make_error, INVALID_INPUT};

fn parse_handle(name: &str) -> Result<Handle, JsValue> {
    name.parse::<Handle>()
        .map_err(|e| make_error(INVALID_INPUT, &e.to_string()))
}

fn crop_field(name: &str) -> Option<CropField> {
    match name {
        "x" => Some(CropField::X),
        "y" => Some(CropField::Y),
        "width" => Some(CropField::Width),
        "height" => Some(CropField::Height),
        _ => None,
    }
}

fn direction(name: &str) -> Option<RotateDirection> {
    match name {
        "left" => Some(RotateDirection::Left),
        "right" => Some(RotateDirection::Right),
        _ => None,
    }
}

/// Interactive editor state for one source image.
#[wasm_bindgen]
#[derive(Default)]
pub struct JsEditor {
    state: EditorState,
}

#[wasm_bindgen]
impl JsEditor {
    /// Create an editor. `contained` selects the clamp policy that keeps
    /// the rectangle inside the image for every handle.
    #[wasm_bindgen(constructor)]
    pub fn new(contained: Option<bool>) -> JsEditor {
        let policy = if contained.unwrap_or(false) {
            ClampPolicy::Contained
        } else {
            ClampPolicy::PerHandle
        };
        JsEditor {
            state: EditorState::with_clamp_policy(policy),
        }
    }

    /// Reset rotation and crop for a freshly loaded image.
    pub fn load_new_image(&mut self) {
        self.update(EditorState::load_new_image);
    }

    pub fn begin_drag(&mut self, handle: &str, x: f64, y: f64) -> Result<(), JsValue> {
        let handle = parse_handle(handle)?;
        self.update(|s| s.begin_drag(handle, PointerPosition::new(x, y)));
        Ok(())
    }

    pub fn begin_drag_px(
        &mut self,
        handle: &str,
        px: f64,
        py: f64,
        container_width: f64,
        container_height: f64,
    ) -> Result<(), JsValue> {
        let handle = parse_handle(handle)?;
        let pointer = PointerPosition::from_pixels(px, py, container_width, container_height);
        self.update(|s| s.begin_drag(handle, pointer));
        Ok(())
    }

    pub fn drag_to(&mut self, x: f64, y: f64) {
        self.update(|s| s.drag_to(PointerPosition::new(x, y)));
    }

    pub fn drag_to_px(&mut self, px: f64, py: f64, container_width: f64, container_height: f64) {
        let pointer = PointerPosition::from_pixels(px, py, container_width, container_height);
        self.update(|s| s.drag_to(pointer));
    }

    pub fn end_drag(&mut self) {
        self.update(EditorState::end_drag);
    }

    #[wasm_bindgen(getter)]
    pub fn is_dragging(&self) -> bool {
        self.state.is_dragging()
    }

    /// Rotate by 90 degrees, `"left"` or `"right"`.
    pub fn rotate_quarter(&mut self, dir: &str) -> Result<(), JsValue> {
        let dir = self.parse_direction(dir)?;
        self.update(|s| s.rotate_quarter(dir));
        Ok(())
    }

    /// Fine-tune by one degree, `"left"` or `"right"`.
    pub fn nudge_rotation(&mut self, dir: &str) -> Result<(), JsValue> {
        let dir = self.parse_direction(dir)?;
        self.update(|s| s.nudge_rotation(dir));
        Ok(())
    }

    pub fn set_rotation(&mut self, degrees: f64) {
        self.update(|s| s.set_rotation(degrees));
    }

    /// Set one crop field (`x`, `y`, `width`, `height`) from the numeric
    /// inputs. Values are clamped to their valid range.
    pub fn set_crop_field(&mut self, field: &str, value: f64) -> Result<(), JsValue> {
        let field = crop_field(field)
            .ok_or_else(|| make_error(INVALID_INPUT, &format!("unknown crop field: {field}")))?;
        self.update(|s| s.set_crop_field(field, value));
        Ok(())
    }

    pub fn reset_edits(&mut self) {
        self.update(EditorState::reset_edits);
    }

    #[wasm_bindgen(getter)]
    pub fn is_pristine(&self) -> bool {
        self.state.is_pristine()
    }

    #[wasm_bindgen(getter)]
    pub fn rotation(&self) -> f64 {
        self.state.rotation.degrees()
    }

    #[wasm_bindgen(getter)]
    pub fn crop_x(&self) -> f64 {
        self.state.crop.x
    }

    #[wasm_bindgen(getter)]
    pub fn crop_y(&self) -> f64 {
        self.state.crop.y
    }

    #[wasm_bindgen(getter)]
    pub fn crop_width(&self) -> f64 {
        self.state.crop.width
    }

    #[wasm_bindgen(getter)]
    pub fn crop_height(&self) -> f64 {
        self.state.crop.height
    }

    /// The crop rectangle as `{ x, y, width, height }`.
    pub fn crop(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.state.crop)
            .map_err(|e| make_error(INVALID_INPUT, &e.to_string()))
    }
}

impl JsEditor {
    pub(crate) fn state(&self) -> &EditorState {
        &self.state
    }

    fn update(&mut self, transition: impl FnOnce(EditorState) -> EditorState) {
        self.state = transition(std::mem::take(&mut self.state));
    }

    fn parse_direction(&self, dir: &str) -> Result<RotateDirection, JsValue> {
        direction(dir)
            .ok_or_else(|| make_error(INVALID_INPUT, &format!("unknown direction: {dir}")))
    }
}
