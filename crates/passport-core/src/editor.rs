//! Interactive crop-rectangle editing.
//!
//! The UI converts pointer movement into percent-of-container deltas and
//! feeds them here. [`apply_drag`] is the pure per-handle update rule;
//! [`EditorState`] owns the current rotation, crop and the single drag
//! session, and is the only thing the interactive surface mutates.
//!
//! # Clamping
//!
//! Under [`ClampPolicy::PerHandle`] every handle keeps its dimension at or
//! above [`MIN_CROP_PERCENT`] and never moves an edge below 0, but only
//! [`Handle::Move`] bounds the far edge by 100. Dragging a right or bottom
//! edge outward can therefore grow the rect past the container.
//! [`ClampPolicy::Contained`] adds that bound to every handle.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::MIN_CROP_PERCENT;
use crate::geometry::{CropRect, RotateDirection, Rotation};

/// A named drag control on the crop rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Handle {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Top,
    Bottom,
    Left,
    Right,
    /// The rectangle interior; translates without resizing.
    Move,
}

impl Handle {
    pub const ALL: [Handle; 9] = [
        Handle::TopLeft,
        Handle::TopRight,
        Handle::BottomLeft,
        Handle::BottomRight,
        Handle::Top,
        Handle::Bottom,
        Handle::Left,
        Handle::Right,
        Handle::Move,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Handle::TopLeft => "top-left",
            Handle::TopRight => "top-right",
            Handle::BottomLeft => "bottom-left",
            Handle::BottomRight => "bottom-right",
            Handle::Top => "top",
            Handle::Bottom => "bottom",
            Handle::Left => "left",
            Handle::Right => "right",
            Handle::Move => "move",
        }
    }

    fn moves_left_edge(self) -> bool {
        matches!(self, Handle::TopLeft | Handle::BottomLeft | Handle::Left)
    }

    fn moves_right_edge(self) -> bool {
        matches!(self, Handle::TopRight | Handle::BottomRight | Handle::Right)
    }

    fn moves_top_edge(self) -> bool {
        matches!(self, Handle::TopLeft | Handle::TopRight | Handle::Top)
    }

    fn moves_bottom_edge(self) -> bool {
        matches!(self, Handle::BottomLeft | Handle::BottomRight | Handle::Bottom)
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a handle name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown crop handle: {0}")]
pub struct UnknownHandle(pub String);

impl FromStr for Handle {
    type Err = UnknownHandle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Handle::ALL
            .into_iter()
            .find(|handle| handle.as_str() == s)
            .ok_or_else(|| UnknownHandle(s.to_string()))
    }
}

/// How far edges may travel toward the container's far side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClampPolicy {
    /// Each handle clamps only its shrinking dimension; `Move` alone is
    /// bounded by the far edge.
    #[default]
    PerHandle,
    /// Every handle is kept inside the container.
    Contained,
}

impl ClampPolicy {
    fn apply(self, rect: CropRect) -> CropRect {
        match self {
            ClampPolicy::PerHandle => rect,
            ClampPolicy::Contained => contain(rect),
        }
    }
}

/// One slider-controlled crop field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CropField {
    X,
    Y,
    Width,
    Height,
}

/// Apply a percent delta from dragging `handle` to `rect`.
///
/// Never fails; the result always has `width` and `height` of at least
/// [`MIN_CROP_PERCENT`] and `x`, `y` of at least 0 (given a valid input).
pub fn apply_drag(
    rect: CropRect,
    handle: Handle,
    delta_x: f64,
    delta_y: f64,
    policy: ClampPolicy,
) -> CropRect {
    let dx = finite_or_zero(delta_x);
    let dy = finite_or_zero(delta_y);
    let mut next = rect;

    if handle == Handle::Move {
        next.x = (rect.x + dx).clamp(0.0, (100.0 - rect.width).max(0.0));
        next.y = (rect.y + dy).clamp(0.0, (100.0 - rect.height).max(0.0));
        return policy.apply(next);
    }

    if handle.moves_left_edge() {
        // The left edge may not pass the point that leaves MIN width.
        next.x = (rect.x + dx).min(rect.right() - MIN_CROP_PERCENT).max(0.0);
        next.width = rect.width - (next.x - rect.x);
    }
    if handle.moves_right_edge() {
        next.width = (rect.width + dx).max(MIN_CROP_PERCENT);
    }
    if handle.moves_top_edge() {
        next.y = (rect.y + dy).min(rect.bottom() - MIN_CROP_PERCENT).max(0.0);
        next.height = rect.height - (next.y - rect.y);
    }
    if handle.moves_bottom_edge() {
        next.height = (rect.height + dy).max(MIN_CROP_PERCENT);
    }

    policy.apply(next)
}

/// Set a single crop field from a slider, clamped to the slider's range.
///
/// Non-finite values leave the rect unchanged.
pub fn set_field(rect: CropRect, field: CropField, value: f64) -> CropRect {
    if !value.is_finite() {
        return rect;
    }
    let mut next = rect;
    match field {
        CropField::X => next.x = value.clamp(0.0, 100.0),
        CropField::Y => next.y = value.clamp(0.0, 100.0),
        CropField::Width => next.width = value.clamp(MIN_CROP_PERCENT, 100.0),
        CropField::Height => next.height = value.clamp(MIN_CROP_PERCENT, 100.0),
    }
    next
}

/// Pull the origin back far enough to fit the minimum size, then cap the
/// size at the far edge.
fn contain(rect: CropRect) -> CropRect {
    let x = rect.x.clamp(0.0, 100.0 - MIN_CROP_PERCENT);
    let y = rect.y.clamp(0.0, 100.0 - MIN_CROP_PERCENT);
    CropRect {
        x,
        y,
        width: rect.width.min(100.0 - x).max(MIN_CROP_PERCENT),
        height: rect.height.min(100.0 - y).max(MIN_CROP_PERCENT),
    }
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

/// Pointer location in percent of the editor container.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
}

impl PointerPosition {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Convert a pixel position relative to the container's top-left corner.
    ///
    /// A container without area maps everything to the origin.
    pub fn from_pixels(px: f64, py: f64, container_width: f64, container_height: f64) -> Self {
        let to_percent = |v: f64, extent: f64| {
            if extent > 0.0 && v.is_finite() {
                v / extent * 100.0
            } else {
                0.0
            }
        };
        Self {
            x: to_percent(px, container_width),
            y: to_percent(py, container_height),
        }
    }
}

/// The single in-progress handle drag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragSession {
    pub handle: Handle,
    /// Last pointer position a delta was applied from.
    pub anchor: PointerPosition,
}

/// Everything the editor surface can change.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EditorState {
    pub rotation: Rotation,
    pub crop: CropRect,
    pub clamp_policy: ClampPolicy,
    #[serde(skip)]
    drag: Option<DragSession>,
}

impl EditorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clamp_policy(policy: ClampPolicy) -> Self {
        Self {
            clamp_policy: policy,
            ..Self::default()
        }
    }

    /// The active drag session, if any.
    pub fn drag(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Reset for a freshly selected image.
    pub fn load_new_image(self) -> Self {
        Self {
            clamp_policy: self.clamp_policy,
            ..Self::default()
        }
    }

    /// Start dragging `handle`. Ignored while another session is active.
    pub fn begin_drag(mut self, handle: Handle, pointer: PointerPosition) -> Self {
        if self.drag.is_none() {
            self.drag = Some(DragSession {
                handle,
                anchor: pointer,
            });
        }
        self
    }

    /// Apply the movement since the last anchor and re-anchor at `pointer`.
    pub fn drag_to(mut self, pointer: PointerPosition) -> Self {
        if let Some(session) = self.drag.as_mut() {
            self.crop = apply_drag(
                self.crop,
                session.handle,
                pointer.x - session.anchor.x,
                pointer.y - session.anchor.y,
                self.clamp_policy,
            );
            session.anchor = pointer;
        }
        self
    }

    /// Clear the drag session. Called for a pointer-up anywhere in the
    /// document and when the pointer leaves the editor.
    pub fn end_drag(mut self) -> Self {
        self.drag = None;
        self
    }

    pub fn rotate_quarter(mut self, direction: RotateDirection) -> Self {
        self.rotation = self.rotation.rotate_quarter(direction);
        self
    }

    pub fn nudge_rotation(mut self, direction: RotateDirection) -> Self {
        self.rotation = self.rotation.nudge(direction);
        self
    }

    pub fn set_rotation(mut self, degrees: f64) -> Self {
        self.rotation = self.rotation.set_exact(degrees);
        self
    }

    /// Slider update. Under [`ClampPolicy::Contained`] the result is pulled
    /// back inside the container as well.
    pub fn set_crop_field(mut self, field: CropField, value: f64) -> Self {
        self.crop = self.clamp_policy.apply(set_field(self.crop, field, value));
        self
    }

    /// Back to no rotation and the full crop.
    pub fn reset_edits(mut self) -> Self {
        self.rotation = self.rotation.reset();
        self.crop = CropRect::default();
        self.drag = None;
        self
    }

    /// True when applying the edits would leave the image unchanged.
    pub fn is_pristine(&self) -> bool {
        self.rotation.is_identity() && self.crop.is_full()
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
