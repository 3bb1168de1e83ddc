//! Passport Core - Passport photo composition library
//!
//! This crate turns an arbitrary photo into a square passport photo and a
//! printable sheet of copies: decoding, the interactive crop editor,
//! rotate-then-crop, fill positioning, background compositing, output
//! checks and print-sheet tiling. Background removal is supplied by the
//! caller through [`segmentation::Segmenter`].

pub mod compose;
pub mod config;
pub mod decode;
pub mod editor;
pub mod encode;
pub mod geometry;
pub mod history;
pub mod pipeline;
pub mod positioning;
pub mod print_sheet;
pub mod raster;
pub mod segmentation;
pub mod transform;
pub mod validate;

pub use compose::{compose_passport, BackgroundMode, CompositionError, Rgb};
pub use config::{PassportSpec, PrintSheetSpec};
pub use decode::{decode_image, DecodeError};
pub use editor::{apply_drag, ClampPolicy, EditorState, Handle};
pub use encode::{encode_png, EncodeError};
pub use geometry::{CropRect, Placement, RotateDirection, Rotation};
pub use pipeline::{ComposedPhoto, PendingComposition, Pipeline, PipelineError};
pub use positioning::{optimal_position, PositionError, ScalePolicy};
pub use print_sheet::{render_print_sheet, PrintSheetError, SheetLayout};
pub use raster::Raster;
pub use segmentation::{CancellationToken, SegmentationError, Segmenter};
pub use transform::{apply_edits, TransformError};
pub use validate::{validate_photo, ValidationResult};
