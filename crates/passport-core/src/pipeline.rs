//! End-to-end composition: edits, segmentation, compose, validate.
//!
//! ```text
//! source ──► apply_edits ──► Segmenter ──► compose_passport ──► validate_photo
//!            (sync)          (async)       (sync)               (sync)
//! ```
//!
//! [`Pipeline::begin_composition`] does the synchronous edit step and hands
//! back a [`PendingComposition`] that owns everything the rest of the run
//! needs. Starting another composition, or calling
//! [`Pipeline::cancel_in_flight`], supersedes the pending one: when it
//! resumes after segmentation it resolves to [`PipelineError::Superseded`]
//! and produces nothing.
//!
//! A failed stage aborts the run. The caller's [`EditorState`] is only
//! borrowed, so it is unchanged by any failure.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::compose::{compose_passport, BackgroundMode, CompositionError};
use crate::config::{PassportSpec, PrintSheetSpec, DEFAULT_OVERSCAN};
use crate::decode::{decode_image, DecodeError};
use crate::editor::EditorState;
use crate::encode::{encode_png, EncodeError};
use crate::history::{EditSettings, HistoryEntry};
use crate::print_sheet::{render_print_sheet, PrintSheetError};
use crate::raster::Raster;
use crate::segmentation::{CancellationToken, RequestTracker, SegmentationError, Segmenter};
use crate::transform::{apply_edits, TransformError};
use crate::validate::{validate_photo, ValidationResult};

/// Any failure along the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Segmentation(#[from] SegmentationError),

    #[error(transparent)]
    Composition(#[from] CompositionError),

    #[error(transparent)]
    PrintSheet(#[from] PrintSheetError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// A newer request replaced this one; its result was discarded.
    #[error("Composition was superseded by a newer request")]
    Superseded,
}

/// Drives compositions and tracks which one is current.
#[derive(Debug)]
pub struct Pipeline {
    spec: PassportSpec,
    sheet: PrintSheetSpec,
    overscan: f64,
    requests: RequestTracker,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    pub fn new() -> Self {
        Self::with_spec(PassportSpec::STANDARD, DEFAULT_OVERSCAN)
    }

    pub fn with_spec(spec: PassportSpec, overscan: f64) -> Self {
        Self {
            spec,
            sheet: PrintSheetSpec::for_passport(&spec),
            overscan,
            requests: RequestTracker::new(),
        }
    }

    pub fn spec(&self) -> &PassportSpec {
        &self.spec
    }

    /// Decode uploaded bytes into a source raster.
    pub fn load_source(&self, bytes: &[u8]) -> Result<Raster, PipelineError> {
        Ok(decode_image(bytes)?)
    }

    /// Apply the editor's rotation and crop and start a new request.
    ///
    /// Any composition still pending is superseded, even if this call
    /// fails.
    pub fn begin_composition(
        &mut self,
        source: &Raster,
        editor: &EditorState,
        background: BackgroundMode,
    ) -> Result<PendingComposition, PipelineError> {
        let token = self.requests.begin();
        let edited = match apply_edits(source, &editor.rotation, &editor.crop) {
            Ok(edited) => edited,
            Err(e) => {
                self.requests.cancel_in_flight();
                return Err(e.into());
            }
        };

        Ok(PendingComposition {
            edited,
            background,
            settings: EditSettings::capture(editor, background),
            spec: self.spec,
            overscan: self.overscan,
            token,
        })
    }

    /// Supersede the pending composition, if any.
    pub fn cancel_in_flight(&mut self) {
        self.requests.cancel_in_flight();
    }

    /// Tile a composed photo onto a print sheet.
    pub fn print_sheet(&self, photo: &Raster) -> Result<Raster, PipelineError> {
        Ok(render_print_sheet(photo, &self.sheet)?)
    }
}

/// A composition waiting for segmentation.
#[derive(Debug)]
pub struct PendingComposition {
    edited: Raster,
    background: BackgroundMode,
    settings: EditSettings,
    spec: PassportSpec,
    overscan: f64,
    token: CancellationToken,
}

impl PendingComposition {
    /// The rotated and cropped image that will be segmented.
    pub fn edited(&self) -> &Raster {
        &self.edited
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn is_superseded(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Segment, compose and validate.
    pub async fn run<S: Segmenter>(self, segmenter: &S) -> Result<ComposedPhoto, PipelineError> {
        let segmented = segmenter.segment(&self.edited, &self.token).await;
        self.ensure_current("segmentation")?;
        let foreground = segmented?;
        debug!(
            width = foreground.width,
            height = foreground.height,
            "segmentation finished"
        );

        let photo = compose_passport(&foreground, &self.background, &self.spec, self.overscan)?;
        let validation = validate_photo(&photo, &self.spec);
        self.ensure_current("composition")?;

        info!(
            background = %self.background,
            all_passed = validation.all_passed(),
            "composition complete"
        );
        Ok(ComposedPhoto {
            edited: self.edited,
            photo,
            validation,
            settings: self.settings,
        })
    }

    fn ensure_current(&self, stage: &str) -> Result<(), PipelineError> {
        if self.token.is_cancelled() {
            warn!(stage, "discarding superseded composition");
            return Err(PipelineError::Superseded);
        }
        Ok(())
    }
}

/// Output of a successful composition.
#[derive(Debug, Clone)]
pub struct ComposedPhoto {
    pub edited: Raster,
    pub photo: Raster,
    pub validation: ValidationResult,
    pub settings: EditSettings,
}

impl ComposedPhoto {
    /// Encode the images into a history entry.
    pub fn to_history_entry(
        &self,
        id: impl Into<String>,
        name: impl Into<String>,
        timestamp_ms: u64,
        original: &Raster,
    ) -> Result<HistoryEntry, PipelineError> {
        Ok(HistoryEntry {
            id: id.into(),
            name: name.into(),
            timestamp_ms,
            original_image: encode_png(original)?,
            edited_image: encode_png(&self.edited)?,
            composed_image: encode_png(&self.photo)?,
            settings: self.settings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::Rgb;
    use crate::editor::CropField;
    use crate::geometry::{CropRect, RotateDirection};
    use crate::history::{HistoryStore, MemoryHistory};

    /// Returns the input unchanged.
    struct Passthrough;

    impl Segmenter for Passthrough {
        async fn segment(
            &self,
            image: &Raster,
            _cancel: &CancellationToken,
        ) -> Result<Raster, SegmentationError> {
            Ok(image.clone())
        }
    }

    /// Always fails with a fixed message.
    struct Failing;

    impl Segmenter for Failing {
        async fn segment(
            &self,
            _image: &Raster,
            _cancel: &CancellationToken,
        ) -> Result<Raster, SegmentationError> {
            Err(SegmentationError::Rejected("model unavailable".into()))
        }
    }

    /// Yields to the executor before answering, so requests interleave.
    struct Yielding;

    impl Segmenter for Yielding {
        async fn segment(
            &self,
            image: &Raster,
            _cancel: &CancellationToken,
        ) -> Result<Raster, SegmentationError> {
            tokio::task::yield_now().await;
            tokio::task::yield_now().await;
            Ok(image.clone())
        }
    }

    /// Keeps the center, makes everything else transparent.
    struct CenterSubject;

    impl Segmenter for CenterSubject {
        async fn segment(
            &self,
            image: &Raster,
            cancel: &CancellationToken,
        ) -> Result<Raster, SegmentationError> {
            cancel.check()?;
            let mut out = image.clone();
            let (w, h) = (image.width as usize, image.height as usize);
            for y in 0..h {
                for x in 0..w {
                    let inside = x >= w / 4 && x < 3 * w / 4 && y >= h / 4 && y < 3 * h / 4;
                    if !inside {
                        out.pixels[(y * w + x) * 4 + 3] = 0;
                    }
                }
            }
            Ok(out)
        }
    }

    fn source() -> Raster {
        Raster::filled(400, 600, [120, 80, 60, 255])
    }

    #[tokio::test]
    async fn test_compose_produces_frame_sized_photo() {
        let mut pipeline = Pipeline::new();
        let pending = pipeline
            .begin_composition(&source(), &EditorState::new(), BackgroundMode::default())
            .unwrap();

        let composed = pending.run(&Passthrough).await.unwrap();
        assert_eq!((composed.photo.width, composed.photo.height), (600, 600));
        assert!(composed.validation.dimensions_ok);
        assert!(composed.validation.quality_ok);
        // An opaque subject covers the white background
        assert!(!composed.validation.background_ok);
    }

    #[tokio::test]
    async fn test_edits_applied_before_segmentation() {
        let mut pipeline = Pipeline::new();
        let editor = EditorState::new()
            .rotate_quarter(RotateDirection::Right)
            .set_crop_field(CropField::Width, 50.0);

        let square = Raster::filled(600, 600, [1, 1, 1, 255]);
        let pending = pipeline
            .begin_composition(&square, &editor, BackgroundMode::default())
            .unwrap();
        assert_eq!((pending.edited().width, pending.edited().height), (300, 600));

        let composed = pending.run(&Passthrough).await.unwrap();
        assert_eq!(composed.settings.rotation_degrees, 90.0);
        assert_eq!(composed.settings.crop.width, 50.0);
    }

    #[tokio::test]
    async fn test_solid_background_shows_around_subject() {
        let mut pipeline = Pipeline::new();
        let background = BackgroundMode::SolidColor(Rgb([0, 0, 255]));
        let red = Raster::filled(600, 600, [200, 0, 0, 255]);
        let pending = pipeline
            .begin_composition(&red, &EditorState::new(), background)
            .unwrap();

        let composed = pending.run(&CenterSubject).await.unwrap();
        assert_eq!(composed.photo.pixel(2, 2), Some([0, 0, 255, 255]));
        assert_eq!(composed.photo.pixel(300, 300), Some([200, 0, 0, 255]));
    }

    #[tokio::test]
    async fn test_segmentation_failure_is_verbatim() {
        let mut pipeline = Pipeline::new();
        let pending = pipeline
            .begin_composition(&source(), &EditorState::new(), BackgroundMode::default())
            .unwrap();

        let err = pending.run(&Failing).await.unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Segmentation(SegmentationError::Rejected(ref msg)) if msg == "model unavailable"
        ));
    }

    #[tokio::test]
    async fn test_newer_request_supersedes_older() {
        let mut pipeline = Pipeline::new();
        let editor = EditorState::new();
        let first = pipeline
            .begin_composition(&source(), &editor, BackgroundMode::default())
            .unwrap();
        let second = pipeline
            .begin_composition(&source(), &editor, BackgroundMode::Original)
            .unwrap();
        assert!(first.is_superseded());

        let (stale, fresh) = tokio::join!(first.run(&Yielding), second.run(&Yielding));
        assert!(matches!(stale, Err(PipelineError::Superseded)));
        assert!(fresh.is_ok());
    }

    #[tokio::test]
    async fn test_cancel_in_flight_discards_result() {
        let mut pipeline = Pipeline::new();
        let pending = pipeline
            .begin_composition(&source(), &EditorState::new(), BackgroundMode::default())
            .unwrap();
        pipeline.cancel_in_flight();

        let err = pending.run(&Passthrough).await.unwrap_err();
        assert!(matches!(err, PipelineError::Superseded));
    }

    #[tokio::test]
    async fn test_cancelled_segmenter_reports_superseded() {
        let mut pipeline = Pipeline::new();
        let pending = pipeline
            .begin_composition(&source(), &EditorState::new(), BackgroundMode::default())
            .unwrap();
        pipeline.cancel_in_flight();

        // The segmenter bails out with Cancelled; the caller sees Superseded
        let err = pending.run(&CenterSubject).await.unwrap_err();
        assert!(matches!(err, PipelineError::Superseded));
    }

    #[test]
    fn test_invalid_crop_leaves_editor_untouched() {
        let mut pipeline = Pipeline::new();
        let mut editor = EditorState::new();
        editor.crop = CropRect::new(0.0, 0.0, 0.0, 50.0);
        let before = editor.clone();

        let err = pipeline
            .begin_composition(&source(), &editor, BackgroundMode::default())
            .unwrap_err();
        assert!(matches!(err, PipelineError::Transform(TransformError::InvalidCrop { .. })));
        assert_eq!(editor, before);
    }

    #[test]
    fn test_failed_begin_still_supersedes() {
        let mut pipeline = Pipeline::new();
        let first = pipeline
            .begin_composition(&source(), &EditorState::new(), BackgroundMode::default())
            .unwrap();

        let mut broken = EditorState::new();
        broken.crop = CropRect::new(0.0, 0.0, 50.0, 0.0);
        assert!(pipeline
            .begin_composition(&source(), &broken, BackgroundMode::default())
            .is_err());
        assert!(first.is_superseded());
    }

    #[test]
    fn test_load_source_rejects_garbage() {
        let pipeline = Pipeline::new();
        let err = pipeline.load_source(b"not an image").unwrap_err();
        assert!(matches!(err, PipelineError::Decode(DecodeError::InvalidFormat)));
    }

    #[tokio::test]
    async fn test_print_sheet_and_history_from_result() {
        let mut pipeline = Pipeline::new();
        let original = source();
        let pending = pipeline
            .begin_composition(&original, &EditorState::new(), BackgroundMode::default())
            .unwrap();
        let composed = pending.run(&Passthrough).await.unwrap();

        let sheet = pipeline.print_sheet(&composed.photo).unwrap();
        assert_eq!((sheet.width, sheet.height), (1200, 1800));

        let entry = composed
            .to_history_entry("1", "selfie.jpg", 1_700_000_000_000, &original)
            .unwrap();
        assert!(entry.composed_image.starts_with(&[0x89, b'P', b'N', b'G']));

        let mut store = MemoryHistory::new();
        store.save(entry).unwrap();
        assert_eq!(store.load().unwrap()[0].name, "selfie.jpg");
    }
}
