//! Background-removal collaborator and request cancellation.
//!
//! The segmentation model itself lives outside this crate. Callers plug it
//! in through [`Segmenter`]; the engine only needs an RGBA raster back whose
//! alpha channel marks the subject.
//!
//! Segmentation is slow and the user can start over at any time (new image,
//! regenerate). Every request therefore carries a [`CancellationToken`], and
//! [`RequestTracker`] makes sure only the newest request can still deliver.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::raster::Raster;

/// Errors reported by a [`Segmenter`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SegmentationError {
    /// The collaborator failed; the message is passed through unchanged.
    #[error("{0}")]
    Rejected(String),

    /// The request was cancelled before it finished.
    #[error("Segmentation was cancelled")]
    Cancelled,
}

/// Shared cancellation flag.
///
/// Clones observe the same flag. Cancelling is permanent.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// `Err(Cancelled)` once the token has been cancelled.
    pub fn check(&self) -> Result<(), SegmentationError> {
        if self.is_cancelled() {
            Err(SegmentationError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Subject/background separation.
///
/// Implementations should return a raster the same size as `image`, with
/// transparent alpha where the background was removed. They may poll
/// `cancel` and bail out early with [`SegmentationError::Cancelled`], but
/// callers must not rely on it: the result of a cancelled request is
/// discarded either way.
#[allow(async_fn_in_trait)]
pub trait Segmenter {
    async fn segment(
        &self,
        image: &Raster,
        cancel: &CancellationToken,
    ) -> Result<Raster, SegmentationError>;
}

/// Issues one token per request and cancels the one before it.
#[derive(Debug, Default)]
pub struct RequestTracker {
    current: Option<CancellationToken>,
    issued: u64,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, superseding any request still in flight.
    pub fn begin(&mut self) -> CancellationToken {
        self.cancel_in_flight();
        let token = CancellationToken::new();
        self.current = Some(token.clone());
        self.issued += 1;
        debug!(request = self.issued, "segmentation request started");
        token
    }

    /// Cancel the in-flight request, if any.
    pub fn cancel_in_flight(&mut self) {
        if let Some(token) = self.current.take() {
            token.cancel();
        }
    }

    /// Whether a request is outstanding and still live.
    pub fn has_live_request(&self) -> bool {
        self.current.as_ref().is_some_and(|t| !t.is_cancelled())
    }

    /// Number of requests started so far.
    pub fn issued(&self) -> u64 {
        self.issued
    }
}
