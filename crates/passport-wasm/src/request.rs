//! Stale-result protection for segmentation calls made from JavaScript.
//!
//! ```typescript
//! const token = tracker.begin();
//! const foreground = await removeBackground(blob);
//! if (!token.is_current) return; // a newer request or a cancel happened
//! ```

use passport_core::segmentation::{CancellationToken, RequestTracker};
use wasm_bindgen::prelude::*;

/// Issues one token per segmentation request.
#[wasm_bindgen]
#[derive(Default)]
pub struct JsRequestTracker {
    inner: RequestTracker,
}

#[wasm_bindgen]
impl JsRequestTracker {
    #[wasm_bindgen(constructor)]
    pub fn new() -> JsRequestTracker {
        JsRequestTracker::default()
    }

    /// Start a request; the previous one stops being current.
    pub fn begin(&mut self) -> JsRequestToken {
        JsRequestToken {
            token: self.inner.begin(),
        }
    }

    /// Used by "regenerate" and when a different image is selected.
    pub fn cancel_in_flight(&mut self) {
        self.inner.cancel_in_flight();
    }

    #[wasm_bindgen(getter)]
    pub fn has_live_request(&self) -> bool {
        self.inner.has_live_request()
    }
}

/// Handle for one request.
#[wasm_bindgen]
pub struct JsRequestToken {
    token: CancellationToken,
}

#[wasm_bindgen]
impl JsRequestToken {
    /// False once the request has been superseded or cancelled.
    #[wasm_bindgen(getter)]
    pub fn is_current(&self) -> bool {
        !self.token.is_cancelled()
    }
}
