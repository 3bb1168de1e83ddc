//! Scale and offset for drawing an arbitrary-aspect source into the square
//! frame.
//!
//! The default [`ScalePolicy::Fill`] scales by the larger of the two axis
//! ratios, so the source always covers the whole frame and the overflow on
//! the long axis is clipped. The overscan factor on top of that absorbs
//! rounding and soft edges left by segmentation. [`ScalePolicy::Fit`] is
//! the opposite trade: the whole source stays visible and the frame may
//! show background margins.
//!
//! # Example
//!
//! ```ignore
//! use passport_core::positioning::optimal_position;
//!
//! let placement = optimal_position(400.0, 600.0, 600.0, 1.1).unwrap();
//! assert_eq!(placement.offset_x.round(), -30.0);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::Placement;

/// Which axis ratio drives the scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalePolicy {
    /// Cover the frame completely; may clip the source.
    #[default]
    Fill,
    /// Show the whole source; may leave margins.
    Fit,
}

/// Errors from placement computation.
#[derive(Debug, Error, PartialEq)]
pub enum PositionError {
    #[error("Source dimensions must be positive, got {width}x{height}")]
    InvalidSource { width: f64, height: f64 },

    #[error("Frame size must be positive, got {0}")]
    InvalidFrame(f64),

    #[error("Overscan must be a finite value of at least 1.0, got {0}")]
    InvalidOverscan(f64),
}

/// Placement that fills a `frame_size` square with the source.
pub fn optimal_position(
    source_width: f64,
    source_height: f64,
    frame_size: f64,
    overscan: f64,
) -> Result<Placement, PositionError> {
    position_with_policy(
        source_width,
        source_height,
        frame_size,
        overscan,
        ScalePolicy::Fill,
    )
}

/// Placement under an explicit [`ScalePolicy`].
///
/// The result is always centered: `offset = (frame - source * scale) / 2`
/// on each axis.
pub fn position_with_policy(
    source_width: f64,
    source_height: f64,
    frame_size: f64,
    overscan: f64,
    policy: ScalePolicy,
) -> Result<Placement, PositionError> {
    let positive = |v: f64| v.is_finite() && v > 0.0;

    if !positive(source_width) || !positive(source_height) {
        return Err(PositionError::InvalidSource {
            width: source_width,
            height: source_height,
        });
    }
    if !positive(frame_size) {
        return Err(PositionError::InvalidFrame(frame_size));
    }
    if !overscan.is_finite() || overscan < 1.0 {
        return Err(PositionError::InvalidOverscan(overscan));
    }

    let scale_x = frame_size / source_width;
    let scale_y = frame_size / source_height;
    let base = match policy {
        ScalePolicy::Fill => scale_x.max(scale_y),
        ScalePolicy::Fit => scale_x.min(scale_y),
    };
    let scale = base * overscan;

    Ok(Placement {
        scale,
        offset_x: (frame_size - source_width * scale) / 2.0,
        offset_y: (frame_size - source_height * scale) / 2.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_portrait_source_scenario() {
        let p = optimal_position(400.0, 600.0, 600.0, 1.1).unwrap();

        assert!((p.scale - 1.65).abs() < EPS, "scale was {}", p.scale);
        assert!((p.offset_x - -30.0).abs() < EPS, "offset_x was {}", p.offset_x);
        assert!((p.offset_y - -195.0).abs() < EPS, "offset_y was {}", p.offset_y);
    }

    #[test]
    fn test_exact_fit_without_overscan() {
        let p = optimal_position(300.0, 300.0, 600.0, 1.0).unwrap();
        assert_eq!(p.scale, 2.0);
        assert_eq!((p.offset_x, p.offset_y), (0.0, 0.0));
    }

    #[test]
    fn test_landscape_source_fills_height() {
        let p = optimal_position(1200.0, 600.0, 600.0, 1.0).unwrap();
        assert_eq!(p.scale, 1.0);
        assert_eq!(p.offset_x, -300.0);
        assert_eq!(p.offset_y, 0.0);
    }

    #[test]
    fn test_fit_policy_leaves_margin() {
        let p = position_with_policy(400.0, 600.0, 600.0, 1.0, ScalePolicy::Fit).unwrap();
        assert_eq!(p.scale, 1.0);
        assert_eq!(p.offset_x, 100.0);
        assert_eq!(p.offset_y, 0.0);
    }

    #[test]
    fn test_fit_policy_shares_overscan_floor() {
        assert_eq!(
            position_with_policy(400.0, 600.0, 600.0, 0.95, ScalePolicy::Fit),
            Err(PositionError::InvalidOverscan(0.95))
        );
    }

    #[test]
    fn test_rejects_non_positive_source() {
        assert_eq!(
            optimal_position(0.0, 600.0, 600.0, 1.1),
            Err(PositionError::InvalidSource {
                width: 0.0,
                height: 600.0
            })
        );
        assert!(optimal_position(400.0, -1.0, 600.0, 1.1).is_err());
        assert!(optimal_position(f64::NAN, 10.0, 600.0, 1.1).is_err());
    }

    #[test]
    fn test_rejects_bad_frame_and_overscan() {
        assert_eq!(
            optimal_position(400.0, 600.0, 0.0, 1.1),
            Err(PositionError::InvalidFrame(0.0))
        );
        assert_eq!(
            optimal_position(400.0, 600.0, 600.0, 0.9),
            Err(PositionError::InvalidOverscan(0.9))
        );
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
