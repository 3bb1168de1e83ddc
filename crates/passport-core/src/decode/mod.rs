//! Turning uploaded bytes into a [`Raster`](crate::raster::Raster).
//!
//! JPEG, PNG and WebP are accepted. EXIF orientation is applied during
//! decoding so the raster matches what a browser shows for the same file,
//! which keeps crop percentages aligned with the on-screen preview.
//!
//! # Examples
//!
//! ```ignore
//! use passport_core::decode::decode_image;
//!
//! let bytes = std::fs::read("selfie.jpg").unwrap();
//! let raster = decode_image(&bytes).unwrap();
//! println!("Decoded {}x{} image", raster.width, raster.height);
//! ```

mod reader;
mod types;

pub use reader::decode_image;
pub use types::{DecodeError, Orientation};
