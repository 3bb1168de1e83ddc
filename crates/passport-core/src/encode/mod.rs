//! Encoding composed rasters for download.
//!
//! Both output artifacts (the single photo and the print sheet) are PNG so
//! that the background stays lossless and an `Original`-mode transparent
//! canvas survives export.
//!
//! # Examples
//!
//! ```ignore
//! use passport_core::encode::encode_png;
//!
//! let bytes = encode_png(&composed).unwrap();
//! std::fs::write(passport_core::config::PHOTO_FILE_NAME, bytes).unwrap();
//! ```

mod png;

pub use png::{encode_png, EncodeError};
