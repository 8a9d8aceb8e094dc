#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for I/O operations.
///
/// Defines [`IoError`](error::IoError) variants for file access and encoding/decoding failures.
pub mod error;

/// High-level image reading and writing functions.
///
/// See [`functional::read_image`] for extension based format selection.
pub mod functional;

/// BMP image encoding and decoding.
pub mod bmp;

/// JPEG image encoding and decoding.
///
/// Pure Rust JPEG codec for reading and writing JPEG images.
pub mod jpeg;

/// Netpbm (PBM, PGM, PPM, PAM) image encoding and decoding.
pub mod pnm;

/// Internal conversions between the codec and pixmorph image types.
mod conv_utils;

pub use error::IoError;
pub use functional::{read_image, write_image};
