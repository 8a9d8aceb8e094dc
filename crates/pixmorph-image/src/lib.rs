#![deny(missing_docs)]
//! Image types and traits for generating and manipulating images

/// image representation for image processing purposes.
pub mod image;

/// run-time tagged images over the supported pixel layouts.
pub mod dynamic;

/// Error types for the image module.
pub mod error;

pub use crate::dynamic::{DynamicImage, Gray8, ImageType, Rgb8, Rgba8};
pub use crate::error::{ErrorCode, ImageError};
pub use crate::image::{Image, ImageSize};
