//! Pixel interpolation methods for image transformations.
//!
//! This module provides the interpolation kernels used when resampling images during
//! geometric transformations like affine warps, rotations or free-form warps.
//!
//! # Interpolation Modes
//!
//! - **Nearest**: Fastest, uses nearest pixel value, black outside the image
//! - **Bilinear**: Smooth linear interpolation between the four adjacent pixels
//! - **Bicubic**: Catmull-Rom interpolation over a 4x4 neighborhood
//!
//! Bilinear and bicubic taps that fall outside the image are clamped to the border.

mod bicubic;
mod bilinear;

/// Grid generation and coordinate mapping utilities.
///
/// Functions for generating coordinate meshgrids used in image warping
/// and transformation operations.
pub mod grid;

pub(crate) mod interpolate;
mod nearest;
mod remap;
mod sample;

pub use interpolate::{interpolate_pixel, InterpolationMode};
pub use remap::remap;
pub use sample::{sample, Pixel};
