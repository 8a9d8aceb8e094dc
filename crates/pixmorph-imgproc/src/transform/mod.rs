//! Geometric transforms applied to whole images.
//!
//! Each transform builds a [`PixelMapping`](crate::warp::PixelMapping) for the source size and
//! rasterizes it with the configured [`InterpolationMode`](crate::interpolation::InterpolationMode).
//! Grayscale, RGB and RGBA images keep their layout; binary images are rejected.

mod affine;
mod driver;
mod geometric;
mod rotate;
mod warp;

pub use affine::AffineTransform;
pub use driver::MAX_OUTPUT_DIMENSION;
pub use geometric::GeometricTransform;
pub use rotate::{RotateTransform, RotationCenter};
pub use warp::WarpTransform;

pub(crate) use driver::catch_panics;
