use std::str::FromStr;

use super::bicubic::bicubic_interpolation;
use super::bilinear::bilinear_interpolation;
use super::nearest::nearest_neighbor_interpolation;
use pixmorph_image::{Image, ImageError};

/// Interpolation mode used when sampling a fractional coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InterpolationMode {
    /// Nearest neighbor interpolation
    Nearest,
    /// Bilinear interpolation
    #[default]
    Bilinear,
    /// Bicubic (Catmull-Rom) interpolation
    Bicubic,
}

impl FromStr for InterpolationMode {
    type Err = ImageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nearest" | "nearest_neighbor" | "nn" => Ok(InterpolationMode::Nearest),
            "bilinear" | "linear" => Ok(InterpolationMode::Bilinear),
            "bicubic" | "cubic" => Ok(InterpolationMode::Bicubic),
            _ => Err(ImageError::InvalidParameter(format!(
                "unknown interpolation mode: {s}"
            ))),
        }
    }
}

impl TryFrom<u8> for InterpolationMode {
    type Error = ImageError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(InterpolationMode::Nearest),
            1 => Ok(InterpolationMode::Bilinear),
            2 => Ok(InterpolationMode::Bicubic),
            _ => Err(ImageError::InvalidParameter(format!(
                "unknown interpolation mode: {value}"
            ))),
        }
    }
}

/// Kernel for interpolating a pixel value
///
/// # Arguments
///
/// * `image` - The input image container with shape (height, width, C).
/// * `u` - The x coordinate of the pixel to interpolate.
/// * `v` - The y coordinate of the pixel to interpolate.
/// * `interpolation` - The interpolation mode to use.
///
/// # Returns
///
/// The interpolated pixel, one value per channel. Never fails: nearest neighbor returns zero
/// outside the image while bilinear and bicubic clamp their taps to the border.
pub fn interpolate_pixel<const C: usize>(
    image: &Image<u8, C>,
    u: f32,
    v: f32,
    interpolation: InterpolationMode,
) -> [u8; C] {
    match interpolation {
        InterpolationMode::Nearest => nearest_neighbor_interpolation(image, u, v),
        InterpolationMode::Bilinear => bilinear_interpolation(image, u, v),
        InterpolationMode::Bicubic => bicubic_interpolation(image, u, v),
    }
}

/// Fetch a pixel with its coordinates clamped to the image bounds.
#[inline]
pub(crate) fn safe_get<const C: usize>(image: &Image<u8, C>, x: i64, y: i64) -> &[u8] {
    let x = x.clamp(0, image.cols() as i64 - 1) as usize;
    let y = y.clamp(0, image.rows() as i64 - 1) as usize;
    let base = (y * image.cols() + x) * C;
    &image.as_slice()[base..base + C]
}

/// Round and saturate an accumulated value to the 8-bit range.
#[inline]
pub(crate) fn saturate_u8(x: f32) -> u8 {
    x.round().clamp(0.0, 255.0) as u8
}
