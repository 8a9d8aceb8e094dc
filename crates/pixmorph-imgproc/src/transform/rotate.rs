use pixmorph_image::{DynamicImage, ImageError, ImageSize};

use crate::interpolation::InterpolationMode;
use crate::operation::Operation;
use crate::warp::{build_mapping, rotated_output_size, CoordinateMapping, PixelMapping};

use super::driver::{check_output_size, check_source, warp_dynamic};

/// The point an image is rotated about.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum RotationCenter {
    /// The center of the pixel grid, `((W - 1) / 2, (H - 1) / 2)`.
    #[default]
    ImageCenter,
    /// The top-left pixel.
    TopLeft,
    /// An arbitrary point in pixels.
    Point(f32, f32),
}

impl RotationCenter {
    /// Resolve the center for an image of the given size.
    pub fn resolve(&self, size: ImageSize) -> (f32, f32) {
        match *self {
            RotationCenter::ImageCenter => grid_center(size),
            RotationCenter::TopLeft => (0.0, 0.0),
            RotationCenter::Point(x, y) => (x, y),
        }
    }
}

fn grid_center(size: ImageSize) -> (f32, f32) {
    (
        (size.width as f32 - 1.0) / 2.0,
        (size.height as f32 - 1.0) / 2.0,
    )
}

/// Rotate an image by an angle in degrees, clockwise on screen for positive angles.
///
/// With `resize_output` the destination grows to hold the whole rotated image, which is then
/// centered in it; the rotation center only matters when the size is kept.
#[derive(Debug, Clone, PartialEq)]
pub struct RotateTransform {
    angle: f32,
    center: RotationCenter,
    resize_output: bool,
    interpolation: InterpolationMode,
}

impl RotateTransform {
    /// Rotate by `angle` degrees about the image center, keeping the source size.
    pub fn new(angle: f32) -> Self {
        Self {
            angle,
            center: RotationCenter::default(),
            resize_output: false,
            interpolation: InterpolationMode::default(),
        }
    }

    /// Set the rotation center.
    pub fn with_center(mut self, center: RotationCenter) -> Self {
        self.center = center;
        self
    }

    /// Grow the output to the bounding box of the rotated image.
    pub fn with_resize_output(mut self, resize_output: bool) -> Self {
        self.resize_output = resize_output;
        self
    }

    /// Set the interpolation mode.
    pub fn with_interpolation(mut self, interpolation: InterpolationMode) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// The rotation angle in degrees.
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Bind the rotation to a source size.
    pub fn pixel_mapping(&self, src_size: ImageSize) -> Result<PixelMapping, ImageError> {
        if !self.angle.is_finite() {
            return Err(ImageError::InvalidParameter(format!(
                "rotation angle must be finite, got {}",
                self.angle
            )));
        }

        let (dst_size, src_center, dst_center) = if self.resize_output {
            let dst_size = rotated_output_size(src_size, self.angle);
            (dst_size, grid_center(src_size), grid_center(dst_size))
        } else {
            let center = self.center.resolve(src_size);
            (src_size, center, center)
        };
        let dst_size = check_output_size(dst_size)?;

        build_mapping(
            src_size,
            dst_size,
            CoordinateMapping::rotation(self.angle, src_center, dst_center),
        )
    }
}

impl Operation for RotateTransform {
    fn name(&self) -> &str {
        "rotate"
    }

    fn apply(&self, src: &DynamicImage) -> Result<DynamicImage, ImageError> {
        check_source(src)?;
        let mapping = self.pixel_mapping(src.size())?;
        warp_dynamic(src, &mapping, self.interpolation)
    }
}
