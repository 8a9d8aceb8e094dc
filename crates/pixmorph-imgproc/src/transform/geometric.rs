use pixmorph_image::{DynamicImage, ImageError, ImageSize};

use crate::interpolation::InterpolationMode;
use crate::operation::Operation;
use crate::warp::{build_mapping, CoordinateMapping, GeometricKind, PixelMapping};

use super::driver::{check_output_size, check_source, warp_dynamic};

/// Apply one of the closed-form distortions of [`GeometricKind`].
#[derive(Debug, Clone, PartialEq)]
pub struct GeometricTransform {
    kind: GeometricKind,
    output_size: Option<ImageSize>,
    interpolation: InterpolationMode,
}

impl GeometricTransform {
    /// Create the transform, the output keeps the source size.
    ///
    /// # Errors
    ///
    /// Fails with [`ImageError::InvalidParameter`] if the parameters of `kind` are out of range.
    pub fn new(kind: GeometricKind) -> Result<Self, ImageError> {
        kind.validate()?;
        Ok(Self {
            kind,
            output_size: None,
            interpolation: InterpolationMode::default(),
        })
    }

    /// Fix the output size; an empty size keeps the source size.
    pub fn with_output_size(mut self, size: ImageSize) -> Self {
        self.output_size = (!size.is_empty()).then_some(size);
        self
    }

    /// Set the interpolation mode.
    pub fn with_interpolation(mut self, interpolation: InterpolationMode) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// The distortion.
    pub fn kind(&self) -> &GeometricKind {
        &self.kind
    }

    /// Bind the distortion to a source size.
    pub fn pixel_mapping(&self, src_size: ImageSize) -> Result<PixelMapping, ImageError> {
        let dst_size = check_output_size(self.output_size.unwrap_or(src_size))?;
        build_mapping(src_size, dst_size, CoordinateMapping::Geometric(self.kind))
    }
}

impl Operation for GeometricTransform {
    fn name(&self) -> &str {
        match self.kind {
            GeometricKind::CartesianToPolar => "cartesian_to_polar",
            GeometricKind::PolarToCartesian => "polar_to_cartesian",
            GeometricKind::Barrel { .. } => "barrel",
            GeometricKind::Pincushion { .. } => "pincushion",
            GeometricKind::FishEye { .. } => "fisheye",
            GeometricKind::Perspective { .. } => "perspective",
        }
    }

    fn apply(&self, src: &DynamicImage) -> Result<DynamicImage, ImageError> {
        check_source(src)?;
        let mapping = self.pixel_mapping(src.size())?;
        warp_dynamic(src, &mapping, self.interpolation)
    }
}

#[cfg(test)]
mod tests {
    use super::GeometricTransform;
    use crate::interpolation::InterpolationMode;
    use crate::operation::Operation;
    use crate::warp::GeometricKind;
    use pixmorph_image::{DynamicImage, ErrorCode, Image, ImageError};

    #[test]
    fn invalid_kind() {
        let err = GeometricTransform::new(GeometricKind::Barrel { strength: -1.0 }).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidParameter);
    }

    #[test]
    fn unit_perspective_is_identity() -> Result<(), ImageError> {
        let data = (0..8 * 6).map(|v| (v * 3) as u8).collect();
        let src = DynamicImage::Gray8(Image::new([8, 6].into(), data)?);
        let transform = GeometricTransform::new(GeometricKind::Perspective {
            corners: [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)],
        })?
        .with_interpolation(InterpolationMode::Nearest);

        assert_eq!(transform.name(), "perspective");
        assert_eq!(transform.apply(&src)?, src);
        Ok(())
    }

    #[test]
    fn barrel_keeps_center() -> Result<(), ImageError> {
        let data = (0..9 * 9).map(|v| v as u8).collect();
        let src = DynamicImage::Gray8(Image::new([9, 9].into(), data)?);

        let flat = GeometricTransform::new(GeometricKind::Barrel { strength: 0.0 })?;
        assert_eq!(flat.apply(&src)?, src);

        let transform = GeometricTransform::new(GeometricKind::Barrel { strength: 0.4 })?
            .with_output_size([9, 9].into());
        let DynamicImage::Gray8(dst) = transform.apply(&src)? else {
            panic!("layout changed");
        };
        assert_eq!(dst.size(), [9, 9].into());
        assert!((dst.pixel(4, 4)?[0] as i32 - 40).abs() <= 1);
        // the corners sample outside the source
        assert_eq!(dst.pixel(0, 0)?, [0]);
        Ok(())
    }

    #[test]
    fn polar_outside_disc_is_empty() -> Result<(), ImageError> {
        let src = DynamicImage::Rgba8(Image::from_size_val([6, 6].into(), 255)?);
        let transform = GeometricTransform::new(GeometricKind::PolarToCartesian)?;
        let DynamicImage::Rgba8(dst) = transform.apply(&src)? else {
            panic!("layout changed");
        };
        assert_eq!(dst.pixel(0, 0)?, [0, 0, 0, 0]);
        assert_eq!(dst.pixel(3, 3)?, [255, 255, 255, 255]);
        Ok(())
    }
}
