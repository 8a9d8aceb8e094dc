use pixmorph_image::{DynamicImage, ImageError, ImageSize};

use crate::interpolation::InterpolationMode;
use crate::operation::Operation;
use crate::warp::{affine_output_bounds, build_mapping, AffineMap, CoordinateMapping, PixelMapping};

use super::driver::{check_output_size, check_source, warp_dynamic};

/// Warp an image with a 2x3 affine matrix.
///
/// Without an explicit output size the destination is sized to the bounding box of the
/// transformed source corners.
///
/// # Example
///
/// ```
/// use pixmorph_image::{DynamicImage, Image};
/// use pixmorph_imgproc::{transform::AffineTransform, Operation};
///
/// let src = DynamicImage::Gray8(Image::from_size_val([4, 4].into(), 9).unwrap());
/// let dst = AffineTransform::scaling(2.0, 2.0).apply(&src).unwrap();
/// assert_eq!(dst.size(), [8, 8].into());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AffineTransform {
    map: AffineMap,
    output_size: Option<ImageSize>,
    interpolation: InterpolationMode,
}

impl AffineTransform {
    /// Create a transform from the forward map.
    pub fn new(map: AffineMap) -> Self {
        Self {
            map,
            output_size: None,
            interpolation: InterpolationMode::default(),
        }
    }

    /// The identity transform.
    pub fn identity() -> Self {
        Self::new(AffineMap::identity())
    }

    /// Scale by `sx` and `sy`.
    pub fn scaling(sx: f32, sy: f32) -> Self {
        Self::new(AffineMap::scaling(sx, sy))
    }

    /// Translate by `(tx, ty)` pixels.
    pub fn translation(tx: f32, ty: f32) -> Self {
        Self::new(AffineMap::translation(tx, ty))
    }

    /// Rotate by `angle` degrees about `center`.
    pub fn rotation(angle: f32, center: (f32, f32)) -> Self {
        Self::new(AffineMap::rotation(angle, center))
    }

    /// Shear by `shx` along x and `shy` along y.
    pub fn shear(shx: f32, shy: f32) -> Self {
        Self::new(AffineMap::shear(shx, shy))
    }

    /// Fix the output size; an empty size restores automatic sizing.
    pub fn with_output_size(mut self, size: ImageSize) -> Self {
        self.output_size = (!size.is_empty()).then_some(size);
        self
    }

    /// Set the interpolation mode.
    pub fn with_interpolation(mut self, interpolation: InterpolationMode) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// The forward map.
    pub fn map(&self) -> &AffineMap {
        &self.map
    }

    /// The fixed output size, `None` when sized automatically.
    pub fn output_size(&self) -> Option<ImageSize> {
        self.output_size
    }

    /// The interpolation mode.
    pub fn interpolation(&self) -> InterpolationMode {
        self.interpolation
    }

    /// Bind the transform to a source size.
    pub fn pixel_mapping(&self, src_size: ImageSize) -> Result<PixelMapping, ImageError> {
        let (dst_size, origin) = match self.output_size {
            Some(size) => (size, (0.0, 0.0)),
            // a singular map has no meaningful bounds, every pixel is skipped anyway
            None if self.map.is_singular() => (src_size, (0.0, 0.0)),
            None => {
                let bounds = affine_output_bounds(&self.map, src_size);
                (bounds.size, (bounds.min_x, bounds.min_y))
            }
        };
        let dst_size = check_output_size(dst_size)?;

        build_mapping(src_size, dst_size, CoordinateMapping::affine(&self.map, origin))
    }
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Operation for AffineTransform {
    fn name(&self) -> &str {
        "affine"
    }

    fn apply(&self, src: &DynamicImage) -> Result<DynamicImage, ImageError> {
        check_source(src)?;
        let mapping = self.pixel_mapping(src.size())?;
        warp_dynamic(src, &mapping, self.interpolation)
    }
}
