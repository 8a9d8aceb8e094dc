use pixmorph_image::{DynamicImage, ImageError, ImageSize};

use crate::interpolation::InterpolationMode;
use crate::operation::Operation;
use crate::warp::{build_mapping, ControlPointSet, CoordinateMapping, PixelMapping, WarpMethod};

use super::driver::{check_output_size, check_source, warp_dynamic};

/// Free-form warp driven by control point correspondences.
///
/// # Example
///
/// ```
/// use pixmorph_imgproc::transform::WarpTransform;
/// use pixmorph_imgproc::warp::{ControlPointSet, WarpMethod};
///
/// let points = ControlPointSet::new(
///     vec![(0, 0), (10, 0), (0, 10)],
///     vec![(1, 0), (11, 0), (1, 10)],
/// )
/// .unwrap();
/// let warp = WarpTransform::new(points, WarpMethod::ThinPlateSpline { stiffness: 1.0 });
/// assert!(warp.is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct WarpTransform {
    points: ControlPointSet,
    method: WarpMethod,
    output_size: Option<ImageSize>,
    interpolation: InterpolationMode,
}

impl WarpTransform {
    /// Create a warp, the output keeps the source size.
    ///
    /// # Errors
    ///
    /// Fails with [`ImageError::InvalidParameter`] if `points` cannot drive `method`.
    pub fn new(points: ControlPointSet, method: WarpMethod) -> Result<Self, ImageError> {
        method.validate(&points)?;
        Ok(Self {
            points,
            method,
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

    /// The correspondences.
    pub fn points(&self) -> &ControlPointSet {
        &self.points
    }

    /// The interpolation scheme of the correspondences.
    pub fn method(&self) -> WarpMethod {
        self.method
    }

    /// Bind the warp to a source size.
    pub fn pixel_mapping(&self, src_size: ImageSize) -> Result<PixelMapping, ImageError> {
        let dst_size = check_output_size(self.output_size.unwrap_or(src_size))?;
        build_mapping(
            src_size,
            dst_size,
            CoordinateMapping::Warp {
                points: self.points.clone(),
                method: self.method,
            },
        )
    }
}

impl Operation for WarpTransform {
    fn name(&self) -> &str {
        "warp"
    }

    fn apply(&self, src: &DynamicImage) -> Result<DynamicImage, ImageError> {
        check_source(src)?;
        let mapping = self.pixel_mapping(src.size())?;
        warp_dynamic(src, &mapping, self.interpolation)
    }
}
