use pixmorph_image::{ImageError, ImageSize};

use super::affine::AffineMap;
use super::control_points::{ControlPointSet, WarpMethod};
use super::geometric::GeometricKind;

/// Source coordinate written for destination pixels that have no source.
///
/// It lies outside every image, so the rasterizer skips the pixel.
pub const OUT_OF_RANGE: (f32, f32) = (-1.0, -1.0);

/// Coordinates closer than this to an integer are snapped to it.
const SNAP_EPSILON: f32 = 1e-3;

/// Remove trigonometric round-off so that exact pixel positions stay exact.
pub(crate) fn snap(v: f32) -> f32 {
    let r = v.round();
    if (v - r).abs() < SNAP_EPSILON {
        r
    } else {
        v
    }
}

/// Inverse mapping from destination to source coordinates.
///
/// Every variant is evaluated in normalized coordinates where `(0, 0)` is the top-left corner
/// and `(1, 1)` the bottom-right corner of the image. The variants that are naturally
/// expressed in pixels (affine, rotation, warps) convert internally using the image sizes.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CoordinateMapping {
    /// Affine transform given by its inverse; `None` when the forward map is singular.
    Affine {
        /// Destination to source map, in pixels.
        inverse: Option<AffineMap>,
        /// Forward-space position of the destination's top-left pixel.
        origin: (f32, f32),
    },
    /// Rotation about a center point.
    Rotation {
        /// Rotation angle in radians.
        angle: f32,
        /// Rotation center in source pixels.
        src_center: (f32, f32),
        /// Position of the source center in destination pixels.
        dst_center: (f32, f32),
    },
    /// Closed-form geometric distortion.
    Geometric(GeometricKind),
    /// Free-form warp driven by control point correspondences.
    Warp {
        /// The correspondences, source and destination in pixels.
        points: ControlPointSet,
        /// How the correspondences are interpolated.
        method: WarpMethod,
    },
}

impl CoordinateMapping {
    /// Build an affine mapping from the forward map `m`.
    ///
    /// A singular `m` does not fail: every destination pixel maps to [`OUT_OF_RANGE`].
    pub fn affine(m: &AffineMap, origin: (f32, f32)) -> Self {
        let inverse = match m.inverse() {
            Ok(inv) => Some(inv),
            Err(err) => {
                log::warn!("affine map {:?} is not invertible: {err}", m.coeffs());
                None
            }
        };
        CoordinateMapping::Affine { inverse, origin }
    }

    /// Build a rotation mapping, `angle` in degrees.
    pub fn rotation(angle: f32, src_center: (f32, f32), dst_center: (f32, f32)) -> Self {
        CoordinateMapping::Rotation {
            angle: angle.to_radians(),
            src_center,
            dst_center,
        }
    }

    /// Evaluate the mapping at a normalized destination position.
    ///
    /// # Arguments
    ///
    /// * `nx`, `ny` - The normalized destination coordinates.
    /// * `src_size` - The size of the source image.
    /// * `dst_size` - The size of the destination image.
    ///
    /// # Returns
    ///
    /// The normalized source coordinates, or `None` when the destination position has no
    /// source (singular matrix, point outside the polar disc).
    pub fn evaluate(
        &self,
        nx: f32,
        ny: f32,
        src_size: ImageSize,
        dst_size: ImageSize,
    ) -> Option<(f32, f32)> {
        let (src_w, src_h) = (src_size.width as f32, src_size.height as f32);
        let (dst_w, dst_h) = (dst_size.width as f32, dst_size.height as f32);

        match self {
            CoordinateMapping::Affine { inverse, origin } => {
                let inverse = inverse.as_ref()?;
                let (x, y) = (nx * dst_w + origin.0, ny * dst_h + origin.1);
                let (u, v) = inverse.transform_point(x, y);
                Some((u / src_w, v / src_h))
            }
            CoordinateMapping::Rotation {
                angle,
                src_center,
                dst_center,
            } => {
                // the forward rotation is [cos, -sin; sin, cos], sample with its transpose
                let (sin, cos) = angle.sin_cos();
                let dx = nx * dst_w - dst_center.0;
                let dy = ny * dst_h - dst_center.1;
                let u = cos * dx + sin * dy + src_center.0;
                let v = -sin * dx + cos * dy + src_center.1;
                Some((u / src_w, v / src_h))
            }
            CoordinateMapping::Geometric(kind) => kind.evaluate(nx, ny),
            CoordinateMapping::Warp { points, method } => {
                match method.evaluate(points, nx * dst_w, ny * dst_h) {
                    Some((u, v)) => Some((u / src_w, v / src_h)),
                    // degenerate weights, scale the destination onto the source
                    None => Some((nx, ny)),
                }
            }
        }
    }
}

/// A [`CoordinateMapping`] bound to concrete source and destination sizes.
///
/// Converts integer destination pixels to real valued source pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelMapping {
    mapping: CoordinateMapping,
    src_size: ImageSize,
    dst_size: ImageSize,
}

impl PixelMapping {
    /// The size of the source image.
    pub fn src_size(&self) -> ImageSize {
        self.src_size
    }

    /// The size of the destination image.
    pub fn dst_size(&self) -> ImageSize {
        self.dst_size
    }

    /// The wrapped mapping.
    pub fn mapping(&self) -> &CoordinateMapping {
        &self.mapping
    }

    /// Map a destination pixel to its source position in pixels.
    ///
    /// Returns [`OUT_OF_RANGE`] when the pixel has no source.
    pub fn map(&self, x: usize, y: usize) -> (f32, f32) {
        let nx = x as f32 / self.dst_size.width as f32;
        let ny = y as f32 / self.dst_size.height as f32;

        match self.mapping.evaluate(nx, ny, self.src_size, self.dst_size) {
            Some((u, v)) if u.is_finite() && v.is_finite() => (
                snap(u * self.src_size.width as f32),
                snap(v * self.src_size.height as f32),
            ),
            _ => OUT_OF_RANGE,
        }
    }
}

/// Wrap a mapping so it accepts destination pixels and returns source pixels.
///
/// # Errors
///
/// Fails if either size is empty.
pub fn build_mapping(
    src_size: ImageSize,
    dst_size: ImageSize,
    mapping: CoordinateMapping,
) -> Result<PixelMapping, ImageError> {
    if src_size.is_empty() {
        return Err(ImageError::InvalidImageSize(src_size.width, src_size.height));
    }
    if dst_size.is_empty() {
        return Err(ImageError::InvalidImageSize(dst_size.width, dst_size.height));
    }

    Ok(PixelMapping {
        mapping,
        src_size,
        dst_size,
    })
}

/// Size of the box that contains a `size` image rotated by `angle` degrees.
///
/// `(ceil(W*|cos| + H*|sin|), ceil(W*|sin| + H*|cos|))`
///
/// # Example
///
/// ```
/// use pixmorph_imgproc::warp::rotated_output_size;
///
/// assert_eq!(rotated_output_size([4, 2].into(), 90.0), [2, 4].into());
/// ```
pub fn rotated_output_size(size: ImageSize, angle: f32) -> ImageSize {
    let (sin, cos) = angle.to_radians().sin_cos();
    let (sin, cos) = (sin.abs(), cos.abs());
    let (w, h) = (size.width as f32, size.height as f32);

    ImageSize {
        width: (snap(w * cos + h * sin).ceil() as usize).max(1),
        height: (snap(w * sin + h * cos).ceil() as usize).max(1),
    }
}

#[cfg(test)]
mod tests {
    use super::{build_mapping, rotated_output_size, snap, CoordinateMapping, OUT_OF_RANGE};
    use crate::warp::{AffineMap, ControlPointSet, WarpMethod};
    use pixmorph_image::{ImageError, ImageSize};

    #[test]
    fn snap_values() {
        assert_eq!(snap(2.9999998), 3.0);
        assert_eq!(snap(-0.0000001), 0.0);
        assert_eq!(snap(2.5), 2.5);
    }

    #[test]
    fn degenerate_spline_scales_to_source() -> Result<(), ImageError> {
        let corners = vec![(0, 0), (10, 0), (0, 10)];
        let mapping = build_mapping(
            [10, 10].into(),
            [20, 20].into(),
            CoordinateMapping::Warp {
                points: ControlPointSet::new(corners.clone(), corners)?,
                method: WarpMethod::ThinPlateSpline { stiffness: 1e30 },
            },
        )?;

        assert_eq!(mapping.map(15, 15), (7.5, 7.5));
        assert_eq!(mapping.map(0, 0), (0.0, 0.0));
        Ok(())
    }

    #[test]
    fn identity_affine_mapping() -> Result<(), ImageError> {
        let size: ImageSize = [7, 5].into();
        let mapping = build_mapping(
            size,
            size,
            CoordinateMapping::affine(&AffineMap::identity(), (0.0, 0.0)),
        )?;
        for y in 0..5 {
            for x in 0..7 {
                assert_eq!(mapping.map(x, y), (x as f32, y as f32));
            }
        }
        Ok(())
    }

    #[test]
    fn scaling_affine_mapping() -> Result<(), ImageError> {
        let mapping = build_mapping(
            [4, 4].into(),
            [8, 8].into(),
            CoordinateMapping::affine(&AffineMap::scaling(2.0, 2.0), (0.0, 0.0)),
        )?;
        assert_eq!(mapping.map(0, 0), (0.0, 0.0));
        assert_eq!(mapping.map(2, 4), (1.0, 2.0));
        assert_eq!(mapping.map(7, 7), (3.5, 3.5));
        Ok(())
    }

    #[test]
    fn singular_affine_mapping() -> Result<(), ImageError> {
        let m = AffineMap::new([1.0, 1.0, 0.0, 1.0, 1.0, 0.0]);
        let mapping = build_mapping(
            [3, 3].into(),
            [3, 3].into(),
            CoordinateMapping::affine(&m, (0.0, 0.0)),
        )?;
        assert_eq!(mapping.map(1, 1), OUT_OF_RANGE);
        Ok(())
    }

    #[test]
    fn rotation_mapping_90() -> Result<(), ImageError> {
        // 2x2 image rotated about its center: dst (0, 0) comes from src (0, 1)
        let mapping = build_mapping(
            [2, 2].into(),
            [2, 2].into(),
            CoordinateMapping::rotation(90.0, (0.5, 0.5), (0.5, 0.5)),
        )?;
        assert_eq!(mapping.map(0, 0), (0.0, 1.0));
        assert_eq!(mapping.map(1, 0), (0.0, 0.0));
        assert_eq!(mapping.map(1, 1), (1.0, 0.0));
        Ok(())
    }

    #[test]
    fn empty_sizes_fail() {
        let res = build_mapping(
            [0, 3].into(),
            [3, 3].into(),
            CoordinateMapping::rotation(0.0, (0.0, 0.0), (0.0, 0.0)),
        );
        assert!(res.is_err());
    }

    #[test]
    fn rotated_sizes() {
        assert_eq!(rotated_output_size([10, 4].into(), 0.0), [10, 4].into());
        assert_eq!(rotated_output_size([10, 4].into(), 180.0), [10, 4].into());
        assert_eq!(rotated_output_size([10, 4].into(), -90.0), [4, 10].into());
        assert_eq!(rotated_output_size([10, 10].into(), 45.0), [15, 15].into());
    }
}
