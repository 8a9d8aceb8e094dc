use std::f32::consts::PI;

use pixmorph_image::{ImageError, ImageSize};

use super::mapping::snap;

/// Determinants with a smaller magnitude are treated as singular.
pub const SINGULAR_EPSILON: f32 = 1e-6;

/// A 2x3 affine transformation `x' = a*x + b*y + c`, `y' = d*x + e*y + f`.
///
/// The coefficients are stored row-major as `[a, b, c, d, e, f]`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AffineMap(pub [f32; 6]);

impl Default for AffineMap {
    fn default() -> Self {
        Self::identity()
    }
}

impl AffineMap {
    /// Create a map from its six coefficients.
    pub fn new(m: [f32; 6]) -> Self {
        Self(m)
    }

    /// The identity map.
    pub fn identity() -> Self {
        Self([1.0, 0.0, 0.0, 0.0, 1.0, 0.0])
    }

    /// Translation by `(tx, ty)`.
    pub fn translation(tx: f32, ty: f32) -> Self {
        Self([1.0, 0.0, tx, 0.0, 1.0, ty])
    }

    /// Scaling about the origin.
    pub fn scaling(sx: f32, sy: f32) -> Self {
        Self([sx, 0.0, 0.0, 0.0, sy, 0.0])
    }

    /// Rotation by `angle` degrees about `center`, see [`get_rotation_matrix2d`].
    pub fn rotation(angle: f32, center: (f32, f32)) -> Self {
        Self(get_rotation_matrix2d(center, angle, 1.0))
    }

    /// Shear along x by `shx` and along y by `shy`.
    pub fn shear(shx: f32, shy: f32) -> Self {
        Self([1.0, shx, 0.0, shy, 1.0, 0.0])
    }

    /// The coefficients `[a, b, c, d, e, f]`.
    pub fn coeffs(&self) -> &[f32; 6] {
        &self.0
    }

    /// Determinant of the linear part, `a*e - b*d`.
    pub fn determinant(&self) -> f32 {
        let m = &self.0;
        m[0] * m[4] - m[1] * m[3]
    }

    /// Returns true if the map cannot be inverted.
    pub fn is_singular(&self) -> bool {
        let det = self.determinant();
        det.is_nan() || det.abs() < SINGULAR_EPSILON
    }

    /// Invert the map.
    ///
    /// # Errors
    ///
    /// Fails with [`ImageError::SingularMatrix`] if `|det| < 1e-6`.
    pub fn inverse(&self) -> Result<Self, ImageError> {
        invert_affine_transform(&self.0).map(Self)
    }

    /// Compose two maps; the result applies `self` first and then `next`.
    pub fn compose(&self, next: &AffineMap) -> Self {
        let (a, b) = (&next.0, &self.0);
        Self([
            a[0] * b[0] + a[1] * b[3],
            a[0] * b[1] + a[1] * b[4],
            a[0] * b[2] + a[1] * b[5] + a[2],
            a[3] * b[0] + a[4] * b[3],
            a[3] * b[1] + a[4] * b[4],
            a[3] * b[2] + a[4] * b[5] + a[5],
        ])
    }

    /// Applies the map to a point.
    pub fn transform_point(&self, x: f32, y: f32) -> (f32, f32) {
        transform_point(x, y, &self.0)
    }
}

/// Inverts a 2x3 affine transformation matrix.
///
/// Arguments:
///
/// * `m` - The 2x3 affine transformation matrix.
///
/// Returns:
///
/// The inverted 2x3 affine transformation matrix.
///
/// # Errors
///
/// Fails with [`ImageError::SingularMatrix`] instead of dividing by a vanishing determinant.
pub fn invert_affine_transform(m: &[f32; 6]) -> Result<[f32; 6], ImageError> {
    let (a, b, c, d, e, f) = (m[0], m[1], m[2], m[3], m[4], m[5]);

    let determinant = a * e - b * d;
    if determinant.is_nan() || determinant.abs() < SINGULAR_EPSILON {
        return Err(ImageError::SingularMatrix(determinant));
    }
    let inv_determinant = 1.0 / determinant;

    let new_a = e * inv_determinant;
    let new_b = -b * inv_determinant;
    let new_d = -d * inv_determinant;
    let new_e = a * inv_determinant;
    let new_c = -(new_a * c + new_b * f);
    let new_f = -(new_d * c + new_e * f);

    Ok([new_a, new_b, new_c, new_d, new_e, new_f])
}

/// Returns a 2x3 rotation matrix for a 2D rotation around a center point.
///
/// The rotation matrix is defined as:
///
/// | alpha  -beta  tx |
/// | beta   alpha  ty |
///
/// where:
///
/// alpha = scale * cos(angle)
/// beta = scale * sin(angle)
/// tx = (1 - alpha) * center.x + beta * center.y
/// ty = -beta * center.x + (1 - alpha) * center.y
///
/// With the y axis pointing down, a positive angle turns the image clockwise on screen.
///
/// # Arguments
///
/// * `center` - The center point of the rotation.
/// * `angle` - The angle of rotation in degrees.
/// * `scale` - The scale factor.
///
/// # Example
///
/// ```
/// use pixmorph_imgproc::warp::get_rotation_matrix2d;
///
/// let rotation_matrix = get_rotation_matrix2d((0.0, 0.0), 90.0, 1.0);
/// assert!((rotation_matrix[1] + 1.0).abs() < 1e-6);
/// ```
pub fn get_rotation_matrix2d(center: (f32, f32), angle: f32, scale: f32) -> [f32; 6] {
    let angle = angle * PI / 180.0f32;
    let alpha = scale * angle.cos();
    let beta = scale * angle.sin();

    let tx = (1.0 - alpha) * center.0 + beta * center.1;
    let ty = -beta * center.0 + (1.0 - alpha) * center.1;

    [alpha, -beta, tx, beta, alpha, ty]
}

/// Applies an affine transformation to a point.
fn transform_point(x: f32, y: f32, m: &[f32; 6]) -> (f32, f32) {
    let u = m[0] * x + m[1] * y + m[2];
    let v = m[3] * x + m[4] * y + m[5];
    (u, v)
}

/// Axis aligned box covering the image of a source rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputBounds {
    /// Smallest x coordinate covered, in destination space.
    pub min_x: f32,
    /// Smallest y coordinate covered, in destination space.
    pub min_y: f32,
    /// Size of the box, never empty.
    pub size: ImageSize,
}

/// Compute the bounding box of the four transformed corners of a `size` image.
///
/// The box is expanded outwards to whole pixels.
///
/// # Example
///
/// ```
/// use pixmorph_imgproc::warp::{affine_output_bounds, AffineMap};
///
/// let bounds = affine_output_bounds(&AffineMap::scaling(2.0, 2.0), [4, 4].into());
/// assert_eq!(bounds.size, [8, 8].into());
/// ```
pub fn affine_output_bounds(m: &AffineMap, size: ImageSize) -> OutputBounds {
    let (w, h) = (size.width as f32, size.height as f32);
    let corners = [(0.0, 0.0), (w, 0.0), (0.0, h), (w, h)].map(|(x, y)| m.transform_point(x, y));

    let (mut min_x, mut min_y) = (f32::INFINITY, f32::INFINITY);
    let (mut max_x, mut max_y) = (f32::NEG_INFINITY, f32::NEG_INFINITY);
    for (x, y) in corners {
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }

    let (min_x, min_y) = (snap(min_x).floor(), snap(min_y).floor());
    let (max_x, max_y) = (snap(max_x).ceil(), snap(max_y).ceil());

    OutputBounds {
        min_x,
        min_y,
        size: ImageSize {
            width: ((max_x - min_x) as usize).max(1),
            height: ((max_y - min_y) as usize).max(1),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::{affine_output_bounds, get_rotation_matrix2d, invert_affine_transform, AffineMap};
    use approx::assert_relative_eq;
    use pixmorph_image::{ErrorCode, ImageError};

    fn assert_map_eq(a: &AffineMap, b: &AffineMap) {
        for (x, y) in a.coeffs().iter().zip(b.coeffs().iter()) {
            assert_relative_eq!(x, y, epsilon = 1e-5);
        }
    }

    #[test]
    fn invert_roundtrip() -> Result<(), ImageError> {
        let m = AffineMap::new([2.0, 0.5, 3.0, -1.0, 1.5, -4.0]);
        let inv = m.inverse()?;
        assert_map_eq(&m.compose(&inv), &AffineMap::identity());

        let (x, y) = m.transform_point(7.0, -2.0);
        let (u, v) = inv.transform_point(x, y);
        assert_relative_eq!(u, 7.0, epsilon = 1e-4);
        assert_relative_eq!(v, -2.0, epsilon = 1e-4);
        Ok(())
    }

    #[test]
    fn invert_singular() {
        let m = AffineMap::new([1.0, 1.0, 0.0, 1.0, 1.0, 0.0]);
        assert!(m.is_singular());
        assert_eq!(m.determinant(), 0.0);

        let err = m.inverse().unwrap_err();
        assert_eq!(err.code(), ErrorCode::ProcessingFailed);
        assert!(invert_affine_transform(&[0.0; 6]).is_err());
    }

    #[test]
    fn compose_order() {
        let m = AffineMap::scaling(2.0, 2.0).compose(&AffineMap::translation(1.0, 0.0));
        assert_eq!(m.transform_point(3.0, 1.0), (7.0, 2.0));

        let m = AffineMap::translation(1.0, 0.0).compose(&AffineMap::scaling(2.0, 2.0));
        assert_eq!(m.transform_point(3.0, 1.0), (8.0, 2.0));
    }

    #[test]
    fn rotation_matrix_90() {
        let m = get_rotation_matrix2d((0.0, 0.0), 90.0, 1.0);
        let (x, y) = AffineMap::new(m).transform_point(1.0, 0.0);
        assert_relative_eq!(x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn rotation_keeps_center() {
        let m = AffineMap::rotation(33.0, (5.0, 7.0));
        let (x, y) = m.transform_point(5.0, 7.0);
        assert_relative_eq!(x, 5.0, epsilon = 1e-5);
        assert_relative_eq!(y, 7.0, epsilon = 1e-5);
    }

    #[test]
    fn output_bounds() {
        let bounds = affine_output_bounds(&AffineMap::identity(), [5, 3].into());
        assert_eq!(bounds.size, [5, 3].into());
        assert_eq!((bounds.min_x, bounds.min_y), (0.0, 0.0));

        let bounds = affine_output_bounds(&AffineMap::translation(-2.5, 1.0), [4, 4].into());
        assert_eq!(bounds.size, [5, 4].into());
        assert_eq!((bounds.min_x, bounds.min_y), (-3.0, 1.0));

        let bounds = affine_output_bounds(&AffineMap::rotation(90.0, (0.0, 0.0)), [4, 2].into());
        assert_eq!(bounds.size, [2, 4].into());
    }
}
