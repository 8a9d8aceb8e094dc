use pixmorph_image::Image;

use super::interpolate::{safe_get, saturate_u8};

/// One dimensional Catmull-Rom spline through `p1` and `p2` evaluated at `t` in [0, 1].
#[inline]
fn cubic_hermite(p0: f32, p1: f32, p2: f32, p3: f32, t: f32) -> f32 {
    let a = -0.5 * p0 + 1.5 * p1 - 1.5 * p2 + 0.5 * p3;
    let b = p0 - 2.5 * p1 + 2.0 * p2 - 0.5 * p3;
    let c = -0.5 * p0 + 0.5 * p2;
    let d = p1;

    ((a * t + b) * t + c) * t + d
}

/// Kernel for bicubic interpolation
///
/// Samples the 4x4 neighborhood around `(u, v)` with clamped coordinates, interpolates each
/// row with a Catmull-Rom spline and then interpolates the four row results along the column.
/// The spline passes through its control points, so integer coordinates return the source
/// pixel unchanged.
///
/// # Arguments
///
/// * `image` - The input image container.
/// * `u` - The x coordinate of the pixel to interpolate.
/// * `v` - The y coordinate of the pixel to interpolate.
///
/// # Returns
///
/// The interpolated pixel values.
pub(crate) fn bicubic_interpolation<const C: usize>(
    image: &Image<u8, C>,
    u: f32,
    v: f32,
) -> [u8; C] {
    // keeps the 4x4 tap offsets inside i64 for far away coordinates
    let u = u.clamp(-2.0, image.cols() as f32 + 1.0);
    let v = v.clamp(-2.0, image.rows() as f32 + 1.0);

    let fx = u.floor();
    let fy = v.floor();

    let (ix, iy) = (fx as i64, fy as i64);
    let (tx, ty) = (u - fx, v - fy);

    let mut pixel = [0u8; C];
    for (k, out) in pixel.iter_mut().enumerate() {
        let mut col = [0.0f32; 4];
        for (j, dy) in (-1..=2).enumerate() {
            let p = |dx: i64| safe_get(image, ix + dx, iy + dy)[k] as f32;
            col[j] = cubic_hermite(p(-1), p(0), p(1), p(2), tx);
        }
        *out = saturate_u8(cubic_hermite(col[0], col[1], col[2], col[3], ty));
    }

    pixel
}
