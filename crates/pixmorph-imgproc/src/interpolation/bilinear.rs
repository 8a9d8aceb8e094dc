use pixmorph_image::Image;

use super::interpolate::{safe_get, saturate_u8};

/// Kernel for bilinear interpolation
///
/// The four neighbors are fetched with clamped coordinates, so the kernel never reads outside
/// the image and extrapolated positions take the value of the nearest border pixel.
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
pub(crate) fn bilinear_interpolation<const C: usize>(
    image: &Image<u8, C>,
    u: f32,
    v: f32,
) -> [u8; C] {
    // past one pixel outside the border every tap clamps to the same edge pixel
    let u = u.clamp(-1.0, image.cols() as f32);
    let v = v.clamp(-1.0, image.rows() as f32);

    let x1 = u.floor();
    let y1 = v.floor();

    let frac_u = u - x1;
    let frac_v = v - y1;

    let frac_uu = 1.0 - frac_u;
    let frac_vv = 1.0 - frac_v;

    let w11 = frac_uu * frac_vv;
    let w21 = frac_u * frac_vv;
    let w12 = frac_uu * frac_v;
    let w22 = frac_u * frac_v;

    let (ix, iy) = (x1 as i64, y1 as i64);

    let p11 = safe_get(image, ix, iy);
    let p21 = safe_get(image, ix + 1, iy);
    let p12 = safe_get(image, ix, iy + 1);
    let p22 = safe_get(image, ix + 1, iy + 1);

    let mut pixel = [0u8; C];
    for k in 0..C {
        let val = p11[k] as f32 * w11
            + p21[k] as f32 * w21
            + p12[k] as f32 * w12
            + p22[k] as f32 * w22;
        pixel[k] = saturate_u8(val);
    }

    pixel
}

#[cfg(test)]
mod tests {
    use super::bilinear_interpolation;
    use pixmorph_image::{Image, ImageError};

    #[test]
    fn bilinear_midpoints() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::new([2, 2].into(), vec![0, 100, 50, 150])?;
        assert_eq!(bilinear_interpolation(&image, 0.5, 0.0), [50]);
        assert_eq!(bilinear_interpolation(&image, 0.0, 0.5), [25]);
        assert_eq!(bilinear_interpolation(&image, 0.5, 0.5), [75]);
        assert_eq!(bilinear_interpolation(&image, 0.25, 0.0), [25]);
        Ok(())
    }

    #[test]
    fn bilinear_clamps_to_border() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::new([2, 2].into(), vec![0, 100, 50, 150])?;
        assert_eq!(bilinear_interpolation(&image, 1.5, 1.5), [150]);
        assert_eq!(bilinear_interpolation(&image, 5.0, 0.0), [100]);
        assert_eq!(bilinear_interpolation(&image, -3.0, -3.0), [0]);
        Ok(())
    }

    #[test]
    fn bilinear_channels_are_independent() -> Result<(), ImageError> {
        let image = Image::<u8, 4>::new(
            [2, 1].into(),
            vec![0, 255, 10, 0, 255, 0, 30, 255],
        )?;
        assert_eq!(bilinear_interpolation(&image, 0.5, 0.0), [128, 128, 20, 128]);
        Ok(())
    }
}
