use pixmorph_image::Image;

/// Kernel for nearest neighbor interpolation
///
/// The coordinates are rounded half away from zero. A pixel that rounds outside the image is
/// black (or transparent black), it is not clamped to the border.
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
pub(crate) fn nearest_neighbor_interpolation<const C: usize>(
    image: &Image<u8, C>,
    u: f32,
    v: f32,
) -> [u8; C] {
    let (rows, cols) = (image.rows(), image.cols());

    let iu = u.round();
    let iv = v.round();

    let mut pixel = [0u8; C];
    if !(iu >= 0.0 && iu < cols as f32 && iv >= 0.0 && iv < rows as f32) {
        return pixel;
    }

    let base = (iv as usize * cols + iu as usize) * C;
    pixel.copy_from_slice(&image.as_slice()[base..base + C]);

    pixel
}

#[cfg(test)]
mod tests {
    use super::nearest_neighbor_interpolation;
    use pixmorph_image::{Image, ImageError};

    #[test]
    fn nearest_rounds_half_away_from_zero() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::new([3, 1].into(), vec![10, 20, 30])?;
        assert_eq!(nearest_neighbor_interpolation(&image, 0.5, 0.0), [20]);
        assert_eq!(nearest_neighbor_interpolation(&image, 1.49, 0.0), [20]);
        assert_eq!(nearest_neighbor_interpolation(&image, 1.5, 0.2), [30]);
        assert_eq!(nearest_neighbor_interpolation(&image, -0.4, 0.0), [10]);
        Ok(())
    }

    #[test]
    fn nearest_outside_is_zero() -> Result<(), ImageError> {
        let image = Image::<u8, 4>::from_size_val([2, 2].into(), 200)?;
        assert_eq!(nearest_neighbor_interpolation(&image, -0.6, 0.0), [0; 4]);
        assert_eq!(nearest_neighbor_interpolation(&image, 1.5, 0.0), [0; 4]);
        assert_eq!(nearest_neighbor_interpolation(&image, 0.0, 2.0), [0; 4]);
        assert_eq!(nearest_neighbor_interpolation(&image, 1.4, 1.4), [200; 4]);
        Ok(())
    }
}
