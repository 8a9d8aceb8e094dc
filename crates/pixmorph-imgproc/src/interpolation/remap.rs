use crate::parallel;

use super::interpolate::interpolate_pixel;
use super::InterpolationMode;
use pixmorph_image::{Image, ImageError};

/// Apply generic geometric transformation to an image.
///
/// Each destination pixel reads its source coordinate from `map_x`/`map_y`. Coordinates
/// outside `[0, width) x [0, height)` are not sampled: the destination pixel keeps its current
/// value, except that images with four channels get a transparent alpha (0).
///
/// # Arguments
///
/// * `src` - The input image container with shape (height, width, C).
/// * `dst` - The output image container with shape (height, width, C).
/// * `map_x` - The x coordinates of the pixels to interpolate.
/// * `map_y` - The y coordinates of the pixels to interpolate.
/// * `interpolation` - The interpolation mode to use.
///
/// # Errors
///
/// * The mapx and mapy must have the same size.
/// * The output image must have the same size as the mapx and mapy.
pub fn remap<const C: usize>(
    src: &Image<u8, C>,
    dst: &mut Image<u8, C>,
    map_x: &Image<f32, 1>,
    map_y: &Image<f32, 1>,
    interpolation: InterpolationMode,
) -> Result<(), ImageError> {
    if map_x.size() != map_y.size() {
        return Err(ImageError::ImageSizeMismatch(
            map_x.width(),
            map_x.height(),
            map_y.width(),
            map_y.height(),
        ));
    }

    if dst.size() != map_x.size() {
        return Err(ImageError::ImageSizeMismatch(
            map_x.width(),
            map_x.height(),
            dst.width(),
            dst.height(),
        ));
    }

    let (cols, rows) = (src.cols() as f32, src.rows() as f32);

    // parallelize the remap operation by rows
    parallel::par_iter_rows_resample(dst, map_x, map_y, |&x, &y, dst_pixel| {
        // check if the position is within the bounds of the src image
        if x >= 0.0 && x < cols && y >= 0.0 && y < rows {
            dst_pixel.copy_from_slice(&interpolate_pixel(src, x, y, interpolation));
        } else if C == 4 {
            dst_pixel[3] = 0;
        }
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use pixmorph_image::{Image, ImageError, ImageSize};

    #[test]
    fn remap_smoke() -> Result<(), ImageError> {
        let image = Image::<_, 1>::new(
            ImageSize {
                width: 3,
                height: 3,
            },
            vec![0u8, 1, 2, 3, 4, 5, 6, 7, 8],
        )?;

        let new_size = [2, 2].into();

        let map_x = Image::<f32, 1>::new(new_size, vec![0.0, 2.0, 0.0, 2.0])?;
        let map_y = Image::<f32, 1>::new(new_size, vec![0.0, 0.0, 2.0, 2.0])?;

        let mut image_transformed = Image::<u8, 1>::from_size_val(new_size, 0)?;

        super::remap(
            &image,
            &mut image_transformed,
            &map_x,
            &map_y,
            super::InterpolationMode::Bilinear,
        )?;

        assert_eq!(image_transformed.num_channels(), 1);
        assert_eq!(image_transformed.size().width, 2);
        assert_eq!(image_transformed.size().height, 2);
        assert_eq!(image_transformed.as_slice(), &[0, 2, 6, 8]);

        Ok(())
    }

    #[test]
    fn remap_out_of_bounds_alpha() -> Result<(), ImageError> {
        let image = Image::<u8, 4>::from_size_val([2, 2].into(), 255)?;
        let size = [2, 1].into();
        let map_x = Image::<f32, 1>::new(size, vec![0.0, -1.0])?;
        let map_y = Image::<f32, 1>::new(size, vec![0.0, 0.0])?;

        let mut dst = Image::<u8, 4>::from_size_val(size, 9)?;
        super::remap(
            &image,
            &mut dst,
            &map_x,
            &map_y,
            super::InterpolationMode::Nearest,
        )?;

        assert_eq!(dst.as_slice(), &[255, 255, 255, 255, 9, 9, 9, 0]);
        Ok(())
    }

    #[test]
    fn remap_size_mismatch() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::from_size_val([2, 2].into(), 0)?;
        let map_x = Image::<f32, 1>::from_size_val([2, 2].into(), 0.0)?;
        let map_y = Image::<f32, 1>::from_size_val([2, 1].into(), 0.0)?;
        let mut dst = Image::<u8, 1>::from_size_val([2, 2].into(), 0)?;

        let res = super::remap(
            &image,
            &mut dst,
            &map_x,
            &map_y,
            super::InterpolationMode::Nearest,
        );
        assert!(matches!(res, Err(ImageError::ImageSizeMismatch(..))));
        Ok(())
    }
}
