use pixmorph_image::{Image, ImageError};

use crate::parallel::par_iter_rows_indexed;

/// Clamp a signed index into `[0, len)`.
#[inline]
pub(crate) fn clamp_index(i: isize, len: usize) -> usize {
    i.clamp(0, len as isize - 1) as usize
}

/// Correlate an image with a horizontal and then a vertical 1D kernel.
///
/// Samples outside the image replicate the border. The result is kept in floating point so
/// that signed responses survive.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `kernel_x` - The horizontal kernel, odd length.
/// * `kernel_y` - The vertical kernel, odd length.
pub fn separable_filter<const C: usize>(
    src: &Image<u8, C>,
    kernel_x: &[f32],
    kernel_y: &[f32],
) -> Result<Image<f32, C>, ImageError> {
    if kernel_x.len() % 2 == 0 || kernel_y.len() % 2 == 0 {
        return Err(ImageError::InvalidParameter(format!(
            "kernel lengths must be odd, got {} and {}",
            kernel_x.len(),
            kernel_y.len()
        )));
    }

    let (cols, rows) = (src.cols(), src.rows());
    let half_x = (kernel_x.len() / 2) as isize;
    let half_y = (kernel_y.len() / 2) as isize;
    let src_data = src.as_slice();

    // horizontal pass
    let mut temp = Image::<f32, C>::from_size_val(src.size(), 0.0)?;
    par_iter_rows_indexed(&mut temp, |r, row| {
        let src_row = &src_data[r * cols * C..(r + 1) * cols * C];
        for (c, out_pixel) in row.chunks_exact_mut(C).enumerate() {
            for (ch, out) in out_pixel.iter_mut().enumerate() {
                *out = kernel_x
                    .iter()
                    .enumerate()
                    .map(|(k, &w)| {
                        let x = clamp_index(c as isize + k as isize - half_x, cols);
                        w * src_row[x * C + ch] as f32
                    })
                    .sum();
            }
        }
    });

    // vertical pass
    let temp_data = temp.as_slice();
    let mut dst = Image::<f32, C>::from_size_val(src.size(), 0.0)?;
    par_iter_rows_indexed(&mut dst, |r, row| {
        for (i, out) in row.iter_mut().enumerate() {
            *out = kernel_y
                .iter()
                .enumerate()
                .map(|(k, &w)| {
                    let y = clamp_index(r as isize + k as isize - half_y, rows);
                    w * temp_data[y * cols * C + i]
                })
                .sum();
        }
    });

    Ok(dst)
}

#[cfg(test)]
mod tests {
    use super::separable_filter;
    use pixmorph_image::{Image, ImageError};

    #[test]
    fn test_separable_filter() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let img = Image::<u8, 1>::new(
            [5, 5].into(),
            vec![
                0, 0, 0, 0, 0,
                0, 0, 0, 0, 0,
                0, 0, 9, 0, 0,
                0, 0, 0, 0, 0,
                0, 0, 0, 0, 0,
            ],
        )?;

        let kernel = vec![1.0 / 3.0; 3];
        let dst = separable_filter(&img, &kernel, &kernel)?;

        let expected = [
            [0.0, 0.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 1.0, 1.0, 0.0],
            [0.0, 1.0, 1.0, 1.0, 0.0],
            [0.0, 1.0, 1.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 0.0, 0.0],
        ];
        for (y, row) in expected.iter().enumerate() {
            for (x, &v) in row.iter().enumerate() {
                assert!((dst.get_pixel(x, y, 0)? - v).abs() < 1e-5);
            }
        }
        Ok(())
    }

    #[test]
    fn borders_replicate() -> Result<(), ImageError> {
        let img = Image::<u8, 2>::new([3, 1].into(), vec![10, 1, 20, 2, 30, 3])?;
        let dst = separable_filter(&img, &[-1.0, 0.0, 1.0], &[1.0])?;
        assert_eq!(dst.as_slice(), &[10.0, 1.0, 20.0, 2.0, 10.0, 1.0]);
        Ok(())
    }

    #[test]
    fn even_kernel_fails() -> Result<(), ImageError> {
        let img = Image::<u8, 1>::from_size_val([2, 2].into(), 1)?;
        assert!(separable_filter(&img, &[0.5, 0.5], &[1.0]).is_err());
        Ok(())
    }
}
