use pixmorph_image::{Image, ImageError, ImageSize};
use rayon::prelude::*;

/// Create a meshgrid of x and y coordinates
///
/// # Arguments
///
/// * `cols` - The number of columns indicating the width of the grid
/// * `rows` - The number of rows indicating the height of the grid
///
/// # Returns
///
/// A tuple of single channel images of shape (rows, cols) containing the x and y coordinates
pub fn meshgrid(cols: usize, rows: usize) -> Result<(Image<f32, 1>, Image<f32, 1>), ImageError> {
    meshgrid_from_fn(cols, rows, |x, y| Ok((x as f32, y as f32)))
}

/// Create a pair of coordinate maps by evaluating `f` at every grid position.
///
/// The rows are filled in parallel; `f` receives the column and row index and returns the
/// (x, y) pair stored at that position.
///
/// # Arguments
///
/// * `cols` - The number of columns of the maps.
/// * `rows` - The number of rows of the maps.
/// * `f` - The function producing the coordinates.
///
/// # Errors
///
/// Returns the first error produced by `f`, or an error if the grid is empty.
pub fn meshgrid_from_fn(
    cols: usize,
    rows: usize,
    f: impl Fn(usize, usize) -> Result<(f32, f32), ImageError> + Send + Sync,
) -> Result<(Image<f32, 1>, Image<f32, 1>), ImageError> {
    let size = ImageSize {
        width: cols,
        height: rows,
    };
    let mut map_x = Image::<f32, 1>::from_size_val(size, 0.0)?;
    let mut map_y = Image::<f32, 1>::from_size_val(size, 0.0)?;

    map_x
        .as_slice_mut()
        .par_chunks_exact_mut(cols)
        .zip(map_y.as_slice_mut().par_chunks_exact_mut(cols))
        .enumerate()
        .try_for_each(|(r, (row_x, row_y))| {
            for (c, (x, y)) in row_x.iter_mut().zip(row_y.iter_mut()).enumerate() {
                (*x, *y) = f(c, r)?;
            }
            Ok::<(), ImageError>(())
        })?;

    Ok((map_x, map_y))
}

#[cfg(test)]
mod tests {
    use pixmorph_image::ImageError;

    #[test]
    fn meshgrid_smoke() -> Result<(), ImageError> {
        let (map_x, map_y) = super::meshgrid(3, 2)?;
        assert_eq!(map_x.as_slice(), &[0.0, 1.0, 2.0, 0.0, 1.0, 2.0]);
        assert_eq!(map_y.as_slice(), &[0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
        Ok(())
    }

    #[test]
    fn meshgrid_from_fn_error() {
        let res = super::meshgrid_from_fn(2, 2, |x, _| {
            if x == 1 {
                Err(ImageError::InvalidParameter("bad column".into()))
            } else {
                Ok((0.0, 0.0))
            }
        });
        assert!(res.is_err());
    }
}
