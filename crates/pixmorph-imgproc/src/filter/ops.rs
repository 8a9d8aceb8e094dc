use pixmorph_image::{Image, ImageError};

use crate::interpolation::interpolate::saturate_u8;
use crate::parallel::par_iter_rows_indexed;

use super::kernels::{box_blur_kernel_1d, check_kernel_size, sobel_kernel_1d};
use super::separable_filter::{clamp_index, separable_filter};

/// Number of leading channels that carry color, the alpha of RGBA images is excluded.
const fn color_channels(channels: usize) -> usize {
    if channels == 4 {
        3
    } else {
        channels
    }
}

/// Round filtered values back to 8 bits, copying the alpha channel from `src`.
fn to_u8_keep_alpha<const C: usize>(
    src: &Image<u8, C>,
    filtered: &Image<f32, C>,
    f: impl Fn(f32) -> u8,
) -> Result<Image<u8, C>, ImageError> {
    let colors = color_channels(C);
    let data = filtered
        .as_slice()
        .iter()
        .zip(src.as_slice())
        .enumerate()
        .map(|(i, (&v, &s))| if i % C < colors { f(v) } else { s })
        .collect();
    Image::new(src.size(), data)
}

/// Blur an image using a box blur filter.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `kernel_size` - The side of the square window, odd.
///
/// Borders are replicated. For four channel images the alpha channel is copied unchanged.
pub fn box_blur<const C: usize>(
    src: &Image<u8, C>,
    kernel_size: usize,
) -> Result<Image<u8, C>, ImageError> {
    check_kernel_size(kernel_size)?;
    let kernel = box_blur_kernel_1d(kernel_size);
    let blurred = separable_filter(src, &kernel, &kernel)?;
    to_u8_keep_alpha(src, &blurred, saturate_u8)
}

/// Replace every sample by the median of its `kernel_size x kernel_size` neighborhood.
///
/// Borders are replicated. For four channel images the alpha channel is copied unchanged.
pub fn median_blur<const C: usize>(
    src: &Image<u8, C>,
    kernel_size: usize,
) -> Result<Image<u8, C>, ImageError> {
    check_kernel_size(kernel_size)?;

    let (cols, rows) = (src.cols(), src.rows());
    let half = (kernel_size / 2) as isize;
    let colors = color_channels(C);
    let src_data = src.as_slice();

    let mut dst = Image::<u8, C>::new(src.size(), src_data.to_vec())?;
    par_iter_rows_indexed(&mut dst, |r, row| {
        let mut window = Vec::with_capacity(kernel_size * kernel_size);
        for (c, pixel) in row.chunks_exact_mut(C).enumerate() {
            for (ch, out) in pixel.iter_mut().enumerate().take(colors) {
                window.clear();
                for dy in -half..=half {
                    let y = clamp_index(r as isize + dy, rows);
                    for dx in -half..=half {
                        let x = clamp_index(c as isize + dx, cols);
                        window.push(src_data[(y * cols + x) * C + ch]);
                    }
                }
                let mid = window.len() / 2;
                *out = *window.select_nth_unstable(mid).1;
            }
        }
    });

    Ok(dst)
}

/// Compute the sobel gradient magnitude of every color channel.
///
/// The magnitude `sqrt(gx^2 + gy^2)` is clamped to 255. Borders are replicated and the alpha
/// channel of four channel images is kept.
pub fn sobel<const C: usize>(src: &Image<u8, C>) -> Result<Image<u8, C>, ImageError> {
    let (derivative, smoothing) = sobel_kernel_1d();

    let gx = separable_filter(src, &derivative, &smoothing)?;
    let gy = separable_filter(src, &smoothing, &derivative)?;

    let mut magnitude = gx;
    magnitude
        .as_slice_mut()
        .iter_mut()
        .zip(gy.as_slice())
        .for_each(|(x, &y)| *x = x.hypot(y));

    to_u8_keep_alpha(src, &magnitude, |v| v.min(255.0) as u8)
}
