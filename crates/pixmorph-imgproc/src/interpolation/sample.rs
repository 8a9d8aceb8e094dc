use pixmorph_image::{DynamicImage, ImageError, ImageType};

use super::{interpolate_pixel, InterpolationMode};

/// A sampled pixel value, tagged with the layout of the image it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pixel {
    /// Luminance sample.
    Gray(u8),
    /// Red, green and blue samples.
    Rgb([u8; 3]),
    /// Red, green, blue and alpha samples.
    Rgba([u8; 4]),
}

impl Pixel {
    /// Expand the pixel to RGBA, pixels without alpha are fully opaque.
    pub fn to_rgba(&self) -> [u8; 4] {
        match *self {
            Pixel::Gray(v) => [v, v, v, 255],
            Pixel::Rgb([r, g, b]) => [r, g, b, 255],
            Pixel::Rgba(p) => p,
        }
    }

    /// The alpha of the pixel, 255 when the source has no alpha channel.
    pub fn alpha(&self) -> u8 {
        self.to_rgba()[3]
    }
}

/// Sample an image at a fractional coordinate.
///
/// # Arguments
///
/// * `image` - The image to sample.
/// * `x` - The x coordinate, may be negative or past the right border.
/// * `y` - The y coordinate, may be negative or past the bottom border.
/// * `interpolation` - The interpolation mode to use.
///
/// # Errors
///
/// Binary images cannot be interpolated and fail with [`ImageError::UnsupportedImageType`].
///
/// # Example
///
/// ```
/// use pixmorph_image::{DynamicImage, Image};
/// use pixmorph_imgproc::interpolation::{sample, InterpolationMode, Pixel};
///
/// let image = Image::<u8, 1>::new([2, 1].into(), vec![0, 100]).unwrap();
/// let pixel = sample(&DynamicImage::from(image), 0.5, 0.0, InterpolationMode::Bilinear).unwrap();
/// assert_eq!(pixel, Pixel::Gray(50));
/// ```
pub fn sample(
    image: &DynamicImage,
    x: f32,
    y: f32,
    interpolation: InterpolationMode,
) -> Result<Pixel, ImageError> {
    match image {
        DynamicImage::Gray8(img) => {
            let [v] = interpolate_pixel(img, x, y, interpolation);
            Ok(Pixel::Gray(v))
        }
        DynamicImage::Rgb8(img) => Ok(Pixel::Rgb(interpolate_pixel(img, x, y, interpolation))),
        DynamicImage::Rgba8(img) => Ok(Pixel::Rgba(interpolate_pixel(img, x, y, interpolation))),
        DynamicImage::Binary(_) => Err(ImageError::UnsupportedImageType(ImageType::Binary)),
    }
}
