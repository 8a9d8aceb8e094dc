use std::borrow::Cow;

use image::ExtendedColorType;
use pixmorph_image::{DynamicImage, Image, ImageSize};

use crate::error::IoError;

/// Convert an image decoded by the `image` crate, any alpha makes it RGBA.
pub(crate) fn from_raster(img: image::DynamicImage) -> Result<DynamicImage, IoError> {
    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };
    let color = img.color();

    Ok(match color {
        image::ColorType::L8 | image::ColorType::L16 => {
            DynamicImage::Gray8(Image::new(size, img.into_luma8().into_raw())?)
        }
        c if c.has_alpha() => DynamicImage::Rgba8(Image::new(size, img.into_rgba8().into_raw())?),
        _ => DynamicImage::Rgb8(Image::new(size, img.into_rgb8().into_raw())?),
    })
}

/// The samples of `image` in a layout the `image` crate encoders accept.
///
/// Binary images are expanded to 0/255 grayscale.
pub(crate) fn to_raster(image: &DynamicImage) -> Result<(Cow<'_, [u8]>, ExtendedColorType), IoError> {
    Ok(match image {
        DynamicImage::Gray8(img) => (Cow::Borrowed(img.as_slice()), ExtendedColorType::L8),
        DynamicImage::Rgb8(img) => (Cow::Borrowed(img.as_slice()), ExtendedColorType::Rgb8),
        DynamicImage::Rgba8(img) => (Cow::Borrowed(img.as_slice()), ExtendedColorType::Rgba8),
        DynamicImage::Binary(_) => (
            Cow::Owned(image.to_gray8()?.into_vec()),
            ExtendedColorType::L8,
        ),
    })
}

/// Image dimensions as expected by the encoders.
pub(crate) fn dimensions(size: ImageSize) -> Result<(u32, u32), IoError> {
    match (u32::try_from(size.width), u32::try_from(size.height)) {
        (Ok(w), Ok(h)) => Ok((w, h)),
        _ => Err(IoError::UnsupportedImageFormat(format!(
            "{size} is too large to encode"
        ))),
    }
}
