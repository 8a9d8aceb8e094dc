use std::{fs, path::Path};

use jpeg_encoder::{ColorType, Encoder};
use pixmorph_image::{DynamicImage, Image, ImageSize};

use crate::error::IoError;

/// Quality used when the caller does not pick one.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Writes the given image as JPEG to the given file path.
///
/// # Arguments
///
/// - `file_path` - The path to the JPEG image.
/// - `image` - The image to encode. Binary images are stored as 0/255 grayscale.
/// - `quality` - The quality of the JPEG encoding, range from 0 (lowest) to 100 (highest)
pub fn write_image_jpeg(
    file_path: impl AsRef<Path>,
    image: &DynamicImage,
    quality: u8,
) -> Result<(), IoError> {
    match image {
        DynamicImage::Gray8(img) => write_image_jpeg_imp(file_path, img, ColorType::Luma, quality),
        DynamicImage::Rgb8(img) => write_image_jpeg_imp(file_path, img, ColorType::Rgb, quality),
        DynamicImage::Rgba8(img) => write_image_jpeg_imp(file_path, img, ColorType::Rgba, quality),
        DynamicImage::Binary(_) => {
            write_image_jpeg_imp(file_path, &image.to_gray8()?, ColorType::Luma, quality)
        }
    }
}

fn write_image_jpeg_imp<const N: usize>(
    file_path: impl AsRef<Path>,
    image: &Image<u8, N>,
    color_type: ColorType,
    quality: u8,
) -> Result<(), IoError> {
    let image_size = image.size();
    let (Ok(width), Ok(height)) = (
        u16::try_from(image_size.width),
        u16::try_from(image_size.height),
    ) else {
        return Err(IoError::UnsupportedImageFormat(format!(
            "{image_size} is too large for JPEG"
        )));
    };

    let encoder = Encoder::new_file(file_path, quality.min(100))?;
    encoder.encode(image.as_slice(), width, height, color_type)?;
    Ok(())
}

/// Reads a JPEG file.
///
/// # Arguments
///
/// - `file_path` - The path to the JPEG file.
///
/// # Returns
///
/// A grayscale, RGB or RGBA image depending on the decoded channel count.
pub fn read_image_jpeg(file_path: impl AsRef<Path>) -> Result<DynamicImage, IoError> {
    let jpeg_data = fs::read(file_path)?;
    decode_image_jpeg(&jpeg_data)
}

/// Decodes a JPEG image from raw bytes.
///
/// # Arguments
///
/// - `src` - Raw bytes of the jpeg file
pub fn decode_image_jpeg(src: &[u8]) -> Result<DynamicImage, IoError> {
    let mut decoder = zune_jpeg::JpegDecoder::new(src);
    decoder.decode_headers()?;

    let image_info = decoder.info().ok_or_else(|| {
        IoError::JpegDecodingError(zune_jpeg::errors::DecodeErrors::Format(String::from(
            "Failed to find image info from its metadata",
        )))
    })?;

    let image_size = ImageSize {
        width: image_info.width as usize,
        height: image_info.height as usize,
    };

    let img_data = decoder.decode()?;

    let channels = img_data.len() / image_size.area().max(1);
    log::debug!("decoded jpeg {image_size} with {channels} channels");

    Ok(match channels {
        1 => DynamicImage::Gray8(Image::new(image_size, img_data)?),
        3 => DynamicImage::Rgb8(Image::new(image_size, img_data)?),
        4 => DynamicImage::Rgba8(Image::new(image_size, img_data)?),
        n => {
            return Err(IoError::UnsupportedImageFormat(format!(
                "jpeg with {n} channels"
            )))
        }
    })
}
