use std::{
    fs::{self, File},
    io::BufWriter,
    path::Path,
};

use image::{
    codecs::pnm::{PnmEncoder, PnmSubtype, SampleEncoding},
    ExtendedColorType, ImageEncoder, ImageFormat,
};
use pixmorph_image::DynamicImage;

use crate::conv_utils::{dimensions, from_raster, to_raster};
use crate::error::IoError;

/// Reads a binary or ASCII PBM, PGM, PPM or PAM file.
///
/// # Arguments
///
/// - `file_path` - The path to the file.
///
/// # Returns
///
/// A grayscale image for graymaps and bitmaps, RGB for pixmaps, RGBA for PAM files with alpha.
pub fn read_image_pnm(file_path: impl AsRef<Path>) -> Result<DynamicImage, IoError> {
    let data = fs::read(file_path)?;
    let img = image::load_from_memory_with_format(&data, ImageFormat::Pnm)?;
    from_raster(img)
}

/// Writes a binary graymap (P5), color images are converted to luma.
pub fn write_image_pgm(file_path: impl AsRef<Path>, image: &DynamicImage) -> Result<(), IoError> {
    let gray = DynamicImage::Gray8(image.to_gray8()?);
    write_pnm_impl(file_path, &gray, PnmSubtype::Graymap(SampleEncoding::Binary))
}

/// Writes a binary pixmap (P6), the alpha channel is dropped.
pub fn write_image_ppm(file_path: impl AsRef<Path>, image: &DynamicImage) -> Result<(), IoError> {
    let rgb = DynamicImage::Rgb8(image.to_rgb8()?);
    write_pnm_impl(file_path, &rgb, PnmSubtype::Pixmap(SampleEncoding::Binary))
}

/// Writes the most compact netpbm variant that keeps every channel.
///
/// Grayscale and binary images become P5, RGB becomes P6 and RGBA a PAM (P7) file.
pub fn write_image_pnm(file_path: impl AsRef<Path>, image: &DynamicImage) -> Result<(), IoError> {
    let subtype = match image {
        DynamicImage::Gray8(_) | DynamicImage::Binary(_) => {
            PnmSubtype::Graymap(SampleEncoding::Binary)
        }
        DynamicImage::Rgb8(_) => PnmSubtype::Pixmap(SampleEncoding::Binary),
        DynamicImage::Rgba8(_) => PnmSubtype::ArbitraryMap,
    };
    write_pnm_impl(file_path, image, subtype)
}

fn write_pnm_impl(
    file_path: impl AsRef<Path>,
    image: &DynamicImage,
    subtype: PnmSubtype,
) -> Result<(), IoError> {
    let (data, color_type): (_, ExtendedColorType) = to_raster(image)?;
    let (width, height) = dimensions(image.size())?;

    let writer = BufWriter::new(File::create(file_path)?);
    PnmEncoder::new(writer)
        .with_subtype(subtype)
        .write_image(&data, width, height, color_type)?;
    Ok(())
}
