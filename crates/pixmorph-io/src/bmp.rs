use std::{
    fs::{self, File},
    io::BufWriter,
    path::Path,
};

use image::{codecs::bmp::BmpEncoder, ImageEncoder, ImageFormat};
use pixmorph_image::DynamicImage;

use crate::conv_utils::{dimensions, from_raster, to_raster};
use crate::error::IoError;

/// Reads a BMP file.
///
/// Palette images are expanded to RGB, images with an alpha channel are returned as RGBA.
pub fn read_image_bmp(file_path: impl AsRef<Path>) -> Result<DynamicImage, IoError> {
    let data = fs::read(file_path)?;
    let img = image::load_from_memory_with_format(&data, ImageFormat::Bmp)?;
    from_raster(img)
}

/// Writes an uncompressed BMP file.
///
/// Grayscale and binary images are stored with a gray palette, RGBA keeps its alpha.
pub fn write_image_bmp(file_path: impl AsRef<Path>, image: &DynamicImage) -> Result<(), IoError> {
    let (data, color_type) = to_raster(image)?;
    let (width, height) = dimensions(image.size())?;

    let mut writer = BufWriter::new(File::create(file_path)?);
    BmpEncoder::new(&mut writer).write_image(&data, width, height, color_type)?;
    Ok(())
}
