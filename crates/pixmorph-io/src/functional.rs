use std::path::Path;

use pixmorph_image::DynamicImage;

use crate::bmp::{read_image_bmp, write_image_bmp};
use crate::error::IoError;
use crate::jpeg::{read_image_jpeg, write_image_jpeg, DEFAULT_JPEG_QUALITY};
use crate::pnm::{read_image_pnm, write_image_pgm, write_image_pnm, write_image_ppm};

/// The file formats selected by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// `.bmp`
    Bmp,
    /// `.jpg` and `.jpeg`
    Jpeg,
    /// `.pgm`
    Pgm,
    /// `.ppm`
    Ppm,
    /// `.pnm`, `.pbm` and `.pam`
    Pnm,
}

impl ImageFormat {
    /// Guess the format from the (case insensitive) file extension.
    pub fn from_path(file_path: impl AsRef<Path>) -> Result<Self, IoError> {
        let file_path = file_path.as_ref();
        let ext = file_path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match ext.as_deref() {
            Some("bmp") => Ok(ImageFormat::Bmp),
            Some("jpg") | Some("jpeg") => Ok(ImageFormat::Jpeg),
            Some("pgm") => Ok(ImageFormat::Pgm),
            Some("ppm") => Ok(ImageFormat::Ppm),
            Some("pnm") | Some("pbm") | Some("pam") => Ok(ImageFormat::Pnm),
            _ => Err(IoError::InvalidFileExtension(file_path.to_path_buf())),
        }
    }
}

/// Reads an image from the given file path.
///
/// The decoder is picked from the file extension.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Returns
///
/// An image with the layout stored in the file.
///
/// # Example
///
/// ```no_run
/// use pixmorph_io::functional as F;
///
/// let image = F::read_image("photo.jpg").unwrap();
/// println!("{} {}", image.image_type(), image.size());
/// ```
pub fn read_image(file_path: impl AsRef<Path>) -> Result<DynamicImage, IoError> {
    let file_path = file_path.as_ref();

    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let format = ImageFormat::from_path(file_path)?;
    log::debug!("reading {} as {format:?}", file_path.display());

    match format {
        ImageFormat::Bmp => read_image_bmp(file_path),
        ImageFormat::Jpeg => read_image_jpeg(file_path),
        ImageFormat::Pgm | ImageFormat::Ppm | ImageFormat::Pnm => read_image_pnm(file_path),
    }
}

/// Writes an image to the given file path.
///
/// The encoder is picked from the file extension. Formats that cannot hold every channel
/// convert the image: `.pgm` stores luma, `.ppm` and JPEG drop alpha.
///
/// # Arguments
///
/// * `file_path` - The destination path.
/// * `image` - The image to write.
/// * `quality` - JPEG quality in `[0, 100]`, ignored by the lossless formats.
pub fn write_image(
    file_path: impl AsRef<Path>,
    image: &DynamicImage,
    quality: Option<u8>,
) -> Result<(), IoError> {
    let file_path = file_path.as_ref();
    let format = ImageFormat::from_path(file_path)?;
    log::debug!(
        "writing {} {} as {format:?}",
        image.image_type(),
        image.size()
    );

    match format {
        ImageFormat::Bmp => write_image_bmp(file_path, image),
        ImageFormat::Jpeg => {
            write_image_jpeg(file_path, image, quality.unwrap_or(DEFAULT_JPEG_QUALITY))
        }
        ImageFormat::Pgm => write_image_pgm(file_path, image),
        ImageFormat::Ppm => write_image_ppm(file_path, image),
        ImageFormat::Pnm => write_image_pnm(file_path, image),
    }
}
