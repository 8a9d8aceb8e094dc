use crate::{Image, ImageError, ImageSize};

/// 8-bit grayscale image.
pub type Gray8 = Image<u8, 1>;
/// 8-bit RGB image.
pub type Rgb8 = Image<u8, 3>;
/// 8-bit RGB image with alpha channel.
pub type Rgba8 = Image<u8, 4>;

/// The pixel layout of a [`DynamicImage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ImageType {
    /// One 8-bit luminance channel.
    Grayscale,
    /// Three interleaved 8-bit channels.
    Rgb,
    /// Four interleaved 8-bit channels, the last one is alpha.
    Rgba,
    /// One channel holding 0 or 1.
    Binary,
}

impl ImageType {
    /// Number of channels stored per pixel.
    pub fn num_channels(&self) -> usize {
        match self {
            ImageType::Grayscale | ImageType::Binary => 1,
            ImageType::Rgb => 3,
            ImageType::Rgba => 4,
        }
    }
}

impl std::fmt::Display for ImageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ImageType::Grayscale => "grayscale",
            ImageType::Rgb => "rgb",
            ImageType::Rgba => "rgba",
            ImageType::Binary => "binary",
        };
        write!(f, "{s}")
    }
}

/// Run channel-generic code on the image held by a [`DynamicImage`].
///
/// `$body` must evaluate to `Result<Image<u8, C>, ImageError>`; the result is wrapped back
/// into the variant it came from. Binary images are rejected with
/// [`ImageError::UnsupportedImageType`](crate::ImageError::UnsupportedImageType).
///
/// # Example
///
/// ```
/// use pixmorph_image::{map_image, DynamicImage, Image, ImageError};
///
/// let src = DynamicImage::Rgb8(Image::from_size_val([2, 2].into(), 7).unwrap());
/// let dst: Result<DynamicImage, ImageError> = map_image!(&src, img => Ok(img.clone()));
/// assert_eq!(dst.unwrap(), src);
/// ```
#[macro_export]
macro_rules! map_image {
    ($src:expr, $img:ident => $body:expr) => {
        match $src {
            $crate::DynamicImage::Gray8($img) => $body.map($crate::DynamicImage::Gray8),
            $crate::DynamicImage::Rgb8($img) => $body.map($crate::DynamicImage::Rgb8),
            $crate::DynamicImage::Rgba8($img) => $body.map($crate::DynamicImage::Rgba8),
            $crate::DynamicImage::Binary(_) => Err($crate::ImageError::UnsupportedImageType(
                $crate::ImageType::Binary,
            )),
        }
    };
}

/// An 8-bit image of any of the supported pixel layouts.
///
/// Operations that accept any layout take a `DynamicImage` and branch once on the variant,
/// then run code that is generic over the channel count.
#[derive(Debug, Clone, PartialEq)]
pub enum DynamicImage {
    /// 8-bit grayscale image
    Gray8(Gray8),
    /// 8-bit RGB image
    Rgb8(Rgb8),
    /// 8-bit RGB image with alpha channel
    Rgba8(Rgba8),
    /// Bi-level image, every sample is 0 or 1
    Binary(Image<u8, 1>),
}

impl DynamicImage {
    /// Allocate a zero-filled image of the given type.
    ///
    /// # Errors
    ///
    /// Fails if the size is empty or the buffer cannot be allocated.
    pub fn new_zeroed(size: ImageSize, image_type: ImageType) -> Result<Self, ImageError> {
        Ok(match image_type {
            ImageType::Grayscale => DynamicImage::Gray8(Image::from_size_val(size, 0)?),
            ImageType::Rgb => DynamicImage::Rgb8(Image::from_size_val(size, 0)?),
            ImageType::Rgba => DynamicImage::Rgba8(Image::from_size_val(size, 0)?),
            ImageType::Binary => DynamicImage::Binary(Image::from_size_val(size, 0)?),
        })
    }

    /// Wrap a single channel image as a bi-level image, any non-zero sample becomes 1.
    pub fn binary_from(image: Gray8) -> Self {
        let mut image = image;
        image
            .as_slice_mut()
            .iter_mut()
            .for_each(|v| *v = u8::from(*v != 0));
        DynamicImage::Binary(image)
    }

    /// The pixel layout of the image.
    pub fn image_type(&self) -> ImageType {
        match self {
            DynamicImage::Gray8(_) => ImageType::Grayscale,
            DynamicImage::Rgb8(_) => ImageType::Rgb,
            DynamicImage::Rgba8(_) => ImageType::Rgba,
            DynamicImage::Binary(_) => ImageType::Binary,
        }
    }

    /// Get the size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        match self {
            DynamicImage::Gray8(img) | DynamicImage::Binary(img) => img.size(),
            DynamicImage::Rgb8(img) => img.size(),
            DynamicImage::Rgba8(img) => img.size(),
        }
    }

    /// Get the width of the image in pixels.
    pub fn width(&self) -> usize {
        self.size().width
    }

    /// Get the height of the image in pixels.
    pub fn height(&self) -> usize {
        self.size().height
    }

    /// Get the number of channels in the image.
    pub fn num_channels(&self) -> usize {
        self.image_type().num_channels()
    }

    /// Returns true if the image holds no pixels.
    pub fn is_empty(&self) -> bool {
        self.size().is_empty()
    }

    /// Returns true if the last channel is alpha.
    pub fn has_alpha(&self) -> bool {
        matches!(self, DynamicImage::Rgba8(_))
    }

    /// The raw interleaved samples.
    pub fn as_slice(&self) -> &[u8] {
        match self {
            DynamicImage::Gray8(img) | DynamicImage::Binary(img) => img.as_slice(),
            DynamicImage::Rgb8(img) => img.as_slice(),
            DynamicImage::Rgba8(img) => img.as_slice(),
        }
    }

    /// Number of bytes held by the pixel buffer.
    pub fn num_bytes(&self) -> usize {
        self.as_slice().len()
    }

    /// Convert to a grayscale image using the ITU-R BT.601 luma weights.
    ///
    /// Binary samples are expanded to 0/255. Alpha is dropped.
    pub fn to_gray8(&self) -> Result<Gray8, ImageError> {
        let data = match self {
            DynamicImage::Gray8(img) => return Ok(img.clone()),
            DynamicImage::Binary(img) => img.as_slice().iter().map(|&v| expand(v)).collect(),
            DynamicImage::Rgb8(img) => img.as_slice().chunks_exact(3).map(luma).collect(),
            DynamicImage::Rgba8(img) => img.as_slice().chunks_exact(4).map(luma).collect(),
        };
        Image::new(self.size(), data)
    }

    /// Convert to an RGB image, dropping alpha.
    pub fn to_rgb8(&self) -> Result<Rgb8, ImageError> {
        let data = match self {
            DynamicImage::Rgb8(img) => return Ok(img.clone()),
            DynamicImage::Gray8(img) => img.as_slice().iter().flat_map(|&v| [v, v, v]).collect(),
            DynamicImage::Binary(img) => img
                .as_slice()
                .iter()
                .map(|&v| expand(v))
                .flat_map(|v| [v, v, v])
                .collect(),
            DynamicImage::Rgba8(img) => img
                .as_slice()
                .chunks_exact(4)
                .flat_map(|p| [p[0], p[1], p[2]])
                .collect(),
        };
        Image::new(self.size(), data)
    }

    /// Convert to an RGBA image, surfaces without alpha become fully opaque.
    pub fn to_rgba8(&self) -> Result<Rgba8, ImageError> {
        let data = match self {
            DynamicImage::Rgba8(img) => return Ok(img.clone()),
            DynamicImage::Gray8(img) => img
                .as_slice()
                .iter()
                .flat_map(|&v| [v, v, v, 255])
                .collect(),
            DynamicImage::Binary(img) => img
                .as_slice()
                .iter()
                .map(|&v| expand(v))
                .flat_map(|v| [v, v, v, 255])
                .collect(),
            DynamicImage::Rgb8(img) => img
                .as_slice()
                .chunks_exact(3)
                .flat_map(|p| [p[0], p[1], p[2], 255])
                .collect(),
        };
        Image::new(self.size(), data)
    }
}

fn expand(v: u8) -> u8 {
    if v != 0 {
        255
    } else {
        0
    }
}

fn luma(p: &[u8]) -> u8 {
    let y = 299 * p[0] as u32 + 587 * p[1] as u32 + 114 * p[2] as u32;
    ((y + 500) / 1000) as u8
}

impl From<Gray8> for DynamicImage {
    fn from(image: Gray8) -> Self {
        DynamicImage::Gray8(image)
    }
}

impl From<Rgb8> for DynamicImage {
    fn from(image: Rgb8) -> Self {
        DynamicImage::Rgb8(image)
    }
}

impl From<Rgba8> for DynamicImage {
    fn from(image: Rgba8) -> Self {
        DynamicImage::Rgba8(image)
    }
}

#[cfg(test)]
mod tests {
    use super::{DynamicImage, ImageType};
    use crate::{Image, ImageError};

    #[test]
    fn dynamic_image_type() -> Result<(), ImageError> {
        let rgb = DynamicImage::new_zeroed([4, 3].into(), ImageType::Rgb)?;
        assert_eq!(rgb.image_type(), ImageType::Rgb);
        assert_eq!(rgb.num_channels(), 3);
        assert_eq!(rgb.num_bytes(), 4 * 3 * 3);
        assert!(!rgb.has_alpha());
        assert!(!rgb.is_empty());

        let rgba = DynamicImage::new_zeroed([4, 3].into(), ImageType::Rgba)?;
        assert!(rgba.has_alpha());
        assert_eq!(rgba.width(), 4);
        assert_eq!(rgba.height(), 3);

        Ok(())
    }

    #[test]
    fn binary_from_gray() -> Result<(), ImageError> {
        let gray = Image::<u8, 1>::new([3, 1].into(), vec![0, 7, 255])?;
        let binary = DynamicImage::binary_from(gray);
        assert_eq!(binary.image_type(), ImageType::Binary);
        assert_eq!(binary.as_slice(), &[0, 1, 1]);
        assert_eq!(binary.to_gray8()?.as_slice(), &[0, 255, 255]);
        Ok(())
    }

    #[test]
    fn convert_layouts() -> Result<(), ImageError> {
        let rgb = DynamicImage::from(Image::<u8, 3>::new(
            [2, 1].into(),
            vec![255, 0, 0, 10, 20, 30],
        )?);

        let rgba = rgb.to_rgba8()?;
        assert_eq!(rgba.as_slice(), &[255, 0, 0, 255, 10, 20, 30, 255]);

        let back = DynamicImage::from(rgba).to_rgb8()?;
        assert_eq!(back.as_slice(), &[255, 0, 0, 10, 20, 30]);

        let gray = rgb.to_gray8()?;
        assert_eq!(gray.as_slice(), &[76, 18]);

        Ok(())
    }
}
