use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use pixmorph_image::{map_image, DynamicImage, Image, ImageError, ImageSize, ImageType};

use crate::interpolation::{grid::meshgrid_from_fn, remap, InterpolationMode};
use crate::warp::PixelMapping;

/// Auto-sized outputs larger than this along either axis are rejected.
pub const MAX_OUTPUT_DIMENSION: usize = 1 << 16;

/// Reject sources no transform can process.
pub(crate) fn check_source(src: &DynamicImage) -> Result<(), ImageError> {
    if src.is_empty() {
        return Err(ImageError::InvalidImageSize(src.width(), src.height()));
    }
    if src.image_type() == ImageType::Binary {
        return Err(ImageError::UnsupportedImageType(ImageType::Binary));
    }
    Ok(())
}

pub(crate) fn check_output_size(size: ImageSize) -> Result<ImageSize, ImageError> {
    if size.is_empty() {
        return Err(ImageError::InvalidImageSize(size.width, size.height));
    }
    if size.width > MAX_OUTPUT_DIMENSION || size.height > MAX_OUTPUT_DIMENSION {
        return Err(ImageError::InvalidParameter(format!(
            "output size {size} exceeds the {MAX_OUTPUT_DIMENSION} pixel limit"
        )));
    }
    Ok(size)
}

/// Rasterize `mapping` over a new image with the layout of `src`.
///
/// Destination pixels without a source stay zero, which makes them transparent for RGBA.
/// A panic raised while rasterizing is reported as [`ImageError::ProcessingFailed`].
pub(crate) fn warp_dynamic(
    src: &DynamicImage,
    mapping: &PixelMapping,
    interpolation: InterpolationMode,
) -> Result<DynamicImage, ImageError> {
    check_source(src)?;

    log::debug!(
        "warping {} {} -> {} with {:?}",
        src.image_type(),
        mapping.src_size(),
        mapping.dst_size(),
        interpolation
    );

    catch_panics(|| map_image!(src, img => warp_image(img, mapping, interpolation)))
}

/// Run `f`, turning a panic into [`ImageError::ProcessingFailed`].
pub(crate) fn catch_panics<R>(f: impl FnOnce() -> Result<R, ImageError>) -> Result<R, ImageError> {
    panic::catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|payload| {
        let msg = panic_message(payload.as_ref());
        log::error!("operation aborted: {msg}");
        Err(ImageError::ProcessingFailed(msg))
    })
}

fn warp_image<const C: usize>(
    src: &Image<u8, C>,
    mapping: &PixelMapping,
    interpolation: InterpolationMode,
) -> Result<Image<u8, C>, ImageError> {
    let size = mapping.dst_size();
    let (map_x, map_y) = meshgrid_from_fn(size.width, size.height, |x, y| Ok(mapping.map(x, y)))?;

    let mut dst = Image::from_size_val(size, 0u8)?;
    remap(src, &mut dst, &map_x, &map_y, interpolation)?;

    Ok(dst)
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panic during processing: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panic during processing: {s}")
    } else {
        "panic during processing".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{catch_panics, check_output_size, panic_message, warp_dynamic};
    use crate::interpolation::InterpolationMode;
    use crate::warp::{build_mapping, CoordinateMapping, GeometricKind};
    use pixmorph_image::{DynamicImage, ErrorCode, Image, ImageError};

    #[test]
    fn output_size_limits() {
        assert!(check_output_size([4, 4].into()).is_ok());
        let err = check_output_size([1 << 20, 4].into()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidParameter);
    }

    #[test]
    fn binary_is_rejected() -> Result<(), ImageError> {
        let src = DynamicImage::binary_from(Image::new([2, 2].into(), vec![0, 1, 1, 0])?);
        let mapping = build_mapping(
            src.size(),
            src.size(),
            CoordinateMapping::Geometric(GeometricKind::Barrel { strength: 0.1 }),
        )?;
        let err = warp_dynamic(&src, &mapping, InterpolationMode::Nearest).unwrap_err();
        assert_eq!(err.code(), ErrorCode::UnsupportedFormat);
        Ok(())
    }

    #[test]
    fn keeps_layout() -> Result<(), ImageError> {
        let src = DynamicImage::Rgb8(Image::from_size_val([3, 2].into(), 7)?);
        let mapping = build_mapping(
            src.size(),
            [5, 4].into(),
            CoordinateMapping::Geometric(GeometricKind::Barrel { strength: 0.0 }),
        )?;
        let dst = warp_dynamic(&src, &mapping, InterpolationMode::Bilinear)?;
        assert_eq!(dst.image_type(), src.image_type());
        assert_eq!(dst.size(), [5, 4].into());
        Ok(())
    }

    #[test]
    fn panics_become_errors() {
        let res: Result<(), ImageError> = catch_panics(|| panic!("index out of range"));
        let err = res.unwrap_err();
        assert_eq!(err.code(), ErrorCode::ProcessingFailed);
        assert!(err.to_string().contains("index out of range"));
        assert_eq!(catch_panics(|| Ok(3)), Ok(3));
    }

    #[test]
    fn panic_messages() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "panic during processing: boom");
        let payload: Box<dyn std::any::Any + Send> = Box::new(3);
        assert_eq!(panic_message(payload.as_ref()), "panic during processing");
    }
}
