use pixmorph_image::{DynamicImage, ErrorCode, Image};
use pixmorph_io::{read_image, write_image, IoError};

fn checker_rgb(width: usize, height: usize) -> Result<DynamicImage, IoError> {
    let data = (0..height)
        .flat_map(|y| {
            (0..width).flat_map(move |x| {
                let v = if (x + y) % 2 == 0 { 200 } else { 40 };
                [v, 255 - v, (x * 10) as u8]
            })
        })
        .collect();
    Ok(DynamicImage::Rgb8(Image::new([width, height].into(), data)?))
}

#[test]
fn lossless_formats_round_trip() -> Result<(), IoError> {
    let tmp_dir = tempfile::tempdir()?;
    let image = checker_rgb(7, 5)?;

    for name in ["a.ppm", "b.PNM", "c.bmp"] {
        let file_path = tmp_dir.path().join(name);
        write_image(&file_path, &image, None)?;
        let back = read_image(&file_path)?;
        assert_eq!(back, image, "{name}");
    }
    Ok(())
}

#[test]
fn pgm_stores_luma() -> Result<(), IoError> {
    let tmp_dir = tempfile::tempdir()?;
    let file_path = tmp_dir.path().join("luma.pgm");

    let image = checker_rgb(4, 4)?;
    write_image(&file_path, &image, None)?;
    let back = read_image(&file_path)?;

    assert_eq!(back, DynamicImage::Gray8(image.to_gray8()?));
    Ok(())
}

#[test]
fn jpeg_quality_changes_size() -> Result<(), IoError> {
    let tmp_dir = tempfile::tempdir()?;
    let image = checker_rgb(64, 48)?;

    let low = tmp_dir.path().join("low.jpg");
    let high = tmp_dir.path().join("high.jpg");
    write_image(&low, &image, Some(10))?;
    write_image(&high, &image, Some(100))?;

    assert!(std::fs::metadata(&low)?.len() < std::fs::metadata(&high)?.len());
    assert_eq!(read_image(&high)?.size(), image.size());
    Ok(())
}

#[test]
fn read_errors_carry_codes() -> Result<(), IoError> {
    let tmp_dir = tempfile::tempdir()?;

    let err = read_image(tmp_dir.path().join("missing.ppm")).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidParameter);

    let broken = tmp_dir.path().join("broken.bmp");
    std::fs::write(&broken, b"not a bitmap")?;
    let err = read_image(&broken).unwrap_err();
    assert_eq!(err.code(), ErrorCode::ProcessingFailed);
    Ok(())
}
