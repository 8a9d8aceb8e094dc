use pixmorph_image::ErrorCode;

/// An error type for the io module.
#[derive(thiserror::Error, Debug)]
pub enum IoError {
    /// Error when the file does not exist.
    #[error("File does not exist: {0}")]
    FileDoesNotExist(std::path::PathBuf),

    /// Invalid file extension.
    #[error("File does not have a supported extension: {0}")]
    InvalidFileExtension(std::path::PathBuf),

    /// Error to open the file.
    #[error("Failed to manipulate the file. {0}")]
    FileError(#[from] std::io::Error),

    /// Error to decode the JPEG image.
    #[error("Error with Jpeg decoding. {0}")]
    JpegDecodingError(#[from] zune_jpeg::errors::DecodeErrors),

    /// Error to encode the JPEG image.
    #[error("Error with Jpeg encoding. {0}")]
    JpegEncodingError(#[from] jpeg_encoder::EncodingError),

    /// Error to create the image.
    #[error("Failed to create image. {0}")]
    ImageCreationError(#[from] pixmorph_image::ImageError),

    /// Error raised by the BMP or PNM codecs.
    #[error("Failed to decode or encode the image. {0}")]
    CodecError(#[from] image::ImageError),

    /// The image cannot be stored in the requested format.
    #[error("Unsupported image format: {0}")]
    UnsupportedImageFormat(String),
}

impl IoError {
    /// The category of the error, shared with the processing errors.
    pub fn code(&self) -> ErrorCode {
        match self {
            IoError::FileDoesNotExist(_) | IoError::InvalidFileExtension(_) => {
                ErrorCode::InvalidParameter
            }
            IoError::UnsupportedImageFormat(_) => ErrorCode::UnsupportedFormat,
            IoError::ImageCreationError(err) => err.code(),
            IoError::FileError(_)
            | IoError::JpegDecodingError(_)
            | IoError::JpegEncodingError(_)
            | IoError::CodecError(_) => ErrorCode::ProcessingFailed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::IoError;
    use pixmorph_image::{ErrorCode, ImageError};

    #[test]
    fn error_codes() {
        let err = IoError::FileDoesNotExist("missing.ppm".into());
        assert_eq!(err.code(), ErrorCode::InvalidParameter);

        let err = IoError::from(ImageError::AllocationFailed(10));
        assert_eq!(err.code(), ErrorCode::InternalError);

        let err = IoError::UnsupportedImageFormat("binary jpeg".to_string());
        assert_eq!(err.code(), ErrorCode::UnsupportedFormat);
    }
}
