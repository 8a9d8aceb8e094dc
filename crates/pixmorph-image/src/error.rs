use crate::dynamic::ImageType;

/// Coarse classification of every failure reported by the library.
///
/// Each concrete error variant maps to exactly one code, so callers that only care about the
/// category (e.g. to decide whether to retry with different arguments) can match on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Bad construction arguments or an unknown enum value.
    InvalidParameter,
    /// Pixel coordinate access outside the surface bounds.
    OutOfRange,
    /// Surface type the operation cannot process.
    UnsupportedFormat,
    /// Failure while executing an operation.
    ProcessingFailed,
    /// Storage or allocation failure.
    InternalError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorCode::InvalidParameter => "InvalidParameter",
            ErrorCode::OutOfRange => "OutOfRange",
            ErrorCode::UnsupportedFormat => "UnsupportedFormat",
            ErrorCode::ProcessingFailed => "ProcessingFailed",
            ErrorCode::InternalError => "InternalError",
        };
        write!(f, "{s}")
    }
}

/// An error type for the image module.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ImageError {
    /// Error when the image size is not valid.
    #[error("Invalid image size ({0}x{1}): width and height must be greater than zero")]
    InvalidImageSize(usize, usize),

    /// Error when channel and shape are not valid.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when two images or maps are expected to share a size.
    #[error("Image size mismatch: expected {0}x{1}, got {2}x{3}")]
    ImageSizeMismatch(usize, usize, usize, usize),

    /// Error when the pixel coordinates are out of bounds.
    #[error("Pixel coordinates ({0}, {1}) are out of bounds ({2}, {3})")]
    PixelIndexOutOfBounds(usize, usize, usize, usize),

    /// Error when the channel index is out of bounds.
    #[error("Channel index ({0}) is out of bounds ({1})")]
    ChannelIndexOutOfBounds(usize, usize),

    /// Error when a numeric cast fails.
    #[error("Failed to cast image data")]
    CastError,

    /// Error when an argument is not valid.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error when a matrix cannot be inverted.
    #[error("Singular matrix: determinant {0} is too close to zero")]
    SingularMatrix(f32),

    /// Error when the image type is not supported by an operation.
    #[error("Unsupported image type: {0}")]
    UnsupportedImageType(ImageType),

    /// Error raised while an operation is running.
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),

    /// Error when the pixel buffer cannot be allocated.
    #[error("Failed to allocate {0} bytes for the image")]
    AllocationFailed(usize),
}

impl ImageError {
    /// Returns the category of the error.
    pub fn code(&self) -> ErrorCode {
        match self {
            ImageError::InvalidImageSize(..)
            | ImageError::InvalidChannelShape(..)
            | ImageError::ImageSizeMismatch(..)
            | ImageError::CastError
            | ImageError::InvalidParameter(_) => ErrorCode::InvalidParameter,
            ImageError::PixelIndexOutOfBounds(..) | ImageError::ChannelIndexOutOfBounds(..) => {
                ErrorCode::OutOfRange
            }
            ImageError::UnsupportedImageType(_) => ErrorCode::UnsupportedFormat,
            ImageError::SingularMatrix(_) | ImageError::ProcessingFailed(_) => {
                ErrorCode::ProcessingFailed
            }
            ImageError::AllocationFailed(_) => ErrorCode::InternalError,
        }
    }
}
