use pixmorph_image::{DynamicImage, ImageError};

/// An image-to-image operation.
///
/// Implementations never modify their input and report every failure through the returned
/// `Result`, including panics raised while rasterizing.
pub trait Operation: Send + Sync {
    /// Short identifier used in logs and observer notifications.
    fn name(&self) -> &str;

    /// Produce a new image from `src`.
    fn apply(&self, src: &DynamicImage) -> Result<DynamicImage, ImageError>;
}

impl<T: Operation + ?Sized> Operation for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn apply(&self, src: &DynamicImage) -> Result<DynamicImage, ImageError> {
        (**self).apply(src)
    }
}
