//! Neighborhood filters on 8-bit images.

mod kernels;
pub use kernels::*;

mod ops;
pub use ops::*;

mod separable_filter;
pub use separable_filter::separable_filter;

use pixmorph_image::{map_image, DynamicImage, ImageError};

use crate::operation::Operation;
use crate::transform::catch_panics;

/// Mean over a square window, see [`box_blur`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxFilter {
    kernel_size: usize,
}

impl BoxFilter {
    /// Create the filter.
    ///
    /// # Errors
    ///
    /// Fails with [`ImageError::InvalidParameter`] if `kernel_size` is even or zero.
    pub fn new(kernel_size: usize) -> Result<Self, ImageError> {
        check_kernel_size(kernel_size)?;
        Ok(Self { kernel_size })
    }

    /// The side of the window.
    pub fn kernel_size(&self) -> usize {
        self.kernel_size
    }
}

impl Operation for BoxFilter {
    fn name(&self) -> &str {
        "box_filter"
    }

    fn apply(&self, src: &DynamicImage) -> Result<DynamicImage, ImageError> {
        log::debug!("box filter {} on {} {}", self.kernel_size, src.image_type(), src.size());
        catch_panics(|| map_image!(src, img => box_blur(img, self.kernel_size)))
    }
}

/// Median over a square window, see [`median_blur`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MedianFilter {
    kernel_size: usize,
}

impl MedianFilter {
    /// Create the filter.
    ///
    /// # Errors
    ///
    /// Fails with [`ImageError::InvalidParameter`] if `kernel_size` is even or zero.
    pub fn new(kernel_size: usize) -> Result<Self, ImageError> {
        check_kernel_size(kernel_size)?;
        Ok(Self { kernel_size })
    }

    /// The side of the window.
    pub fn kernel_size(&self) -> usize {
        self.kernel_size
    }
}

impl Operation for MedianFilter {
    fn name(&self) -> &str {
        "median_filter"
    }

    fn apply(&self, src: &DynamicImage) -> Result<DynamicImage, ImageError> {
        log::debug!("median filter {} on {} {}", self.kernel_size, src.image_type(), src.size());
        catch_panics(|| map_image!(src, img => median_blur(img, self.kernel_size)))
    }
}

/// Gradient magnitude, see [`sobel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SobelFilter;

impl Operation for SobelFilter {
    fn name(&self) -> &str {
        "sobel_filter"
    }

    fn apply(&self, src: &DynamicImage) -> Result<DynamicImage, ImageError> {
        log::debug!("sobel filter on {} {}", src.image_type(), src.size());
        catch_panics(|| map_image!(src, img => sobel(img)))
    }
}
