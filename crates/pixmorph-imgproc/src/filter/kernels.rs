use pixmorph_image::ImageError;

/// Create a box blur kernel.
///
/// # Arguments
///
/// * `kernel_size` - The size of the kernel.
///
/// # Returns
///
/// A vector of the kernel.
pub fn box_blur_kernel_1d(kernel_size: usize) -> Vec<f32> {
    vec![1.0 / kernel_size as f32; kernel_size]
}

/// Create the separable 3x3 sobel kernels.
///
/// # Returns
///
/// The derivative and smoothing kernels. The x gradient applies the derivative horizontally
/// and the smoothing vertically, the y gradient the other way around.
pub fn sobel_kernel_1d() -> ([f32; 3], [f32; 3]) {
    ([-1.0, 0.0, 1.0], [1.0, 2.0, 1.0])
}

/// Check that a kernel size is odd and not zero.
pub(crate) fn check_kernel_size(kernel_size: usize) -> Result<(), ImageError> {
    if kernel_size == 0 || kernel_size % 2 == 0 {
        return Err(ImageError::InvalidParameter(format!(
            "kernel size must be odd and >= 1, got {kernel_size}"
        )));
    }
    Ok(())
}
