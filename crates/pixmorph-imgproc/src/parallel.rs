use rayon::prelude::*;
use thiserror::Error;

use pixmorph_image::{Image, ImageError};

/// Errors that can occur during parallel execution.
#[derive(Error, Debug, PartialEq)]
pub enum ParallelError {
    /// The thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    BuildError(String),

    /// The requested thread count is invalid.
    #[error("thread count must be > 0, got {0}")]
    InvalidThreadCount(usize),
}

impl From<ParallelError> for ImageError {
    fn from(err: ParallelError) -> Self {
        match err {
            ParallelError::InvalidThreadCount(_) => ImageError::InvalidParameter(err.to_string()),
            ParallelError::BuildError(_) => ImageError::ProcessingFailed(err.to_string()),
        }
    }
}

/// Controls which thread pool runs the row bands of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Use the global Rayon thread pool.
    #[default]
    Global,

    /// Run sequentially on a single worker thread.
    ///
    /// Useful for small images, debugging, or when the overhead of parallelization
    /// outweighs the benefits.
    Serial,

    /// Run on a local thread pool with `n` threads.
    ///
    /// # Warning
    /// Creates a new thread pool on every call, which has significant overhead.
    Fixed(usize),
}

impl ExecutionStrategy {
    /// Run `op` with the rayon pool selected by the strategy.
    ///
    /// Every parallel iterator started inside `op` uses that pool.
    pub fn install<R, F>(&self, op: F) -> Result<R, ParallelError>
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        let num_threads = match *self {
            ExecutionStrategy::Global => return Ok(op()),
            ExecutionStrategy::Serial => 1,
            ExecutionStrategy::Fixed(0) => return Err(ParallelError::InvalidThreadCount(0)),
            ExecutionStrategy::Fixed(n) => n,
        };

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build()
            .map_err(|e| ParallelError::BuildError(e.to_string()))?;

        Ok(pool.install(op))
    }
}

/// Apply a function to every row of the destination image in parallel.
///
/// The closure receives the row index and the interleaved samples of that row. Rows are
/// disjoint, so no synchronization is needed as long as the closure only reads shared state.
pub fn par_iter_rows_indexed<T, const C: usize>(
    dst: &mut Image<T, C>,
    f: impl Fn(usize, &mut [T]) + Send + Sync,
) where
    T: Send,
{
    let cols = dst.cols();
    dst.as_slice_mut()
        .par_chunks_exact_mut(C * cols)
        .enumerate()
        .for_each(|(r, row)| f(r, row));
}

/// Apply a function to each pixel for grid sampling in parallel.
pub fn par_iter_rows_resample<const C: usize>(
    dst: &mut Image<u8, C>,
    map_x: &Image<f32, 1>,
    map_y: &Image<f32, 1>,
    f: impl Fn(&f32, &f32, &mut [u8]) + Send + Sync,
) {
    let cols = dst.cols();
    let map_x_slice = map_x.as_slice();
    let map_y_slice = map_y.as_slice();

    dst.as_slice_mut()
        .par_chunks_exact_mut(C * cols)
        .zip(map_x_slice.par_chunks_exact(cols))
        .zip(map_y_slice.par_chunks_exact(cols))
        .for_each(|((dst_chunk, map_x_chunk), map_y_chunk)| {
            dst_chunk
                .chunks_exact_mut(C)
                .zip(map_x_chunk.iter().zip(map_y_chunk.iter()))
                .for_each(|(dst_pixel, (x, y))| {
                    f(x, y, dst_pixel);
                });
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_global() {
        let res = ExecutionStrategy::Global.install(|| 21 * 2);
        assert_eq!(res, Ok(42));
    }

    #[test]
    fn test_install_serial() {
        let threads = ExecutionStrategy::Serial
            .install(rayon::current_num_threads)
            .unwrap();
        assert_eq!(threads, 1);
    }

    #[test]
    fn test_install_fixed() {
        let threads = ExecutionStrategy::Fixed(2)
            .install(rayon::current_num_threads)
            .unwrap();
        assert_eq!(threads, 2);
    }

    #[test]
    fn test_install_fixed_error() {
        let res = ExecutionStrategy::Fixed(0).install(|| ());
        assert_eq!(res, Err(ParallelError::InvalidThreadCount(0)));
    }

    #[test]
    fn test_par_iter_rows_indexed() -> Result<(), ImageError> {
        let mut image = Image::<u8, 2>::from_size_val([3, 2].into(), 0)?;
        par_iter_rows_indexed(&mut image, |r, row| row.iter_mut().for_each(|v| *v = r as u8));
        assert_eq!(image.as_slice(), &[0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1]);
        Ok(())
    }
}
