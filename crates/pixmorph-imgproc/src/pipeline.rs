use std::sync::Arc;

use pixmorph_image::{DynamicImage, ImageError};

use crate::context::ProcessingContext;
use crate::operation::Operation;

/// Receives notifications while a [`Pipeline`] runs.
///
/// Every method has an empty default body.
pub trait ProcessingObserver: Send + Sync {
    /// An operation is about to start.
    fn on_started(&self, _name: &str) {}

    /// Fraction of the pipeline completed, in `[0, 1]`.
    fn on_progress(&self, _progress: f32) {}

    /// An operation finished.
    fn on_completed(&self, _name: &str, _success: bool) {}

    /// An operation failed.
    fn on_error(&self, _message: &str) {}
}

/// Forwards notifications to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl ProcessingObserver for LogObserver {
    fn on_started(&self, name: &str) {
        log::info!("{name}: started");
    }

    fn on_progress(&self, progress: f32) {
        log::debug!("progress {:.0}%", progress * 100.0);
    }

    fn on_completed(&self, name: &str, success: bool) {
        log::info!("{name}: {}", if success { "done" } else { "failed" });
    }

    fn on_error(&self, message: &str) {
        log::error!("{message}");
    }
}

/// An ordered list of operations applied one after the other.
///
/// # Example
///
/// ```
/// use pixmorph_image::{DynamicImage, Image};
/// use pixmorph_imgproc::context::ProcessingContext;
/// use pixmorph_imgproc::filter::BoxFilter;
/// use pixmorph_imgproc::pipeline::Pipeline;
/// use pixmorph_imgproc::transform::RotateTransform;
///
/// let pipeline = Pipeline::new()
///     .with_operation(BoxFilter::new(3).unwrap())
///     .with_operation(RotateTransform::new(90.0));
///
/// let src = DynamicImage::Gray8(Image::from_size_val([4, 4].into(), 1).unwrap());
/// let dst = pipeline.run(&ProcessingContext::new(), &src).unwrap();
/// assert_eq!(dst.size(), src.size());
/// ```
#[derive(Default)]
pub struct Pipeline {
    operations: Vec<Box<dyn Operation>>,
    observers: Vec<Arc<dyn ProcessingObserver>>,
}

impl Pipeline {
    /// An empty pipeline, running it returns a copy of the input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an operation.
    pub fn with_operation(mut self, op: impl Operation + 'static) -> Self {
        self.push(Box::new(op));
        self
    }

    /// Register an observer.
    pub fn with_observer(mut self, observer: Arc<dyn ProcessingObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Append a boxed operation.
    pub fn push(&mut self, op: Box<dyn Operation>) {
        self.operations.push(op);
    }

    /// Number of operations.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Returns true if the pipeline has no operation.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Names of the operations in execution order.
    pub fn names(&self) -> Vec<&str> {
        self.operations.iter().map(|op| op.name()).collect()
    }

    /// Apply every operation in order.
    ///
    /// The operations run inside the thread pool of `ctx`, and the bytes of every intermediate
    /// image are recorded in its memory counter.
    ///
    /// # Errors
    ///
    /// Returns the error of the first failing operation; the remaining ones are skipped.
    pub fn run(
        &self,
        ctx: &ProcessingContext,
        input: &DynamicImage,
    ) -> Result<DynamicImage, ImageError> {
        ctx.install(|| self.run_inner(ctx, input))?
    }

    fn run_inner(
        &self,
        ctx: &ProcessingContext,
        input: &DynamicImage,
    ) -> Result<DynamicImage, ImageError> {
        let total = self.operations.len();
        let mut current = input.clone();

        for (i, op) in self.operations.iter().enumerate() {
            let name = op.name();
            self.notify(|o| o.on_started(name));

            match op.apply(&current) {
                Ok(next) => {
                    ctx.memory().allocate(next.num_bytes());
                    if i > 0 {
                        ctx.memory().release(current.num_bytes());
                    }
                    current = next;
                    self.notify(|o| o.on_completed(name, true));
                    self.notify(|o| o.on_progress((i + 1) as f32 / total as f32));
                }
                Err(err) => {
                    let message = format!("{name} failed: {err}");
                    self.notify(|o| o.on_error(&message));
                    self.notify(|o| o.on_completed(name, false));
                    return Err(err);
                }
            }
        }

        Ok(current)
    }

    fn notify(&self, f: impl Fn(&dyn ProcessingObserver)) {
        self.observers.iter().for_each(|o| f(o.as_ref()));
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::{Pipeline, ProcessingObserver};
    use crate::context::ProcessingContext;
    use crate::filter::{BoxFilter, SobelFilter};
    use crate::transform::{AffineTransform, RotateTransform};
    use pixmorph_image::{DynamicImage, ErrorCode, Image, ImageError};

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl Recorder {
        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }
    }

    impl ProcessingObserver for Recorder {
        fn on_started(&self, name: &str) {
            self.events.lock().unwrap().push(format!("start {name}"));
        }

        fn on_progress(&self, progress: f32) {
            self.events.lock().unwrap().push(format!("{progress:.2}"));
        }

        fn on_completed(&self, name: &str, success: bool) {
            self.events.lock().unwrap().push(format!("end {name} {success}"));
        }

        fn on_error(&self, _message: &str) {
            self.events.lock().unwrap().push("error".to_string());
        }
    }

    #[test]
    fn runs_in_order() -> Result<(), ImageError> {
        let recorder = Arc::new(Recorder::default());
        let pipeline = Pipeline::new()
            .with_operation(RotateTransform::new(90.0).with_resize_output(true))
            .with_operation(SobelFilter)
            .with_observer(recorder.clone());
        assert_eq!(pipeline.names(), vec!["rotate", "sobel_filter"]);

        let src = DynamicImage::Gray8(Image::from_size_val([6, 2].into(), 9)?);
        let ctx = ProcessingContext::new().with_num_threads(2)?;
        let dst = pipeline.run(&ctx, &src)?;

        assert_eq!(dst.size(), [2, 6].into());
        assert_eq!(
            recorder.events(),
            vec![
                "start rotate",
                "end rotate true",
                "0.50",
                "start sobel_filter",
                "end sobel_filter true",
                "1.00"
            ]
        );
        assert_eq!(ctx.memory().total(), 24);
        assert_eq!(ctx.memory().current(), 12);
        Ok(())
    }

    #[test]
    fn stops_at_first_error() -> Result<(), ImageError> {
        let recorder = Arc::new(Recorder::default());
        let pipeline = Pipeline::new()
            .with_operation(BoxFilter::new(3)?)
            .with_operation(AffineTransform::scaling(1e6, 1.0))
            .with_operation(SobelFilter)
            .with_observer(recorder.clone());

        let src = DynamicImage::Rgb8(Image::from_size_val([4, 4].into(), 1)?);
        let err = pipeline.run(&ProcessingContext::new(), &src).unwrap_err();

        assert_eq!(err.code(), ErrorCode::InvalidParameter);
        let events = recorder.events();
        assert_eq!(events.last().map(String::as_str), Some("end affine false"));
        assert!(!events.iter().any(|e| e.contains("sobel")));
        Ok(())
    }

    #[test]
    fn empty_pipeline_copies() -> Result<(), ImageError> {
        let src = DynamicImage::Gray8(Image::from_size_val([2, 2].into(), 3)?);
        let pipeline = Pipeline::new();
        assert!(pipeline.is_empty());
        assert_eq!(pipeline.run(&ProcessingContext::new(), &src)?, src);
        Ok(())
    }
}
