use std::sync::atomic::{AtomicUsize, Ordering};

use pixmorph_image::ImageError;

use crate::parallel::{ExecutionStrategy, ParallelError};

/// Running totals of the bytes held by intermediate images.
#[derive(Debug, Default)]
pub struct MemoryCounter {
    current: AtomicUsize,
    peak: AtomicUsize,
    total: AtomicUsize,
}

impl MemoryCounter {
    /// Record `bytes` as allocated.
    pub fn allocate(&self, bytes: usize) {
        let current = self.current.fetch_add(bytes, Ordering::Relaxed) + bytes;
        self.total.fetch_add(bytes, Ordering::Relaxed);
        self.peak.fetch_max(current, Ordering::Relaxed);
    }

    /// Record `bytes` as released.
    pub fn release(&self, bytes: usize) {
        // saturate instead of wrapping if releases outnumber allocations
        let _ = self
            .current
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |v| {
                Some(v.saturating_sub(bytes))
            });
    }

    /// Bytes currently held.
    pub fn current(&self) -> usize {
        self.current.load(Ordering::Relaxed)
    }

    /// Largest value `current` reached.
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::Relaxed)
    }

    /// Sum of every allocation.
    pub fn total(&self) -> usize {
        self.total.load(Ordering::Relaxed)
    }

    /// Reset every counter to zero.
    pub fn reset(&self) {
        self.current.store(0, Ordering::Relaxed);
        self.peak.store(0, Ordering::Relaxed);
        self.total.store(0, Ordering::Relaxed);
    }
}

/// Runtime settings shared by the operations of a [`Pipeline`](crate::pipeline::Pipeline).
///
/// The context is passed explicitly, there is no process wide state.
#[derive(Debug, Default)]
pub struct ProcessingContext {
    strategy: ExecutionStrategy,
    memory: MemoryCounter,
}

impl ProcessingContext {
    /// A context using the global rayon pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select how parallel work is scheduled.
    pub fn with_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Run on a dedicated pool of `num_threads` threads.
    ///
    /// # Errors
    ///
    /// Fails with [`ImageError::InvalidParameter`] if `num_threads` is zero.
    pub fn with_num_threads(self, num_threads: usize) -> Result<Self, ImageError> {
        if num_threads == 0 {
            return Err(ParallelError::InvalidThreadCount(num_threads).into());
        }
        Ok(self.with_strategy(ExecutionStrategy::Fixed(num_threads)))
    }

    /// The scheduling strategy.
    pub fn strategy(&self) -> ExecutionStrategy {
        self.strategy
    }

    /// The memory counter.
    pub fn memory(&self) -> &MemoryCounter {
        &self.memory
    }

    /// Run `op` inside the thread pool selected by the strategy.
    pub fn install<R, F>(&self, op: F) -> Result<R, ImageError>
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        Ok(self.strategy.install(op)?)
    }
}

#[cfg(test)]
mod tests {
    use super::{MemoryCounter, ProcessingContext};
    use crate::parallel::ExecutionStrategy;
    use pixmorph_image::{ErrorCode, ImageError};

    #[test]
    fn memory_counter() {
        let counter = MemoryCounter::default();
        counter.allocate(100);
        counter.allocate(50);
        counter.release(120);
        counter.allocate(10);
        assert_eq!(counter.current(), 40);
        assert_eq!(counter.peak(), 150);
        assert_eq!(counter.total(), 160);

        counter.release(1000);
        assert_eq!(counter.current(), 0);
        counter.reset();
        assert_eq!(counter.total(), 0);
    }

    #[test]
    fn thread_count() -> Result<(), ImageError> {
        let ctx = ProcessingContext::new().with_num_threads(3)?;
        assert_eq!(ctx.strategy(), ExecutionStrategy::Fixed(3));
        assert_eq!(ctx.install(rayon::current_num_threads)?, 3);

        let err = ProcessingContext::new().with_num_threads(0).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidParameter);
        Ok(())
    }
}
