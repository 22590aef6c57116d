//! Progress reporting.
//!
//! This module provides [`ProgressCallback`] for monitoring a conversion and
//! [`ProgressInfo`] for per-frame progress snapshots.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use lottie2webp::{ConvertOptions, Converter, ProgressCallback, ProgressInfo};
//!
//! struct PrintProgress;
//!
//! impl ProgressCallback for PrintProgress {
//!     fn on_progress(&self, info: &ProgressInfo) {
//!         if let Some(pct) = info.percentage {
//!             println!("frame {:?}: {pct:.1}% complete", info.current_frame);
//!         }
//!     }
//! }
//!
//! let options = ConvertOptions::new().with_progress(Arc::new(PrintProgress));
//! Converter::new(options).convert_file("sticker.tgs", "sticker.webp")?;
//! # Ok::<(), lottie2webp::ConvertError>(())
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

/// A snapshot of conversion progress.
///
/// Delivered to [`ProgressCallback::on_progress`] at a cadence controlled
/// by [`ConvertOptions::with_batch_size`](crate::ConvertOptions::with_batch_size).
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    /// How many sampled frames have been encoded so far.
    pub current: u64,
    /// Total sampled frames expected.
    pub total: Option<u64>,
    /// Completion percentage (0.0 – 100.0), if `total` is known.
    pub percentage: Option<f32>,
    /// Wall-clock time elapsed since rendering started.
    pub elapsed: Duration,
    /// Estimated time remaining, based on current throughput.
    pub estimated_remaining: Option<Duration>,
    /// The source frame index that was just encoded.
    pub current_frame: Option<u32>,
    /// Output timestamp assigned to that frame.
    pub current_timestamp: Option<Duration>,
}

/// Trait for receiving progress updates during a conversion.
///
/// Progress callbacks are **infallible**: they observe but cannot halt the
/// conversion.
pub trait ProgressCallback: Send + Sync {
    /// Called after encoded frames, every `batch_size` frames.
    fn on_progress(&self, info: &ProgressInfo);
}

/// A no-op implementation that discards all progress notifications.
///
/// This is the default when no callback is configured.
pub(crate) struct NoOpProgress;

impl ProgressCallback for NoOpProgress {
    fn on_progress(&self, _info: &ProgressInfo) {}
}

/// Internal helper that tracks progress timing and emits callbacks.
pub(crate) struct ProgressTracker {
    callback: Arc<dyn ProgressCallback>,
    total: Option<u64>,
    current: u64,
    batch_size: u64,
    start_time: Instant,
    items_since_last_report: u64,
}

impl ProgressTracker {
    pub(crate) fn new(
        callback: Arc<dyn ProgressCallback>,
        total: Option<u64>,
        batch_size: u64,
    ) -> Self {
        Self {
            callback,
            total,
            current: 0,
            batch_size: batch_size.max(1),
            start_time: Instant::now(),
            items_since_last_report: 0,
        }
    }

    /// Record one encoded frame and fire the callback if the batch
    /// threshold is reached.
    pub(crate) fn advance(&mut self, frame: u32, timestamp: Duration) {
        self.current += 1;
        self.items_since_last_report += 1;

        if self.items_since_last_report >= self.batch_size {
            self.report(Some(frame), Some(timestamp));
            self.items_since_last_report = 0;
        }
    }

    /// Emit a final report unless the last frame was already reported.
    pub(crate) fn finish(&mut self) {
        if self.items_since_last_report > 0 {
            self.report(None, None);
            self.items_since_last_report = 0;
        }
    }

    fn report(&self, frame: Option<u32>, timestamp: Option<Duration>) {
        let elapsed = self.start_time.elapsed();

        let percentage = self
            .total
            .filter(|&t| t > 0)
            .map(|t| (self.current as f32 / t as f32) * 100.0);

        let estimated_remaining = if self.current > 0 {
            self.total.map(|t| {
                let remaining = t.saturating_sub(self.current);
                let per_item = elapsed.div_f64(self.current as f64);
                per_item.mul_f64(remaining as f64)
            })
        } else {
            None
        };

        let info = ProgressInfo {
            current: self.current,
            total: self.total,
            percentage,
            elapsed,
            estimated_remaining,
            current_frame: frame,
            current_timestamp: timestamp,
        };

        self.callback.on_progress(&info);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<u64>>,
    }

    impl ProgressCallback for Recorder {
        fn on_progress(&self, info: &ProgressInfo) {
            self.seen.lock().unwrap().push(info.current);
        }
    }

    #[test]
    fn batches_and_final_report() {
        let recorder = Arc::new(Recorder::default());
        let mut tracker = ProgressTracker::new(recorder.clone(), Some(5), 2);
        for frame in 0..5 {
            tracker.advance(frame, Duration::ZERO);
        }
        tracker.finish();
        assert_eq!(*recorder.seen.lock().unwrap(), vec![2, 4, 5]);
    }

    #[test]
    fn finish_does_not_repeat_last_report() {
        let recorder = Arc::new(Recorder::default());
        let mut tracker = ProgressTracker::new(recorder.clone(), Some(2), 1);
        tracker.advance(0, Duration::ZERO);
        tracker.advance(1, Duration::ZERO);
        tracker.finish();
        assert_eq!(*recorder.seen.lock().unwrap(), vec![1, 2]);
    }
}
