//! Output timing reconstruction.
//!
//! [`Timeline`] assigns an output timestamp to every sampled frame so that
//! the encoded animation lasts roughly as long as the source. The per-frame
//! duration is the source duration averaged over the emitted frame count
//! and is computed once; rounding error therefore accumulates linearly over
//! the run instead of being corrected frame by frame.
//!
//! # Example
//!
//! ```
//! use lottie2webp::Timeline;
//!
//! // 100 frames over 4 seconds, every 5th frame rendered.
//! let timeline = Timeline::new(4.0, 100, 5)?;
//! assert_eq!(timeline.emitted_frame_count(), 20);
//! assert_eq!(timeline.frame_duration_ms(), 200);
//! assert_eq!(timeline.timestamp(19), 3800);
//! # Ok::<(), lottie2webp::ConvertError>(())
//! ```

use crate::error::ConvertError;

/// Fixed-rate output timeline for one conversion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeline {
    emitted_frame_count: u32,
    frame_duration_ms: u32,
}

impl Timeline {
    /// Build the timeline for an animation of `total_frames` lasting
    /// `duration_seconds`, sampled every `stride` frames.
    ///
    /// The frame duration is `round(duration * 1000 / (total_frames / stride))`
    /// milliseconds. A positive source duration never yields a zero-length
    /// frame; the value is clamped to at least 1 ms.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::Configuration`] if the stride is zero or
    /// larger than `total_frames` (no frames would be emitted), or if the
    /// duration is negative or not finite.
    pub fn new(duration_seconds: f64, total_frames: u32, stride: u32) -> Result<Self, ConvertError> {
        if stride == 0 {
            return Err(ConvertError::Configuration(
                "stride must be greater than zero".to_string(),
            ));
        }
        if !duration_seconds.is_finite() || duration_seconds < 0.0 {
            return Err(ConvertError::Configuration(format!(
                "animation duration must be a non-negative number of seconds (got {duration_seconds})"
            )));
        }

        let emitted_frame_count = total_frames / stride;
        if emitted_frame_count == 0 {
            return Err(ConvertError::Configuration(format!(
                "stride {stride} leaves no frames to emit from {total_frames} source frames"
            )));
        }

        let average_ms = (duration_seconds * 1000.0 / f64::from(emitted_frame_count)).round();
        let mut frame_duration_ms = average_ms.min(f64::from(u32::MAX)) as u32;
        if frame_duration_ms == 0 && duration_seconds > 0.0 {
            frame_duration_ms = 1;
        }

        log::debug!(
            "Timeline: {emitted_frame_count} frames at {frame_duration_ms} ms (source {duration_seconds:.3}s)"
        );

        Ok(Self {
            emitted_frame_count,
            frame_duration_ms,
        })
    }

    /// `total_frames / stride`, the frame count the duration is averaged over.
    pub fn emitted_frame_count(&self) -> u32 {
        self.emitted_frame_count
    }

    /// Display time of every output frame, in milliseconds.
    pub fn frame_duration_ms(&self) -> u32 {
        self.frame_duration_ms
    }

    /// Timestamp of the `k`-th sampled frame (0-based), in milliseconds.
    pub fn timestamp(&self, k: u32) -> u64 {
        u64::from(k) * u64::from(self.frame_duration_ms)
    }

    /// Timestamps of the first `count` sampled frames.
    pub fn timestamps(&self, count: u32) -> impl Iterator<Item = u64> + Clone + '_ {
        (0..count).map(move |k| self.timestamp(k))
    }

    /// Timestamp that closes out the last of `count` frames.
    ///
    /// This is the value handed to the encoder's terminating call so the
    /// final frame gets its full duration.
    pub fn end_timestamp(&self, count: u32) -> u64 {
        self.timestamp(count)
    }
}
