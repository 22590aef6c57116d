//! Frame sampling.
//!
//! [`FrameSampler`] decides which source frames of an animation are rendered.
//! Long animations are thinned out by a stride so that the output stays
//! close to a frame budget; short ones are rendered frame by frame.
//!
//! # Example
//!
//! ```
//! use lottie2webp::FrameSampler;
//!
//! // 100 source frames, no explicit stride, budget of 20 frames.
//! let sampler = FrameSampler::new(100, None, Some(20))?;
//! assert_eq!(sampler.stride(), 5);
//!
//! let indices: Vec<u32> = sampler.indices().collect();
//! assert_eq!(indices[..3], [0, 5, 10]);
//! assert_eq!(indices.len(), 20);
//! # Ok::<(), lottie2webp::ConvertError>(())
//! ```

use std::iter::FusedIterator;

use crate::error::ConvertError;

/// Frame budget applied when the caller does not supply one.
pub const DEFAULT_FRAME_BUDGET: u32 = 20;

/// Chooses the subset of source frames to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSampler {
    total_frames: u32,
    stride: u32,
}

impl FrameSampler {
    /// Resolve the sampling stride for an animation of `total_frames`.
    ///
    /// An explicit stride is honoured as-is. Without one, the stride is
    /// `total_frames / budget` when the animation exceeds the budget, and 1
    /// otherwise. Integer division means the emitted frame count can be
    /// below the budget; the budget is an approximation, not a hard cap.
    ///
    /// # Errors
    ///
    /// - [`ConvertError::EmptyAnimation`] if `total_frames` is zero.
    /// - [`ConvertError::Configuration`] if the explicit stride is zero or
    ///   larger than `total_frames`.
    pub fn new(
        total_frames: u32,
        explicit_stride: Option<u32>,
        frame_budget: Option<u32>,
    ) -> Result<Self, ConvertError> {
        if total_frames == 0 {
            return Err(ConvertError::EmptyAnimation);
        }

        let stride = match explicit_stride {
            Some(0) => {
                return Err(ConvertError::Configuration(
                    "stride must be greater than zero".to_string(),
                ));
            }
            Some(stride) if stride > total_frames => {
                return Err(ConvertError::Configuration(format!(
                    "stride {stride} exceeds the animation's {total_frames} frames"
                )));
            }
            Some(stride) => stride,
            None => match frame_budget {
                Some(budget) if budget > 0 && total_frames > budget => total_frames / budget,
                _ => 1,
            },
        };

        log::debug!(
            "Sampling {total_frames} frames with stride {stride} (explicit={explicit_stride:?}, budget={frame_budget:?})"
        );

        Ok(Self {
            total_frames,
            stride,
        })
    }

    /// Number of frames in the source animation.
    pub fn total_frames(&self) -> u32 {
        self.total_frames
    }

    /// The resolved sampling stride (always at least 1).
    pub fn stride(&self) -> u32 {
        self.stride
    }

    /// Number of indices [`indices`](FrameSampler::indices) yields.
    pub fn sample_count(&self) -> u32 {
        self.total_frames.div_ceil(self.stride)
    }

    /// Lazily iterate the sampled source indices `0, stride, 2*stride, …`.
    ///
    /// The iterator is finite and can be restarted by calling this method
    /// again (or by cloning it before consumption).
    pub fn indices(&self) -> SampleIndices {
        SampleIndices {
            next: 0,
            total_frames: self.total_frames,
            stride: self.stride,
        }
    }
}

impl IntoIterator for &FrameSampler {
    type Item = u32;
    type IntoIter = SampleIndices;

    fn into_iter(self) -> Self::IntoIter {
        self.indices()
    }
}

/// Iterator over sampled source frame indices.
///
/// Created by [`FrameSampler::indices`].
#[derive(Debug, Clone)]
pub struct SampleIndices {
    next: u32,
    total_frames: u32,
    stride: u32,
}

impl Iterator for SampleIndices {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        if self.next >= self.total_frames {
            return None;
        }
        let index = self.next;
        // Saturate so a stride near u32::MAX terminates instead of wrapping.
        self.next = self.next.saturating_add(self.stride);
        Some(index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self
            .total_frames
            .saturating_sub(self.next)
            .div_ceil(self.stride) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SampleIndices {}

impl FusedIterator for SampleIndices {}
