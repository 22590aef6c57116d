//! Animation metadata types.
//!
//! [`AnimationMetadata`] is read once when an animation is opened and
//! describes both the source (frame count, frame rate, duration, intrinsic
//! size) and the size frames are rendered at.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    time::Duration,
};

use crate::input::InputKind;

/// Metadata for a loaded animation.
///
/// # Example
///
/// ```no_run
/// use lottie2webp::{AnimationSource, LottieAnimation};
///
/// let animation = LottieAnimation::open("sticker.tgs", (512, 512)).unwrap();
/// let metadata = animation.metadata();
/// println!("{} frames over {:?}", metadata.frame_count, metadata.duration);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct AnimationMetadata {
    /// How the input file was classified.
    pub kind: InputKind,
    /// Total number of source frames.
    pub frame_count: u32,
    /// Source frame rate in frames per second.
    pub frames_per_second: f64,
    /// Total animation duration.
    pub duration: Duration,
    /// Width declared by the animation, in pixels.
    pub intrinsic_width: u32,
    /// Height declared by the animation, in pixels.
    pub intrinsic_height: u32,
    /// Width frames are rendered at.
    pub width: u32,
    /// Height frames are rendered at.
    pub height: u32,
}

impl Display for AnimationMetadata {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        writeln!(f, "Format: {}", self.kind)?;
        writeln!(
            f,
            "Frames: {} @ {:.2} fps ({:.3}s)",
            self.frame_count,
            self.frames_per_second,
            self.duration.as_secs_f64()
        )?;
        writeln!(
            f,
            "Canvas: {}x{} (rendered at {}x{})",
            self.intrinsic_width, self.intrinsic_height, self.width, self.height
        )
    }
}
