//! Error types for the `lottie2webp` crate.
//!
//! This module defines [`ConvertError`], the unified error type returned by
//! every fallible operation in the crate. Errors carry enough context (file
//! paths, frame indices, upstream messages) to be printed directly to the
//! operator.

use std::{io::Error as IoError, path::PathBuf};

use thiserror::Error;

/// The unified error type for all `lottie2webp` operations.
///
/// Every error is terminal for the conversion run that produced it; nothing
/// is retried and no partial output is written.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConvertError {
    /// Invalid options: out-of-range encoder settings, a zero stride, or a
    /// stride larger than the animation.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// The animation could not be read or parsed.
    #[error("Failed to load animation at {path}: {reason}")]
    Load {
        /// Path of the animation input.
        path: PathBuf,
        /// Underlying reason the load failed.
        reason: String,
    },

    /// A compressed (`.tgs`) animation could not be decompressed.
    #[error("Failed to decompress {path}: {reason}")]
    Decompress {
        /// Path of the compressed input.
        path: PathBuf,
        /// Underlying gzip error.
        reason: String,
    },

    /// The animation reports zero frames.
    #[error("Animation has no frames to render")]
    EmptyAnimation,

    /// A rendered frame has different dimensions from the first frame.
    #[error(
        "Frame {frame} is {}x{}, expected {}x{} (frame dimensions must not change)",
        actual.0, actual.1, expected.0, expected.1
    )]
    DimensionMismatch {
        /// Source frame index that was rendered.
        frame: u32,
        /// Dimensions of the first rendered frame.
        expected: (u32, u32),
        /// Dimensions of the offending frame.
        actual: (u32, u32),
    },

    /// The renderer failed to produce a frame.
    #[error("Failed to render frame {frame}: {reason}")]
    Render {
        /// Source frame index that was requested.
        frame: u32,
        /// Underlying reason.
        reason: String,
    },

    /// The WebP encoder rejected a frame or failed to assemble the output.
    #[error("WebP encoding error: {0}")]
    Encode(String),

    /// An I/O error occurred while reading input or writing output.
    #[error("I/O error: {0}")]
    Io(#[from] IoError),
}

impl ConvertError {
    /// Returns `true` for failures that happened while loading the input
    /// (unreadable, malformed, or undecompressable animations).
    pub fn is_load_error(&self) -> bool {
        matches!(self, ConvertError::Load { .. } | ConvertError::Decompress { .. })
    }
}

impl From<webp_animation::Error> for ConvertError {
    fn from(error: webp_animation::Error) -> Self {
        ConvertError::Encode(format!("{error:?}"))
    }
}
