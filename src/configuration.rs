//! Conversion configuration.
//!
//! [`ConvertOptions`] is a builder that carries the render size, sampling
//! parameters, encoder settings, and progress reporting through a
//! conversion without widening every function signature.
//!
//! # Example
//!
//! ```
//! use lottie2webp::{ConvertOptions, WebpOptions};
//!
//! let options = ConvertOptions::new()
//!     .with_size(256, 256)
//!     .with_frame_budget(Some(25))
//!     .with_webp(WebpOptions::default().lossy(true).quality(60.0));
//! assert_eq!(options.size(), (256, 256));
//! ```

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use crate::encode::WebpOptions;
use crate::error::ConvertError;
use crate::progress::{NoOpProgress, ProgressCallback};
use crate::sampler::DEFAULT_FRAME_BUDGET;

/// Default render width and height in pixels.
pub const DEFAULT_RENDER_SIZE: u32 = 512;

/// Largest width or height a WebP canvas can have.
pub const MAX_RENDER_SIZE: u32 = 16383;

/// Reject render sizes the encoder cannot represent, before anything is
/// allocated for them.
pub(crate) fn check_render_size(width: u32, height: u32) -> Result<(), ConvertError> {
    if width == 0 || height == 0 {
        return Err(ConvertError::Configuration(format!(
            "render size must be non-zero (got {width}x{height})"
        )));
    }
    if width > MAX_RENDER_SIZE || height > MAX_RENDER_SIZE {
        return Err(ConvertError::Configuration(format!(
            "render size {width}x{height} exceeds the WebP limit of {MAX_RENDER_SIZE}x{MAX_RENDER_SIZE}"
        )));
    }
    Ok(())
}

/// Configuration for a conversion run.
///
/// All fields have defaults: 512×512 output, no explicit stride, a frame
/// budget of 20, default [`WebpOptions`], and no progress callback.
#[derive(Clone)]
pub struct ConvertOptions {
    pub(crate) width: u32,
    pub(crate) height: u32,
    /// Explicit sampling stride. When set, the frame budget is ignored.
    pub(crate) stride: Option<u32>,
    /// Target number of output frames for long animations. `None` renders
    /// every frame.
    pub(crate) frame_budget: Option<u32>,
    pub(crate) webp: WebpOptions,
    pub(crate) progress: Arc<dyn ProgressCallback>,
    /// How often to fire the progress callback (every N frames).
    pub(crate) batch_size: u64,
}

impl Debug for ConvertOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ConvertOptions")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("stride", &self.stride)
            .field("frame_budget", &self.frame_budget)
            .field("webp", &self.webp)
            .field("batch_size", &self.batch_size)
            .finish_non_exhaustive()
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ConvertOptions {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self {
            width: DEFAULT_RENDER_SIZE,
            height: DEFAULT_RENDER_SIZE,
            stride: None,
            frame_budget: Some(DEFAULT_FRAME_BUDGET),
            webp: WebpOptions::default(),
            progress: Arc::new(NoOpProgress),
            batch_size: 1,
        }
    }

    /// Set the render size in pixels.
    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Render every `stride`-th source frame.
    ///
    /// An explicit stride takes precedence over the frame budget.
    #[must_use]
    pub fn with_stride(mut self, stride: u32) -> Self {
        self.stride = Some(stride);
        self
    }

    /// Set the frame budget used to derive a stride for long animations.
    ///
    /// `None` (or `Some(0)`) disables the cap.
    #[must_use]
    pub fn with_frame_budget(mut self, budget: Option<u32>) -> Self {
        self.frame_budget = budget.filter(|&budget| budget > 0);
        self
    }

    /// Set the WebP encoder settings.
    #[must_use]
    pub fn with_webp(mut self, webp: WebpOptions) -> Self {
        self.webp = webp;
        self
    }

    /// Attach a progress callback.
    #[must_use]
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }

    /// Set how often the progress callback fires. Clamped to at least 1.
    #[must_use]
    pub fn with_batch_size(mut self, size: u64) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// Render size as `(width, height)`.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Explicit stride, if one was set.
    pub fn stride(&self) -> Option<u32> {
        self.stride
    }

    /// Active frame budget, if any.
    pub fn frame_budget(&self) -> Option<u32> {
        self.frame_budget
    }

    /// Encoder settings.
    pub fn webp(&self) -> &WebpOptions {
        &self.webp
    }

    /// Check the render size and encoder settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::Configuration`] for a zero or oversized render
    /// size, or for out-of-range [`WebpOptions`].
    pub fn validate(&self) -> Result<(), ConvertError> {
        check_render_size(self.width, self.height)?;
        self.webp.validate()
    }
}
