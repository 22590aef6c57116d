//! Animation sources.
//!
//! [`AnimationSource`] is the renderer-facing seam of the pipeline: anything
//! that knows its frame count and duration and can synchronously draw a
//! frame into an RGBA buffer. [`LottieAnimation`] implements it on top of
//! rlottie.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    path::Path,
    time::Duration,
};

use image::RgbaImage;
use rlottie::{Animation, Size, Surface};

use crate::{
    configuration::check_render_size,
    conversion::unpremultiply_bgra,
    error::ConvertError,
    input::{AnimationData, read_animation_data},
    metadata::AnimationMetadata,
};

/// A vector animation that can be rendered frame by frame.
pub trait AnimationSource {
    /// Total number of frames in the animation.
    fn frame_count(&self) -> u32;

    /// Total playback duration in seconds.
    fn duration_seconds(&self) -> f64;

    /// Native frame rate in frames per second.
    fn frame_rate(&self) -> f64;

    /// Render frame `index` into `destination`, overwriting its contents.
    ///
    /// The buffer is owned by the caller and reused across frames. An
    /// implementation may resize it, but the pipeline rejects any frame
    /// whose dimensions differ from the first one.
    fn render_frame(&mut self, index: u32, destination: &mut RgbaImage)
    -> Result<(), ConvertError>;
}

/// A Lottie animation rendered with rlottie.
///
/// Created via [`LottieAnimation::open`] or [`LottieAnimation::from_data`].
/// The rlottie surface is allocated once at the render size and reused for
/// every frame.
pub struct LottieAnimation {
    animation: Animation,
    surface: Surface,
    metadata: AnimationMetadata,
}

impl Debug for LottieAnimation {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("LottieAnimation")
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

impl LottieAnimation {
    /// Open a `.json` or `.tgs` animation and prepare it for rendering at
    /// `size` (width, height).
    ///
    /// # Errors
    ///
    /// - [`ConvertError::Load`] if the file cannot be read or parsed.
    /// - [`ConvertError::Decompress`] if a `.tgs` file is not valid gzip.
    /// - [`ConvertError::Configuration`] if either dimension is zero or larger
    ///   than [`MAX_RENDER_SIZE`](crate::MAX_RENDER_SIZE).
    ///
    /// # Example
    ///
    /// ```no_run
    /// use lottie2webp::{AnimationSource, ConvertError, LottieAnimation};
    ///
    /// let animation = LottieAnimation::open("sticker.tgs", (512, 512))?;
    /// println!("{} frames", animation.frame_count());
    /// # Ok::<(), ConvertError>(())
    /// ```
    pub fn open<P: AsRef<Path>>(path: P, size: (u32, u32)) -> Result<Self, ConvertError> {
        let data = read_animation_data(path)?;
        Self::from_data(data, size)
    }

    /// Parse already-loaded (and decompressed) animation data.
    ///
    /// External assets referenced by the animation are resolved relative to
    /// the directory of [`AnimationData::path`].
    pub fn from_data(data: AnimationData, size: (u32, u32)) -> Result<Self, ConvertError> {
        let (width, height) = size;
        check_render_size(width, height)?;

        let resource_dir = data
            .path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let cache_key = data.path.to_string_lossy().into_owned();

        let animation = Animation::from_data(data.json, cache_key, resource_dir).ok_or_else(|| {
            ConvertError::Load {
                path: data.path.clone(),
                reason: "not a valid Lottie animation".to_string(),
            }
        })?;

        let frame_count = u32::try_from(animation.totalframe()).map_err(|_| ConvertError::Load {
            path: data.path.clone(),
            reason: format!("frame count {} is out of range", animation.totalframe()),
        })?;
        let duration_seconds = animation.duration();
        let intrinsic = animation.size();

        let metadata = AnimationMetadata {
            kind: data.kind,
            frame_count,
            frames_per_second: animation.framerate(),
            duration: Duration::try_from_secs_f64(duration_seconds).unwrap_or_default(),
            intrinsic_width: intrinsic_dimension(&data.path, "width", intrinsic.width)?,
            intrinsic_height: intrinsic_dimension(&data.path, "height", intrinsic.height)?,
            width,
            height,
        };

        log::debug!(
            "Loaded {} ({}): {} frames, {:.3}s, {}x{}",
            data.path.display(),
            metadata.kind,
            frame_count,
            duration_seconds,
            metadata.intrinsic_width,
            metadata.intrinsic_height,
        );

        let surface = Surface::new(Size {
            width: width as usize,
            height: height as usize,
        });

        Ok(Self {
            animation,
            surface,
            metadata,
        })
    }

    /// Metadata read when the animation was opened.
    pub fn metadata(&self) -> &AnimationMetadata {
        &self.metadata
    }

    /// The (width, height) frames are rendered at.
    pub fn render_size(&self) -> (u32, u32) {
        (self.metadata.width, self.metadata.height)
    }
}

fn intrinsic_dimension(path: &Path, axis: &str, value: usize) -> Result<u32, ConvertError> {
    u32::try_from(value).map_err(|_| ConvertError::Load {
        path: path.to_path_buf(),
        reason: format!("declared {axis} {value} is out of range"),
    })
}

impl AnimationSource for LottieAnimation {
    fn frame_count(&self) -> u32 {
        self.metadata.frame_count
    }

    fn duration_seconds(&self) -> f64 {
        self.animation.duration()
    }

    fn frame_rate(&self) -> f64 {
        self.metadata.frames_per_second
    }

    fn render_frame(
        &mut self,
        index: u32,
        destination: &mut RgbaImage,
    ) -> Result<(), ConvertError> {
        if index >= self.metadata.frame_count {
            return Err(ConvertError::Render {
                frame: index,
                reason: format!(
                    "frame is out of range (animation has {} frames)",
                    self.metadata.frame_count
                ),
            });
        }

        self.animation.render(index as usize, &mut self.surface);

        let (width, height) = self.render_size();
        if destination.dimensions() != (width, height) {
            *destination = RgbaImage::new(width, height);
        }

        for (source, target) in self.surface.data().iter().zip(destination.pixels_mut()) {
            target.0 = unpremultiply_bgra([source.b, source.g, source.r, source.a]);
        }

        Ok(())
    }
}
