//! Animated WebP encoding.
//!
//! [`FrameEncoder`] is the encoder-facing seam of the pipeline: frames go in
//! with millisecond timestamps and, after a terminating timestamp, the
//! assembled container comes out as bytes. [`WebpEncoder`] implements it
//! with libwebp's animation encoder via the `webp-animation` crate.
//!
//! # Example
//!
//! ```no_run
//! use image::RgbaImage;
//! use lottie2webp::{ConvertError, FrameEncoder, WebpEncoder, WebpOptions};
//!
//! let options = WebpOptions::default().quality(80.0).lossy(true);
//! let mut encoder = WebpEncoder::new(64, 64, &options)?;
//! let frame = RgbaImage::new(64, 64);
//! encoder.add_frame(&frame, 0)?;
//! encoder.add_frame(&frame, 100)?;
//! let bytes = Box::new(encoder).finish(200)?;
//! std::fs::write("blank.webp", bytes)?;
//! # Ok::<(), ConvertError>(())
//! ```

use image::RgbaImage;
use webp_animation::{
    AnimParams, ColorMode, Encoder, EncoderOptions, EncodingConfig, EncodingType,
    LossyEncodingConfig,
};

use crate::{configuration::check_render_size, error::ConvertError};

/// Accepts rendered frames and assembles them into an animated image.
pub trait FrameEncoder {
    /// Add a frame that starts displaying at `timestamp_ms`.
    ///
    /// The encoder only borrows `frame` for the duration of the call.
    fn add_frame(&mut self, frame: &RgbaImage, timestamp_ms: u64) -> Result<(), ConvertError>;

    /// Signal that no more frames follow, closing the last frame at
    /// `end_timestamp_ms`, and assemble the encoded container.
    fn finish(self: Box<Self>, end_timestamp_ms: u64) -> Result<Vec<u8>, ConvertError>;
}

/// Encoder settings for animated WebP output.
///
/// Defaults follow libwebp's: lossless, quality 75, method 4, loop forever.
#[derive(Debug, Clone, PartialEq)]
pub struct WebpOptions {
    /// Quality factor (0–100). For lossless output this trades speed for
    /// size; for lossy output it controls visual quality.
    pub quality: f32,
    /// Compression method (0 = fastest, 6 = smallest).
    pub method: u8,
    /// Use lossy compression instead of lossless.
    pub lossy: bool,
    /// Let the encoder choose lossy or lossless per frame.
    pub allow_mixed: bool,
    /// Spend extra effort minimising output size.
    pub minimize_size: bool,
    /// Deblocking filter strength (0–100, lossy only). `None` keeps the
    /// encoder default.
    pub filter_strength: Option<u8>,
    /// Request multi-threaded encoding.
    ///
    /// `webp-animation` exposes no `thread_level` setting, so this is
    /// currently only logged and has no effect on the encoder.
    pub multi_thread: bool,
    /// Number of times the animation loops; 0 means forever.
    pub loop_count: u32,
}

impl Default for WebpOptions {
    fn default() -> Self {
        Self {
            quality: 75.0,
            method: 4,
            lossy: false,
            allow_mixed: false,
            minimize_size: false,
            filter_strength: None,
            multi_thread: false,
            loop_count: 0,
        }
    }
}

impl WebpOptions {
    /// Set the quality factor (0–100).
    #[must_use]
    pub fn quality(mut self, quality: f32) -> Self {
        self.quality = quality;
        self
    }

    /// Set the compression method (0–6).
    #[must_use]
    pub fn method(mut self, method: u8) -> Self {
        self.method = method;
        self
    }

    /// Switch between lossy and lossless compression.
    #[must_use]
    pub fn lossy(mut self, lossy: bool) -> Self {
        self.lossy = lossy;
        self
    }

    /// Allow mixing lossy and lossless frames.
    #[must_use]
    pub fn allow_mixed(mut self, allow_mixed: bool) -> Self {
        self.allow_mixed = allow_mixed;
        self
    }

    /// Minimise output size at the cost of encoding speed.
    #[must_use]
    pub fn minimize_size(mut self, minimize_size: bool) -> Self {
        self.minimize_size = minimize_size;
        self
    }

    /// Set the lossy deblocking filter strength (0–100).
    #[must_use]
    pub fn filter_strength(mut self, strength: u8) -> Self {
        self.filter_strength = Some(strength);
        self
    }

    /// Request multi-threaded encoding.
    #[must_use]
    pub fn multi_thread(mut self, multi_thread: bool) -> Self {
        self.multi_thread = multi_thread;
        self
    }

    /// Set the loop count (0 = infinite).
    #[must_use]
    pub fn loop_count(mut self, loop_count: u32) -> Self {
        self.loop_count = loop_count;
        self
    }

    /// Check every setting against the ranges libwebp accepts.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::Configuration`] naming the first invalid field.
    pub fn validate(&self) -> Result<(), ConvertError> {
        if !(0.0..=100.0).contains(&self.quality) {
            return Err(ConvertError::Configuration(format!(
                "quality must be between 0 and 100 (got {})",
                self.quality
            )));
        }
        if self.method > 6 {
            return Err(ConvertError::Configuration(format!(
                "method must be between 0 and 6 (got {})",
                self.method
            )));
        }
        if let Some(strength) = self.filter_strength {
            if strength > 100 {
                return Err(ConvertError::Configuration(format!(
                    "filter strength must be between 0 and 100 (got {strength})"
                )));
            }
            if !self.lossy && !self.allow_mixed {
                log::warn!("filter strength only applies to lossy frames and will be ignored");
            }
        }
        if i32::try_from(self.loop_count).is_err() {
            return Err(ConvertError::Configuration(format!(
                "loop count {} is too large",
                self.loop_count
            )));
        }
        Ok(())
    }

    fn encoding_config(&self) -> EncodingConfig {
        let encoding_type = if self.lossy {
            let mut lossy = LossyEncodingConfig::default();
            if let Some(strength) = self.filter_strength {
                lossy.filter_strength = strength as _;
            }
            EncodingType::Lossy(lossy)
        } else {
            EncodingType::Lossless
        };

        EncodingConfig {
            encoding_type,
            quality: self.quality,
            method: usize::from(self.method),
        }
    }

    fn encoder_options(&self) -> EncoderOptions {
        EncoderOptions {
            anim_params: AnimParams {
                loop_count: self.loop_count as i32,
            },
            minimize_size: self.minimize_size,
            allow_mixed: self.allow_mixed,
            color_mode: ColorMode::Rgba,
            encoding_config: Some(self.encoding_config()),
            ..EncoderOptions::default()
        }
    }
}

/// Animated WebP encoder backed by libwebp's `WebPAnimEncoder`.
pub struct WebpEncoder {
    encoder: Encoder,
    dimensions: (u32, u32),
    frames: u32,
}

impl WebpEncoder {
    /// Create an encoder for a `width`×`height` canvas.
    ///
    /// # Errors
    ///
    /// - [`ConvertError::Configuration`] if `options` fail validation or the
    ///   canvas is empty or larger than [`MAX_RENDER_SIZE`](crate::MAX_RENDER_SIZE).
    /// - [`ConvertError::Encode`] if libwebp cannot create the encoder.
    pub fn new(width: u32, height: u32, options: &WebpOptions) -> Result<Self, ConvertError> {
        options.validate()?;
        check_render_size(width, height)?;

        if options.multi_thread {
            log::debug!("Multi-threaded encoding requested but not supported; ignoring");
        }
        log::debug!("Creating {width}x{height} WebP encoder ({options:?})");

        let encoder = Encoder::new_with_options((width, height), options.encoder_options())?;
        Ok(Self {
            encoder,
            dimensions: (width, height),
            frames: 0,
        })
    }

    /// Boxed constructor, usable as the encoder factory of
    /// [`Converter::encode_with`](crate::Converter::encode_with).
    pub fn boxed(
        width: u32,
        height: u32,
        options: &WebpOptions,
    ) -> Result<Box<dyn FrameEncoder>, ConvertError> {
        Ok(Box::new(Self::new(width, height, options)?))
    }

    /// Canvas dimensions fixed at construction.
    pub fn dimensions(&self) -> (u32, u32) {
        self.dimensions
    }
}

fn to_encoder_timestamp(timestamp_ms: u64) -> Result<i32, ConvertError> {
    i32::try_from(timestamp_ms).map_err(|_| {
        ConvertError::Encode(format!(
            "timestamp {timestamp_ms} ms exceeds the WebP timestamp range"
        ))
    })
}

impl FrameEncoder for WebpEncoder {
    fn add_frame(&mut self, frame: &RgbaImage, timestamp_ms: u64) -> Result<(), ConvertError> {
        if frame.dimensions() != self.dimensions {
            let (width, height) = frame.dimensions();
            return Err(ConvertError::Encode(format!(
                "frame is {width}x{height} but the canvas is {}x{}",
                self.dimensions.0, self.dimensions.1
            )));
        }

        let timestamp = to_encoder_timestamp(timestamp_ms)?;
        self.encoder
            .add_frame(frame.as_raw(), timestamp)
            .map_err(|error| {
                ConvertError::Encode(format!(
                    "failed to add frame {} at {timestamp} ms: {error:?}",
                    self.frames
                ))
            })?;
        self.frames += 1;
        Ok(())
    }

    fn finish(self: Box<Self>, end_timestamp_ms: u64) -> Result<Vec<u8>, ConvertError> {
        let timestamp = to_encoder_timestamp(end_timestamp_ms)?;
        log::debug!(
            "Assembling {} frames, final timestamp {timestamp} ms",
            self.frames
        );
        let data = self.encoder.finalize(timestamp).map_err(|error| {
            ConvertError::Encode(format!("failed to assemble animation: {error:?}"))
        })?;
        Ok(data.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(WebpOptions::default().validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_settings() {
        assert!(WebpOptions::default().quality(101.0).validate().is_err());
        assert!(WebpOptions::default().quality(-1.0).validate().is_err());
        assert!(WebpOptions::default().method(7).validate().is_err());
        assert!(
            WebpOptions::default()
                .lossy(true)
                .filter_strength(150)
                .validate()
                .is_err()
        );
        assert!(WebpOptions::default().loop_count(u32::MAX).validate().is_err());
    }

    #[test]
    fn oversized_canvas_is_a_configuration_error() {
        let result = WebpEncoder::new(20_000, 64, &WebpOptions::default());
        assert!(matches!(result, Err(ConvertError::Configuration(_))));
    }

    #[test]
    fn lossy_flag_selects_encoding_type() {
        let lossless = WebpOptions::default().encoding_config();
        assert!(matches!(lossless.encoding_type, EncodingType::Lossless));

        let lossy = WebpOptions::default().lossy(true).encoding_config();
        assert!(matches!(lossy.encoding_type, EncodingType::Lossy(_)));
    }
}
