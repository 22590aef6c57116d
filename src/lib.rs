//! # lottie2webp
//!
//! Convert Lottie animations and Telegram stickers into animated WebP.
//!
//! `lottie2webp` renders a Lottie (`.json`) or Telegram sticker (`.tgs`)
//! animation frame by frame with [rlottie](https://crates.io/crates/rlottie)
//! and muxes the frames into an animated WebP container with libwebp via
//! [`webp-animation`](https://crates.io/crates/webp-animation).
//!
//! ## Quick Start
//!
//! ### Convert a File
//!
//! ```no_run
//! use lottie2webp::Converter;
//!
//! let report = Converter::default()
//!     .convert_file("sticker.tgs", "sticker.webp")
//!     .unwrap();
//! println!("{} frames, {} ms", report.frames_encoded, report.duration_ms);
//! ```
//!
//! ### Tune Sampling and Encoding
//!
//! ```no_run
//! use lottie2webp::{ConvertOptions, Converter, WebpOptions};
//!
//! let options = ConvertOptions::new()
//!     .with_size(256, 256)
//!     .with_stride(2)
//!     .with_webp(WebpOptions::default().lossy(true).quality(40.0).method(6));
//! Converter::new(options)
//!     .convert_file("animation.json", "animation.webp")
//!     .unwrap();
//! ```
//!
//! ## How frames are chosen
//!
//! Animations longer than the frame budget (20 frames unless configured)
//! are sampled with stride `total_frames / budget`; an explicit stride
//! overrides the budget. Every output frame is shown for the same time,
//! `round(duration_ms / (total_frames / stride))`, so the output lasts about
//! as long as the source. See [`FrameSampler`] and [`Timeline`].
//!
//! ## Requirements
//!
//! The rlottie and libwebp libraries must be available on the system.

pub mod animation;
pub mod configuration;
pub mod conversion;
pub mod encode;
pub mod error;
pub mod input;
pub mod metadata;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod sampler;
pub mod timeline;

pub use animation::{AnimationSource, LottieAnimation};
pub use configuration::{ConvertOptions, DEFAULT_RENDER_SIZE, MAX_RENDER_SIZE};
pub use encode::{FrameEncoder, WebpEncoder, WebpOptions};
pub use error::ConvertError;
pub use input::{AnimationData, InputKind, read_animation_data};
pub use metadata::AnimationMetadata;
pub use output::{default_output_path, write_output};
pub use pipeline::{ConversionPlan, ConversionReport, Converter, EncodedAnimation, PlannedFrames};
pub use progress::{ProgressCallback, ProgressInfo};
pub use sampler::{DEFAULT_FRAME_BUDGET, FrameSampler, SampleIndices};
pub use timeline::Timeline;
