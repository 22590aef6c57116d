//! Render/encode orchestration.
//!
//! [`Converter`] ties the pieces together: it plans which frames to render
//! and when they are shown ([`ConversionPlan`]), renders each sampled frame
//! into a single reused buffer, hands it to the encoder, and finally
//! assembles the container. A run moves through
//! `Idle → Loading → Sampling(i)… → Assembling → Done`; any error ends it in
//! `Failed` with nothing written to disk.
//!
//! # Example
//!
//! ```no_run
//! use lottie2webp::{ConvertError, ConvertOptions, Converter, WebpOptions};
//!
//! let options = ConvertOptions::new()
//!     .with_size(512, 512)
//!     .with_webp(WebpOptions::default().lossy(true).quality(50.0));
//! let report = Converter::new(options).convert_file("sticker.tgs", "sticker.webp")?;
//! println!("{} frames, {} bytes", report.frames_encoded, report.bytes);
//! # Ok::<(), ConvertError>(())
//! ```

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    path::Path,
    time::Duration,
};

use image::RgbaImage;

use crate::{
    animation::{AnimationSource, LottieAnimation},
    configuration::ConvertOptions,
    encode::{FrameEncoder, WebpEncoder, WebpOptions},
    error::ConvertError,
    output::write_output,
    progress::ProgressTracker,
    sampler::{FrameSampler, SampleIndices},
    timeline::Timeline,
};

/// Which source frames are rendered and when each is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionPlan {
    sampler: FrameSampler,
    timeline: Timeline,
}

impl ConversionPlan {
    /// Plan a run over `total_frames` source frames lasting
    /// `duration_seconds`.
    ///
    /// # Errors
    ///
    /// - [`ConvertError::EmptyAnimation`] if `total_frames` is zero.
    /// - [`ConvertError::Configuration`] for an unusable stride or duration,
    ///   including a zero duration spread over more than one frame.
    pub fn new(
        total_frames: u32,
        duration_seconds: f64,
        stride: Option<u32>,
        frame_budget: Option<u32>,
    ) -> Result<Self, ConvertError> {
        let sampler = FrameSampler::new(total_frames, stride, frame_budget)?;
        let timeline = Timeline::new(duration_seconds, total_frames, sampler.stride())?;
        if timeline.frame_duration_ms() == 0 && sampler.sample_count() > 1 {
            return Err(ConvertError::Configuration(format!(
                "animation has zero duration but {} frames would be emitted",
                sampler.sample_count()
            )));
        }
        Ok(Self { sampler, timeline })
    }

    /// The frame sampler.
    pub fn sampler(&self) -> &FrameSampler {
        &self.sampler
    }

    /// The output timeline.
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Resolved sampling stride.
    pub fn stride(&self) -> u32 {
        self.sampler.stride()
    }

    /// Number of frames that will be rendered and encoded.
    pub fn frame_count(&self) -> u32 {
        self.sampler.sample_count()
    }

    /// Display time of every output frame, in milliseconds.
    pub fn frame_duration_ms(&self) -> u32 {
        self.timeline.frame_duration_ms()
    }

    /// Terminating timestamp handed to the encoder after the last frame.
    pub fn end_timestamp_ms(&self) -> u64 {
        self.timeline.end_timestamp(self.frame_count())
    }

    /// `(source index, output timestamp in ms)` for every sampled frame.
    pub fn frames(&self) -> PlannedFrames {
        PlannedFrames {
            indices: self.sampler.indices(),
            timeline: self.timeline,
            position: 0,
        }
    }
}

/// Iterator over the frames of a [`ConversionPlan`].
#[derive(Debug, Clone)]
pub struct PlannedFrames {
    indices: SampleIndices,
    timeline: Timeline,
    position: u32,
}

impl Iterator for PlannedFrames {
    type Item = (u32, u64);

    fn next(&mut self) -> Option<(u32, u64)> {
        let index = self.indices.next()?;
        let timestamp = self.timeline.timestamp(self.position);
        self.position += 1;
        Some((index, timestamp))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.indices.size_hint()
    }
}

impl ExactSizeIterator for PlannedFrames {}

/// Summary of a finished conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionReport {
    /// Sampling stride that was used.
    pub stride: u32,
    /// Display time of every output frame, in milliseconds.
    pub frame_duration_ms: u32,
    /// Number of frames handed to the encoder.
    pub frames_encoded: u32,
    /// Total output duration in milliseconds.
    pub duration_ms: u64,
    /// Output canvas width.
    pub width: u32,
    /// Output canvas height.
    pub height: u32,
    /// Size of the encoded animation in bytes.
    pub bytes: usize,
}

/// An assembled animation held in memory.
#[derive(Debug, Clone)]
pub struct EncodedAnimation {
    /// Encoded container bytes.
    pub data: Vec<u8>,
    /// Run summary.
    pub report: ConversionReport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    Idle,
    Loading,
    Sampling(u32),
    Assembling,
    Done,
    Failed,
}

impl Display for RunState {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            RunState::Idle => write!(f, "idle"),
            RunState::Loading => write!(f, "loading"),
            RunState::Sampling(index) => write!(f, "sampling frame {index}"),
            RunState::Assembling => write!(f, "assembling"),
            RunState::Done => write!(f, "done"),
            RunState::Failed => write!(f, "failed"),
        }
    }
}

struct StateTracker {
    state: RunState,
}

impl StateTracker {
    fn new() -> Self {
        Self {
            state: RunState::Idle,
        }
    }

    fn enter(&mut self, next: RunState) {
        match next {
            RunState::Sampling(_) => log::trace!("{} -> {next}", self.state),
            _ => log::debug!("{} -> {next}", self.state),
        }
        self.state = next;
    }

    /// Pass `result` through, recording the `Failed` transition on error.
    fn check<T>(&mut self, result: Result<T, ConvertError>) -> Result<T, ConvertError> {
        if let Err(error) = &result {
            log::debug!("{} failed: {error}", self.state);
            self.state = RunState::Failed;
        }
        result
    }
}

/// Runs conversions with a fixed set of [`ConvertOptions`].
#[derive(Debug, Clone, Default)]
pub struct Converter {
    options: ConvertOptions,
}

impl Converter {
    /// Create a converter.
    pub fn new(options: ConvertOptions) -> Self {
        Self { options }
    }

    /// The options this converter was built with.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Plan the run for `source` without rendering anything.
    pub fn plan<S: AnimationSource + ?Sized>(
        &self,
        source: &S,
    ) -> Result<ConversionPlan, ConvertError> {
        ConversionPlan::new(
            source.frame_count(),
            source.duration_seconds(),
            self.options.stride,
            self.options.frame_budget,
        )
    }

    /// Load `input`, convert it to animated WebP and write it to `output`.
    ///
    /// `output` is only created once the animation has been fully assembled.
    ///
    /// # Errors
    ///
    /// Any [`ConvertError`]; on error `output` is left untouched.
    pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input: P,
        output: Q,
    ) -> Result<ConversionReport, ConvertError> {
        let mut state = StateTracker::new();
        state.check(self.options.validate())?;

        state.enter(RunState::Loading);
        let mut animation = state.check(LottieAnimation::open(input, self.options.size()))?;

        self.write_with_state(&mut animation, WebpEncoder::boxed, output, &mut state)
    }

    /// Render `source`, encode it with an encoder built by `create_encoder`
    /// and write the result to `output`.
    ///
    /// Like [`convert_file`](Self::convert_file), `output` is only created
    /// after the encoder has assembled the animation.
    pub fn encode_to_file<S, F, Q>(
        &self,
        source: &mut S,
        create_encoder: F,
        output: Q,
    ) -> Result<ConversionReport, ConvertError>
    where
        S: AnimationSource + ?Sized,
        F: FnOnce(u32, u32, &WebpOptions) -> Result<Box<dyn FrameEncoder>, ConvertError>,
        Q: AsRef<Path>,
    {
        let mut state = StateTracker::new();
        state.check(self.options.webp.validate())?;
        self.write_with_state(source, create_encoder, output, &mut state)
    }

    fn write_with_state<S, F, Q>(
        &self,
        source: &mut S,
        create_encoder: F,
        output: Q,
        state: &mut StateTracker,
    ) -> Result<ConversionReport, ConvertError>
    where
        S: AnimationSource + ?Sized,
        F: FnOnce(u32, u32, &WebpOptions) -> Result<Box<dyn FrameEncoder>, ConvertError>,
        Q: AsRef<Path>,
    {
        let encoded = self.encode_with_state(source, create_encoder, state)?;
        state.check(write_output(output, &encoded.data))?;
        state.enter(RunState::Done);
        Ok(encoded.report)
    }

    /// Render `source` and encode it as animated WebP in memory.
    pub fn encode<S: AnimationSource + ?Sized>(
        &self,
        source: &mut S,
    ) -> Result<EncodedAnimation, ConvertError> {
        self.encode_with(source, WebpEncoder::boxed)
    }

    /// Render `source` and encode it with an encoder built by
    /// `create_encoder`.
    ///
    /// The factory is called once, with the dimensions of the first
    /// rendered frame, and only after planning has succeeded.
    pub fn encode_with<S, F>(
        &self,
        source: &mut S,
        create_encoder: F,
    ) -> Result<EncodedAnimation, ConvertError>
    where
        S: AnimationSource + ?Sized,
        F: FnOnce(u32, u32, &WebpOptions) -> Result<Box<dyn FrameEncoder>, ConvertError>,
    {
        let mut state = StateTracker::new();
        state.check(self.options.webp.validate())?;
        let encoded = self.encode_with_state(source, create_encoder, &mut state)?;
        state.enter(RunState::Done);
        Ok(encoded)
    }

    fn encode_with_state<S, F>(
        &self,
        source: &mut S,
        create_encoder: F,
        state: &mut StateTracker,
    ) -> Result<EncodedAnimation, ConvertError>
    where
        S: AnimationSource + ?Sized,
        F: FnOnce(u32, u32, &WebpOptions) -> Result<Box<dyn FrameEncoder>, ConvertError>,
    {
        let result = self.render_and_encode(source, create_encoder, state);
        state.check(result)
    }

    fn render_and_encode<S, F>(
        &self,
        source: &mut S,
        create_encoder: F,
        state: &mut StateTracker,
    ) -> Result<EncodedAnimation, ConvertError>
    where
        S: AnimationSource + ?Sized,
        F: FnOnce(u32, u32, &WebpOptions) -> Result<Box<dyn FrameEncoder>, ConvertError>,
    {
        let plan = self.plan(source)?;
        log::info!(
            "Rendering {} of {} frames (stride {}, {} ms per frame)",
            plan.frame_count(),
            source.frame_count(),
            plan.stride(),
            plan.frame_duration_ms(),
        );

        let mut tracker = ProgressTracker::new(
            self.options.progress.clone(),
            Some(u64::from(plan.frame_count())),
            self.options.batch_size,
        );

        // Sized by the source on the first render, then reused for every frame.
        let mut frame = RgbaImage::new(0, 0);
        let mut frames = plan.frames();
        let (first_index, first_timestamp) = frames.next().ok_or(ConvertError::EmptyAnimation)?;

        state.enter(RunState::Sampling(first_index));
        source.render_frame(first_index, &mut frame)?;
        let (width, height) = frame.dimensions();
        if width == 0 || height == 0 {
            return Err(ConvertError::Render {
                frame: first_index,
                reason: format!("renderer produced an empty {width}x{height} frame"),
            });
        }

        let mut encoder = create_encoder(width, height, &self.options.webp)?;
        encoder.add_frame(&frame, first_timestamp)?;
        tracker.advance(first_index, Duration::from_millis(first_timestamp));
        let mut frames_encoded = 1_u32;

        for (index, timestamp) in frames {
            state.enter(RunState::Sampling(index));
            source.render_frame(index, &mut frame)?;

            let actual = frame.dimensions();
            if actual != (width, height) {
                return Err(ConvertError::DimensionMismatch {
                    frame: index,
                    expected: (width, height),
                    actual,
                });
            }

            encoder.add_frame(&frame, timestamp)?;
            tracker.advance(index, Duration::from_millis(timestamp));
            frames_encoded += 1;
        }
        tracker.finish();

        state.enter(RunState::Assembling);
        let end_timestamp = plan.end_timestamp_ms();
        let data = encoder.finish(end_timestamp)?;

        let report = ConversionReport {
            stride: plan.stride(),
            frame_duration_ms: plan.frame_duration_ms(),
            frames_encoded,
            duration_ms: end_timestamp,
            width,
            height,
            bytes: data.len(),
        };
        log::info!(
            "Encoded {} frames ({}x{}, {} ms) into {} bytes",
            report.frames_encoded,
            report.width,
            report.height,
            report.duration_ms,
            report.bytes,
        );

        Ok(EncodedAnimation { data, report })
    }
}
