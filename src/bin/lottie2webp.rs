use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use clap::{ArgAction, CommandFactory, Parser};
use clap_complete::Shell;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use log::LevelFilter;
use lottie2webp::{
    AnimationSource, ConversionPlan, ConvertOptions, Converter, DEFAULT_FRAME_BUDGET,
    DEFAULT_RENDER_SIZE, LottieAnimation, ProgressCallback, ProgressInfo, WebpOptions,
    default_output_path,
};
use serde_json::json;

const CLI_AFTER_HELP: &str = "Examples:\n  lottie2webp sticker.tgs\n  lottie2webp animation.json -o out.webp --lossy -q 50 -m 6 --progress\n  lottie2webp sticker.tgs --stride 2 --width 256 --height 256\n  lottie2webp sticker.tgs --info --json\n  lottie2webp --completions zsh > _lottie2webp";

#[derive(Debug, Parser)]
#[command(
    name = "lottie2webp",
    version,
    about = "Convert Lottie (.json) and Telegram (.tgs) animations to animated WebP",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    /// Input animation (.json or .tgs).
    #[arg(required_unless_present = "completions")]
    input: Option<PathBuf>,

    /// Output path (default: input path with a .webp extension).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Render every Nth source frame. Overrides --max-frames.
    #[arg(short, long)]
    stride: Option<u32>,

    /// Target frame count for long animations when no stride is given (0 = render all).
    #[arg(long, default_value_t = DEFAULT_FRAME_BUDGET)]
    max_frames: u32,

    /// Render width in pixels.
    #[arg(long, default_value_t = DEFAULT_RENDER_SIZE)]
    width: u32,

    /// Render height in pixels.
    #[arg(long, default_value_t = DEFAULT_RENDER_SIZE)]
    height: u32,

    /// Encoder quality factor (0-100).
    #[arg(short, long, default_value_t = 75.0)]
    quality: f32,

    /// Compression method (0 = fast, 6 = slowest/smallest).
    #[arg(short, long, default_value_t = 4)]
    method: u8,

    /// Use lossy compression (default is lossless).
    #[arg(long)]
    lossy: bool,

    /// Allow mixed lossy and lossless frames.
    #[arg(long)]
    mixed: bool,

    /// Minimise output size (slower).
    #[arg(long)]
    min_size: bool,

    /// Lossy deblocking filter strength (0-100).
    #[arg(short, long)]
    filter_strength: Option<u8>,

    /// Use multi-threaded encoding where available.
    #[arg(long)]
    mt: bool,

    /// Number of loops (0 = loop forever).
    #[arg(long, default_value_t = 0)]
    loop_count: u32,

    /// Allow overwriting an existing output file.
    #[arg(long)]
    overwrite: bool,

    /// Show a progress bar.
    #[arg(long)]
    progress: bool,

    /// Print animation metadata and the sampling plan without encoding.
    #[arg(long)]
    info: bool,

    /// With --info, print machine-readable JSON.
    #[arg(long, requires = "info")]
    json: bool,

    /// More logging output (repeat for more detail).
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Only print errors.
    #[arg(long)]
    quiet: bool,

    /// Print a shell completion script and exit.
    #[arg(long, value_enum, exclusive = true)]
    completions: Option<Shell>,
}

impl Cli {
    fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Error;
        }
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    fn webp_options(&self) -> WebpOptions {
        let mut webp = WebpOptions::default()
            .quality(self.quality)
            .method(self.method)
            .lossy(self.lossy)
            .allow_mixed(self.mixed)
            .minimize_size(self.min_size)
            .multi_thread(self.mt)
            .loop_count(self.loop_count);
        if let Some(strength) = self.filter_strength {
            webp = webp.filter_strength(strength);
        }
        webp
    }

    fn convert_options(&self) -> ConvertOptions {
        let mut options = ConvertOptions::new()
            .with_size(self.width, self.height)
            .with_frame_budget(Some(self.max_frames))
            .with_webp(self.webp_options());
        if let Some(stride) = self.stride {
            options = options.with_stride(stride);
        }
        options
    }
}

fn init_logging(level: LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .parse_env("RUST_LOG")
        .format_timestamp(None)
        .init();
}

fn ensure_writable_path(path: &Path, overwrite: bool) -> Result<(), Box<dyn std::error::Error>> {
    if path.exists() {
        if overwrite {
            eprintln!(
                "{} {}",
                "warning:".yellow().bold(),
                format!("overwriting {}", path.display()).yellow()
            );
        } else {
            return Err(format!(
                "output already exists: {} (use --overwrite to replace)",
                path.display()
            )
            .into());
        }
    }
    Ok(())
}

struct TerminalProgress {
    bar: ProgressBar,
}

impl TerminalProgress {
    fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let bar = ProgressBar::new(0);
        let style =
            ProgressStyle::with_template("{spinner:.green} {bar:40.cyan/blue} {pos}/{len} {msg}")?;
        bar.set_style(style.progress_chars("##-"));
        Ok(Self { bar })
    }
}

impl ProgressCallback for TerminalProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        if let Some(total) = info.total {
            self.bar.set_length(total);
        }
        self.bar.set_position(info.current);
        if let Some(frame) = info.current_frame {
            self.bar.set_message(format!("frame {frame}"));
        }
        if info.total == Some(info.current) {
            self.bar.finish_with_message("done");
        }
    }
}

fn print_info(
    animation: &LottieAnimation,
    plan: &ConversionPlan,
    as_json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let metadata = animation.metadata();
    if as_json {
        let payload = json!({
            "format": metadata.kind.to_string(),
            "frame_count": metadata.frame_count,
            "fps": metadata.frames_per_second,
            "duration_seconds": metadata.duration.as_secs_f64(),
            "intrinsic_size": [metadata.intrinsic_width, metadata.intrinsic_height],
            "render_size": [metadata.width, metadata.height],
            "plan": {
                "stride": plan.stride(),
                "frames": plan.frame_count(),
                "frame_duration_ms": plan.frame_duration_ms(),
                "output_duration_ms": plan.end_timestamp_ms(),
                "indices": plan.frames().map(|(index, _)| index).collect::<Vec<_>>(),
            },
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        print!("{metadata}");
        println!(
            "Plan: {} frames, stride {}, {} ms per frame ({} ms total)",
            plan.frame_count(),
            plan.stride(),
            plan.frame_duration_ms(),
            plan.end_timestamp_ms(),
        );
    }
    Ok(())
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        let mut command = Cli::command();
        clap_complete::generate(shell, &mut command, "lottie2webp", &mut std::io::stdout());
        return Ok(());
    }

    init_logging(cli.log_level());

    let input = cli.input.clone().ok_or("missing input path")?;
    let mut options = cli.convert_options();
    options.validate()?;

    if cli.info {
        let animation = LottieAnimation::open(&input, options.size())?;
        let plan = Converter::new(options).plan(&animation)?;
        log::debug!(
            "{} frames at {:.2} fps",
            animation.frame_count(),
            animation.frame_rate()
        );
        return print_info(&animation, &plan, cli.json);
    }

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&input));
    ensure_writable_path(&output, cli.overwrite)?;

    if cli.progress && !cli.quiet {
        options = options.with_progress(Arc::new(TerminalProgress::new()?));
    }

    let report = Converter::new(options).convert_file(&input, &output)?;

    if !cli.quiet {
        println!(
            "{} {}",
            "success:".green().bold(),
            format!(
                "{} -> {} ({} frames, {}x{}, {} ms, {} bytes)",
                input.display(),
                output.display(),
                report.frames_encoded,
                report.width,
                report.height,
                report.duration_ms,
                report.bytes,
            )
            .green()
        );
    }

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("{} {error}", "error:".red().bold());
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["lottie2webp", "sticker.tgs"]).unwrap();
        assert_eq!(cli.input, Some(PathBuf::from("sticker.tgs")));
        assert_eq!(cli.max_frames, DEFAULT_FRAME_BUDGET);
        assert_eq!(cli.log_level(), LevelFilter::Warn);

        let options = cli.convert_options();
        assert_eq!(options.size(), (512, 512));
        assert_eq!(options.stride(), None);
        assert_eq!(options.frame_budget(), Some(DEFAULT_FRAME_BUDGET));
        assert_eq!(options.webp(), &WebpOptions::default());
    }

    #[test]
    fn encoder_flags() {
        let cli = Cli::try_parse_from([
            "lottie2webp", "in.json", "-o", "out.webp", "-s", "3", "-q", "40", "-m", "6",
            "--lossy", "--mixed", "--min-size", "-f", "20", "--mt",
        ])
        .unwrap();
        let options = cli.convert_options();
        assert_eq!(options.stride(), Some(3));

        let webp = options.webp();
        assert_eq!(webp.quality, 40.0);
        assert_eq!(webp.method, 6);
        assert!(webp.lossy && webp.allow_mixed && webp.minimize_size && webp.multi_thread);
        assert_eq!(webp.filter_strength, Some(20));
    }

    #[test]
    fn zero_max_frames_disables_budget() {
        let cli = Cli::try_parse_from(["lottie2webp", "in.tgs", "--max-frames", "0"]).unwrap();
        assert_eq!(cli.convert_options().frame_budget(), None);
    }

    #[test]
    fn verbosity_levels() {
        let cli = Cli::try_parse_from(["lottie2webp", "in.tgs", "-vv"]).unwrap();
        assert_eq!(cli.log_level(), LevelFilter::Debug);
        let cli = Cli::try_parse_from(["lottie2webp", "in.tgs", "--quiet"]).unwrap();
        assert_eq!(cli.log_level(), LevelFilter::Error);
        assert!(Cli::try_parse_from(["lottie2webp", "in.tgs", "-v", "--quiet"]).is_err());
    }

    #[test]
    fn input_is_required_unless_completions() {
        assert!(Cli::try_parse_from(["lottie2webp"]).is_err());
        assert!(Cli::try_parse_from(["lottie2webp", "--completions", "bash"]).is_ok());
        assert!(Cli::try_parse_from(["lottie2webp", "--json", "in.tgs"]).is_err());
    }
}
