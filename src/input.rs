//! Input classification and loading.
//!
//! Animations arrive either as plain Lottie JSON or as Telegram stickers
//! (`.tgs`), which are the same JSON compressed with gzip. [`InputKind`]
//! picks the loading path from the file extension, falling back to the gzip
//! magic bytes when the extension is not recognised.
//!
//! # Example
//!
//! ```no_run
//! use lottie2webp::{ConvertError, InputKind, read_animation_data};
//!
//! let data = read_animation_data("sticker.tgs")?;
//! assert_eq!(data.kind, InputKind::Telegram);
//! println!("{} bytes of Lottie JSON", data.json.len());
//! # Ok::<(), ConvertError>(())
//! ```

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    fs,
    io::Read,
    path::{Path, PathBuf},
};

use flate2::read::GzDecoder;

use crate::error::ConvertError;

/// Leading bytes of every gzip stream.
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// The kind of animation file being converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKind {
    /// Plain Lottie JSON (`.json`).
    Lottie,
    /// Gzip-compressed Lottie JSON (`.tgs`).
    Telegram,
}

impl InputKind {
    /// Classify a path by its extension (case-insensitive).
    ///
    /// Returns `None` for extensions that do not identify a format.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let extension = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "tgs" => Some(InputKind::Telegram),
            "json" => Some(InputKind::Lottie),
            _ => None,
        }
    }

    /// Classify an input using its extension, then its leading bytes.
    ///
    /// Unknown extensions are treated as compressed when the content starts
    /// with the gzip magic number and as plain JSON otherwise.
    pub fn sniff<P: AsRef<Path>>(path: P, content: &[u8]) -> Self {
        Self::from_path(path).unwrap_or(if content.starts_with(&GZIP_MAGIC) {
            InputKind::Telegram
        } else {
            InputKind::Lottie
        })
    }

    /// Whether the content must be gunzipped before parsing.
    pub fn is_compressed(self) -> bool {
        matches!(self, InputKind::Telegram)
    }
}

impl Display for InputKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            InputKind::Lottie => write!(f, "Lottie JSON"),
            InputKind::Telegram => write!(f, "Telegram sticker (gzip)"),
        }
    }
}

/// Uncompressed animation data ready to hand to the renderer.
#[derive(Debug, Clone)]
pub struct AnimationData {
    /// Path the data was read from.
    pub path: PathBuf,
    /// How the input was classified.
    pub kind: InputKind,
    /// Lottie JSON document bytes.
    pub json: Vec<u8>,
}

/// Read an animation file, decompressing it when needed.
///
/// # Errors
///
/// - [`ConvertError::Load`] if the file cannot be read.
/// - [`ConvertError::Decompress`] if a compressed input is not valid gzip.
pub fn read_animation_data<P: AsRef<Path>>(path: P) -> Result<AnimationData, ConvertError> {
    let path = path.as_ref();
    let content = fs::read(path).map_err(|error| ConvertError::Load {
        path: path.to_path_buf(),
        reason: error.to_string(),
    })?;

    let kind = InputKind::sniff(path, &content);
    log::debug!(
        "Read {} bytes from {} ({kind})",
        content.len(),
        path.display()
    );

    let json = if kind.is_compressed() {
        decompress(path, &content)?
    } else {
        content
    };

    Ok(AnimationData {
        path: path.to_path_buf(),
        kind,
        json,
    })
}

/// Gunzip `content`, attributing failures to `path`.
pub fn decompress(path: &Path, content: &[u8]) -> Result<Vec<u8>, ConvertError> {
    let mut decoder = GzDecoder::new(content);
    // Stickers typically inflate by an order of magnitude.
    let mut json = Vec::with_capacity(content.len().saturating_mul(8));
    decoder
        .read_to_end(&mut json)
        .map_err(|error| ConvertError::Decompress {
            path: path.to_path_buf(),
            reason: error.to_string(),
        })?;

    log::debug!(
        "Decompressed {} -> {} bytes",
        content.len(),
        json.len()
    );
    Ok(json)
}
