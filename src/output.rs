//! Output writing.
//!
//! The encoded animation is written to a temporary file next to the
//! destination and renamed into place, so the destination either holds the
//! complete result or is left untouched.

use std::{
    io::Write,
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;

use crate::error::ConvertError;

/// Atomically write `bytes` to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns [`ConvertError::Io`] if the temporary file cannot be created,
/// written, or moved into place.
pub fn write_output<P: AsRef<Path>>(path: P, bytes: &[u8]) -> Result<(), ConvertError> {
    let path = path.as_ref();
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(directory)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|error| ConvertError::Io(error.error))?;

    log::debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

/// Derive the default output path: the input path with a `.webp` extension.
pub fn default_output_path<P: AsRef<Path>>(input: P) -> PathBuf {
    input.as_ref().with_extension("webp")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_output_replaces_extension() {
        assert_eq!(
            default_output_path("stickers/cat.tgs"),
            PathBuf::from("stickers/cat.webp")
        );
        assert_eq!(default_output_path("anim"), PathBuf::from("anim.webp"));
    }

    #[test]
    fn writes_and_replaces() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("out.webp");

        write_output(&path, b"first").unwrap();
        write_output(&path, b"second").unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"second");
        assert_eq!(std::fs::read_dir(directory.path()).unwrap().count(), 1);
    }
}
