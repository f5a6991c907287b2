use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;

/// Largest input file accepted, in bytes (16 MiB).
pub const MAX_INPUT_SIZE: u64 = 16 * 1024 * 1024;

pub struct InputReader;

impl InputReader {
    /// Reads a UTF-8 text file, rejecting anything over [`MAX_INPUT_SIZE`].
    pub fn read(path: &Path) -> Result<String> {
        let metadata = fs::metadata(path)
            .with_context(|| format!("Failed to access file: {}", path.display()))?;

        if !metadata.is_file() {
            bail!("{} is not a regular file", path.display());
        }

        let size = metadata.len();
        if size > MAX_INPUT_SIZE {
            bail!(
                "Input size ({:.1} MB) exceeds maximum allowed size (16 MB).\n\n\
                 Consider splitting the file into smaller parts.",
                size as f64 / 1024.0 / 1024.0
            );
        }

        let bytes =
            fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
        String::from_utf8(bytes).context("Input is not valid UTF-8")
    }
}
