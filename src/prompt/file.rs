//! The temporary prompt file handed to the inference command.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use tempfile::{Builder, TempPath};
use tracing::debug;

use crate::error::PromptError;

use super::template::FIXED_TEMPLATE;

/// File name prefix of prompt files; a random suffix follows.
pub const PROMPT_FILE_PREFIX: &str = "commitline_prompt_";

/// A fully written prompt file on disk.
///
/// The file is created exclusively (never reusing or following an existing
/// path) and is deleted when this value is dropped or [`remove`](Self::remove)d.
#[derive(Debug)]
pub struct PromptFile {
    path: TempPath,
}

impl PromptFile {
    /// Create a new prompt file in `dir` holding [`FIXED_TEMPLATE`] followed by `diff`.
    ///
    /// On write failure the partially written file is removed before returning.
    pub fn create(dir: &Path, diff: &[u8]) -> Result<Self, PromptError> {
        Self::create_with(dir, diff, |file, diff| write_prompt(file, diff))
    }

    fn create_with<F>(dir: &Path, diff: &[u8], write: F) -> Result<Self, PromptError>
    where
        F: FnOnce(&mut File, &[u8]) -> io::Result<()>,
    {
        let mut file = Builder::new()
            .prefix(PROMPT_FILE_PREFIX)
            .tempfile_in(dir)
            .map_err(|source| PromptError::CreateFailed {
                dir: dir.to_path_buf(),
                source,
            })?;

        // Dropping `file` on error unlinks it
        write(file.as_file_mut(), diff).map_err(PromptError::WriteFailed)?;

        // Closes the handle; the path stays owned until removal
        let path = file.into_temp_path();
        debug!(path = %path.display(), bytes = FIXED_TEMPLATE.len() + diff.len(), "wrote prompt file");

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the file now, reporting any failure.
    pub fn remove(self) -> Result<(), PromptError> {
        self.path.close().map_err(PromptError::RemoveFailed)
    }
}

fn write_prompt<W: Write>(mut out: W, diff: &[u8]) -> io::Result<()> {
    out.write_all(FIXED_TEMPLATE.as_bytes())?;
    out.write_all(diff)?;
    out.flush()
}
