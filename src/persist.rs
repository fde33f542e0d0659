// used for persistence of rendered queries next to their selection files
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Result, SelconvError};

pub fn read_input(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| SelconvError::io(path, e))
}

/// The input path with its extension substituted, or appended when it has
/// none.
pub fn output_path(input: &Path, extension: &str) -> PathBuf {
    input.with_extension(extension)
}

pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(extension)
}

/// Writes `contents` to `path` through a uniquely named temporary sibling
/// that is moved into place, so a failed write never leaves a partial
/// artifact behind and concurrent writers never share a staging file.
/// Without `overwrite` the move itself refuses to replace an existing file.
pub fn write_output(path: &Path, contents: &str, overwrite: bool) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staging = tempfile::Builder::new()
        .prefix(".selconv-")
        .suffix(".partial")
        .tempfile_in(dir)
        .map_err(|e| SelconvError::io(path, e))?;
    staging
        .write_all(contents.as_bytes())
        .and_then(|_| staging.as_file().sync_all())
        .map_err(|e| SelconvError::io(path, e))?;
    let persisted = if overwrite { staging.persist(path) } else { staging.persist_noclobber(path) };
    match persisted {
        Ok(_) => {
            debug!(path = %path.display(), bytes = contents.len(), "wrote output");
            Ok(())
        }
        Err(e) if !overwrite && e.error.kind() == ErrorKind::AlreadyExists => {
            Err(SelconvError::OutputExists(path.to_path_buf()))
        }
        Err(e) => Err(SelconvError::io(path, e.error)),
    }
}
