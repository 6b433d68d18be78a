use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{Result, ViewerError};

/// Read a whole source file.
pub fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| ViewerError::ReadInput {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `contents` to `path` through a temp file in the same directory, so a
/// failed write leaves any existing destination untouched.
pub fn write_atomically(path: &Path, contents: &str) -> Result<()> {
    let write_err = |source| ViewerError::WriteOutput {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(contents.as_bytes()).map_err(write_err)?;
    tmp.flush().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}
