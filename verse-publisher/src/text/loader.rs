//! Reading and truncating the inbox file.

use crate::error::{PublishError, Result};
use std::fs;
use std::path::Path;

/// Read the input file, replacing invalid UTF-8 sequences with U+FFFD.
pub fn load_input(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(PublishError::MissingInput(path.to_path_buf()));
    }

    let bytes = fs::read(path).map_err(|e| PublishError::io(path, e))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Truncate the input file to zero length.
pub fn clear_input(path: &Path) -> Result<()> {
    fs::write(path, "").map_err(|e| PublishError::io(path, e))
}
