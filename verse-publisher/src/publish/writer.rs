//! Idempotent verse writes: digest comparison, diff preview, confirmation.

use super::confirm::Confirm;
use crate::error::PublishError;
use anyhow::Result;
use log::debug;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

/// What happened to one chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Created,
    Updated,
    Unchanged,
    WouldCreate,
    WouldModify,
    Cancelled,
    Duplicate,
}

impl Outcome {
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Created => "created",
            Outcome::Updated => "modified",
            Outcome::Unchanged => "unchanged",
            Outcome::WouldCreate => "would create",
            Outcome::WouldModify => "would modify",
            Outcome::Cancelled => "cancelled",
            Outcome::Duplicate => "skipped",
        }
    }

    pub const ALL: [Outcome; 7] = [
        Outcome::Created,
        Outcome::Updated,
        Outcome::Unchanged,
        Outcome::WouldCreate,
        Outcome::WouldModify,
        Outcome::Cancelled,
        Outcome::Duplicate,
    ];
}

/// SHA-256 of the content as lowercase hex.
pub fn content_digest(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{:x}", hasher.finalize())
}

/// Write `content` to `path` unless it is already there.
///
/// An existing file with different content is diffed on stdout and only
/// replaced once `confirm` agrees. Dry runs never write or prompt.
pub fn reconcile(
    path: &Path,
    content: &str,
    dry_run: bool,
    confirm: &mut dyn Confirm,
) -> Result<Outcome> {
    if !path.exists() {
        if dry_run {
            return Ok(Outcome::WouldCreate);
        }
        fs::write(path, content).map_err(|e| PublishError::io(path, e))?;
        return Ok(Outcome::Created);
    }

    let existing = fs::read(path).map_err(|e| PublishError::io(path, e))?;
    let old_digest = content_digest(&existing);
    let new_digest = content_digest(content.as_bytes());
    debug!(
        "{}: existing {} new {}",
        path.display(),
        &old_digest[..12],
        &new_digest[..12]
    );

    if old_digest == new_digest {
        return Ok(Outcome::Unchanged);
    }
    if dry_run {
        return Ok(Outcome::WouldModify);
    }

    let old_text = String::from_utf8_lossy(&existing);
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    println!("{} differs from the new content:", name);
    print!("{}", diffy::create_patch(&old_text, content));

    if confirm.confirm(&format!("Overwrite {}?", name))? {
        fs::write(path, content).map_err(|e| PublishError::io(path, e))?;
        Ok(Outcome::Updated)
    } else {
        Ok(Outcome::Cancelled)
    }
}
