//! Output directory scanning and sequential number allocation.

use super::parse_digits;
use crate::error::{PublishError, Result};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

static VERSE_FILE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^verse-([0-9]+)\.txt$").expect("verse file pattern should compile"));

/// File names in `dir`, or nothing if the directory does not exist yet.
fn file_names(dir: &Path) -> Result<Vec<String>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| PublishError::io(dir, e))? {
        let entry = entry.map_err(|e| PublishError::io(dir, e))?;
        if !entry.path().is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            names.push(name.to_string());
        }
    }
    Ok(names)
}

/// Highest `verse-NNN.txt` number present in `dir` (0 if none).
///
/// A verse file whose number does not fit `u64` is an error.
pub fn max_verse_number(dir: &Path) -> Result<u64> {
    let mut max: u64 = 0;
    for name in file_names(dir)? {
        if let Some(caps) = VERSE_FILE.captures(&name) {
            max = max.max(parse_digits(&caps[1])?);
        }
    }
    Ok(max)
}

/// Lexicographically last `verse-*.txt` file in `dir`.
pub fn last_verse_path(dir: &Path) -> Result<Option<PathBuf>> {
    let last = file_names(dir)?
        .into_iter()
        .filter(|name| name.starts_with("verse-") && name.ends_with(".txt"))
        .max();
    Ok(last.map(|name| dir.join(name)))
}

/// Hands out strictly increasing sequential numbers within one run.
///
/// Each allocation re-scans the directory and also respects the numbers
/// already handed out, so allocations that were never written (dry run,
/// declined overwrite) are not reused.
#[derive(Debug, Default)]
pub struct SequentialAllocator {
    high_water: u64,
}

impl SequentialAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self, dir: &Path) -> Result<u64> {
        let on_disk = max_verse_number(dir)?;
        let max = on_disk.max(self.high_water);
        let next = max
            .checked_add(1)
            .ok_or(PublishError::SequenceExhausted { max })?;
        debug!(
            "allocated verse {} (on disk max {}, in-run max {})",
            next, on_disk, self.high_water
        );
        self.high_water = next;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), "x\n").unwrap();
    }

    #[test]
    fn test_max_verse_number_empty_and_missing() {
        let temp_dir = TempDir::new().unwrap();
        assert_eq!(max_verse_number(temp_dir.path()).unwrap(), 0);
        assert_eq!(max_verse_number(&temp_dir.path().join("nope")).unwrap(), 0);
    }

    #[test]
    fn test_max_verse_number_ignores_other_files() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "verse-003.txt");
        touch(temp_dir.path(), "verse-010.txt");
        touch(temp_dir.path(), "name-200.txt");
        touch(temp_dir.path(), "verse-abc.txt");
        touch(temp_dir.path(), "notes.md");

        assert_eq!(max_verse_number(temp_dir.path()).unwrap(), 10);
    }

    #[test]
    fn test_allocation_never_reuses_gaps() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "verse-001.txt");
        touch(temp_dir.path(), "verse-005.txt");

        let mut allocator = SequentialAllocator::new();
        assert_eq!(allocator.allocate(temp_dir.path()).unwrap(), 6);
    }

    #[test]
    fn test_allocation_increases_without_writes() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "verse-003.txt");

        let mut allocator = SequentialAllocator::new();
        assert_eq!(allocator.allocate(temp_dir.path()).unwrap(), 4);
        assert_eq!(allocator.allocate(temp_dir.path()).unwrap(), 5);
    }

    #[test]
    fn test_allocation_sees_new_files() {
        let temp_dir = TempDir::new().unwrap();
        let mut allocator = SequentialAllocator::new();
        assert_eq!(allocator.allocate(temp_dir.path()).unwrap(), 1);

        touch(temp_dir.path(), "verse-009.txt");
        assert_eq!(allocator.allocate(temp_dir.path()).unwrap(), 10);
    }

    #[test]
    fn test_allocation_past_u32() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "verse-4294967295.txt");

        let mut allocator = SequentialAllocator::new();
        assert_eq!(allocator.allocate(temp_dir.path()).unwrap(), 4_294_967_296);
        assert_eq!(allocator.allocate(temp_dir.path()).unwrap(), 4_294_967_297);
    }

    #[test]
    fn test_allocation_at_u64_max_is_error() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), &format!("verse-{}.txt", u64::MAX));

        let mut allocator = SequentialAllocator::new();
        let err = allocator.allocate(temp_dir.path()).unwrap_err();
        assert!(matches!(err, PublishError::SequenceExhausted { max } if max == u64::MAX));
    }

    #[test]
    fn test_oversized_verse_file_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "verse-003.txt");
        touch(temp_dir.path(), "verse-123456789012345678901234.txt");

        let err = max_verse_number(temp_dir.path()).unwrap_err();
        assert!(matches!(err, PublishError::NumberOutOfRange { .. }));
    }

    #[test]
    fn test_last_verse_path_is_lexicographic() {
        let temp_dir = TempDir::new().unwrap();
        assert_eq!(last_verse_path(temp_dir.path()).unwrap(), None);

        touch(temp_dir.path(), "verse-002.txt");
        touch(temp_dir.path(), "verse-011.txt");
        touch(temp_dir.path(), "name-999.txt");

        assert_eq!(
            last_verse_path(temp_dir.path()).unwrap(),
            Some(temp_dir.path().join("verse-011.txt"))
        );
    }
}
