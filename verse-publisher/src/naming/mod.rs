//! Target filename selection: numbers parsed from a verse's own text, or the
//! next free sequential number in the output directory.

mod allocator;

pub use allocator::{SequentialAllocator, last_verse_path};

use crate::error::{PublishError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

/// Digits at the start of any line, after optional indentation.
static LEADING_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*([0-9]+)").expect("leading number pattern should compile"));

/// How a chunk's target filename is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamingScheme {
    /// The chunk carries its own verse number
    Named(u64),
    /// The chunk takes the next free `verse-NNN` number
    Sequential,
}

impl NamingScheme {
    /// Classify finalized chunk content.
    pub fn classify(content: &str) -> Result<Self> {
        Ok(match parse_verse_number(content)? {
            Some(number) => NamingScheme::Named(number),
            None => NamingScheme::Sequential,
        })
    }
}

/// A resolved output file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerseTarget {
    Named(u64),
    Sequential(u64),
}

impl VerseTarget {
    /// File name, zero-padded to at least three digits.
    pub fn file_name(&self) -> String {
        match self {
            VerseTarget::Named(n) => format!("name-{:03}.txt", n),
            VerseTarget::Sequential(n) => format!("verse-{:03}.txt", n),
        }
    }
}

/// Parse the first leading line number in the content.
///
/// Zero is not a verse number. Digits that do not fit `u64` are an error.
pub fn parse_verse_number(content: &str) -> Result<Option<u64>> {
    let Some(caps) = LEADING_NUMBER.captures(content) else {
        return Ok(None);
    };
    let number = parse_digits(&caps[1])?;
    Ok(Some(number).filter(|n| *n > 0))
}

/// Parse an ASCII digit run, reporting overflow instead of dropping it.
pub(crate) fn parse_digits(digits: &str) -> Result<u64> {
    digits
        .parse::<u64>()
        .map_err(|_| PublishError::NumberOutOfRange {
            digits: digits.to_string(),
        })
}
