//! Input handling: loading the inbox file and splitting it into signed chunks.

mod loader;
pub mod splitter;

pub use loader::{clear_input, load_input};
pub use splitter::{DEFAULT_SIGNATURE, signature_pattern, split_chunks};

/// One signature-delimited message destined for its own verse file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Position among the non-empty chunks of the input
    pub index: usize,
    /// The text as cut from the input, closing signature included
    pub raw: String,
}

impl Chunk {
    /// Create a new chunk.
    pub fn new(index: usize, raw: String) -> Self {
        Self { index, raw }
    }

    /// Text with surrounding whitespace removed.
    pub fn trimmed(&self) -> &str {
        self.raw.trim()
    }

    /// Content to write: trimmed plus a single trailing newline, or the raw
    /// text untouched when trimming is disabled.
    pub fn finalize(&self, trim: bool) -> String {
        if trim {
            format!("{}\n", self.trimmed())
        } else {
            self.raw.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_creation() {
        let chunk = Chunk::new(2, "Hello world".to_string());
        assert_eq!(chunk.index, 2);
        assert_eq!(chunk.raw, "Hello world");
    }

    #[test]
    fn test_finalize_trims_and_terminates() {
        let chunk = Chunk::new(0, "\n\n  52 TVASHTAA\nSome text  \n\n".to_string());
        assert_eq!(chunk.finalize(true), "52 TVASHTAA\nSome text\n");
    }

    #[test]
    fn test_finalize_no_trim_keeps_whitespace() {
        let raw = "\n  Some text\nsig";
        let chunk = Chunk::new(0, raw.to_string());
        assert_eq!(chunk.finalize(false), raw);
    }
}
