//! Splitting raw input into chunks at each author signature.

use super::Chunk;
use log::debug;
use regex::{Regex, RegexBuilder};

/// Signature that closes every message in the inbox.
pub const DEFAULT_SIGNATURE: &str = "Bubhukshitah mvr sharma";

/// Build the case-insensitive matcher for a literal signature.
pub fn signature_pattern(signature: &str) -> anyhow::Result<Regex> {
    if signature.trim().is_empty() {
        anyhow::bail!("Signature must not be empty");
    }

    let pattern = RegexBuilder::new(&regex::escape(signature))
        .case_insensitive(true)
        .build()?;
    Ok(pattern)
}

/// Split text into chunks, each ending with the signature occurrence that
/// closed it. Text after the last signature becomes a final chunk.
/// Whitespace-only pieces are dropped.
pub fn split_chunks(raw: &str, signature: &Regex) -> Vec<Chunk> {
    let mut pieces = Vec::new();
    let mut start = 0;

    for found in signature.find_iter(raw) {
        pieces.push(&raw[start..found.end()]);
        start = found.end();
    }
    pieces.push(&raw[start..]);

    let chunks: Vec<Chunk> = pieces
        .into_iter()
        .filter(|piece| !piece.trim().is_empty())
        .enumerate()
        .map(|(index, piece)| Chunk::new(index, piece.to_string()))
        .collect();

    debug!("split input ({} bytes) into {} chunk(s)", raw.len(), chunks.len());
    chunks
}
