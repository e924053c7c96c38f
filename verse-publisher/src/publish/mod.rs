//! The publishing pipeline: load, split, name, reconcile, clear.

mod confirm;
mod writer;

#[cfg(test)]
pub use confirm::ScriptedConfirm;
pub use confirm::{AlwaysConfirm, Confirm, TerminalConfirm};
pub use writer::{Outcome, reconcile};

use crate::error::PublishError;
use crate::naming::{NamingScheme, SequentialAllocator, VerseTarget, last_verse_path};
use crate::text::{Chunk, clear_input, load_input, split_chunks};
use anyhow::{Context, Result};
use log::{debug, info};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// Switches taken from the command line.
#[derive(Debug, Clone, Copy)]
pub struct PublishOptions {
    /// Trim chunks and end them with a single newline
    pub trim: bool,
    /// Truncate the input file once every chunk is handled
    pub clear_input: bool,
    /// Skip chunks identical to the last verse-*.txt file
    pub dedupe_last: bool,
    /// Report decisions without touching the filesystem
    pub dry_run: bool,
}

impl Default for PublishOptions {
    fn default() -> Self {
        Self {
            trim: true,
            clear_input: false,
            dedupe_last: false,
            dry_run: false,
        }
    }
}

/// Why a run stopped where it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    EmptyInput,
    NoChunks,
    Processed,
}

/// The decision made for one chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkReport {
    pub index: usize,
    /// None when the chunk was skipped before naming
    pub target: Option<VerseTarget>,
    pub path: Option<PathBuf>,
    pub outcome: Outcome,
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub status: RunStatus,
    pub chunks: Vec<ChunkReport>,
    pub input_cleared: bool,
}

impl RunReport {
    fn stopped(status: RunStatus) -> Self {
        Self {
            status,
            chunks: Vec::new(),
            input_cleared: false,
        }
    }

    /// Number of chunks that ended with the given outcome.
    pub fn count(&self, outcome: Outcome) -> usize {
        self.chunks.iter().filter(|c| c.outcome == outcome).count()
    }

    /// One-line tally of non-zero outcomes.
    pub fn summary(&self) -> String {
        let parts: Vec<String> = Outcome::ALL
            .iter()
            .map(|o| (o, self.count(*o)))
            .filter(|(_, n)| *n > 0)
            .map(|(o, n)| format!("{}: {}", o.label(), n))
            .collect();

        if parts.is_empty() {
            "nothing to do".to_string()
        } else {
            parts.join(", ")
        }
    }
}

/// Publish every chunk of `input` into `outdir`.
pub fn publish(
    input: &Path,
    outdir: &Path,
    signature: &Regex,
    options: &PublishOptions,
    confirm: &mut dyn Confirm,
) -> Result<RunReport> {
    let raw = load_input(input)?;

    if raw.trim().is_empty() {
        println!("Input is empty or whitespace-only. Nothing to publish.");
        return Ok(RunReport::stopped(RunStatus::EmptyInput));
    }

    let chunks = split_chunks(&raw, signature);
    if chunks.is_empty() {
        println!("No chunks found in {}. Nothing to publish.", input.display());
        return Ok(RunReport::stopped(RunStatus::NoChunks));
    }

    if !options.dry_run {
        fs::create_dir_all(outdir)
            .map_err(|e| PublishError::io(outdir, e))
            .context("Failed to create output directory")?;
    }

    info!("publishing {} chunk(s) into {}", chunks.len(), outdir.display());

    let mut state = RunState::default();
    let mut reports = Vec::with_capacity(chunks.len());

    for chunk in &chunks {
        let report = publish_chunk(chunk, outdir, options, &mut state, confirm)
            .with_context(|| format!("Failed to publish chunk {}", chunk.index + 1))?;
        reports.push(report);
    }

    let mut input_cleared = false;
    if options.clear_input && !options.dry_run {
        clear_input(input)?;
        println!("Cleared input file.");
        input_cleared = true;
    }

    let report = RunReport {
        status: RunStatus::Processed,
        chunks: reports,
        input_cleared,
    };
    println!("---");
    println!("{}", report.summary());

    Ok(report)
}

/// A sequential verse a dry run would have created.
#[derive(Debug)]
struct PlannedVerse {
    path: PathBuf,
    text: String,
}

/// State carried from one chunk to the next within a run.
#[derive(Debug, Default)]
struct RunState {
    allocator: SequentialAllocator,
    /// Latest dry-run verse, standing in for the file a live run would have written
    planned: Option<PlannedVerse>,
}

fn publish_chunk(
    chunk: &Chunk,
    outdir: &Path,
    options: &PublishOptions,
    state: &mut RunState,
    confirm: &mut dyn Confirm,
) -> Result<ChunkReport> {
    if options.dedupe_last {
        if let Some(last) = duplicate_of_last(chunk, outdir, state.planned.as_ref())? {
            println!(
                "skipped: chunk {} is identical to last verse ({})",
                chunk.index + 1,
                last.display()
            );
            return Ok(ChunkReport {
                index: chunk.index,
                target: None,
                path: None,
                outcome: Outcome::Duplicate,
            });
        }
    }

    let content = chunk.finalize(options.trim);
    let target = match NamingScheme::classify(&content)? {
        NamingScheme::Named(number) => VerseTarget::Named(number),
        NamingScheme::Sequential => VerseTarget::Sequential(state.allocator.allocate(outdir)?),
    };
    let path = outdir.join(target.file_name());
    debug!("chunk {} -> {:?} ({})", chunk.index + 1, target, path.display());

    let outcome = reconcile(&path, &content, options.dry_run, confirm)?;
    if outcome == Outcome::WouldCreate && matches!(target, VerseTarget::Sequential(_)) {
        state.planned = Some(PlannedVerse {
            path: path.clone(),
            text: content.trim().to_string(),
        });
    }
    match outcome {
        Outcome::Cancelled => println!("cancelled: {} (kept existing file)", path.display()),
        _ => println!("{}: {}", outcome.label(), path.display()),
    }

    Ok(ChunkReport {
        index: chunk.index,
        target: Some(target),
        path: Some(path),
        outcome,
    })
}

/// The last sequential verse file, if its trimmed text equals the chunk's.
///
/// In a dry run the latest planned verse counts as written when it sorts
/// after everything on disk.
fn duplicate_of_last(
    chunk: &Chunk,
    outdir: &Path,
    planned: Option<&PlannedVerse>,
) -> Result<Option<PathBuf>> {
    let on_disk = last_verse_path(outdir)?;

    if let Some(planned) = planned {
        let planned_is_last = match &on_disk {
            Some(disk) => planned.path.file_name() > disk.file_name(),
            None => true,
        };
        if planned_is_last {
            return Ok((planned.text == chunk.trimmed()).then(|| planned.path.clone()));
        }
    }

    let Some(last) = on_disk else {
        return Ok(None);
    };

    let bytes = fs::read(&last).map_err(|e| PublishError::io(&last, e))?;
    let last_text = String::from_utf8_lossy(&bytes);
    if last_text.trim() == chunk.trimmed() {
        Ok(Some(last))
    } else {
        Ok(None)
    }
}
