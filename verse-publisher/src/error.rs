use std::path::PathBuf;
use thiserror::Error;

/// Failures raised while loading, scanning, or writing verse files.
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Input not found: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Verse number {digits} is too large")]
    NumberOutOfRange { digits: String },

    #[error("No sequential verse number left after {max}")]
    SequenceExhausted { max: u64 },
}

impl PublishError {
    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, PublishError>;
