/// Error types for the DriveSweep core.
///
/// Scan-time problems never surface here: unreadable subtrees are skipped
/// and attribute queries fall back to safe defaults. These variants cover the
/// operations whose failures the user is told about (export, config,
/// shortcut creation).
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum DriveSweepError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid configuration in {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not create shortcut: {0}")]
    Shortcut(String),

    #[error("{0} is not supported on this platform")]
    Unsupported(&'static str),
}

impl DriveSweepError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, DriveSweepError>;
