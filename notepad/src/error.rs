//! Error types for editor actions and the update check.

use std::path::PathBuf;
use thiserror::Error;

/// Failure of a document or clipboard action.
#[derive(Error, Debug)]
pub enum EditorError {
    #[error("cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{0}")]
    Validation(String),
    #[error("clipboard error: {0}")]
    Clipboard(#[from] ClipboardError),
}

impl EditorError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}

#[derive(Error, Debug)]
#[error("{0}")]
pub struct ClipboardError(pub String);

/// Transport failure or non-2xx status.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    #[error("failed to fetch latest release information: {0}")]
    FetchFailed(String),
    #[error("failed to download update package: {0}")]
    DownloadFailed(String),
}

/// The external unpack step failed.
#[derive(Error, Debug)]
pub enum InstallError {
    #[error("could not run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} exited with {status}")]
    Status { program: String, status: String },
}

#[derive(Error, Debug)]
pub enum UpdateError {
    #[error(transparent)]
    Network(#[from] NetworkError),
    #[error("release information is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("release {0} has no downloadable assets")]
    NoAssets(String),
    #[error("failed to install update: {0}")]
    Install(#[from] InstallError),
    #[error("update package I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("update cancelled")]
    Cancelled,
    #[error("update check stopped unexpectedly")]
    WorkerLost,
}

pub type Result<T> = std::result::Result<T, EditorError>;
