//! Error types for the build runtime.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a command or a single build pass.
#[derive(Error, Debug)]
pub enum CslinerError {
    #[error("configuration not found at {0}, run `csliner init` first")]
    ConfigMissing(PathBuf),

    #[error("invalid configuration {path}: {source}")]
    ConfigInvalid {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no markup files found under {0:?}")]
    NoMarkupFiles(Vec<PathBuf>),

    #[error("cannot create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write output {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Compiler(#[from] ucss::UcssError),

    #[error("watcher error: {0}")]
    Watch(#[from] notify::Error),

    #[error("background task failed: {0}")]
    Task(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CslinerError>;
