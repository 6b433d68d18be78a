use std::path::PathBuf;

use thiserror::Error;

/// Failures that end a viewer run.
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("cannot read source file {}", path.display())]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("syntax error at {line}:{column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("cannot write document to {}", path.display())]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
}

pub type Result<T> = std::result::Result<T, ViewerError>;
