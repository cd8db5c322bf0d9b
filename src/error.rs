//! @ai:module:intent Define error types for annotation stripping
//! @ai:module:layer domain
//! @ai:module:public_api Error, Result
//! @ai:module:stateless true

use std::path::PathBuf;
use thiserror::Error;

/// @ai:intent Unified error type for all annostrip operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Parse error at {file}:{line}:{column}: {message}")]
    Parse {
        file: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Failed to print {file}: {message}")]
    Print { file: PathBuf, message: String },

    #[error("Formatter `{tool}` failed: {message}")]
    Formatter { tool: String, message: String },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// @ai:intent Attach a file path to errors raised before the path was known
    /// @ai:effects pure
    pub fn with_file(self, path: &std::path::Path) -> Self {
        match self {
            Error::Parse {
                line,
                column,
                message,
                ..
            } => Error::Parse {
                file: path.to_path_buf(),
                line,
                column,
                message,
            },
            Error::Print { message, .. } => Error::Print {
                file: path.to_path_buf(),
                message,
            },
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
