//! Error types shared by every stage of the conversion pipeline.

use std::path::PathBuf;
use thiserror::Error;

use crate::validate::SchemaViolation;

#[derive(Error, Debug)]
pub enum Error {
    /// Bad invocation or malformed source data. Fatal, nothing is written.
    #[error("Input error: {0}")]
    Input(String),

    /// The assembled destination document does not satisfy the schema.
    #[error("Schema error: {0}")]
    Schema(SchemaViolation),

    /// Dictionary download failed. Never leaves the dictionary client.
    #[error("Network error: {0}")]
    Network(String),

    /// Malformed rank-override, todo or missing-rank file.
    #[error("Override file error in {path}: {message}")]
    OverrideFile { path: PathBuf, message: String },

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn input(message: impl Into<String>) -> Self {
        Self::Input(message.into())
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn override_file(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::OverrideFile {
            path: path.into(),
            message: message.into(),
        }
    }

    /// True for errors that abort only an override subcommand.
    pub fn is_override_file(&self) -> bool {
        matches!(self, Self::OverrideFile { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
