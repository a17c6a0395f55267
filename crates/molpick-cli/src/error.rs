use molpick::core::io::identifiers::IdentifierIoError;
use molpick::engine::error::EngineError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Molpick(#[from] EngineError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Identifier file '{path}': {source}", path = path.display())]
    Identifiers {
        path: PathBuf,
        #[source]
        source: IdentifierIoError,
    },

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CliError {
    pub fn identifiers(path: impl Into<PathBuf>, source: IdentifierIoError) -> Self {
        Self::Identifiers {
            path: path.into(),
            source,
        }
    }
}
