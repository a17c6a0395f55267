use super::config::ConfigError;
use crate::core::chemistry::ChemistryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Identifier '{identifier}' could not be fingerprinted: {source}")]
    InvalidIdentifier {
        identifier: String,
        #[source]
        source: ChemistryError,
    },

    #[error(
        "Requested a library of {requested} molecules but only {available} distinct candidates are available"
    )]
    InsufficientCandidates { requested: usize, available: usize },

    #[error("Duplicate identifier '{identifier}' at pool positions {first} and {second}")]
    DuplicateIdentifier {
        identifier: String,
        first: usize,
        second: usize,
    },

    #[error("Seed index {index} is out of range for a pool of {pool_size} candidates")]
    SeedOutOfRange { index: usize, pool_size: usize },

    #[error("No fingerprint cached for identifier '{0}'")]
    MissingFingerprint(String),

    #[error("Similarity between '{first}' and '{second}' is not a finite number: {value}")]
    InvalidSimilarity {
        first: String,
        second: String,
        value: f64,
    },

    #[error("Internal logic error: {0}")]
    Internal(String),
}
