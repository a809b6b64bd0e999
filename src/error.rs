//! Error types for the spindex inverted index engine.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SpindexError>;

#[derive(Error, Debug)]
pub enum SpindexError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("data corruption: {0}")]
    Corruption(String),

    #[error("invalid corpus: {0}")]
    InvalidCorpus(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("index not ready: {0}")]
    NotReady(String),
}

impl From<bincode::Error> for SpindexError {
    fn from(err: bincode::Error) -> Self {
        SpindexError::Serialization(err.to_string())
    }
}

impl From<csv::Error> for SpindexError {
    fn from(err: csv::Error) -> Self {
        SpindexError::InvalidCorpus(err.to_string())
    }
}
