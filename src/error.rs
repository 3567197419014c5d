use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("the secret is not a valid base32 encoding")]
    Decode,

    #[error("the secret decodes to an empty key")]
    Key,

    #[error("unsupported number of digits {0}, expected 6-8")]
    InvalidDigits(u32),

    #[error("Entry with this name already exists: {0}")]
    DuplicateName(String),

    #[error("No entry found with the name: {0}")]
    NotFound(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl Error {
    /// Failures that surface to users as "cannot derive a code".
    pub fn is_derivation_failure(&self) -> bool {
        matches!(self, Error::Decode | Error::Key | Error::InvalidDigits(_))
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("unable to read store {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("store {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unable to serialize store: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("unable to write store {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
