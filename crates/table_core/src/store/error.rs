use crate::models::MatchId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] rmp_serde::encode::Error),

    #[error("Deserialization error: {0}")]
    Deserialization(#[from] rmp_serde::decode::Error),

    #[error("Decompression error")]
    Decompression,

    #[error("Corrupted data")]
    Corrupted,

    #[error("Version mismatch: found {found}, expected {expected}")]
    VersionMismatch { found: u32, expected: u32 },

    #[error("Checksum mismatch")]
    ChecksumMismatch,

    #[error("No stored snapshot for match {match_id}")]
    NotFound { match_id: MatchId },

    #[error("Repository unavailable: {0}")]
    Unavailable(String),
}

impl RepositoryError {
    /// Whether retrying the same call later can succeed.
    pub fn is_recoverable(&self) -> bool {
        match self {
            RepositoryError::Io(_) => true,
            RepositoryError::NotFound { .. } => true,
            RepositoryError::Unavailable(_) => true,
            RepositoryError::Corrupted => false,
            RepositoryError::ChecksumMismatch => false,
            RepositoryError::VersionMismatch { .. } => false,
            _ => false,
        }
    }
}
