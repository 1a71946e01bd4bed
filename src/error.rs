//! Error taxonomy for knowledge operations.
//!
//! Every core operation fails with one of three kinds: bad input
//! ([`KnowledgeError::Validation`]), a storage backend failure
//! ([`KnowledgeError::Storage`]), or a failed answer generation
//! ([`KnowledgeError::Generation`]). Nothing is retried at this layer.

use thiserror::Error;

/// Errors surfaced by the store, the synthesizer, and the engine flows.
#[derive(Error, Debug)]
pub enum KnowledgeError {
    /// Malformed or missing input. No event is recorded for these.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Backend unavailable or a constraint violation (duplicate id, bad type).
    #[error("storage error: {0}")]
    Storage(String),

    /// Generation capability unreachable or returned something unusable.
    #[error("generation failed: {0}")]
    Generation(String),
}

pub type Result<T> = std::result::Result<T, KnowledgeError>;

impl KnowledgeError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn generation(msg: impl Into<String>) -> Self {
        Self::Generation(msg.into())
    }

    /// Message safe to hand back to a caller. Validation problems are the
    /// caller's to fix, so they are passed through; anything else is
    /// reduced to a generic failure and the details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            Self::Storage(_) | Self::Generation(_) => "internal error".to_string(),
        }
    }
}

impl From<rusqlite::Error> for KnowledgeError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for KnowledgeError {
    fn from(e: serde_json::Error) -> Self {
        Self::Storage(format!("failed to decode stored JSON: {e}"))
    }
}

impl From<reqwest::Error> for KnowledgeError {
    fn from(e: reqwest::Error) -> Self {
        Self::Generation(e.to_string())
    }
}
