//! Error types for TalentScout.

use uuid::Uuid;

use crate::screening::FieldName;

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Failed to load question bank from {path}: {reason}")]
    QuestionBank { path: String, reason: String },
}

/// Candidate store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Candidate already screened: {email}")]
    Duplicate { email: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Rejection of a single answer. Never fatal: the host re-prompts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnswerError {
    #[error("Please enter a value.")]
    EmptyAnswer,

    #[error("Please enter a valid {field}: {reason}")]
    InvalidFormat { field: FieldName, reason: String },
}

impl serde::Serialize for AnswerError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Session lifecycle errors raised by the session manager.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session {id} not found")]
    NotFound { id: Uuid },

    #[error("Session {id} is not ready to submit: {reason}")]
    NotReady { id: Uuid, reason: String },

    #[error("This email or phone number has already been used for screening")]
    DuplicateCandidate,

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;
