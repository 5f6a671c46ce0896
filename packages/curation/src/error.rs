//! Typed errors for the curation library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.

use thiserror::Error;

use crate::types::PostId;

/// Failures produced while parsing a raw conversation upload.
///
/// All of these are terminal: the uploaded text itself is malformed and must
/// be corrected by the submitter. None are retried automatically, and every
/// message is written to be shown to the submitter verbatim.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The upload was empty or whitespace
    #[error("the submission is empty")]
    EmptyInput,

    /// Input was JSON-shaped but could not be read as a known export format
    #[error("could not read the upload as a conversation export: {detail}")]
    UnparseableFormat { detail: String },

    /// A structured message carried a role outside user/assistant
    #[error("unrecognized speaker role: {role}")]
    InvalidRole { role: String },

    /// A structured message had no usable text content
    #[error("message {index} has no text content")]
    MissingContent { index: usize },

    /// Parsing succeeded but every message came out empty
    #[error("no usable messages were found in the submission")]
    NoValidMessages,
}

/// Error returned when a string label does not match any closed tag
/// vocabulary (status, category, content warning, flag reason).
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown tag: {0}")]
pub struct UnknownTag(pub String);

/// Failures from the external classifier collaborator.
///
/// These are recoverable from the pipeline's point of view: the post under
/// review is left untouched and a later scheduled pass retries it.
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// The call did not complete in time
    #[error("classifier timed out")]
    Timeout,

    /// A response arrived but could not be interpreted as a verdict
    #[error("malformed classifier verdict: {reason}")]
    MalformedVerdict { reason: String },

    /// Transport-level failure reaching the classifier
    #[error("classifier transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Failures from the persistence collaborator.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Storage backend operation failed
    #[error("storage error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Failures surfaced by submission intake.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The upload could not be parsed; the message is submitter-facing
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The pending post could not be persisted
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

/// Failures surfaced by the moderation and flag-handling passes.
#[derive(Debug, Error)]
pub enum ModerationError {
    /// The post does not exist
    #[error("post not found: {id}")]
    PostNotFound { id: PostId },

    /// The classifier call failed; the post was left untouched
    #[error("classifier error: {0}")]
    Classifier(#[from] ClassifierError),

    /// A persistence call failed
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

/// Result type alias for parse operations.
pub type ParseResult<T> = std::result::Result<T, ParseError>;

/// Result type alias for submission intake.
pub type IngestResult<T> = std::result::Result<T, IngestError>;

/// Result type alias for classifier calls.
pub type ClassifierResult<T> = std::result::Result<T, ClassifierError>;

/// Result type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Result type alias for moderation operations.
pub type ModerationResult<T> = std::result::Result<T, ModerationError>;
