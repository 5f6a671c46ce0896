//! Classifier trait for automated conversation review.

use async_trait::async_trait;

use crate::error::ClassifierResult;
use crate::types::{Message, Verdict};

/// The external review collaborator.
///
/// Implementations wrap a specific provider and own its prompting, response
/// parsing, timeouts, and retries. From the pipeline's side this is an
/// opaque, possibly slow, possibly failing remote call that either produces
/// a [`Verdict`] or fails recoverably.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Review a canonical conversation and produce a verdict.
    ///
    /// The verdict's `scrubbed_messages` must parallel `messages` (same
    /// length, same per-index roles); the review pass treats a verdict that
    /// does not as malformed.
    async fn review(&self, messages: &[Message]) -> ClassifierResult<Verdict>;
}
