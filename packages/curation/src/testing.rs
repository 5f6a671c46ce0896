//! Testing utilities including mock implementations.
//!
//! These are useful for testing applications that use the curation library
//! without making real AI-provider calls.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, RwLock};

use crate::error::{ClassifierError, ClassifierResult};
use crate::traits::Classifier;
use crate::types::{Message, Verdict};

/// Confidence attached to the default echo-approve verdict, comfortably
/// above the automated approval threshold.
const DEFAULT_CONFIDENCE: f64 = 0.95;

/// A mock classifier for testing.
///
/// Returns deterministic, configurable verdicts for moderation calls.
/// Useful for testing pipeline logic without making real LLM calls.
#[derive(Default)]
pub struct MockClassifier {
    /// Scripted verdicts, consumed in order
    verdicts: Arc<RwLock<VecDeque<Verdict>>>,

    /// Scripted failures, consumed before any verdict
    failures: Arc<RwLock<VecDeque<ClassifierError>>>,

    /// Call tracking for assertions
    calls: Arc<RwLock<Vec<MockClassifierCall>>>,
}

/// Record of a call made to the mock classifier.
#[derive(Debug, Clone)]
pub struct MockClassifierCall {
    /// The conversation submitted for review.
    pub messages: Vec<Message>,
}

impl MockClassifier {
    /// Create a new mock classifier with default behavior.
    ///
    /// With nothing scripted, every call approves at high confidence and
    /// echoes the conversation back as its scrub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a verdict. Queued verdicts are returned in order before the
    /// default applies.
    pub fn with_verdict(self, verdict: Verdict) -> Self {
        self.verdicts.write().unwrap().push_back(verdict);
        self
    }

    /// Queue a failure. Failures are consumed before any queued verdict.
    pub fn with_failure(self, error: ClassifierError) -> Self {
        self.failures.write().unwrap().push_back(error);
        self
    }

    /// Get all calls made to this mock.
    pub fn calls(&self) -> Vec<MockClassifierCall> {
        self.calls.read().unwrap().clone()
    }

    /// Get the number of review calls made to this mock.
    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }

    /// Clear call history.
    pub fn clear_calls(&self) {
        self.calls.write().unwrap().clear();
    }
}

#[async_trait]
impl Classifier for MockClassifier {
    async fn review(&self, messages: &[Message]) -> ClassifierResult<Verdict> {
        self.calls.write().unwrap().push(MockClassifierCall {
            messages: messages.to_vec(),
        });

        if let Some(error) = self.failures.write().unwrap().pop_front() {
            return Err(error);
        }

        // Return the next scripted verdict or the echo-approve default
        Ok(self
            .verdicts
            .write()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Verdict::approve(DEFAULT_CONFIDENCE, messages.to_vec())))
    }
}
