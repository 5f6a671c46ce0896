//! Classifier verdicts consumed by the review pass.
//!
//! A [`Verdict`] is the structured output of the external classifier
//! collaborator. The pipeline never looks inside the classifier; it consumes
//! exactly this shape, at most once per post.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::UnknownTag;
use crate::types::message::Message;
use crate::types::post::{Category, ContentWarning};

/// The classifier's recommendation for a post.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VerdictDecision {
    Approve,
    Reject,
}

impl std::fmt::Display for VerdictDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerdictDecision::Approve => write!(f, "approve"),
            VerdictDecision::Reject => write!(f, "reject"),
        }
    }
}

impl std::str::FromStr for VerdictDecision {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approve" => Ok(VerdictDecision::Approve),
            "reject" => Ok(VerdictDecision::Reject),
            _ => Err(UnknownTag(s.to_string())),
        }
    }
}

/// Kind of personally identifying information the classifier redacted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PiiKind {
    Name,
    Email,
    Phone,
    Address,
    Handle,
    Financial,
    Other,
}

/// One redaction the classifier applied while producing the scrubbed copy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PiiReplacement {
    pub kind: PiiKind,
    /// The text that was removed.
    pub found: String,
    /// The placeholder it was replaced with, e.g. `[email]`.
    pub replaced_with: String,
}

/// Structured output of one classifier review.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Verdict {
    pub decision: VerdictDecision,
    /// Classifier self-reported confidence in `[0, 1]`.
    pub confidence: f64,
    /// Present when `decision` is reject; shown to moderators, not stored
    /// on the post.
    pub rejection_reason: Option<String>,
    /// Redacted copy of the conversation, parallel to the post's messages.
    /// Always applied when the verdict is merged, whatever the decision.
    pub scrubbed_messages: Vec<Message>,
    /// Redactions performed while producing `scrubbed_messages`.
    pub pii_replacements: Vec<PiiReplacement>,
    /// Sensitivity tags the classifier detected in the conversation.
    pub detected_warnings: BTreeSet<ContentWarning>,
    /// Topic tags the classifier suggests adding.
    pub suggested_categories: Option<BTreeSet<Category>>,
}

impl Verdict {
    /// An approving verdict with the given confidence and scrubbed copy.
    ///
    /// Confidence is clamped to `[0, 1]`.
    pub fn approve(confidence: f64, scrubbed_messages: Vec<Message>) -> Self {
        Self {
            decision: VerdictDecision::Approve,
            confidence: confidence.clamp(0.0, 1.0),
            rejection_reason: None,
            scrubbed_messages,
            pii_replacements: Vec::new(),
            detected_warnings: BTreeSet::new(),
            suggested_categories: None,
        }
    }

    /// A rejecting verdict with the given confidence and reason.
    ///
    /// Confidence is clamped to `[0, 1]`.
    pub fn reject(
        confidence: f64,
        reason: impl Into<String>,
        scrubbed_messages: Vec<Message>,
    ) -> Self {
        Self {
            decision: VerdictDecision::Reject,
            confidence: confidence.clamp(0.0, 1.0),
            rejection_reason: Some(reason.into()),
            scrubbed_messages,
            pii_replacements: Vec::new(),
            detected_warnings: BTreeSet::new(),
            suggested_categories: None,
        }
    }

    /// Attach suggested topic tags.
    pub fn with_suggested_categories(
        mut self,
        categories: impl IntoIterator<Item = Category>,
    ) -> Self {
        self.suggested_categories = Some(categories.into_iter().collect());
        self
    }

    /// Attach detected sensitivity tags.
    pub fn with_detected_warnings(
        mut self,
        warnings: impl IntoIterator<Item = ContentWarning>,
    ) -> Self {
        self.detected_warnings = warnings.into_iter().collect();
        self
    }

    /// Attach redaction records.
    pub fn with_pii_replacements(
        mut self,
        replacements: impl IntoIterator<Item = PiiReplacement>,
    ) -> Self {
        self.pii_replacements = replacements.into_iter().collect();
        self
    }
}
