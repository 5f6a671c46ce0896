//! Moderation pipeline - classify a pending post and apply the decision.
//!
//! The decision rule is deliberately asymmetric: automated approval demands
//! high confidence while automated rejection does not, because wrongly
//! publishing a conversation costs more than holding one back for a human.
//! The classifier call is the only slow step and runs outside any critical
//! section; the write itself is conditional on the post still being
//! unreviewed, which makes redelivered moderation events harmless.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::error::{ClassifierError, ModerationError, ModerationResult};
use crate::traits::{Classifier, ConditionalWrite, PostStore, ReviewUpdate};
use crate::types::{Message, Post, PostId, PostStatus, Verdict, VerdictDecision};

/// Minimum classifier confidence for automated approval.
///
/// Approvals below this are held in `pending` for a human moderator.
/// Rejections apply at any confidence.
pub const AUTO_APPROVE_CONFIDENCE: f64 = 0.85;

/// Outcome of one moderation pass.
#[derive(Debug, Clone, PartialEq)]
pub enum ModerationOutcome {
    /// This call ran the classifier and applied the decision.
    Completed {
        status: PostStatus,
        /// Submitter-facing explanation, present on rejection.
        rejection_reason: Option<String>,
    },

    /// The post had already been reviewed, either before this call started
    /// or by a concurrent pass that won the write race. Nothing was changed.
    AlreadyReviewed,
}

impl ModerationOutcome {
    /// Whether this call was the one that applied a decision.
    ///
    /// Callers use this to avoid duplicate side effects such as repeated
    /// submitter notifications.
    pub fn is_completed(&self) -> bool {
        matches!(self, ModerationOutcome::Completed { .. })
    }
}

/// Map a classifier decision and confidence to the post's next status.
///
/// Total over its inputs: rejection applies at any confidence, approval
/// requires [`AUTO_APPROVE_CONFIDENCE`] or better, and a low-confidence
/// approval keeps the post pending for manual review.
pub fn decide_status(decision: VerdictDecision, confidence: f64) -> PostStatus {
    match decision {
        VerdictDecision::Reject => PostStatus::Rejected,
        VerdictDecision::Approve if confidence >= AUTO_APPROVE_CONFIDENCE => PostStatus::Approved,
        VerdictDecision::Approve => PostStatus::Pending,
    }
}

/// Build the single atomic update a verdict produces for a post.
///
/// Tag sets are unioned with the submitter's declared tags, never replaced.
/// Scrubbed messages are always replaced, whatever the resulting status,
/// since even a held post benefits from redaction.
pub fn build_review(post: &Post, verdict: &Verdict, reviewed_at: DateTime<Utc>) -> ReviewUpdate {
    let mut categories = post.categories.clone();
    if let Some(suggested) = &verdict.suggested_categories {
        categories.extend(suggested.iter().copied());
    }

    let mut content_warnings = post.content_warnings.clone();
    content_warnings.extend(verdict.detected_warnings.iter().copied());

    ReviewUpdate {
        status: decide_status(verdict.decision, verdict.confidence),
        categories,
        content_warnings,
        scrubbed_messages: verdict.scrubbed_messages.clone(),
        ai_confidence: verdict.confidence,
        ai_reviewed_at: reviewed_at,
    }
}

/// Run the automated moderation pass for one post: fetch, classify, decide,
/// and conditionally apply.
///
/// Runs at most once per post. A post whose reviewed marker is already set
/// short-circuits to [`ModerationOutcome::AlreadyReviewed`] without
/// consulting the classifier. A classifier failure leaves the post pending
/// and untouched; the caller retries on a later pass.
pub async fn moderate_post<S, C>(
    post_id: PostId,
    store: &S,
    classifier: &C,
) -> ModerationResult<ModerationOutcome>
where
    S: PostStore,
    C: Classifier,
{
    // 1. Fetch and check the idempotency gate before doing any work
    let post = store
        .get_post(post_id)
        .await?
        .ok_or(ModerationError::PostNotFound { id: post_id })?;

    if post.is_reviewed() || post.status != PostStatus::Pending {
        info!("Post {} already moderated, skipping", post_id);
        return Ok(ModerationOutcome::AlreadyReviewed);
    }

    // 2. Classify. A failure here leaves the post untouched and retryable.
    let verdict = classifier.review(&post.messages).await?;

    if !scrub_is_parallel(&post.messages, &verdict.scrubbed_messages) {
        warn!("Post {} verdict carried a mismatched scrub, discarding", post_id);
        return Err(ClassifierError::MalformedVerdict {
            reason: "scrubbed messages do not parallel the original conversation".to_string(),
        }
        .into());
    }

    // 3. Merge and write, conditional on the post still being unreviewed
    let review = build_review(&post, &verdict, Utc::now());

    match store.apply_review(post_id, &review).await? {
        ConditionalWrite::Applied => {
            info!(
                "Post {} moderated: {} (confidence {:.2})",
                post_id, review.status, verdict.confidence
            );
            Ok(ModerationOutcome::Completed {
                status: review.status,
                rejection_reason: verdict.rejection_reason,
            })
        }
        ConditionalWrite::Skipped => {
            info!(
                "Post {} was reviewed by a concurrent pass, keeping the stored decision",
                post_id
            );
            Ok(ModerationOutcome::AlreadyReviewed)
        }
    }
}

/// A verdict's scrub must mirror the original conversation one-to-one:
/// same length, same role at every index.
fn scrub_is_parallel(original: &[Message], scrubbed: &[Message]) -> bool {
    original.len() == scrubbed.len()
        && original.iter().zip(scrubbed).all(|(a, b)| a.role == b.role)
}
