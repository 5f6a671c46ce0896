//! Persistence traits for posts and community flags.
//!
//! The pipeline never talks to a database directly; it goes through these
//! seams. Conditional updates carry the optimistic-concurrency discipline:
//! the precondition is checked against stored state inside the same write,
//! and a write whose precondition no longer holds is a silent no-op reported
//! as [`ConditionalWrite::Skipped`]. No lock is ever held across a
//! classifier call.

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::StoreResult;
use crate::types::{
    Category, ContentWarning, FlagReason, Message, Post, PostId, PostStatus, ReporterIdentity,
};

/// Outcome of a conditional update.
///
/// `Skipped` is a successful idempotent outcome, not an error; callers use
/// it to avoid duplicate side effects such as repeated notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionalWrite {
    /// The precondition held and this call applied the update.
    Applied,
    /// The precondition no longer held; nothing was written.
    Skipped,
}

impl ConditionalWrite {
    /// Whether this call performed the write.
    pub fn applied(&self) -> bool {
        matches!(self, ConditionalWrite::Applied)
    }
}

/// The single atomic payload the review pass writes to a post.
///
/// Everything here lands together or not at all, gated on the post still
/// being unreviewed and pending.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewUpdate {
    pub status: PostStatus,
    /// Full replacement sets, already unioned with the post's own tags.
    pub categories: BTreeSet<Category>,
    pub content_warnings: BTreeSet<ContentWarning>,
    pub scrubbed_messages: Vec<Message>,
    pub ai_confidence: f64,
    pub ai_reviewed_at: DateTime<Utc>,
}

/// Point lookups and conditional writes for posts.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Persist a freshly submitted post.
    async fn create_post(&self, post: &Post) -> StoreResult<()>;

    /// Fetch a post by id.
    async fn get_post(&self, id: PostId) -> StoreResult<Option<Post>>;

    /// Apply a review outcome if and only if the post is still unreviewed
    /// and pending.
    ///
    /// The precondition check and the write are one atomic step from the
    /// caller's point of view. Returns [`ConditionalWrite::Skipped`] when a
    /// concurrent writer (a racing review pass, or a manual moderator
    /// decision) got there first; nothing is merged in that case.
    async fn apply_review(
        &self,
        id: PostId,
        review: &ReviewUpdate,
    ) -> StoreResult<ConditionalWrite>;

    /// Move an approved post to flagged.
    ///
    /// Skipped when the post is in any other status, including already
    /// flagged, so redundant escalations under racing flag submissions stay
    /// harmless.
    async fn mark_flagged(&self, id: PostId) -> StoreResult<ConditionalWrite>;
}

/// Append-only flag recording with per-reporter deduplication.
#[async_trait]
pub trait FlagStore: Send + Sync {
    /// Record a flag and return the deduplicated open-flag count for the
    /// post.
    ///
    /// At most one open flag exists per reporter per post; a repeat report
    /// from the same identity replaces the stored reason without growing
    /// the count.
    async fn record_flag(
        &self,
        post_id: PostId,
        reporter: ReporterIdentity,
        reason: FlagReason,
    ) -> StoreResult<i64>;
}

/// Composite store: everything the full pipeline needs.
pub trait CurationStore: PostStore + FlagStore {}

// Blanket implementation: anything implementing both seams is a CurationStore
impl<T: PostStore + FlagStore> CurationStore for T {}
