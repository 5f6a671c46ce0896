//! Flag escalation - community reports pull a published post back into review.
//!
//! Reports accrue against any post, but only an approved post with enough
//! distinct reporters is pulled back to `flagged`. The gate is one-way:
//! nothing here ever restores a flagged post to the feed, that takes an
//! explicit human moderator action.

use tracing::{debug, info};

use crate::error::{ModerationError, ModerationResult};
use crate::traits::CurationStore;
use crate::types::{FlagReason, PostId, PostStatus, ReporterIdentity};

/// Distinct open reports required to pull an approved post back into review.
pub const FLAG_ESCALATION_THRESHOLD: i64 = 3;

/// Outcome of recording one community report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagOutcome {
    /// This report crossed the threshold and this call moved the post to
    /// `flagged`.
    Escalated { flag_count: i64 },

    /// The report was stored; the post keeps its current status. Also the
    /// outcome when a concurrent report escalated first, so callers can key
    /// re-review side effects off [`FlagOutcome::Escalated`] alone.
    Recorded { flag_count: i64 },
}

impl FlagOutcome {
    /// Deduplicated open-report count after this report was stored.
    pub fn flag_count(&self) -> i64 {
        match self {
            FlagOutcome::Escalated { flag_count } | FlagOutcome::Recorded { flag_count } => {
                *flag_count
            }
        }
    }
}

/// Whether a post at `status` with `flag_count` open reports should move to
/// `flagged`.
///
/// Only approved posts escalate; reports against posts in any other status
/// accrue as a counter without triggering anything.
pub fn escalated_status(status: PostStatus, flag_count: i64) -> Option<PostStatus> {
    if status == PostStatus::Approved && flag_count >= FLAG_ESCALATION_THRESHOLD {
        Some(PostStatus::Flagged)
    } else {
        None
    }
}

/// Record a community report and escalate the post if the deduplicated
/// report volume crosses the threshold.
///
/// A repeat report from the same identity updates the stored reason instead
/// of growing the count. Racing reports may both attempt the escalation;
/// the store applies it once and the loser comes back as
/// [`FlagOutcome::Recorded`].
pub async fn record_flag<S>(
    post_id: PostId,
    reporter: ReporterIdentity,
    reason: FlagReason,
    store: &S,
) -> ModerationResult<FlagOutcome>
where
    S: CurationStore,
{
    // 1. The post must exist before any flag is stored against it
    let post = store
        .get_post(post_id)
        .await?
        .ok_or(ModerationError::PostNotFound { id: post_id })?;

    // 2. Store the report; the count comes back deduplicated by reporter
    let flag_count = store.record_flag(post_id, reporter, reason).await?;
    debug!("Post {} reported ({} open flags)", post_id, flag_count);

    // 3. Escalate once the volume crosses the threshold
    if escalated_status(post.status, flag_count).is_none() {
        return Ok(FlagOutcome::Recorded { flag_count });
    }

    if store.mark_flagged(post_id).await?.applied() {
        info!(
            "Post {} pulled back into review after {} reports",
            post_id, flag_count
        );
        Ok(FlagOutcome::Escalated { flag_count })
    } else {
        // A concurrent report or a moderator got there first.
        Ok(FlagOutcome::Recorded { flag_count })
    }
}
