//! Curation pipeline - the core of the library.
//!
//! The pipeline covers a post's whole automated lifecycle:
//! - Intake (parse the upload, persist a pending post)
//! - Parsing (format detection across exports, transcripts, and prose)
//! - Moderation (classifier verdict → lifecycle decision, applied once)
//! - Flag escalation (community reports pull a post back into review)
//! - Ranking (time-decay ordering of the approved feed)

pub mod escalate;
pub mod ingest;
pub mod moderate;
pub mod parse;
pub mod rank;

pub use escalate::{escalated_status, record_flag, FlagOutcome, FLAG_ESCALATION_THRESHOLD};
pub use ingest::{ingest_submission, Submission};
pub use moderate::{
    build_review, decide_status, moderate_post, ModerationOutcome, AUTO_APPROVE_CONFIDENCE,
};
pub use parse::parse_conversation;
pub use rank::{decay_score, rank_posts, RANKING_BASELINE_HOURS, RANKING_GRAVITY};
