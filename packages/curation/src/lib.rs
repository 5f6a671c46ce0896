//! Conversation Curation Library
//!
//! The ingestion, moderation, and feed-ranking core of the Afterglow
//! archive: people share the AI conversations that mattered to them, and
//! this library turns raw uploads into reviewed, ranked posts.
//!
//! # Design Philosophy
//!
//! **"Detect, don't declare"**
//!
//! - Upload formats are detected, never chosen by the submitter
//! - Closed enums everywhere a tag could silently drift
//! - Moderation policy is pure and separately testable from persistence
//! - Automated approval is conservative; automated rejection is not
//! - Library handles decisions, app handles transport and storage
//!
//! # Usage
//!
//! ```rust,ignore
//! use curation::{ingest_submission, moderate_post, rank_posts, Submission};
//! use curation::stores::MemoryStore;
//! use curation::testing::MockClassifier;
//!
//! // Initialize with a storage backend and classifier
//! let store = MemoryStore::new();
//! let classifier = MockClassifier::new();
//!
//! // Intake: raw upload to pending post
//! let submission = Submission::new("User: hi\nAssistant: hello there");
//! let post = ingest_submission(submission, &store).await?;
//!
//! // Moderation: classifier verdict to lifecycle decision, applied once
//! let outcome = moderate_post(post.id, &store, &classifier).await?;
//!
//! // Feed: time-decay ranking over approved posts
//! let feed = rank_posts(&store.approved_posts(), chrono::Utc::now());
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Core trait abstractions (Classifier, PostStore, FlagStore)
//! - [`types`] - Domain data types (Post, Message, Verdict, tags)
//! - [`pipeline`] - Intake, parsing, moderation, escalation, and ranking
//! - [`stores`] - Storage implementations (MemoryStore)
//! - [`testing`] - Mock implementations for testing

pub mod error;
pub mod pipeline;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{
    ClassifierError, IngestError, ModerationError, ParseError, StoreError, UnknownTag,
};
pub use traits::{
    Classifier, ConditionalWrite, CurationStore, FlagStore, PostStore, ReviewUpdate,
};
pub use types::{
    Category, ContentWarning, Flag, FlagReason, Id, MemberId, Message, PiiKind, PiiReplacement,
    Post, PostId, PostStatus, ReporterIdentity, Role, Verdict, VerdictDecision,
};

// Re-export pipeline components
pub use pipeline::{
    // Intake and parsing
    ingest_submission, parse_conversation, Submission,
    // Moderation
    build_review, decide_status, moderate_post, ModerationOutcome, AUTO_APPROVE_CONFIDENCE,
    // Flag escalation
    escalated_status, record_flag, FlagOutcome, FLAG_ESCALATION_THRESHOLD,
    // Feed ranking
    decay_score, rank_posts, RANKING_BASELINE_HOURS, RANKING_GRAVITY,
};

// Re-export stores
pub use stores::MemoryStore;

// Re-export testing utilities
pub use testing::{MockClassifier, MockClassifierCall};
