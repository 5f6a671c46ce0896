//! The post aggregate and its lifecycle vocabulary.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::UnknownTag;
use crate::types::id::PostId;
use crate::types::message::Message;

/// Lifecycle status of a post.
///
/// Only `approved` posts are ever publicly visible or ranked. `pending`
/// covers both "awaiting automated review" and "held for manual review after
/// a low-confidence approval". `flagged` means community reports pulled an
/// approved post back out of the feed; only an explicit moderator action
/// (outside this library) restores it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PostStatus {
    Pending,
    Approved,
    Rejected,
    Flagged,
}

impl PostStatus {
    /// Whether posts in this status appear in the public feed.
    pub fn is_publicly_visible(&self) -> bool {
        matches!(self, PostStatus::Approved)
    }
}

impl std::fmt::Display for PostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PostStatus::Pending => write!(f, "pending"),
            PostStatus::Approved => write!(f, "approved"),
            PostStatus::Rejected => write!(f, "rejected"),
            PostStatus::Flagged => write!(f, "flagged"),
        }
    }
}

impl std::str::FromStr for PostStatus {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PostStatus::Pending),
            "approved" => Ok(PostStatus::Approved),
            "rejected" => Ok(PostStatus::Rejected),
            "flagged" => Ok(PostStatus::Flagged),
            _ => Err(UnknownTag(s.to_string())),
        }
    }
}

/// Topic tag for an archived conversation.
///
/// Declared by the submitter at intake and later unioned with whatever the
/// review pass suggests. Unions only ever add tags.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Farewell,
    Gratitude,
    Philosophy,
    Creative,
    Humor,
    Technical,
    Companionship,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Farewell => write!(f, "farewell"),
            Category::Gratitude => write!(f, "gratitude"),
            Category::Philosophy => write!(f, "philosophy"),
            Category::Creative => write!(f, "creative"),
            Category::Humor => write!(f, "humor"),
            Category::Technical => write!(f, "technical"),
            Category::Companionship => write!(f, "companionship"),
        }
    }
}

impl std::str::FromStr for Category {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "farewell" => Ok(Category::Farewell),
            "gratitude" => Ok(Category::Gratitude),
            "philosophy" => Ok(Category::Philosophy),
            "creative" => Ok(Category::Creative),
            "humor" => Ok(Category::Humor),
            "technical" => Ok(Category::Technical),
            "companionship" => Ok(Category::Companionship),
            _ => Err(UnknownTag(s.to_string())),
        }
    }
}

/// Sensitivity tag attached to a conversation.
///
/// Same union semantics as [`Category`]: submitter-declared warnings are
/// kept and review-detected warnings are added, never removed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ContentWarning {
    Grief,
    MentalHealth,
    SelfHarm,
    Violence,
    Sexual,
    Profanity,
}

impl std::fmt::Display for ContentWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentWarning::Grief => write!(f, "grief"),
            ContentWarning::MentalHealth => write!(f, "mental_health"),
            ContentWarning::SelfHarm => write!(f, "self_harm"),
            ContentWarning::Violence => write!(f, "violence"),
            ContentWarning::Sexual => write!(f, "sexual"),
            ContentWarning::Profanity => write!(f, "profanity"),
        }
    }
}

impl std::str::FromStr for ContentWarning {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "grief" => Ok(ContentWarning::Grief),
            "mental_health" => Ok(ContentWarning::MentalHealth),
            "self_harm" => Ok(ContentWarning::SelfHarm),
            "violence" => Ok(ContentWarning::Violence),
            "sexual" => Ok(ContentWarning::Sexual),
            "profanity" => Ok(ContentWarning::Profanity),
            _ => Err(UnknownTag(s.to_string())),
        }
    }
}

/// The central aggregate: one archived conversation submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    pub id: PostId,

    // Conversation content
    /// Canonical conversation, in upload order.
    pub messages: Vec<Message>,
    /// Redacted parallel copy of `messages` (same length, same per-index
    /// roles); when present it supersedes `messages` for public display.
    pub scrubbed_messages: Option<Vec<Message>>,

    // Metadata
    pub categories: BTreeSet<Category>,
    pub content_warnings: BTreeSet<ContentWarning>,

    // Lifecycle
    pub status: PostStatus,
    pub created_at: DateTime<Utc>,

    // Counters maintained by the surrounding application
    pub upvotes: i64,
    /// Deduplicated open community flags against this post.
    pub flag_count: i64,

    // Review provenance, written at most once by the automated pass
    pub ai_confidence: Option<f64>,
    pub ai_reviewed_at: Option<DateTime<Utc>>,
}

impl Post {
    /// Create a freshly submitted post: `pending`, zero counters, no review
    /// provenance.
    pub fn submitted(
        messages: Vec<Message>,
        categories: BTreeSet<Category>,
        content_warnings: BTreeSet<ContentWarning>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: PostId::new(),
            messages,
            scrubbed_messages: None,
            categories,
            content_warnings,
            status: PostStatus::Pending,
            created_at,
            upvotes: 0,
            flag_count: 0,
            ai_confidence: None,
            ai_reviewed_at: None,
        }
    }

    /// Whether the automated review pass has already run for this post.
    pub fn is_reviewed(&self) -> bool {
        self.ai_reviewed_at.is_some()
    }

    /// The messages to show publicly: the scrubbed copy when present,
    /// otherwise the originals.
    pub fn display_messages(&self) -> &[Message] {
        self.scrubbed_messages.as_deref().unwrap_or(&self.messages)
    }
}
