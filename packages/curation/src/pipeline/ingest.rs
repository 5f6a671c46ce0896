//! Submission intake - parse a raw upload and persist a pending post.

use std::collections::BTreeSet;

use chrono::Utc;
use tracing::info;

use crate::error::IngestResult;
use crate::pipeline::parse::parse_conversation;
use crate::traits::PostStore;
use crate::types::{Category, ContentWarning, Post};

/// A raw submission as it arrives from the web layer.
#[derive(Debug, Clone, Default)]
pub struct Submission {
    /// The pasted or uploaded conversation, format unknown.
    pub raw_conversation: String,

    /// Topic tags declared by the submitter.
    pub categories: BTreeSet<Category>,

    /// Sensitivity tags declared by the submitter.
    pub content_warnings: BTreeSet<ContentWarning>,
}

impl Submission {
    /// Create a submission carrying just the raw conversation.
    pub fn new(raw_conversation: impl Into<String>) -> Self {
        Self {
            raw_conversation: raw_conversation.into(),
            categories: BTreeSet::new(),
            content_warnings: BTreeSet::new(),
        }
    }

    /// Set the declared categories.
    pub fn with_categories(mut self, categories: impl IntoIterator<Item = Category>) -> Self {
        self.categories = categories.into_iter().collect();
        self
    }

    /// Set the declared content warnings.
    pub fn with_content_warnings(
        mut self,
        warnings: impl IntoIterator<Item = ContentWarning>,
    ) -> Self {
        self.content_warnings = warnings.into_iter().collect();
        self
    }
}

/// Ingest a submission: parse the upload into canonical messages and persist
/// a pending post.
///
/// Parse failures propagate synchronously with submitter-facing text, and
/// nothing is stored in that case. The returned post is invisible to the
/// public feed until moderation approves it.
pub async fn ingest_submission<S>(submission: Submission, store: &S) -> IngestResult<Post>
where
    S: PostStore,
{
    let messages = parse_conversation(&submission.raw_conversation)?;

    let post = Post::submitted(
        messages,
        submission.categories,
        submission.content_warnings,
        Utc::now(),
    );
    store.create_post(&post).await?;

    info!(
        "Post {} submitted with {} messages",
        post.id,
        post.messages.len()
    );
    Ok(post)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::error::{IngestError, ParseError};
    use crate::stores::MemoryStore;
    use crate::types::{Message, PostStatus, Role};

    #[tokio::test]
    async fn test_ingest_creates_pending_post() {
        let store = MemoryStore::new();
        let submission = Submission::new("User: hi\nAssistant: hello there")
            .with_categories([Category::Farewell])
            .with_content_warnings([ContentWarning::Grief]);

        let post = ingest_submission(submission, &store).await.unwrap();

        assert_eq!(post.status, PostStatus::Pending);
        assert_eq!(
            post.messages,
            vec![Message::user("hi"), Message::assistant("hello there")]
        );
        assert_eq!(post.categories, BTreeSet::from([Category::Farewell]));
        assert_eq!(post.upvotes, 0);
        assert_eq!(post.flag_count, 0);
        assert!(!post.is_reviewed());

        let stored = store.get_post(post.id).await.unwrap().unwrap();
        assert_eq!(stored, post);
    }

    #[tokio::test]
    async fn test_ingest_accepts_structured_uploads() {
        let store = MemoryStore::new();
        let submission = Submission::new(r#"[{"role":"user","content":"hi"}]"#);

        let post = ingest_submission(submission, &store).await.unwrap();
        assert_eq!(post.messages, vec![Message::user("hi")]);
    }

    #[tokio::test]
    async fn test_ingest_archives_freeform_prose_whole() {
        let store = MemoryStore::new();
        let submission = Submission::new("random prose, no markers");

        let post = ingest_submission(submission, &store).await.unwrap();
        assert_eq!(post.messages.len(), 1);
        assert_eq!(post.messages[0].role, Role::User);
    }

    #[tokio::test]
    async fn test_parse_failure_stores_nothing() {
        let store = MemoryStore::new();
        let submission = Submission::new("   ");

        let err = ingest_submission(submission, &store).await.unwrap_err();
        assert!(matches!(err, IngestError::Parse(ParseError::EmptyInput)));
        // The submitter sees the parse failure text directly.
        assert_eq!(err.to_string(), "the submission is empty");
        assert_eq!(store.post_count(), 0);
    }
}
