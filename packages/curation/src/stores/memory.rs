//! In-memory storage implementation for testing and development.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use crate::error::StoreResult;
use crate::traits::store::{ConditionalWrite, FlagStore, PostStore, ReviewUpdate};
use crate::types::{Flag, FlagReason, Post, PostId, PostStatus, ReporterIdentity};

/// In-memory storage for posts and community flags.
///
/// Useful for testing and development. Not suitable for production as data
/// is lost on restart. Conditional writes check their precondition and
/// mutate under one write lock, which gives this backend the same atomicity
/// a relational store gets from a conditional `UPDATE`.
pub struct MemoryStore {
    posts: RwLock<HashMap<PostId, Post>>,
    flags: RwLock<HashMap<PostId, BTreeMap<ReporterIdentity, FlagReason>>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self {
            posts: RwLock::new(HashMap::new()),
            flags: RwLock::new(HashMap::new()),
        }
    }

    /// Clear all stored data.
    pub fn clear(&self) {
        self.posts.write().unwrap().clear();
        self.flags.write().unwrap().clear();
    }

    /// Get the number of stored posts.
    pub fn post_count(&self) -> usize {
        self.posts.read().unwrap().len()
    }

    /// Get all approved posts, the set the public feed ranks.
    pub fn approved_posts(&self) -> Vec<Post> {
        self.posts
            .read()
            .unwrap()
            .values()
            .filter(|p| p.status == PostStatus::Approved)
            .cloned()
            .collect()
    }

    /// Get the open flags recorded against a post.
    pub fn open_flags(&self, post_id: PostId) -> Vec<Flag> {
        self.flags
            .read()
            .unwrap()
            .get(&post_id)
            .map(|flags| {
                flags
                    .iter()
                    .map(|(reporter, reason)| Flag {
                        reporter: reporter.clone(),
                        reason: *reason,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn create_post(&self, post: &Post) -> StoreResult<()> {
        self.posts.write().unwrap().insert(post.id, post.clone());
        Ok(())
    }

    async fn get_post(&self, id: PostId) -> StoreResult<Option<Post>> {
        Ok(self.posts.read().unwrap().get(&id).cloned())
    }

    async fn apply_review(
        &self,
        id: PostId,
        review: &ReviewUpdate,
    ) -> StoreResult<ConditionalWrite> {
        let mut posts = self.posts.write().unwrap();
        let Some(post) = posts.get_mut(&id) else {
            // Deleted between fetch and write; nothing to update.
            return Ok(ConditionalWrite::Skipped);
        };
        if post.is_reviewed() || post.status != PostStatus::Pending {
            return Ok(ConditionalWrite::Skipped);
        }

        post.status = review.status;
        post.categories = review.categories.clone();
        post.content_warnings = review.content_warnings.clone();
        post.scrubbed_messages = Some(review.scrubbed_messages.clone());
        post.ai_confidence = Some(review.ai_confidence);
        post.ai_reviewed_at = Some(review.ai_reviewed_at);
        Ok(ConditionalWrite::Applied)
    }

    async fn mark_flagged(&self, id: PostId) -> StoreResult<ConditionalWrite> {
        let mut posts = self.posts.write().unwrap();
        match posts.get_mut(&id) {
            Some(post) if post.status == PostStatus::Approved => {
                post.status = PostStatus::Flagged;
                Ok(ConditionalWrite::Applied)
            }
            _ => Ok(ConditionalWrite::Skipped),
        }
    }
}

#[async_trait]
impl FlagStore for MemoryStore {
    async fn record_flag(
        &self,
        post_id: PostId,
        reporter: ReporterIdentity,
        reason: FlagReason,
    ) -> StoreResult<i64> {
        let count = {
            let mut flags = self.flags.write().unwrap();
            let post_flags = flags.entry(post_id).or_default();
            // Upsert: a repeat reporter replaces their reason, never the count.
            post_flags.insert(reporter, reason);
            post_flags.len() as i64
        };

        if let Some(post) = self.posts.write().unwrap().get_mut(&post_id) {
            post.flag_count = count;
        }
        Ok(count)
    }
}
