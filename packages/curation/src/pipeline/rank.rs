//! Feed ranking: time-decay scoring over approved posts.
//!
//! Popularity buys a post prominence and age takes it away. The score is
//! `upvotes / (age_hours + 2)^1.5`: the additive baseline keeps brand-new
//! posts finite and bounded, and the exponent controls how fast older posts
//! sink. Eligibility is not decided here; the persistence layer hands in
//! already-approved posts and this module only orders them.

use chrono::{DateTime, Utc};

use crate::types::Post;

/// Exponent applied to post age. Higher values sink old posts faster.
pub const RANKING_GRAVITY: f64 = 1.5;

/// Hours added to every post's age so fresh posts divide by a finite
/// baseline instead of near-zero.
pub const RANKING_BASELINE_HOURS: f64 = 2.0;

/// Decay score for one post.
///
/// Zero or negative upvotes always score exactly zero. Negative age (clock
/// skew, future timestamps) is clamped to zero rather than rejected.
pub fn decay_score(upvotes: i64, created_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    if upvotes <= 0 {
        return 0.0;
    }
    let age_hours = ((now - created_at).num_milliseconds() as f64 / 3_600_000.0).max(0.0);
    upvotes as f64 / (age_hours + RANKING_BASELINE_HOURS).powf(RANKING_GRAVITY)
}

/// Order posts for the public feed, most prominent first.
///
/// Returns a new sequence and leaves the input untouched. The sort is
/// stable, so posts with equal scores keep their original relative order.
pub fn rank_posts(posts: &[Post], now: DateTime<Utc>) -> Vec<Post> {
    let mut scored: Vec<(f64, Post)> = posts
        .iter()
        .map(|post| (decay_score(post.upvotes, post.created_at, now), post.clone()))
        .collect();

    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    scored.into_iter().map(|(_, post)| post).collect()
}
