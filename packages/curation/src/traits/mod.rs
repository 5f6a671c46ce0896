//! Core trait abstractions for the curation library.
//!
//! These traits define the seams the surrounding application implements:
//! the review classifier and the persistence layer.

pub mod classifier;
pub mod store;

pub use classifier::Classifier;
pub use store::{ConditionalWrite, CurationStore, FlagStore, PostStore, ReviewUpdate};
