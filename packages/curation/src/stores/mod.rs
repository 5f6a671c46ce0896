//! Storage implementations for the curation library.
//!
//! Available backends:
//! - `MemoryStore` - In-memory storage (always available)
//!
//! Production deployments implement [`crate::traits::PostStore`] and
//! [`crate::traits::FlagStore`] over their own database and get the same
//! pipeline behavior.

pub mod memory;

pub use memory::MemoryStore;
