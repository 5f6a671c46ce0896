//! Domain types for the curation library.

pub mod flag;
pub mod id;
pub mod message;
pub mod post;
pub mod verdict;

pub use flag::{Flag, FlagReason, ReporterIdentity};
pub use id::{Id, MemberId, PostId};
pub use message::{Message, Role};
pub use post::{Category, ContentWarning, Post, PostStatus};
pub use verdict::{PiiKind, PiiReplacement, Verdict, VerdictDecision};
