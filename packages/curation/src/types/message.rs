//! Canonical conversation messages.
//!
//! A [`Message`] is the only conversation representation the rest of the
//! pipeline operates on. Raw uploads in whatever shape they arrive are
//! reduced to an ordered `Vec<Message>` by the parser, and that order is
//! meaningful (conversation order) end-to-end.

use serde::{Deserialize, Serialize};

/// Speaker role for a canonical message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Normalize a raw role label onto a canonical role.
    ///
    /// Case-insensitive; shared by every parsing path. `user` and `human`
    /// map to [`Role::User`]; `assistant`, `system`, and `ai` map to
    /// [`Role::Assistant`]. Anything else is unrecognized and yields `None`.
    pub fn normalize(raw: &str) -> Option<Role> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "user" | "human" => Some(Role::User),
            "assistant" | "system" | "ai" => Some(Role::Assistant),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single speaker turn in an archived conversation.
///
/// Immutable once produced by the parser.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    /// Create a message with the given role and content.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Shorthand for a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Shorthand for an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_user_aliases() {
        assert_eq!(Role::normalize("user"), Some(Role::User));
        assert_eq!(Role::normalize("Human"), Some(Role::User));
        assert_eq!(Role::normalize("  USER  "), Some(Role::User));
    }

    #[test]
    fn test_normalize_assistant_aliases() {
        assert_eq!(Role::normalize("assistant"), Some(Role::Assistant));
        assert_eq!(Role::normalize("System"), Some(Role::Assistant));
        assert_eq!(Role::normalize("AI"), Some(Role::Assistant));
    }

    #[test]
    fn test_normalize_rejects_unknown_labels() {
        assert_eq!(Role::normalize("tool"), None);
        assert_eq!(Role::normalize("moderator"), None);
        assert_eq!(Role::normalize(""), None);
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&Message::user("hi")).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"hi"}"#);
    }
}
