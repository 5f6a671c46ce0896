//! Chat format parser: raw uploads to canonical messages.
//!
//! Uploads arrive in whatever shape the submitter had at hand: a structured
//! JSON export, a copy-pasted `User: ... / Assistant: ...` transcript, or
//! plain prose. The format is detected, never declared. Detection is
//! ordered and the first match wins:
//!
//! 1. Empty input fails immediately.
//! 2. Input starting with `{` or `[` is treated as JSON and must parse as
//!    either a flat message array or a mapping-tree export. JSON-shaped
//!    input never falls through to the text paths; a malformed export
//!    surfaces as an error instead of being archived as one giant freeform
//!    message.
//! 3. Line-oriented transcripts are split on recognized role markers.
//! 4. Anything left is a single freeform user message.

use std::collections::{HashMap, HashSet};

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{ParseError, ParseResult};
use crate::types::{Message, Role};

/// Transcript markers that open a user turn, lowercase.
const USER_MARKERS: &[&str] = &["user:", "you:", "human:", "me:"];

/// Transcript markers that open an assistant turn, lowercase.
const ASSISTANT_MARKERS: &[&str] = &["assistant:", "chatgpt:", "gpt:", "ai:", "bot:"];

/// Parse a raw upload into an ordered, non-empty message sequence.
///
/// Every failure is terminal and submitter-actionable; see [`ParseError`].
pub fn parse_conversation(raw: &str) -> ParseResult<Vec<Message>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ParseError::EmptyInput);
    }

    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return parse_structured(trimmed);
    }

    if let Some(messages) = parse_transcript(trimmed)? {
        return Ok(messages);
    }

    debug!("no role markers recognized, archiving upload as freeform text");
    Ok(vec![Message::user(trimmed)])
}

// ============================================================================
// Structured exports (JSON)
// ============================================================================

fn parse_structured(text: &str) -> ParseResult<Vec<Message>> {
    let value: Value = serde_json::from_str(text).map_err(|e| ParseError::UnparseableFormat {
        detail: e.to_string(),
    })?;

    if let Value::Array(items) = &value {
        return parse_message_array(items);
    }
    if let Some(Value::Object(mapping)) = value.get("mapping") {
        return parse_mapping_tree(mapping);
    }

    Err(ParseError::UnparseableFormat {
        detail: "expected a message array or an export with a mapping object".to_string(),
    })
}

/// Parse a flat `[{role, content}, ...]` message array.
fn parse_message_array(items: &[Value]) -> ParseResult<Vec<Message>> {
    let mut messages = Vec::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        let role_value = item.get("role");
        let role = role_value
            .and_then(Value::as_str)
            .and_then(Role::normalize)
            .ok_or_else(|| ParseError::InvalidRole {
                role: describe_role(role_value),
            })?;

        let content = item
            .get("content")
            .and_then(Value::as_str)
            .ok_or(ParseError::MissingContent { index })?;

        let content = content.trim();
        if content.is_empty() {
            // Empty turns are dropped, not an error.
            continue;
        }
        messages.push(Message::new(role, content));
    }

    if messages.is_empty() {
        return Err(ParseError::NoValidMessages);
    }
    Ok(messages)
}

/// Render the offending role for an error message.
fn describe_role(value: Option<&Value>) -> String {
    match value {
        None => "(missing)".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// One node of a mapping-tree export.
///
/// Real exports carry far more fields; everything beyond the message and
/// the child links is irrelevant here and ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ExportNode {
    message: Option<ExportMessage>,
    children: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ExportMessage {
    author: Option<ExportAuthor>,
    content: Option<ExportContent>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ExportAuthor {
    role: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ExportContent {
    parts: Vec<Value>,
}

/// Parse a tree-structured export: a flat map of id to node, with `children`
/// id arrays forming the conversation order.
///
/// The map is the arena and node identity is the key, so the walk stays safe
/// on malformed exports: a visited set emits shared children once and
/// terminates cycles, and a final sweep picks up nodes no root can reach.
/// Every node is visited exactly once, in first-visit order.
fn parse_mapping_tree(mapping: &serde_json::Map<String, Value>) -> ParseResult<Vec<Message>> {
    // Nodes that fail to deserialize decay to empty nodes: skipped, never
    // an error on this path.
    let nodes: Vec<(String, ExportNode)> = mapping
        .iter()
        .map(|(id, value)| {
            let node = serde_json::from_value(value.clone()).unwrap_or_default();
            (id.clone(), node)
        })
        .collect();

    let by_id: HashMap<&str, &ExportNode> = nodes
        .iter()
        .map(|(id, node)| (id.as_str(), node))
        .collect();

    let referenced: HashSet<&str> = nodes
        .iter()
        .flat_map(|(_, node)| node.children.iter().map(String::as_str))
        .collect();

    let mut visited: HashSet<&str> = HashSet::with_capacity(nodes.len());
    let mut messages = Vec::new();

    // Depth-first from every root (ids never referenced as a child), in map
    // order.
    for (id, _) in &nodes {
        if !referenced.contains(id.as_str()) {
            walk(id, &by_id, &mut visited, &mut messages);
        }
    }

    // Cycles have no root; sweep whatever the root walk could not reach.
    for (id, _) in &nodes {
        if !visited.contains(id.as_str()) {
            walk(id, &by_id, &mut visited, &mut messages);
        }
    }

    if messages.is_empty() {
        return Err(ParseError::NoValidMessages);
    }
    Ok(messages)
}

/// Iterative depth-first walk from one start id.
fn walk<'a>(
    start: &'a str,
    by_id: &HashMap<&'a str, &'a ExportNode>,
    visited: &mut HashSet<&'a str>,
    messages: &mut Vec<Message>,
) {
    let mut stack = vec![start];
    while let Some(id) = stack.pop() {
        if !visited.insert(id) {
            continue;
        }
        let Some(&node) = by_id.get(id) else {
            // Dangling child reference.
            continue;
        };
        if let Some(message) = node_message(node) {
            messages.push(message);
        }
        // Reversed so the first child is visited first.
        for child in node.children.iter().rev() {
            if !visited.contains(child.as_str()) {
                stack.push(child);
            }
        }
    }
}

/// Extract the canonical message a node carries, if any.
///
/// Nodes without a message, with an unrecognized role (e.g. `tool`), or
/// with empty joined content are skipped.
fn node_message(node: &ExportNode) -> Option<Message> {
    let message = node.message.as_ref()?;
    let role = message
        .author
        .as_ref()
        .and_then(|author| author.role.as_deref())
        .and_then(Role::normalize)?;

    let parts = &message.content.as_ref()?.parts;
    let fragments: Vec<&str> = parts.iter().filter_map(Value::as_str).collect();
    let joined = fragments.join("\n");
    let content = joined.trim();
    if content.is_empty() {
        return None;
    }
    Some(Message::new(role, content))
}

// ============================================================================
// Line-oriented transcripts
// ============================================================================

/// Split line-oriented transcript text on role markers.
///
/// Returns `None` when no line carries a recognized marker; that is the only
/// case where the freeform fallback is allowed.
fn parse_transcript(text: &str) -> ParseResult<Option<Vec<Message>>> {
    let mut messages: Vec<Message> = Vec::new();
    let mut current: Option<(Role, Vec<&str>)> = None;
    let mut saw_marker = false;

    for line in text.lines() {
        if let Some((role, rest)) = match_marker(line) {
            saw_marker = true;
            flush(&mut messages, current.take());
            current = Some((role, vec![rest]));
        } else if let Some((_, body)) = current.as_mut() {
            // Continuation line, kept verbatim.
            body.push(line);
        }
        // Lines before the first marker belong to nobody and are dropped.
    }
    flush(&mut messages, current.take());

    if !saw_marker {
        return Ok(None);
    }
    if messages.is_empty() {
        // A marker committed us to this path; an empty result is a failure,
        // never a freeform fallback.
        return Err(ParseError::NoValidMessages);
    }
    Ok(Some(messages))
}

/// Append the accumulated turn if its trimmed content is non-empty.
fn flush(messages: &mut Vec<Message>, current: Option<(Role, Vec<&str>)>) {
    if let Some((role, body)) = current {
        let joined = body.join("\n");
        let content = joined.trim();
        if !content.is_empty() {
            messages.push(Message::new(role, content));
        }
    }
}

/// Match a recognized role marker at the start of a line.
///
/// Markers are prefix-matched case-insensitively with leading whitespace
/// ignored, so content may follow the colon on the same line.
fn match_marker(line: &str) -> Option<(Role, &str)> {
    let text = line.trim_start();
    for (markers, role) in [
        (USER_MARKERS, Role::User),
        (ASSISTANT_MARKERS, Role::Assistant),
    ] {
        for marker in markers {
            if text.len() >= marker.len()
                && text.as_bytes()[..marker.len()].eq_ignore_ascii_case(marker.as_bytes())
            {
                // The matched prefix is pure ASCII, so the byte split lands
                // on a char boundary.
                return Some((role, &text[marker.len()..]));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ------------------------------------------------------------------
    // Detection ordering
    // ------------------------------------------------------------------

    #[test]
    fn test_empty_input_fails() {
        assert!(matches!(parse_conversation(""), Err(ParseError::EmptyInput)));
        assert!(matches!(
            parse_conversation("   \n\t  "),
            Err(ParseError::EmptyInput)
        ));
    }

    #[test]
    fn test_freeform_prose_becomes_single_user_message() {
        let messages = parse_conversation("random prose, no markers").unwrap();
        assert_eq!(messages, vec![Message::user("random prose, no markers")]);
    }

    #[test]
    fn test_json_shaped_input_never_falls_back_to_text() {
        // Broken JSON that still "contains" marker-ish text must fail as a
        // format error, not come back as a freeform message.
        let err = parse_conversation("{ \"User: hi\" ").unwrap_err();
        assert!(matches!(err, ParseError::UnparseableFormat { .. }));
    }

    #[test]
    fn test_leading_whitespace_before_json_is_ignored() {
        let messages =
            parse_conversation("  \n [{\"role\":\"user\",\"content\":\"hi\"}]").unwrap();
        assert_eq!(messages, vec![Message::user("hi")]);
    }

    // ------------------------------------------------------------------
    // Message arrays
    // ------------------------------------------------------------------

    #[test]
    fn test_message_array_roundtrip() {
        let raw = r#"[{"role":"user","content":"hi"}]"#;
        let messages = parse_conversation(raw).unwrap();
        assert_eq!(messages, vec![Message::user("hi")]);
    }

    #[test]
    fn test_message_array_normalizes_roles() {
        let raw = json!([
            {"role": "Human", "content": "hello"},
            {"role": "system", "content": "noted"},
            {"role": "AI", "content": "hi there"},
        ])
        .to_string();

        let messages = parse_conversation(&raw).unwrap();
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[1].role, Role::Assistant);
        assert_eq!(messages[2].role, Role::Assistant);
    }

    #[test]
    fn test_message_array_names_offending_role() {
        let raw = json!([{"role": "narrator", "content": "once upon"}]).to_string();
        let err = parse_conversation(&raw).unwrap_err();
        assert!(matches!(err, ParseError::InvalidRole { role } if role == "narrator"));
    }

    #[test]
    fn test_message_array_missing_role_is_invalid() {
        let raw = json!([{"content": "hi"}]).to_string();
        let err = parse_conversation(&raw).unwrap_err();
        assert!(matches!(err, ParseError::InvalidRole { role } if role == "(missing)"));
    }

    #[test]
    fn test_message_array_non_string_role_is_named() {
        let raw = json!([{"role": 7, "content": "hi"}]).to_string();
        let err = parse_conversation(&raw).unwrap_err();
        assert!(matches!(err, ParseError::InvalidRole { role } if role == "7"));
    }

    #[test]
    fn test_message_array_non_text_content_fails_with_index() {
        let raw = json!([
            {"role": "user", "content": "fine"},
            {"role": "user", "content": ["not", "text"]},
        ])
        .to_string();

        let err = parse_conversation(&raw).unwrap_err();
        assert!(matches!(err, ParseError::MissingContent { index: 1 }));
    }

    #[test]
    fn test_message_array_drops_empty_turns() {
        let raw = json!([
            {"role": "user", "content": "  "},
            {"role": "assistant", "content": "kept"},
        ])
        .to_string();

        let messages = parse_conversation(&raw).unwrap();
        assert_eq!(messages, vec![Message::assistant("kept")]);
    }

    #[test]
    fn test_message_array_with_only_empty_turns_fails() {
        let raw = json!([{"role": "user", "content": ""}]).to_string();
        let err = parse_conversation(&raw).unwrap_err();
        assert!(matches!(err, ParseError::NoValidMessages));
    }

    #[test]
    fn test_object_without_mapping_is_unparseable() {
        let raw = json!({"messages": [{"role": "user", "content": "hi"}]}).to_string();
        let err = parse_conversation(&raw).unwrap_err();
        assert!(matches!(err, ParseError::UnparseableFormat { .. }));
    }

    // ------------------------------------------------------------------
    // Mapping-tree exports
    // ------------------------------------------------------------------

    fn tree_node(role: Option<&str>, parts: Vec<Value>, children: Vec<&str>) -> Value {
        let mut node = json!({ "children": children });
        if let Some(role) = role {
            node["message"] = json!({
                "author": { "role": role },
                "content": { "parts": parts },
            });
        }
        node
    }

    #[test]
    fn test_mapping_tree_follows_children_not_key_order() {
        // Key order (sorted) is a-reply, z-root; conversation order must
        // come from the child links instead.
        let raw = json!({
            "mapping": {
                "z-root": tree_node(Some("user"), vec![json!("first")], vec!["a-reply"]),
                "a-reply": tree_node(Some("assistant"), vec![json!("second")], vec![]),
            }
        })
        .to_string();

        let messages = parse_conversation(&raw).unwrap();
        assert_eq!(
            messages,
            vec![Message::user("first"), Message::assistant("second")]
        );
    }

    #[test]
    fn test_mapping_tree_joins_parts_with_newline() {
        let raw = json!({
            "mapping": {
                "root": tree_node(
                    Some("assistant"),
                    vec![json!("line one"), json!("line two")],
                    vec![],
                ),
            }
        })
        .to_string();

        let messages = parse_conversation(&raw).unwrap();
        assert_eq!(messages, vec![Message::assistant("line one\nline two")]);
    }

    #[test]
    fn test_mapping_tree_skips_non_text_parts() {
        let raw = json!({
            "mapping": {
                "root": tree_node(
                    Some("user"),
                    vec![json!({"asset": "image"}), json!("caption")],
                    vec![],
                ),
            }
        })
        .to_string();

        let messages = parse_conversation(&raw).unwrap();
        assert_eq!(messages, vec![Message::user("caption")]);
    }

    #[test]
    fn test_mapping_tree_skips_messageless_and_unknown_role_nodes() {
        let raw = json!({
            "mapping": {
                "root": tree_node(None, vec![], vec!["a"]),
                "a": tree_node(Some("tool"), vec![json!("ignored")], vec!["b"]),
                "b": tree_node(Some("user"), vec![json!("kept")], vec![]),
            }
        })
        .to_string();

        let messages = parse_conversation(&raw).unwrap();
        assert_eq!(messages, vec![Message::user("kept")]);
    }

    #[test]
    fn test_mapping_tree_survives_cycles() {
        let raw = json!({
            "mapping": {
                "a": tree_node(Some("user"), vec![json!("ping")], vec!["b"]),
                "b": tree_node(Some("assistant"), vec![json!("pong")], vec!["a"]),
            }
        })
        .to_string();

        // Neither node is a root (both are referenced), so the sweep picks
        // them up; each is emitted exactly once.
        let messages = parse_conversation(&raw).unwrap();
        assert_eq!(
            messages,
            vec![Message::user("ping"), Message::assistant("pong")]
        );
    }

    #[test]
    fn test_mapping_tree_emits_shared_child_once() {
        let raw = json!({
            "mapping": {
                "a": tree_node(Some("user"), vec![json!("one")], vec!["shared"]),
                "b": tree_node(Some("user"), vec![json!("two")], vec!["shared"]),
                "shared": tree_node(Some("assistant"), vec![json!("reply")], vec![]),
            }
        })
        .to_string();

        let messages = parse_conversation(&raw).unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(
            messages
                .iter()
                .filter(|m| m.content == "reply")
                .count(),
            1
        );
    }

    #[test]
    fn test_mapping_tree_tolerates_dangling_children_and_junk_nodes() {
        let raw = json!({
            "mapping": {
                "root": tree_node(Some("user"), vec![json!("hello")], vec!["gone"]),
                "junk": "not even an object",
            }
        })
        .to_string();

        let messages = parse_conversation(&raw).unwrap();
        assert_eq!(messages, vec![Message::user("hello")]);
    }

    #[test]
    fn test_mapping_tree_with_no_usable_messages_fails() {
        let raw = json!({
            "mapping": {
                "root": tree_node(None, vec![], vec![]),
            }
        })
        .to_string();

        let err = parse_conversation(&raw).unwrap_err();
        assert!(matches!(err, ParseError::NoValidMessages));
    }

    // ------------------------------------------------------------------
    // Line-oriented transcripts
    // ------------------------------------------------------------------

    #[test]
    fn test_transcript_two_turns() {
        let messages = parse_conversation("User: hi\nAssistant: hello there").unwrap();
        assert_eq!(
            messages,
            vec![Message::user("hi"), Message::assistant("hello there")]
        );
    }

    #[test]
    fn test_transcript_markers_are_case_insensitive_and_indentable() {
        let messages = parse_conversation("  you: question\nCHATGPT: answer").unwrap();
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[0].content, "question");
        assert_eq!(messages[1].role, Role::Assistant);
        assert_eq!(messages[1].content, "answer");
    }

    #[test]
    fn test_transcript_multiline_bodies_keep_internal_newlines() {
        let raw = "User: first line\nsecond line\n\nstill user\nAssistant: ok";
        let messages = parse_conversation(raw).unwrap();
        assert_eq!(
            messages[0].content,
            "first line\nsecond line\n\nstill user"
        );
        assert_eq!(messages[1].content, "ok");
    }

    #[test]
    fn test_transcript_marker_count_matches_message_count() {
        let raw = "Me: one\nBot: two\nHuman: three\nAI: four";
        let messages = parse_conversation(raw).unwrap();
        assert_eq!(messages.len(), 4);
        assert_eq!(
            messages.iter().map(|m| m.role).collect::<Vec<_>>(),
            vec![Role::User, Role::Assistant, Role::User, Role::Assistant]
        );
    }

    #[test]
    fn test_transcript_drops_empty_turns_but_keeps_the_rest() {
        let messages = parse_conversation("User:\nAssistant: here").unwrap();
        assert_eq!(messages, vec![Message::assistant("here")]);
    }

    #[test]
    fn test_transcript_with_only_empty_turns_fails() {
        let err = parse_conversation("User:\nAssistant:   ").unwrap_err();
        assert!(matches!(err, ParseError::NoValidMessages));
    }

    #[test]
    fn test_transcript_ignores_prose_before_first_marker() {
        let messages = parse_conversation("pasted intro text\nUser: the question").unwrap();
        assert_eq!(messages, vec![Message::user("the question")]);
    }

    #[test]
    fn test_marker_must_open_the_line() {
        // A mid-line "Me:" is content, not a marker.
        let messages = parse_conversation("User: tell Me: a story").unwrap();
        assert_eq!(messages, vec![Message::user("tell Me: a story")]);
    }
}
