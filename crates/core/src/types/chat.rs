//! Chat transcript types.

use serde::{Deserialize, Serialize};

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
}

/// A supporting citation returned alongside an assistant reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingLink {
    pub title: String,
    pub uri: String,
}

impl GroundingLink {
    /// Create a new grounding link.
    #[must_use]
    pub fn new(title: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            uri: uri.into(),
        }
    }
}

/// One entry in a chat transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub grounding_links: Vec<GroundingLink>,
}

impl ChatMessage {
    /// A message typed by the visitor.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
            grounding_links: Vec::new(),
        }
    }

    /// A reply from the assistant, with optional citations.
    #[must_use]
    pub fn assistant(content: impl Into<String>, grounding_links: Vec<GroundingLink>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
            grounding_links,
        }
    }

    /// Whether the visitor wrote this message.
    #[must_use]
    pub fn is_user(&self) -> bool {
        self.role == ChatRole::User
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_role_serde() {
        let json = serde_json::to_string(&ChatRole::Assistant).expect("serialize");
        assert_eq!(json, "\"assistant\"");
    }

    #[test]
    fn test_message_without_links_omits_field() {
        let json = serde_json::to_value(ChatMessage::user("kaju katli?")).expect("serialize");
        assert_eq!(json["role"], "user");
        assert!(json.get("grounding_links").is_none());
    }
}
