//! Message types.
//!
//! Messages are ordered by `created_at` within a conversation; insertion
//! order breaks ties since timestamps are assigned at append time. A
//! message holds a back-reference to its conversation, never the reverse.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::id::{ConversationId, MessageId};

/// Author role of a message. Exactly two values exist in this domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// A single message within a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub conversation_id: ConversationId,
    pub content: String,
    pub role: MessageRole,
    /// References to attached files, if any.
    pub attachments: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
}

/// Payload for appending a message. Id and timestamp are assigned by the
/// store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMessage {
    pub conversation_id: ConversationId,
    pub content: String,
    pub role: MessageRole,
    #[serde(default)]
    pub attachments: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip() {
        for role in [MessageRole::User, MessageRole::Assistant] {
            let parsed: MessageRole = role.to_string().parse().unwrap();
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn test_role_serde() {
        assert_eq!(
            serde_json::to_string(&MessageRole::Assistant).unwrap(),
            "\"assistant\""
        );
        let parsed: MessageRole = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(parsed, MessageRole::User);
    }

    #[test]
    fn test_role_rejects_system() {
        // No system messages in this domain.
        assert!(serde_json::from_str::<MessageRole>("\"system\"").is_err());
        assert!("system".parse::<MessageRole>().is_err());
    }

    #[test]
    fn test_message_serialize() {
        let msg = Message {
            id: MessageId(3),
            conversation_id: ConversationId(1),
            content: "Hello".to_string(),
            role: MessageRole::User,
            attachments: None,
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"role\":\"user\""));
        assert!(json.contains("\"conversation_id\":1"));
    }
}
