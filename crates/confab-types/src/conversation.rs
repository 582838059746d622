//! Conversation types.
//!
//! A conversation belongs to a single user and carries two timestamps:
//! `created_at` is set once, `updated_at` is refreshed on every mutation
//! and on every message append. Invariant: `updated_at >= created_at`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{ConversationId, UserId};

/// A conversation between a user and the assistant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,
    pub user_id: UserId,
    pub title: String,
    /// Pinned conversations always sort ahead of unpinned ones in listings.
    pub pinned: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a conversation. Id and timestamps are assigned by
/// the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewConversation {
    pub user_id: UserId,
    pub title: String,
    #[serde(default)]
    pub pinned: bool,
}

/// Partial update for a conversation.
///
/// Timestamps are not patchable: the store refreshes `updated_at` on every
/// update, so a caller-supplied value could never win anyway. Unknown
/// fields are rejected at the boundary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConversationPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinned: Option<bool>,
}

impl ConversationPatch {
    /// A patch with no fields. Applying it still refreshes `updated_at`,
    /// which is how message appends touch their owning conversation.
    pub fn empty() -> Self {
        Self::default()
    }
}

impl Conversation {
    /// Apply a patch, replacing only the supplied fields.
    ///
    /// `updated_at` is stamped unconditionally, even for an empty patch.
    pub fn apply_patch(&mut self, patch: ConversationPatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(pinned) = patch.pinned {
            self.pinned = pinned;
        }
        self.updated_at = now;
    }
}
