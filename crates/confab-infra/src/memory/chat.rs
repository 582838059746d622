//! In-memory chat repository implementation.
//!
//! Implements `ChatRepository` from `confab-core` over four entity tables
//! guarded by a single `tokio::sync::RwLock`. Every operation takes the
//! lock once and runs to completion, so a cascade delete is never
//! observable half-done and no finer locking discipline is needed.
//!
//! Ordering policies live here, the way a SQL backend would express them
//! as ORDER BY clauses: pinned-then-recency for conversation listings,
//! ascending timeline for messages, ascending day for usage records.

use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;

use confab_core::chat::repository::ChatRepository;
use confab_types::conversation::{Conversation, ConversationPatch, NewConversation};
use confab_types::error::RepositoryError;
use confab_types::id::{ConversationId, MessageId, UsageRecordId, UserId};
use confab_types::message::{Message, MessageRole, NewMessage};
use confab_types::usage::{NewUsageRecord, UsageRange, UsageRecord};
use confab_types::user::{AiPreferences, NewUser, User, UserPatch};

use super::table::Table;

/// All entity tables behind one lock.
struct MemStoreState {
    users: Table<User>,
    conversations: Table<Conversation>,
    messages: Table<Message>,
    usage: Table<UsageRecord>,
}

impl MemStoreState {
    fn new() -> Self {
        Self {
            users: Table::new(),
            conversations: Table::new(),
            messages: Table::new(),
            usage: Table::new(),
        }
    }

    /// Shared patch path for conversations: merge fields, refresh
    /// `updated_at`. Message appends reuse this with an empty patch.
    fn patch_conversation(
        &mut self,
        id: ConversationId,
        patch: ConversationPatch,
    ) -> Option<Conversation> {
        let conversation = self.conversations.get_mut(id.0)?;
        conversation.apply_patch(patch, Utc::now());
        Some(conversation.clone())
    }
}

/// In-memory implementation of `ChatRepository`.
///
/// Constructed once at process start and handed around by `Arc`; there is
/// no ambient global instance.
pub struct MemChatRepository {
    inner: RwLock<MemStoreState>,
}

impl MemChatRepository {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemStoreState::new()),
        }
    }

    /// Record usage for an explicit day instead of today.
    ///
    /// Seeding needs back-dated records; that is a property of this
    /// concrete store, not of the repository contract, so the method lives
    /// here rather than on the trait.
    pub async fn record_usage_on(
        &self,
        user_id: UserId,
        day: NaiveDate,
        tokens_used: u32,
    ) -> UsageRecord {
        let mut state = self.inner.write().await;
        state.usage.insert(|id| UsageRecord {
            id: UsageRecordId(id),
            user_id,
            day,
            tokens_used,
        })
    }
}

impl Default for MemChatRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatRepository for MemChatRepository {
    async fn create_user(&self, new: NewUser) -> Result<User, RepositoryError> {
        let mut state = self.inner.write().await;
        Ok(state.users.insert(|id| User {
            id: UserId(id),
            username: new.username.clone(),
            password: new.password.clone(),
            email: new.email.clone(),
            profile_photo: new.profile_photo.clone(),
            role: new.role.clone(),
            ai_preferences: AiPreferences::default(),
        }))
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let state = self.inner.read().await;
        Ok(state.users.get(id.0).cloned())
    }

    async fn find_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, RepositoryError> {
        let state = self.inner.read().await;
        Ok(state
            .users
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn update_user(
        &self,
        id: UserId,
        patch: UserPatch,
    ) -> Result<Option<User>, RepositoryError> {
        let mut state = self.inner.write().await;
        let Some(user) = state.users.get_mut(id.0) else {
            return Ok(None);
        };
        user.apply_patch(patch);
        Ok(Some(user.clone()))
    }

    async fn list_conversations(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Conversation>, RepositoryError> {
        let state = self.inner.read().await;
        let mut conversations: Vec<Conversation> = state
            .conversations
            .values()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        // Pinned group first, then recency within each group; the sort is
        // stable, so equal timestamps keep insertion order.
        conversations.sort_by(|a, b| {
            b.pinned
                .cmp(&a.pinned)
                .then_with(|| b.updated_at.cmp(&a.updated_at))
        });
        Ok(conversations)
    }

    async fn get_conversation(
        &self,
        id: ConversationId,
    ) -> Result<Option<Conversation>, RepositoryError> {
        let state = self.inner.read().await;
        Ok(state.conversations.get(id.0).cloned())
    }

    async fn create_conversation(
        &self,
        new: NewConversation,
    ) -> Result<Conversation, RepositoryError> {
        let mut state = self.inner.write().await;
        let now = Utc::now();
        Ok(state.conversations.insert(|id| Conversation {
            id: ConversationId(id),
            user_id: new.user_id,
            title: new.title.clone(),
            pinned: new.pinned,
            created_at: now,
            updated_at: now,
        }))
    }

    async fn update_conversation(
        &self,
        id: ConversationId,
        patch: ConversationPatch,
    ) -> Result<Option<Conversation>, RepositoryError> {
        let mut state = self.inner.write().await;
        Ok(state.patch_conversation(id, patch))
    }

    async fn delete_conversation(&self, id: ConversationId) -> Result<bool, RepositoryError> {
        let mut state = self.inner.write().await;
        if state.conversations.get(id.0).is_none() {
            return Ok(false);
        }
        // Cascade: drop the back-references first, then the conversation.
        state.messages.remove_where(|m| m.conversation_id == id);
        Ok(state.conversations.remove(id.0))
    }

    async fn list_messages(
        &self,
        conversation_id: ConversationId,
    ) -> Result<Vec<Message>, RepositoryError> {
        let state = self.inner.read().await;
        let mut messages: Vec<Message> = state
            .messages
            .values()
            .filter(|m| m.conversation_id == conversation_id)
            .cloned()
            .collect();
        messages.sort_by_key(|m| m.created_at);
        Ok(messages)
    }

    async fn create_message(&self, new: NewMessage) -> Result<Message, RepositoryError> {
        let mut state = self.inner.write().await;
        let message = state.messages.insert(|id| Message {
            id: MessageId(id),
            conversation_id: new.conversation_id,
            content: new.content.clone(),
            role: new.role,
            attachments: new.attachments.clone(),
            created_at: Utc::now(),
        });
        // Touch the owning conversation: an empty patch whose only purpose
        // is the updated_at refresh.
        state.patch_conversation(new.conversation_id, ConversationPatch::empty());
        Ok(message)
    }

    async fn count_messages(
        &self,
        conversation_id: ConversationId,
        role: Option<MessageRole>,
    ) -> Result<u64, RepositoryError> {
        let state = self.inner.read().await;
        let count = state
            .messages
            .values()
            .filter(|m| m.conversation_id == conversation_id)
            .filter(|m| role.is_none_or(|r| m.role == r))
            .count();
        Ok(count as u64)
    }

    async fn record_usage(&self, new: NewUsageRecord) -> Result<UsageRecord, RepositoryError> {
        let day = Utc::now().date_naive();
        Ok(self.record_usage_on(new.user_id, day, new.tokens_used).await)
    }

    async fn list_usage(
        &self,
        user_id: UserId,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<UsageRecord>, RepositoryError> {
        let range = UsageRange {
            start_date: start,
            end_date: end,
        };
        let state = self.inner.read().await;
        let mut records: Vec<UsageRecord> = state
            .usage
            .values()
            .filter(|u| u.user_id == user_id && range.contains(u.day))
            .cloned()
            .collect();
        records.sort_by_key(|u| u.day);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            password: "password".to_string(),
            email: None,
            profile_photo: None,
            role: None,
        }
    }

    fn new_conversation(user_id: UserId, title: &str, pinned: bool) -> NewConversation {
        NewConversation {
            user_id,
            title: title.to_string(),
            pinned,
        }
    }

    fn new_message(conversation_id: ConversationId, content: &str, role: MessageRole) -> NewMessage {
        NewMessage {
            conversation_id,
            content: content.to_string(),
            role,
            attachments: None,
        }
    }

    #[tokio::test]
    async fn test_user_ids_start_at_one() {
        let repo = MemChatRepository::new();
        let first = repo.create_user(new_user("alpha")).await.unwrap();
        let second = repo.create_user(new_user("beta")).await.unwrap();
        assert_eq!(first.id, UserId(1));
        assert_eq!(second.id, UserId(2));
    }

    #[tokio::test]
    async fn test_sequences_are_independent_per_kind() {
        let repo = MemChatRepository::new();
        let user = repo.create_user(new_user("solo")).await.unwrap();
        let conv = repo
            .create_conversation(new_conversation(user.id, "First", false))
            .await
            .unwrap();
        let msg = repo
            .create_message(new_message(conv.id, "hi", MessageRole::User))
            .await
            .unwrap();
        // Each kind starts its own sequence at 1.
        assert_eq!(user.id, UserId(1));
        assert_eq!(conv.id, ConversationId(1));
        assert_eq!(msg.id, MessageId(1));
    }

    #[tokio::test]
    async fn test_conversation_ids_not_reused_after_delete() {
        let repo = MemChatRepository::new();
        let user = repo.create_user(new_user("u")).await.unwrap();
        let first = repo
            .create_conversation(new_conversation(user.id, "a", false))
            .await
            .unwrap();
        assert!(repo.delete_conversation(first.id).await.unwrap());
        let second = repo
            .create_conversation(new_conversation(user.id, "b", false))
            .await
            .unwrap();
        assert_eq!(second.id, ConversationId(2));
    }

    #[tokio::test]
    async fn test_find_user_by_username() {
        let repo = MemChatRepository::new();
        repo.create_user(new_user("findme")).await.unwrap();
        let found = repo.find_user_by_username("findme").await.unwrap();
        assert!(found.is_some());
        assert!(repo.find_user_by_username("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_user_merges_fields() {
        let repo = MemChatRepository::new();
        let user = repo.create_user(new_user("patchable")).await.unwrap();
        let updated = repo
            .update_user(
                user.id,
                UserPatch {
                    email: Some("new@example.com".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.email.as_deref(), Some("new@example.com"));
        assert_eq!(updated.username, "patchable");
    }

    #[tokio::test]
    async fn test_update_missing_user_reports_absence() {
        let repo = MemChatRepository::new();
        let result = repo
            .update_user(UserId(404), UserPatch::default())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_create_conversation_stamps_both_timestamps() {
        let repo = MemChatRepository::new();
        let user = repo.create_user(new_user("u")).await.unwrap();
        let conv = repo
            .create_conversation(new_conversation(user.id, "stamps", false))
            .await
            .unwrap();
        assert_eq!(conv.created_at, conv.updated_at);
    }

    #[tokio::test]
    async fn test_empty_patch_still_refreshes_updated_at() {
        let repo = MemChatRepository::new();
        let user = repo.create_user(new_user("u")).await.unwrap();
        let conv = repo
            .create_conversation(new_conversation(user.id, "touch", false))
            .await
            .unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let touched = repo
            .update_conversation(conv.id, ConversationPatch::empty())
            .await
            .unwrap()
            .unwrap();
        assert!(touched.updated_at > conv.updated_at);
        assert_eq!(touched.title, "touch");
        assert!(touched.updated_at >= touched.created_at);
    }

    #[tokio::test]
    async fn test_listing_orders_pinned_then_recency() {
        let repo = MemChatRepository::new();
        let user = repo.create_user(new_user("u")).await.unwrap();

        let oldest = repo
            .create_conversation(new_conversation(user.id, "oldest", false))
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let pinned = repo
            .create_conversation(new_conversation(user.id, "pinned", true))
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let newest = repo
            .create_conversation(new_conversation(user.id, "newest", false))
            .await
            .unwrap();

        let listed = repo.list_conversations(user.id).await.unwrap();
        let ids: Vec<ConversationId> = listed.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![pinned.id, newest.id, oldest.id]);
    }

    #[tokio::test]
    async fn test_listing_is_scoped_to_user() {
        let repo = MemChatRepository::new();
        let a = repo.create_user(new_user("a")).await.unwrap();
        let b = repo.create_user(new_user("b")).await.unwrap();
        repo.create_conversation(new_conversation(a.id, "mine", false))
            .await
            .unwrap();
        repo.create_conversation(new_conversation(b.id, "theirs", false))
            .await
            .unwrap();

        let listed = repo.list_conversations(a.id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "mine");
    }

    #[tokio::test]
    async fn test_touching_an_unpinned_conversation_reorders_within_group() {
        let repo = MemChatRepository::new();
        let user = repo.create_user(new_user("u")).await.unwrap();
        let first = repo
            .create_conversation(new_conversation(user.id, "first", false))
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = repo
            .create_conversation(new_conversation(user.id, "second", false))
            .await
            .unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        repo.update_conversation(first.id, ConversationPatch::empty())
            .await
            .unwrap();

        let ids: Vec<ConversationId> = repo
            .list_conversations(user.id)
            .await
            .unwrap()
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[tokio::test]
    async fn test_message_append_touches_conversation() {
        let repo = MemChatRepository::new();
        let user = repo.create_user(new_user("u")).await.unwrap();
        let conv = repo
            .create_conversation(new_conversation(user.id, "t", false))
            .await
            .unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        repo.create_message(new_message(conv.id, "ping", MessageRole::User))
            .await
            .unwrap();

        let after = repo.get_conversation(conv.id).await.unwrap().unwrap();
        assert!(after.updated_at > conv.updated_at);
    }

    #[tokio::test]
    async fn test_messages_listed_in_timeline_order() {
        let repo = MemChatRepository::new();
        let user = repo.create_user(new_user("u")).await.unwrap();
        let conv = repo
            .create_conversation(new_conversation(user.id, "t", false))
            .await
            .unwrap();

        for content in ["one", "two", "three"] {
            repo.create_message(new_message(conv.id, content, MessageRole::User))
                .await
                .unwrap();
        }

        let listed = repo.list_messages(conv.id).await.unwrap();
        let contents: Vec<&str> = listed.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["one", "two", "three"]);
        // Timestamps never decrease along the timeline.
        for pair in listed.windows(2) {
            assert!(pair[0].created_at <= pair[1].created_at);
        }
    }

    #[tokio::test]
    async fn test_count_messages_by_role() {
        let repo = MemChatRepository::new();
        let user = repo.create_user(new_user("u")).await.unwrap();
        let conv = repo
            .create_conversation(new_conversation(user.id, "t", false))
            .await
            .unwrap();

        repo.create_message(new_message(conv.id, "q", MessageRole::User))
            .await
            .unwrap();
        repo.create_message(new_message(conv.id, "a", MessageRole::Assistant))
            .await
            .unwrap();
        repo.create_message(new_message(conv.id, "q2", MessageRole::User))
            .await
            .unwrap();

        assert_eq!(repo.count_messages(conv.id, None).await.unwrap(), 3);
        assert_eq!(
            repo.count_messages(conv.id, Some(MessageRole::User))
                .await
                .unwrap(),
            2
        );
        assert_eq!(
            repo.count_messages(conv.id, Some(MessageRole::Assistant))
                .await
                .unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn test_cascade_delete_removes_messages() {
        let repo = MemChatRepository::new();
        let user = repo.create_user(new_user("u")).await.unwrap();
        let doomed = repo
            .create_conversation(new_conversation(user.id, "doomed", false))
            .await
            .unwrap();
        let kept = repo
            .create_conversation(new_conversation(user.id, "kept", false))
            .await
            .unwrap();

        for _ in 0..3 {
            repo.create_message(new_message(doomed.id, "x", MessageRole::User))
                .await
                .unwrap();
        }
        repo.create_message(new_message(kept.id, "stays", MessageRole::User))
            .await
            .unwrap();

        assert!(repo.delete_conversation(doomed.id).await.unwrap());
        assert!(repo.get_conversation(doomed.id).await.unwrap().is_none());
        assert!(repo.list_messages(doomed.id).await.unwrap().is_empty());
        // Unrelated conversation untouched.
        assert_eq!(repo.list_messages(kept.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_missing_conversation_returns_false() {
        let repo = MemChatRepository::new();
        assert!(!repo.delete_conversation(ConversationId(7)).await.unwrap());
    }

    #[tokio::test]
    async fn test_usage_range_bounds_are_inclusive() {
        let repo = MemChatRepository::new();
        let user = repo.create_user(new_user("u")).await.unwrap();
        let base: NaiveDate = "2026-08-01".parse().unwrap();

        for offset in 0..5u64 {
            repo.record_usage_on(user.id, base + Days::new(offset), 100)
                .await;
        }

        let start: NaiveDate = "2026-08-02".parse().unwrap();
        let end: NaiveDate = "2026-08-04".parse().unwrap();
        let records = repo
            .list_usage(user.id, Some(start), Some(end))
            .await
            .unwrap();
        let days: Vec<NaiveDate> = records.iter().map(|r| r.day).collect();
        assert_eq!(
            days,
            vec![
                "2026-08-02".parse().unwrap(),
                "2026-08-03".parse().unwrap(),
                "2026-08-04".parse().unwrap(),
            ]
        );
    }

    #[tokio::test]
    async fn test_usage_sorted_ascending_even_when_recorded_out_of_order() {
        let repo = MemChatRepository::new();
        let user = repo.create_user(new_user("u")).await.unwrap();
        let base: NaiveDate = "2026-08-01".parse().unwrap();

        for offset in [4u64, 0, 2, 3, 1] {
            repo.record_usage_on(user.id, base + Days::new(offset), 100)
                .await;
        }

        let records = repo.list_usage(user.id, None, None).await.unwrap();
        for pair in records.windows(2) {
            assert!(pair[0].day <= pair[1].day);
        }
        assert_eq!(records.len(), 5);
    }

    #[tokio::test]
    async fn test_record_usage_stamps_today() {
        let repo = MemChatRepository::new();
        let user = repo.create_user(new_user("u")).await.unwrap();
        let record = repo
            .record_usage(NewUsageRecord {
                user_id: user.id,
                tokens_used: 1234,
            })
            .await
            .unwrap();
        assert_eq!(record.day, Utc::now().date_naive());
        assert_eq!(record.tokens_used, 1234);
    }
}
