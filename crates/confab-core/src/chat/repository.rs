//! ChatRepository trait definition.
//!
//! The storage contract for users, conversations, messages, and usage
//! records. The store assigns identifiers (an independent monotonically
//! increasing sequence per entity kind, starting at 1, never reused) and
//! timestamps; it performs no validation beyond reporting absence.
//!
//! Implementations live in confab-infra (e.g., `MemChatRepository`).
//! Uses native async fn in traits (RPITIT, Rust 2024 edition).

use chrono::NaiveDate;

use confab_types::conversation::{Conversation, ConversationPatch, NewConversation};
use confab_types::error::RepositoryError;
use confab_types::id::{ConversationId, UserId};
use confab_types::message::{Message, MessageRole, NewMessage};
use confab_types::usage::{NewUsageRecord, UsageRecord};
use confab_types::user::{NewUser, User, UserPatch};

/// Repository trait for chat-session persistence.
pub trait ChatRepository: Send + Sync {
    // --- Users ---

    /// Create a user with default AI preferences.
    fn create_user(
        &self,
        new: NewUser,
    ) -> impl std::future::Future<Output = Result<User, RepositoryError>> + Send;

    /// Get a user by id.
    fn get_user(
        &self,
        id: UserId,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// Look up a user by their unique username.
    fn find_user_by_username(
        &self,
        username: &str,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// Merge a patch into an existing user, returning the new value.
    fn update_user(
        &self,
        id: UserId,
        patch: UserPatch,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    // --- Conversations ---

    /// List a user's conversations: pinned first, then unpinned, each group
    /// ordered by `updated_at` descending with stable insertion-order
    /// tie-breaks.
    fn list_conversations(
        &self,
        user_id: UserId,
    ) -> impl std::future::Future<Output = Result<Vec<Conversation>, RepositoryError>> + Send;

    /// Get a conversation by id.
    fn get_conversation(
        &self,
        id: ConversationId,
    ) -> impl std::future::Future<Output = Result<Option<Conversation>, RepositoryError>> + Send;

    /// Create a conversation, stamping `created_at` = `updated_at` = now.
    fn create_conversation(
        &self,
        new: NewConversation,
    ) -> impl std::future::Future<Output = Result<Conversation, RepositoryError>> + Send;

    /// Apply a patch to a conversation. `updated_at` is refreshed
    /// unconditionally, even when the patch is empty.
    fn update_conversation(
        &self,
        id: ConversationId,
        patch: ConversationPatch,
    ) -> impl std::future::Future<Output = Result<Option<Conversation>, RepositoryError>> + Send;

    /// Delete a conversation and every message that references it.
    ///
    /// Returns whether the conversation existed; in the `false` case no
    /// partial deletion is visible to the caller.
    fn delete_conversation(
        &self,
        id: ConversationId,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    // --- Messages ---

    /// List a conversation's messages ascending by `created_at`, with
    /// insertion order as the tie-break.
    fn list_messages(
        &self,
        conversation_id: ConversationId,
    ) -> impl std::future::Future<Output = Result<Vec<Message>, RepositoryError>> + Send;

    /// Append a message, stamping `created_at` = now, then touch the owning
    /// conversation's `updated_at` (an empty-patch update).
    fn create_message(
        &self,
        new: NewMessage,
    ) -> impl std::future::Future<Output = Result<Message, RepositoryError>> + Send;

    /// Count messages in a conversation, optionally restricted to one role.
    fn count_messages(
        &self,
        conversation_id: ConversationId,
        role: Option<MessageRole>,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;

    // --- Usage ledger ---

    /// Record token usage, stamped with the current day.
    fn record_usage(
        &self,
        new: NewUsageRecord,
    ) -> impl std::future::Future<Output = Result<UsageRecord, RepositoryError>> + Send;

    /// List a user's usage records within an inclusive day range (either
    /// bound may be open), ascending by day.
    fn list_usage(
        &self,
        user_id: UserId,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> impl std::future::Future<Output = Result<Vec<UsageRecord>, RepositoryError>> + Send;
}
