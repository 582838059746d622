//! Chat service orchestrating conversation lifecycle and the message
//! timeline.
//!
//! ChatService validates input, maps absence to the boundary error kinds,
//! and coordinates the append side effects: the auto-title rule for the
//! first user message and the arming of the deferred reply scheduler.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use tracing::{info, warn};

use confab_types::conversation::{Conversation, ConversationPatch, NewConversation};
use confab_types::error::ChatError;
use confab_types::id::{ConversationId, UserId};
use confab_types::message::{Message, MessageRole, NewMessage};
use confab_types::usage::{NewUsageRecord, UsageRecord};
use confab_types::user::{User, UserPatch};

use crate::chat::repository::ChatRepository;
use crate::chat::responder::ReplyScheduler;
use crate::chat::title::derive_title;

/// Orchestrates the chat-session lifecycle over a storage backend.
///
/// Generic over `ChatRepository` to maintain clean architecture
/// (confab-core never depends on confab-infra). The repository handle is
/// shared with spawned reply tasks, hence the `Arc`.
pub struct ChatService<R: ChatRepository> {
    repo: Arc<R>,
    responder: ReplyScheduler,
}

impl<R: ChatRepository + 'static> ChatService<R> {
    /// Create a new chat service with the default reply delay.
    pub fn new(repo: Arc<R>) -> Self {
        Self {
            repo,
            responder: ReplyScheduler::default(),
        }
    }

    /// Create a chat service with a custom reply delay (tests shorten it).
    pub fn with_reply_delay(repo: Arc<R>, delay: Duration) -> Self {
        Self {
            repo,
            responder: ReplyScheduler::new(delay),
        }
    }

    /// Access the underlying repository.
    pub fn repo(&self) -> &Arc<R> {
        &self.repo
    }

    // --- Users ---

    /// Get a user by id.
    pub async fn get_user(&self, id: UserId) -> Result<User, ChatError> {
        self.repo
            .get_user(id)
            .await?
            .ok_or(ChatError::UserNotFound)
    }

    /// Apply a patch to a user. The username is not patchable.
    pub async fn update_user(&self, id: UserId, patch: UserPatch) -> Result<User, ChatError> {
        self.repo
            .update_user(id, patch)
            .await?
            .ok_or(ChatError::UserNotFound)
    }

    // --- Conversation lifecycle ---

    /// List a user's conversations, pinned first, then by recency.
    pub async fn list_conversations(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Conversation>, ChatError> {
        Ok(self.repo.list_conversations(user_id).await?)
    }

    /// Create a conversation for a user.
    pub async fn create_conversation(
        &self,
        new: NewConversation,
    ) -> Result<Conversation, ChatError> {
        if self.repo.get_user(new.user_id).await?.is_none() {
            return Err(ChatError::UserNotFound);
        }

        let conversation = self.repo.create_conversation(new).await?;
        info!(conversation_id = %conversation.id, user_id = %conversation.user_id, "conversation created");
        Ok(conversation)
    }

    /// Apply a patch to a conversation; `updated_at` always refreshes.
    pub async fn update_conversation(
        &self,
        id: ConversationId,
        patch: ConversationPatch,
    ) -> Result<Conversation, ChatError> {
        self.repo
            .update_conversation(id, patch)
            .await?
            .ok_or(ChatError::ConversationNotFound)
    }

    /// Delete a conversation and every message inside it.
    ///
    /// Outstanding deferred replies for the conversation are cancelled
    /// first, so no assistant message can materialize against the dead id.
    pub async fn delete_conversation(&self, id: ConversationId) -> Result<(), ChatError> {
        self.responder.cancel(id);

        if self.repo.delete_conversation(id).await? {
            info!(conversation_id = %id, "conversation deleted");
            Ok(())
        } else {
            Err(ChatError::ConversationNotFound)
        }
    }

    // --- Message timeline ---

    /// List a conversation's messages in timeline order.
    pub async fn list_messages(
        &self,
        conversation_id: ConversationId,
    ) -> Result<Vec<Message>, ChatError> {
        Ok(self.repo.list_messages(conversation_id).await?)
    }

    /// Append a message to a conversation.
    ///
    /// Storing the message touches the owning conversation's `updated_at`.
    /// A user-role message additionally runs the first-message title hook
    /// and arms the deferred reply; the call returns as soon as the user
    /// message is stored, never waiting for the reply.
    pub async fn create_message(&self, new: NewMessage) -> Result<Message, ChatError> {
        if new.content.is_empty() {
            return Err(ChatError::InvalidInput(
                "message content must not be empty".to_string(),
            ));
        }
        if self
            .repo
            .get_conversation(new.conversation_id)
            .await?
            .is_none()
        {
            return Err(ChatError::ConversationNotFound);
        }

        let message = self.repo.create_message(new).await?;

        if message.role == MessageRole::User {
            self.first_user_message_hook(&message).await?;
            self.responder.arm(
                message.conversation_id,
                message.content.clone(),
                Arc::clone(&self.repo),
            );
        }

        Ok(message)
    }

    /// Post-append hook: the first user message ever sent in a conversation
    /// names it. Runs synchronously before the append call returns.
    async fn first_user_message_hook(&self, message: &Message) -> Result<(), ChatError> {
        let user_messages = self
            .repo
            .count_messages(message.conversation_id, Some(MessageRole::User))
            .await?;
        if user_messages != 1 {
            return Ok(());
        }

        let patch = ConversationPatch {
            title: Some(derive_title(&message.content)),
            pinned: None,
        };
        match self
            .repo
            .update_conversation(message.conversation_id, patch)
            .await?
        {
            Some(_) => {
                info!(conversation_id = %message.conversation_id, "conversation auto-titled");
            }
            None => {
                warn!(conversation_id = %message.conversation_id, "auto-title target vanished mid-append");
            }
        }
        Ok(())
    }

    // --- Usage ledger ---

    /// Record token usage for a user, stamped with the current day.
    pub async fn record_usage(&self, new: NewUsageRecord) -> Result<UsageRecord, ChatError> {
        if self.repo.get_user(new.user_id).await?.is_none() {
            return Err(ChatError::UserNotFound);
        }
        Ok(self.repo.record_usage(new).await?)
    }

    /// Query a user's usage records, inclusive on both day bounds.
    pub async fn query_usage(
        &self,
        user_id: UserId,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<UsageRecord>, ChatError> {
        Ok(self.repo.list_usage(user_id, start, end).await?)
    }
}
