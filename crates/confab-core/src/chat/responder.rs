//! Deferred reply scheduler.
//!
//! Every stored user message arms a one-shot timer; when it fires, a
//! templated assistant reply is appended to the same conversation. Tasks
//! carry a cancellation token keyed by conversation id so that deleting a
//! conversation retracts its outstanding replies, and the fire path
//! re-validates that the conversation still exists before appending.
//!
//! The scheduler has no error channel back to the caller: a cancelled,
//! skipped, or failed append leaves at most a debug trace.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use confab_types::id::ConversationId;
use confab_types::message::{MessageRole, NewMessage};

use crate::chat::repository::ChatRepository;

/// Delay between a stored user message and its simulated assistant reply.
pub const DEFAULT_REPLY_DELAY: Duration = Duration::from_millis(1000);

/// Build the simulated assistant reply for a user message.
pub fn simulated_reply(content: &str) -> String {
    format!("Hello, this is an AI response simulation. Are you asking about \"{content}\"?")
}

/// Schedules simulated assistant replies to user messages.
///
/// One cancellation token per conversation; all replies pending against a
/// conversation share it, so a single `cancel` retracts them together.
pub struct ReplyScheduler {
    delay: Duration,
    pending: DashMap<ConversationId, CancellationToken>,
}

impl ReplyScheduler {
    /// Create a scheduler with the given reply delay.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: DashMap::new(),
        }
    }

    /// Arm a one-shot reply for a stored user message.
    ///
    /// Returns immediately; the reply is appended by a spawned task after
    /// the configured delay. The task holds its own handle to the
    /// repository, so the conversation may be mutated (or deleted) freely
    /// in the meantime.
    pub fn arm<R>(&self, conversation_id: ConversationId, content: String, repo: Arc<R>)
    where
        R: ChatRepository + 'static,
    {
        let token = self
            .pending
            .entry(conversation_id)
            .or_default()
            .clone();
        let delay = self.delay;

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    debug!(conversation_id = %conversation_id, "deferred reply cancelled");
                }
                _ = tokio::time::sleep(delay) => {
                    deliver_reply(conversation_id, &content, repo).await;
                }
            }
        });
    }

    /// Cancel every reply still pending against a conversation.
    ///
    /// Called before cascade-deleting the conversation. No-op if nothing
    /// is pending.
    pub fn cancel(&self, conversation_id: ConversationId) {
        if let Some((_, token)) = self.pending.remove(&conversation_id) {
            token.cancel();
        }
    }
}

impl Default for ReplyScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_REPLY_DELAY)
    }
}

/// Append the templated assistant reply, skipping benignly when the
/// conversation no longer exists.
async fn deliver_reply<R>(conversation_id: ConversationId, content: &str, repo: Arc<R>)
where
    R: ChatRepository,
{
    match repo.get_conversation(conversation_id).await {
        Ok(Some(_)) => {
            let reply = NewMessage {
                conversation_id,
                content: simulated_reply(content),
                role: MessageRole::Assistant,
                attachments: None,
            };
            if let Err(e) = repo.create_message(reply).await {
                debug!(conversation_id = %conversation_id, error = %e, "deferred reply append failed");
            }
        }
        Ok(None) => {
            debug!(conversation_id = %conversation_id, "conversation gone before reply fired");
        }
        Err(e) => {
            debug!(conversation_id = %conversation_id, error = %e, "deferred reply lookup failed");
        }
    }
}
