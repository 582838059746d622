//! Application state wiring the service to its storage backend.
//!
//! `ChatService` is generic over the repository trait; AppState pins it to
//! the in-memory implementation. The store is constructed exactly once
//! here and handed around by `Arc` -- nothing reaches it through ambient
//! global state.

use std::sync::Arc;

use confab_core::chat::service::ChatService;
use confab_infra::memory::{MemChatRepository, seed_demo_data};
use confab_types::id::UserId;

/// Concrete type alias for the service generic pinned to the in-memory
/// repository.
pub type ConcreteChatService = ChatService<MemChatRepository>;

/// Shared application state holding the chat service.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
    /// Seeded demo account, printed at startup for convenience.
    pub demo_user_id: UserId,
}

impl AppState {
    /// Initialize the application state: build the volatile store and
    /// repopulate the demo dataset.
    pub async fn init() -> anyhow::Result<Self> {
        let repo = Arc::new(MemChatRepository::new());
        let demo_user = seed_demo_data(&repo).await?;

        Ok(Self {
            chat_service: Arc::new(ChatService::new(repo)),
            demo_user_id: demo_user.id,
        })
    }
}
