//! Demo seed data.
//!
//! All state is volatile, so every process start repopulates the store:
//! one demo user, one conversation holding a two-message exchange, and 30
//! days of randomized token usage. Messages are inserted straight through
//! the repository -- seeding must not trip the auto-title rule or arm
//! deferred replies.

use chrono::{Days, Utc};
use rand::Rng;
use tracing::info;

use confab_core::chat::repository::ChatRepository;
use confab_core::chat::title::derive_title;
use confab_types::conversation::NewConversation;
use confab_types::error::RepositoryError;
use confab_types::message::{MessageRole, NewMessage};
use confab_types::user::{NewUser, User};

use super::chat::MemChatRepository;

const DEMO_QUESTION: &str =
    "Which crude grades were processed at the refinery in May 2025?";

const DEMO_ANSWER: &str = "In May 2025 the refinery processed a blend of several crude grades \
to meet product specifications and optimize operating cost.\n\n\
Crude grades processed:\n\n\
Minas Crude: domestically produced, low-sulfur, and stable -- used as the base load.\n\n\
Saudi Light Crude: imported, moderate sulfur with a lighter API gravity, well suited to \
producing high-quality gasoline and naphtha.\n\n\
WTI Crude: sourced from the United States and used as topping feed to raise the yield of \
light distillates such as jet fuel and kerosene.";

/// Daily seeded usage stays within this band (tokens per day).
const USAGE_MIN: u32 = 1000;
const USAGE_MAX: u32 = 6000;

/// Number of back-dated usage days seeded per start.
const USAGE_DAYS: u64 = 30;

/// Populate an empty store with the demo dataset, returning the demo user.
pub async fn seed_demo_data(repo: &MemChatRepository) -> Result<User, RepositoryError> {
    let user = repo
        .create_user(NewUser {
            username: "demo_user".to_string(),
            password: "password".to_string(),
            email: Some("demo@example.com".to_string()),
            profile_photo: None,
            role: Some("Developer".to_string()),
        })
        .await?;

    let conversation = repo
        .create_conversation(NewConversation {
            user_id: user.id,
            title: derive_title(DEMO_QUESTION),
            pinned: false,
        })
        .await?;

    repo.create_message(NewMessage {
        conversation_id: conversation.id,
        content: DEMO_QUESTION.to_string(),
        role: MessageRole::User,
        attachments: None,
    })
    .await?;

    repo.create_message(NewMessage {
        conversation_id: conversation.id,
        content: DEMO_ANSWER.to_string(),
        role: MessageRole::Assistant,
        attachments: None,
    })
    .await?;

    // Draw all samples up front; ThreadRng must not be held across awaits.
    let samples: Vec<u32> = {
        let mut rng = rand::rng();
        (0..USAGE_DAYS)
            .map(|_| rng.random_range(USAGE_MIN..USAGE_MAX))
            .collect()
    };

    let today = Utc::now().date_naive();
    for (offset, tokens) in samples.into_iter().enumerate() {
        let day = today - Days::new(offset as u64);
        repo.record_usage_on(user.id, day, tokens).await;
    }

    info!(user_id = %user.id, "seeded demo data");
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seed_creates_demo_user_with_id_one() {
        let repo = MemChatRepository::new();
        let user = seed_demo_data(&repo).await.unwrap();
        assert_eq!(user.id.0, 1);
        assert_eq!(user.username, "demo_user");
        assert_eq!(user.role.as_deref(), Some("Developer"));

        let by_name = repo.find_user_by_username("demo_user").await.unwrap();
        assert!(by_name.is_some());
    }

    #[tokio::test]
    async fn test_seed_creates_one_conversation_with_exchange() {
        let repo = MemChatRepository::new();
        let user = seed_demo_data(&repo).await.unwrap();

        let conversations = repo.list_conversations(user.id).await.unwrap();
        assert_eq!(conversations.len(), 1);
        // The seeded title obeys the same truncation rule as live titles.
        assert_eq!(conversations[0].title, derive_title(DEMO_QUESTION));

        let messages = repo.list_messages(conversations[0].id).await.unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::User);
        assert_eq!(messages[1].role, MessageRole::Assistant);
    }

    #[tokio::test]
    async fn test_seed_back_dates_thirty_usage_days() {
        let repo = MemChatRepository::new();
        let user = seed_demo_data(&repo).await.unwrap();

        let records = repo.list_usage(user.id, None, None).await.unwrap();
        assert_eq!(records.len(), USAGE_DAYS as usize);

        let today = Utc::now().date_naive();
        let oldest = today - Days::new(USAGE_DAYS - 1);
        assert_eq!(records.first().unwrap().day, oldest);
        assert_eq!(records.last().unwrap().day, today);
        for record in &records {
            assert!((USAGE_MIN..USAGE_MAX).contains(&record.tokens_used));
        }
    }
}
