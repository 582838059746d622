//! In-memory storage engine.
//!
//! `MemChatRepository` implements the `ChatRepository` contract over
//! per-kind entity tables ([`table::Table`]); `seed` repopulates the demo
//! dataset on process start.

pub mod chat;
pub mod seed;
mod table;

pub use chat::MemChatRepository;
pub use seed::seed_demo_data;
