//! Business logic for Confab.
//!
//! This crate defines the repository contract and the chat orchestration
//! layer: conversation lifecycle, the message timeline with its auto-title
//! rule, the deferred reply scheduler, and the token-usage ledger entry
//! points. Storage implementations live in confab-infra.

pub mod chat;
