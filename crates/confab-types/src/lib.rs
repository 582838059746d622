//! Shared domain types for Confab.
//!
//! This crate contains the core domain types used across the Confab chat
//! manager: users, conversations, messages, usage records, their patch
//! payloads, and the associated error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod conversation;
pub mod error;
pub mod id;
pub mod message;
pub mod usage;
pub mod user;
