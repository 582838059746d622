//! HTTP request handlers, one module per resource.

pub mod conversation;
pub mod message;
pub mod usage;
pub mod user;
