//! Chat domain: repository contract, lifecycle orchestration, auto-title
//! rule, and the deferred reply scheduler.

pub mod repository;
pub mod responder;
pub mod service;
pub mod title;
