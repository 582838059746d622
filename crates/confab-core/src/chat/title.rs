//! Conversation title derivation.
//!
//! The first user message of a conversation names it: the content becomes
//! the title, truncated to 50 characters with a `...` suffix when anything
//! was cut off. Later user messages never rename the conversation.

/// Maximum number of characters kept from the message content.
const MAX_TITLE_CHARS: usize = 50;

/// Derive a conversation title from message content.
///
/// Content of 50 characters or fewer is used verbatim; longer content is
/// cut at 50 characters and suffixed with `...`. Truncation counts
/// characters, not bytes, so multi-byte content never splits a codepoint.
pub fn derive_title(content: &str) -> String {
    let mut chars = content.chars();
    let head: String = chars.by_ref().take(MAX_TITLE_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
