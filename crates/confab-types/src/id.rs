//! Typed entity identifiers.
//!
//! Each entity kind carries its own integer id space: an independent,
//! monotonically increasing sequence starting at 1, assigned by the store
//! on creation and never reused after deletion. Wrapping the raw `i64` in
//! per-kind newtypes keeps a `MessageId` from ever being passed where a
//! `ConversationId` belongs.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.parse()?))
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }
    };
}

entity_id! {
    /// Unique identifier for a user.
    UserId
}

entity_id! {
    /// Unique identifier for a conversation.
    ConversationId
}

entity_id! {
    /// Unique identifier for a message within a conversation.
    MessageId
}

entity_id! {
    /// Unique identifier for a token-usage record.
    UsageRecordId
}
