//! User account and AI-preference types.
//!
//! A user is created once (by the seed routine) and mutated through
//! `UserPatch`. The username is deliberately absent from the patch type:
//! it is immutable after creation.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::id::UserId;

/// Assistant personality selected in a user's AI preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Personality {
    Default,
    Robot,
    Cynic,
    Expert,
}

impl fmt::Display for Personality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Personality::Default => write!(f, "default"),
            Personality::Robot => write!(f, "robot"),
            Personality::Cynic => write!(f, "cynic"),
            Personality::Expert => write!(f, "expert"),
        }
    }
}

impl FromStr for Personality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "default" => Ok(Personality::Default),
            "robot" => Ok(Personality::Robot),
            "cynic" => Ok(Personality::Cynic),
            "expert" => Ok(Personality::Expert),
            other => Err(format!("invalid personality: '{other}'")),
        }
    }
}

impl Default for Personality {
    fn default() -> Self {
        Personality::Default
    }
}

/// Per-user AI reply preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiPreferences {
    /// Upper bound on tokens per generated reply.
    pub max_tokens: u32,
    pub personality: Personality,
    /// Free-text address style ("casual", "formal", ...).
    pub address_style: String,
}

impl Default for AiPreferences {
    fn default() -> Self {
        Self {
            max_tokens: 4000,
            personality: Personality::Default,
            address_style: "casual".to_string(),
        }
    }
}

/// A user account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    /// Unique login name, immutable after creation.
    pub username: String,
    pub password: String,
    pub email: Option<String>,
    /// Reference to an uploaded profile photo.
    pub profile_photo: Option<String>,
    /// Free-text role label shown in the profile ("Developer", ...).
    pub role: Option<String>,
    pub ai_preferences: AiPreferences,
}

/// Payload for creating a user. Ids and default preferences are assigned
/// by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub profile_photo: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Partial update for a user.
///
/// Only the fields listed here may be mutated; unknown fields (including
/// `username` and `id`) are rejected at the boundary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_photo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_preferences: Option<AiPreferences>,
}

impl User {
    /// Apply a patch, replacing only the supplied fields.
    pub fn apply_patch(&mut self, patch: UserPatch) {
        if let Some(password) = patch.password {
            self.password = password;
        }
        if let Some(email) = patch.email {
            self.email = Some(email);
        }
        if let Some(photo) = patch.profile_photo {
            self.profile_photo = Some(photo);
        }
        if let Some(role) = patch.role {
            self.role = Some(role);
        }
        if let Some(prefs) = patch.ai_preferences {
            self.ai_preferences = prefs;
        }
    }
}
