//! Token-usage ledger types.
//!
//! Usage is recorded per user at day granularity. Range queries are
//! inclusive on both bounds: a record dated exactly on the start or end
//! day matches.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::id::{UsageRecordId, UserId};

/// A dated count of tokens consumed by a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageRecord {
    pub id: UsageRecordId,
    pub user_id: UserId,
    /// The day this usage was recorded, stamped at creation.
    pub day: NaiveDate,
    pub tokens_used: u32,
}

/// Payload for recording usage. Id and day are assigned by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUsageRecord {
    pub user_id: UserId,
    pub tokens_used: u32,
}

/// Inclusive day-range filter for usage queries. Either bound may be open.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct UsageRange {
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl UsageRange {
    /// Whether the given day falls inside this range (inclusive bounds).
    pub fn contains(&self, day: NaiveDate) -> bool {
        let after_start = self.start_date.is_none_or(|start| day >= start);
        let before_end = self.end_date.is_none_or(|end| day <= end);
        after_start && before_end
    }
}
