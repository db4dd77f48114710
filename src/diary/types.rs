//! Diary entry records and query filters.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::category::Category;

/// Date format for `entry_date` (`2026-01-04`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Time-of-day format for `entry_time` (`10:30`).
pub const TIME_FORMAT: &str = "%H:%M";

/// A stored diary entry, matching the `entries` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiaryEntry {
    /// UUID v7 (time-sortable) primary key.
    pub id: String,
    /// Opaque identifier of the user who owns the entry.
    pub owner: String,
    pub content: String,
    /// Calendar day, `YYYY-MM-DD`.
    pub date: String,
    /// Time of day, `HH:MM`.
    pub time: String,
    pub category: Category,
    /// Completion flag for to-do entries; `None` for everything else.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
    /// RFC 3339 last-modification timestamp.
    pub updated_at: String,
}

impl DiaryEntry {
    /// A new entry with a fresh id, timestamped now.
    pub fn new(
        owner: &str,
        content: &str,
        category: Category,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::now_v7().to_string(),
            owner: owner.to_string(),
            content: content.to_string(),
            date: date.format(DATE_FORMAT).to_string(),
            time: time.format(TIME_FORMAT).to_string(),
            category,
            completed: initial_completion(content),
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// Entries written as explicit to-dos start out incomplete.
pub fn initial_completion(content: &str) -> Option<bool> {
    let lower = content.to_lowercase();
    if lower.contains("待办") || lower.contains("todo") {
        Some(false)
    } else {
        None
    }
}

/// Partial update applied by [`crate::diary::store::update_entry`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntryPatch {
    /// Replacement text. Blank text is ignored.
    pub content: Option<String>,
    pub completed: Option<bool>,
    pub category: Option<Category>,
}

/// Filter for [`crate::diary::store::find_entries`]. All fields besides `owner` are optional.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    pub owner: String,
    pub date: Option<NaiveDate>,
    pub category: Option<Category>,
    /// Case-insensitive substring of the content.
    pub query: Option<String>,
    pub limit: Option<usize>,
}

impl EntryFilter {
    pub fn for_owner(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            ..Default::default()
        }
    }
}
