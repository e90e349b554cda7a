/// MoodEntry entity for the one-entry-per-day mood journal
///
/// A profile has at most one entry per calendar day. Re-selecting a mood on
/// the same day rewrites the entry in place rather than adding a second one.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use crate::domain::{DomainError, EntryId, MoodLevel, ProfileId};

/// Maximum length of the free-text note, in characters
pub const MAX_NOTES_CHARS: usize = 500;

/// A profile's mood for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodEntry {
    /// Unique identifier for this entry
    pub id: EntryId,
    /// Which profile this entry belongs to
    pub profile_id: ProfileId,
    /// The calendar day this mood was recorded for
    pub entry_date: NaiveDate,
    /// Numeric mood code (1-8)
    pub mood_level: MoodLevel,
    /// Emoji bound to the level at the time of writing
    pub mood_emoji: String,
    /// Label bound to the level at the time of writing
    pub mood_label: String,
    /// Optional free-text note
    pub notes: Option<String>,
    /// When the entry was first written
    pub created_at: DateTime<Utc>,
    /// When the entry was last rewritten
    pub updated_at: DateTime<Utc>,
}

impl MoodEntry {
    /// Create a new entry for a day
    ///
    /// `notes` must already have gone through [`normalize_notes`].
    pub fn new(
        profile_id: ProfileId,
        entry_date: NaiveDate,
        mood_level: MoodLevel,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: EntryId::new(),
            profile_id,
            entry_date,
            mood_level,
            mood_emoji: mood_level.emoji().to_string(),
            mood_label: mood_level.label().to_string(),
            notes,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create an entry from existing data (used when loading from database)
    #[allow(clippy::too_many_arguments)]
    pub fn from_existing(
        id: EntryId,
        profile_id: ProfileId,
        entry_date: NaiveDate,
        mood_level: MoodLevel,
        mood_emoji: String,
        mood_label: String,
        notes: Option<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            profile_id,
            entry_date,
            mood_level,
            mood_emoji,
            mood_label,
            notes,
            created_at,
            updated_at,
        }
    }

    /// Check if this entry has notes
    pub fn has_notes(&self) -> bool {
        self.notes.as_deref().is_some_and(|n| !n.trim().is_empty())
    }

    /// Rewrite the mutable fields in place, keeping `id` and `created_at`
    pub fn apply(&mut self, update: &MoodUpdate) {
        self.mood_level = update.mood_level;
        self.mood_emoji = update.mood_level.emoji().to_string();
        self.mood_label = update.mood_level.label().to_string();
        self.notes = update.notes.clone();
        self.updated_at = update.updated_at;
    }
}

/// The fields a same-day re-selection overwrites
#[derive(Debug, Clone, PartialEq)]
pub struct MoodUpdate {
    pub mood_level: MoodLevel,
    pub notes: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Trim notes, drop blank ones, and enforce the length limit
pub fn normalize_notes(notes: Option<String>) -> Result<Option<String>, DomainError> {
    let Some(text) = notes else {
        return Ok(None);
    };

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let chars = trimmed.chars().count();
    if chars > MAX_NOTES_CHARS {
        return Err(DomainError::NotesTooLong { max: MAX_NOTES_CHARS, actual: chars });
    }

    Ok(Some(trimmed.to_string()))
}
