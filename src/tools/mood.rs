/// Tools for recording and browsing daily moods
///
/// This module implements the mood_set, mood_today, mood_recent and
/// mood_levels MCP tools.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{MoodEntry, MoodLevel, ProfileId};
use crate::journal::{JournalError, MoodJournal};

/// Default window for mood_recent
pub const DEFAULT_RECENT_DAYS: u32 = 7;

/// Parameters for recording today's mood
#[derive(Debug, Deserialize, JsonSchema)]
pub struct SetMoodParams {
    /// Mood level 1-8 (see mood_levels)
    pub mood_level: i64,
    /// Optional note, up to 500 characters
    pub notes: Option<String>,
}

/// Parameters for listing recent moods
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct RecentMoodsParams {
    /// Number of days to look back, today included (default 7, max 365)
    pub days: Option<u32>,
}

/// Response carrying zero or more entries
#[derive(Debug, Serialize)]
pub struct MoodResponse {
    pub entries: Vec<MoodEntry>,
    pub message: String,
}

/// One row of the mood catalogue
#[derive(Debug, Serialize)]
pub struct MoodLevelInfo {
    pub level: u8,
    pub emoji: &'static str,
    pub label: &'static str,
}

fn describe(entry: &MoodEntry) -> String {
    let mut line = format!(
        "{} {} {} (level {})",
        entry.entry_date, entry.mood_emoji, entry.mood_label, entry.mood_level.code()
    );
    if let Some(notes) = entry.notes.as_deref() {
        line.push_str(&format!(" - {}", notes));
    }
    line
}

/// Record today's mood for a profile
pub async fn set_mood(
    journal: &MoodJournal,
    profile_id: &ProfileId,
    params: SetMoodParams,
) -> Result<MoodResponse, JournalError> {
    let entry = journal
        .set_todays_mood(profile_id, params.mood_level, params.notes)
        .await?;

    Ok(MoodResponse {
        message: format!("✅ Mood saved for today: {}", describe(&entry)),
        entries: vec![entry],
    })
}

/// Show today's mood, if recorded
///
/// A user without a profile has nothing recorded.
pub async fn todays_mood(
    journal: &MoodJournal,
    profile_id: Option<&ProfileId>,
) -> Result<MoodResponse, JournalError> {
    let entry = match profile_id {
        Some(profile_id) => journal.get_todays_mood(profile_id).await?,
        None => None,
    };

    let message = match &entry {
        Some(entry) => format!("Today's mood: {}", describe(entry)),
        None => "No mood recorded yet today. How are you feeling?".to_string(),
    };

    Ok(MoodResponse {
        entries: entry.into_iter().collect(),
        message,
    })
}

/// List moods from the last few days
pub async fn recent_moods(
    journal: &MoodJournal,
    profile_id: Option<&ProfileId>,
    params: RecentMoodsParams,
) -> Result<MoodResponse, JournalError> {
    let days = params.days.unwrap_or(DEFAULT_RECENT_DAYS);
    let entries = match profile_id {
        Some(profile_id) => journal.get_recent_moods(profile_id, days).await?,
        None => Vec::new(),
    };

    let message = if entries.is_empty() {
        format!("No moods recorded in the last {} day(s).", days)
    } else {
        let lines = entries.iter().map(describe).collect::<Vec<_>>().join("\n");
        format!("📅 {} mood(s) in the last {} day(s):\n{}", entries.len(), days, lines)
    };

    Ok(MoodResponse { entries, message })
}

/// The fixed catalogue of levels
pub fn mood_levels() -> Vec<MoodLevelInfo> {
    MoodLevel::ALL
        .iter()
        .map(|&level| MoodLevelInfo {
            level: level.code(),
            emoji: level.emoji(),
            label: level.label(),
        })
        .collect()
}
