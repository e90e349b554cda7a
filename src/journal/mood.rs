/// The one-entry-per-day mood journal
///
/// `set_todays_mood` looks up today's row and then either updates it or
/// inserts a new one. Two sessions can both see "no row" and race to insert;
/// the store rejects the loser with `Conflict` and the loser retries once as
/// an update against the row that won.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{debug, warn};

use crate::analytics::{MoodStatsAggregator, MoodStatsSnapshot, CURRENT_STREAK_WINDOW_DAYS};
use crate::domain::{
    day_key, month_bounds, normalize_notes, Clock, MoodEntry, MoodLevel, MoodUpdate, ProfileId,
};
use crate::journal::JournalError;
use crate::storage::{MoodEntryStore, StorageError};

/// Upper bound on the `days` window of [`MoodJournal::get_recent_moods`]
pub const MAX_RECENT_DAYS: u32 = 365;

pub struct MoodJournal {
    store: Arc<dyn MoodEntryStore>,
    clock: Arc<dyn Clock>,
    aggregator: MoodStatsAggregator,
}

impl MoodJournal {
    pub fn new(store: Arc<dyn MoodEntryStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            aggregator: MoodStatsAggregator::new(),
        }
    }

    /// Today's entry for a profile, if one was recorded
    pub async fn get_todays_mood(
        &self,
        profile_id: &ProfileId,
    ) -> Result<Option<MoodEntry>, JournalError> {
        let today = day_key(&self.clock.now());
        Ok(self.store.query_entry(profile_id, today).await?)
    }

    /// Record today's mood, replacing an earlier selection from the same day
    pub async fn set_todays_mood(
        &self,
        profile_id: &ProfileId,
        mood_level: i64,
        notes: Option<String>,
    ) -> Result<MoodEntry, JournalError> {
        let level = MoodLevel::from_code(mood_level)?;
        let notes = normalize_notes(notes)?;

        let now = self.clock.now();
        let today = day_key(&now);
        let update = MoodUpdate {
            mood_level: level,
            notes,
            updated_at: now.with_timezone(&Utc),
        };

        if let Some(existing) = self.store.query_entry(profile_id, today).await? {
            debug!("Updating mood entry {} for {}", existing.id, today);
            return Ok(self.store.update_entry(&existing.id, &update).await?);
        }

        let entry = MoodEntry::new(
            *profile_id,
            today,
            level,
            update.notes.clone(),
            update.updated_at,
        );

        match self.store.insert_entry(&entry).await {
            Ok(saved) => {
                debug!("Created mood entry {} for {}", saved.id, today);
                Ok(saved)
            }
            Err(StorageError::Conflict { .. }) => {
                warn!("Concurrent mood entry for profile {} on {}, retrying as update", profile_id, today);
                self.retry_as_update(profile_id, &entry, &update).await
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Second attempt after losing an insert race; any failure here is a store error
    async fn retry_as_update(
        &self,
        profile_id: &ProfileId,
        attempted: &MoodEntry,
        update: &MoodUpdate,
    ) -> Result<MoodEntry, JournalError> {
        let existing = self
            .store
            .query_entry(profile_id, attempted.entry_date)
            .await
            .map_err(JournalError::Store)?
            .ok_or_else(|| {
                JournalError::Store(StorageError::Conflict {
                    profile_id: profile_id.to_string(),
                    date: attempted.entry_date.to_string(),
                })
            })?;

        self.store
            .update_entry(&existing.id, update)
            .await
            .map_err(JournalError::Store)
    }

    /// Statistics for one calendar month
    pub async fn get_monthly_stats(
        &self,
        profile_id: &ProfileId,
        year: i32,
        month: u32,
    ) -> Result<MoodStatsSnapshot, JournalError> {
        let (start, end) = month_bounds(year, month)?;
        let period = self.store.query_range(profile_id, start, end).await?;

        let today = day_key(&self.clock.now());
        let window_start = today - Duration::days(i64::from(CURRENT_STREAK_WINDOW_DAYS) - 1);
        let recent = self.store.query_range(profile_id, window_start, today).await?;

        Ok(self.aggregator.snapshot(&period, &recent, today))
    }

    /// Entries from the last `days` calendar days, today included, oldest first
    pub async fn get_recent_moods(
        &self,
        profile_id: &ProfileId,
        days: u32,
    ) -> Result<Vec<MoodEntry>, JournalError> {
        if days == 0 {
            return Ok(Vec::new());
        }

        let days = days.min(MAX_RECENT_DAYS);
        let today = day_key(&self.clock.now());
        let start = today - Duration::days(i64::from(days) - 1);

        Ok(self.store.query_range(profile_id, start, today).await?)
    }
}
