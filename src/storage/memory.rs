/// In-memory implementation of the stores
///
/// Mirrors the SQLite semantics (unique day per profile, ascending range
/// queries, get-or-create profiles) without touching disk.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Mutex;

use crate::domain::{EntryId, MoodEntry, MoodUpdate, ProfileId, StreakState, UserId};
use crate::storage::{MoodEntryStore, ProfileStore, StorageError};

#[derive(Debug, Clone)]
struct ProfileRow {
    id: ProfileId,
    state: StreakState,
}

#[derive(Debug, Default)]
pub struct InMemoryStorage {
    profiles: Mutex<HashMap<UserId, ProfileRow>>,
    entries: Mutex<HashMap<EntryId, MoodEntry>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries for a profile
    pub async fn entry_count(&self, profile_id: &ProfileId) -> usize {
        self.entries
            .lock()
            .await
            .values()
            .filter(|e| e.profile_id == *profile_id)
            .count()
    }
}

#[async_trait]
impl ProfileStore for InMemoryStorage {
    async fn read_profile(&self, user_id: &UserId) -> Result<StreakState, StorageError> {
        self.profiles
            .lock()
            .await
            .get(user_id)
            .map(|row| row.state.clone())
            .ok_or_else(|| StorageError::ProfileNotFound {
                profile: user_id.to_string(),
            })
    }

    async fn write_profile(&self, state: &StreakState) -> Result<(), StorageError> {
        let mut profiles = self.profiles.lock().await;
        profiles
            .entry(state.user_id.clone())
            .and_modify(|row| row.state = state.clone())
            .or_insert_with(|| ProfileRow {
                id: ProfileId::new(),
                state: state.clone(),
            });
        Ok(())
    }

    async fn resolve_profile(&self, user_id: &UserId) -> Result<ProfileId, StorageError> {
        let mut profiles = self.profiles.lock().await;
        let row = profiles.entry(user_id.clone()).or_insert_with(|| ProfileRow {
            id: ProfileId::new(),
            state: StreakState::new(user_id.clone()),
        });
        Ok(row.id)
    }

    async fn find_profile(&self, user_id: &UserId) -> Result<Option<ProfileId>, StorageError> {
        Ok(self.profiles.lock().await.get(user_id).map(|row| row.id))
    }
}

#[async_trait]
impl MoodEntryStore for InMemoryStorage {
    async fn query_entry(
        &self,
        profile_id: &ProfileId,
        date: NaiveDate,
    ) -> Result<Option<MoodEntry>, StorageError> {
        let entries = self.entries.lock().await;
        Ok(entries
            .values()
            .find(|e| e.profile_id == *profile_id && e.entry_date == date)
            .cloned())
    }

    async fn insert_entry(&self, entry: &MoodEntry) -> Result<MoodEntry, StorageError> {
        let mut entries = self.entries.lock().await;

        let taken = entries
            .values()
            .any(|e| e.profile_id == entry.profile_id && e.entry_date == entry.entry_date);
        if taken {
            return Err(StorageError::Conflict {
                profile_id: entry.profile_id.to_string(),
                date: entry.entry_date.to_string(),
            });
        }

        entries.insert(entry.id, entry.clone());
        Ok(entry.clone())
    }

    async fn update_entry(
        &self,
        entry_id: &EntryId,
        update: &MoodUpdate,
    ) -> Result<MoodEntry, StorageError> {
        let mut entries = self.entries.lock().await;
        let entry = entries
            .get_mut(entry_id)
            .ok_or_else(|| StorageError::EntryNotFound {
                entry_id: entry_id.to_string(),
            })?;

        entry.apply(update);
        Ok(entry.clone())
    }

    async fn query_range(
        &self,
        profile_id: &ProfileId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<MoodEntry>, StorageError> {
        let entries = self.entries.lock().await;
        let mut found: Vec<MoodEntry> = entries
            .values()
            .filter(|e| e.profile_id == *profile_id && e.entry_date >= start && e.entry_date <= end)
            .cloned()
            .collect();
        found.sort_by_key(|e| e.entry_date);
        Ok(found)
    }
}
