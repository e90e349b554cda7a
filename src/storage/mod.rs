/// Storage layer for persisting profiles and mood entries
///
/// The services only see the async traits defined here. `SqliteStorage` is
/// the on-disk implementation used by the server; `InMemoryStorage` backs
/// tests and embedders that bring their own persistence.

pub mod memory;
pub mod migrations;
pub mod sqlite;

// Re-export the main storage types
pub use memory::InMemoryStorage;
pub use sqlite::SqliteStorage;

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{EntryId, MoodEntry, MoodUpdate, ProfileId, StreakState, UserId};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Profile not found: {profile}")]
    ProfileNotFound { profile: String },

    #[error("Entry not found: {entry_id}")]
    EntryNotFound { entry_id: String },

    #[error("Conflict: profile {profile_id} already has an entry for {date}")]
    Conflict { profile_id: String, date: String },

    #[error("Migration error: {0}")]
    Migration(String),
}

impl StorageError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StorageError::ProfileNotFound { .. } | StorageError::EntryNotFound { .. }
        )
    }
}

/// Persisted profile fields owned by the streak engine
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Read the streak fields for a user
    ///
    /// Returns `ProfileNotFound` when the user has no profile yet.
    async fn read_profile(&self, user_id: &UserId) -> Result<StreakState, StorageError>;

    /// Write the streak fields, creating the profile if needed
    async fn write_profile(&self, state: &StreakState) -> Result<(), StorageError>;

    /// Get the user's profile id, creating an empty profile if none exists
    async fn resolve_profile(&self, user_id: &UserId) -> Result<ProfileId, StorageError>;

    /// Look up the user's profile id without creating anything
    async fn find_profile(&self, user_id: &UserId) -> Result<Option<ProfileId>, StorageError>;
}

/// One-row-per-day mood journal persistence
#[async_trait]
pub trait MoodEntryStore: Send + Sync {
    /// Look up the entry for a profile and day
    async fn query_entry(
        &self,
        profile_id: &ProfileId,
        date: NaiveDate,
    ) -> Result<Option<MoodEntry>, StorageError>;

    /// Insert a new entry
    ///
    /// Returns `Conflict` if the profile already has an entry for that day.
    async fn insert_entry(&self, entry: &MoodEntry) -> Result<MoodEntry, StorageError>;

    /// Overwrite level, emoji, label, notes and updated_at of an entry
    async fn update_entry(
        &self,
        entry_id: &EntryId,
        update: &MoodUpdate,
    ) -> Result<MoodEntry, StorageError>;

    /// All entries with `start <= entry_date <= end`, ascending by date
    async fn query_range(
        &self,
        profile_id: &ProfileId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<MoodEntry>, StorageError>;
}
