/// SQLite implementation of the profile and mood entry stores
///
/// This module provides the concrete SQLite implementation for storing
/// and retrieving journal data. It handles all SQL queries and data conversion.

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::domain::{
    EntryId, MoodEntry, MoodLevel, MoodUpdate, ProfileId, StreakState, UserId, DAY_KEY_FORMAT,
    parse_day_key,
};
use crate::storage::{migrations, MoodEntryStore, ProfileStore, StorageError};

const ENTRY_COLUMNS: &str =
    "id, profile_id, entry_date, mood_level, mood_emoji, mood_label, notes, created_at, updated_at";

/// SQLite-based storage implementation
///
/// The connection sits behind a mutex that is only held for the duration of
/// one synchronous statement, never across an await point.
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// Create a new SQLite storage instance
    ///
    /// This opens the database file and runs any necessary migrations
    /// to ensure the schema is up to date.
    pub fn new(db_path: PathBuf) -> Result<Self, StorageError> {
        let conn = Connection::open(&db_path)
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;

        let storage = Self::from_connection(conn)?;
        tracing::info!("SQLite storage initialized at: {:?}", db_path);
        Ok(storage)
    }

    /// Create a storage instance backed by a private in-memory database
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, StorageError> {
        conn.execute("PRAGMA foreign_keys = ON", [])
            .map_err(|e| StorageError::Connection(format!("Failed to enable foreign keys: {}", e)))?;

        migrations::initialize_database(&conn)?;

        Ok(Self { conn: Mutex::new(conn) })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn
            .lock()
            .map_err(|_| StorageError::Connection("Database connection lock poisoned".to_string()))
    }

    fn parse_profile_id(id_str: &str) -> Result<ProfileId, StorageError> {
        ProfileId::from_string(id_str).map_err(|_| {
            StorageError::Query(rusqlite::Error::InvalidColumnType(
                0,
                "Invalid UUID".to_string(),
                rusqlite::types::Type::Text,
            ))
        })
    }

    /// Convert a database row into a MoodEntry
    fn row_to_entry(row: &Row<'_>) -> rusqlite::Result<MoodEntry> {
        let id_str: String = row.get(0)?;
        let id = EntryId::from_string(&id_str).map_err(|_| {
            rusqlite::Error::InvalidColumnType(0, "Invalid UUID".to_string(), rusqlite::types::Type::Text)
        })?;

        let profile_str: String = row.get(1)?;
        let profile_id = ProfileId::from_string(&profile_str).map_err(|_| {
            rusqlite::Error::InvalidColumnType(1, "Invalid UUID".to_string(), rusqlite::types::Type::Text)
        })?;

        let date_str: String = row.get(2)?;
        let entry_date = parse_day_key(&date_str).map_err(|_| {
            rusqlite::Error::InvalidColumnType(2, "Invalid date".to_string(), rusqlite::types::Type::Text)
        })?;

        let level_code: i64 = row.get(3)?;
        let mood_level = MoodLevel::from_code(level_code).map_err(|_| {
            rusqlite::Error::InvalidColumnType(3, "Invalid mood level".to_string(), rusqlite::types::Type::Integer)
        })?;

        let created_at = parse_timestamp(row, 7)?;
        let updated_at = parse_timestamp(row, 8)?;

        Ok(MoodEntry::from_existing(
            id,
            profile_id,
            entry_date,
            mood_level,
            row.get(4)?, // mood_emoji
            row.get(5)?, // mood_label
            row.get(6)?, // notes
            created_at,
            updated_at,
        ))
    }

    fn fetch_entry(conn: &Connection, entry_id: &EntryId) -> Result<MoodEntry, StorageError> {
        let sql = format!("SELECT {} FROM mood_entries WHERE id = ?1", ENTRY_COLUMNS);
        let result = conn.query_row(&sql, params![entry_id.to_string()], Self::row_to_entry);

        match result {
            Ok(entry) => Ok(entry),
            Err(rusqlite::Error::QueryReturnedNoRows) => Err(StorageError::EntryNotFound {
                entry_id: entry_id.to_string(),
            }),
            Err(e) => Err(StorageError::Query(e)),
        }
    }
}

fn parse_timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            rusqlite::Error::InvalidColumnType(idx, "Invalid datetime".to_string(), rusqlite::types::Type::Text)
        })
}

fn constraint_code(err: &rusqlite::Error) -> Option<i32> {
    match err {
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation => {
            Some(e.extended_code)
        }
        _ => None,
    }
}

#[async_trait]
impl ProfileStore for SqliteStorage {
    async fn read_profile(&self, user_id: &UserId) -> Result<StreakState, StorageError> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                "SELECT streak, last_activity_date FROM profiles WHERE user_id = ?1",
                params![user_id.as_str()],
                |row| Ok((row.get::<_, u32>(0)?, row.get::<_, Option<String>>(1)?)),
            )
            .optional()?;

        let Some((streak, last_activity)) = row else {
            return Err(StorageError::ProfileNotFound {
                profile: user_id.to_string(),
            });
        };

        // An unreadable date is treated as no prior activity
        let last_activity_day = last_activity
            .and_then(|s| parse_day_key(&s).ok());

        Ok(StreakState {
            user_id: user_id.clone(),
            streak,
            last_activity_day,
        })
    }

    async fn write_profile(&self, state: &StreakState) -> Result<(), StorageError> {
        let now = Utc::now().to_rfc3339();
        let conn = self.conn()?;

        conn.execute(
            "INSERT INTO profiles (id, user_id, streak, last_activity_date, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)
             ON CONFLICT (user_id) DO UPDATE SET
                streak = excluded.streak,
                last_activity_date = excluded.last_activity_date,
                updated_at = excluded.updated_at",
            params![
                ProfileId::new().to_string(),
                state.user_id.as_str(),
                state.streak,
                state.last_activity_day.map(|d| d.format(DAY_KEY_FORMAT).to_string()),
                now
            ],
        )?;

        tracing::debug!("Wrote streak {} for user {}", state.streak, state.user_id);
        Ok(())
    }

    async fn resolve_profile(&self, user_id: &UserId) -> Result<ProfileId, StorageError> {
        let now = Utc::now().to_rfc3339();
        let conn = self.conn()?;

        conn.execute(
            "INSERT INTO profiles (id, user_id, streak, last_activity_date, created_at, updated_at)
             VALUES (?1, ?2, 0, NULL, ?3, ?3)
             ON CONFLICT (user_id) DO NOTHING",
            params![ProfileId::new().to_string(), user_id.as_str(), now],
        )?;

        let id_str: String = conn.query_row(
            "SELECT id FROM profiles WHERE user_id = ?1",
            params![user_id.as_str()],
            |row| row.get(0),
        )?;

        Self::parse_profile_id(&id_str)
    }

    async fn find_profile(&self, user_id: &UserId) -> Result<Option<ProfileId>, StorageError> {
        let conn = self.conn()?;

        let id_str: Option<String> = conn
            .query_row(
                "SELECT id FROM profiles WHERE user_id = ?1",
                params![user_id.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        id_str.map(|s| Self::parse_profile_id(&s)).transpose()
    }
}

#[async_trait]
impl MoodEntryStore for SqliteStorage {
    async fn query_entry(
        &self,
        profile_id: &ProfileId,
        date: NaiveDate,
    ) -> Result<Option<MoodEntry>, StorageError> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM mood_entries WHERE profile_id = ?1 AND entry_date = ?2",
            ENTRY_COLUMNS
        );

        let entry = conn
            .query_row(
                &sql,
                params![profile_id.to_string(), date.format(DAY_KEY_FORMAT).to_string()],
                Self::row_to_entry,
            )
            .optional()?;

        Ok(entry)
    }

    async fn insert_entry(&self, entry: &MoodEntry) -> Result<MoodEntry, StorageError> {
        let conn = self.conn()?;
        let date = entry.entry_date.format(DAY_KEY_FORMAT).to_string();

        let result = conn.execute(
            "INSERT INTO mood_entries (
                id, profile_id, entry_date, mood_level, mood_emoji, mood_label, notes, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                entry.id.to_string(),
                entry.profile_id.to_string(),
                date,
                entry.mood_level.code(),
                entry.mood_emoji,
                entry.mood_label,
                entry.notes,
                entry.created_at.to_rfc3339(),
                entry.updated_at.to_rfc3339()
            ],
        );

        if let Err(e) = result {
            return Err(match constraint_code(&e) {
                Some(rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE) => StorageError::Conflict {
                    profile_id: entry.profile_id.to_string(),
                    date,
                },
                Some(rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY) => StorageError::ProfileNotFound {
                    profile: entry.profile_id.to_string(),
                },
                _ => StorageError::Query(e),
            });
        }

        tracing::debug!("Created mood entry: {} for profile {} on {}", entry.id, entry.profile_id, date);
        Self::fetch_entry(&conn, &entry.id)
    }

    async fn update_entry(
        &self,
        entry_id: &EntryId,
        update: &MoodUpdate,
    ) -> Result<MoodEntry, StorageError> {
        let conn = self.conn()?;

        let rows_affected = conn.execute(
            "UPDATE mood_entries SET
                mood_level = ?2,
                mood_emoji = ?3,
                mood_label = ?4,
                notes = ?5,
                updated_at = ?6
             WHERE id = ?1",
            params![
                entry_id.to_string(),
                update.mood_level.code(),
                update.mood_level.emoji(),
                update.mood_level.label(),
                update.notes,
                update.updated_at.to_rfc3339()
            ],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::EntryNotFound {
                entry_id: entry_id.to_string(),
            });
        }

        tracing::debug!("Updated mood entry: {}", entry_id);
        Self::fetch_entry(&conn, entry_id)
    }

    async fn query_range(
        &self,
        profile_id: &ProfileId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<MoodEntry>, StorageError> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM mood_entries
             WHERE profile_id = ?1 AND entry_date BETWEEN ?2 AND ?3
             ORDER BY entry_date ASC",
            ENTRY_COLUMNS
        );

        let mut stmt = conn.prepare(&sql)?;
        let entry_iter = stmt.query_map(
            params![
                profile_id.to_string(),
                start.format(DAY_KEY_FORMAT).to_string(),
                end.format(DAY_KEY_FORMAT).to_string()
            ],
            Self::row_to_entry,
        )?;

        let mut entries = Vec::new();
        for entry in entry_iter {
            entries.push(entry?);
        }

        Ok(entries)
    }
}
