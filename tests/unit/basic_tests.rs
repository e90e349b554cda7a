/// Basic unit tests to verify core functionality through the public API
use chrono::{NaiveDate, Utc};
use mood_journal_mcp::*;
use tempfile::NamedTempFile;

#[test]
fn test_mood_entry_creation() {
    let profile_id = ProfileId::new();
    let today = NaiveDate::from_ymd_opt(2024, 3, 3).unwrap();

    let entry = MoodEntry::new(profile_id, today, MoodLevel::Calm, Some("tea".to_string()), Utc::now());

    assert_eq!(entry.profile_id, profile_id);
    assert_eq!(entry.entry_date, today);
    assert_eq!(entry.mood_emoji, "😌");
    assert!(entry.has_notes());
}

#[test]
fn test_every_level_has_a_distinct_pair() {
    let mut emojis: Vec<_> = MoodLevel::ALL.iter().map(|l| l.emoji()).collect();
    let mut labels: Vec<_> = MoodLevel::ALL.iter().map(|l| l.label()).collect();
    emojis.sort();
    emojis.dedup();
    labels.sort();
    labels.dedup();
    assert_eq!(emojis.len(), 8);
    assert_eq!(labels.len(), 8);
}

#[test]
fn test_storage_creation() {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let storage = SqliteStorage::new(temp_file.path().to_path_buf());
    assert!(storage.is_ok());
}

#[tokio::test]
async fn test_server_creation() {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let server = MoodJournalServer::new(temp_file.path().to_path_buf(), UserId::new("u1")).await;
    assert!(server.is_ok());
}

#[tokio::test]
async fn test_server_rejects_blank_user() {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let server = MoodJournalServer::new(temp_file.path().to_path_buf(), UserId::new("  ")).await;
    assert!(matches!(server, Err(ServerError::Domain(_))));
}

#[test]
fn test_day_key_format() {
    let clock = FixedClock::at(
        NaiveDate::from_ymd_opt(2024, 1, 5).unwrap().and_hms_opt(7, 45, 0).unwrap(),
    );
    assert_eq!(day_key_string(&clock.now()), "2024-01-05");
}
