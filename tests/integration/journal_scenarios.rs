/// End-to-end streak and journal scenarios against an on-disk SQLite database
use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use mood_journal_mcp::*;
use tempfile::NamedTempFile;
use tokio_test::{assert_err, assert_ok};

struct Fixture {
    _db: NamedTempFile,
    storage: Arc<SqliteStorage>,
    clock: Arc<FixedClock>,
    streaks: StreakTracker,
    journal: MoodJournal,
}

fn fixture() -> Fixture {
    let db = NamedTempFile::new().expect("Failed to create temp file");
    let storage = Arc::new(SqliteStorage::new(db.path().to_path_buf()).expect("Failed to open storage"));
    let clock = Arc::new(FixedClock::at(
        NaiveDate::from_ymd_opt(2024, 10, 15).unwrap().and_hms_opt(12, 0, 0).unwrap(),
    ));

    Fixture {
        streaks: StreakTracker::new(storage.clone(), clock.clone()),
        journal: MoodJournal::new(storage.clone(), clock.clone()),
        _db: db,
        storage,
        clock,
    }
}

fn oct(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 10, day).unwrap()
}

#[tokio::test]
async fn test_login_day_after_extends_streak() {
    let f = fixture();
    let user = UserId::new("alice");
    assert_ok!(
        f.storage
            .write_profile(&StreakState {
                user_id: user.clone(),
                streak: 5,
                last_activity_day: Some(oct(14)),
            })
            .await
    );

    assert_eq!(f.streaks.update_user_streak(&user).await, 6);
    assert_eq!(f.streaks.get_user_streak(&user).await, 6);
}

#[tokio::test]
async fn test_login_after_three_days_resets() {
    let f = fixture();
    let user = UserId::new("bob");
    assert_ok!(
        f.storage
            .write_profile(&StreakState {
                user_id: user.clone(),
                streak: 12,
                last_activity_day: Some(oct(12)),
            })
            .await
    );

    assert_eq!(f.streaks.update_user_streak(&user).await, 1);
}

#[tokio::test]
async fn test_week_of_daily_logins() {
    let f = fixture();
    let user = UserId::new("carol");

    for expected in 1..=7 {
        assert_eq!(f.streaks.update_user_streak(&user).await, expected);
        // a second login the same evening changes nothing
        f.clock.advance(Duration::hours(8));
        assert_eq!(f.streaks.update_user_streak(&user).await, expected);
        f.clock.advance(Duration::hours(16));
    }
}

#[tokio::test]
async fn test_first_mood_of_the_day() {
    let f = fixture();
    let profile = assert_ok!(f.storage.resolve_profile(&UserId::new("dana")).await);

    let entry = assert_ok!(f.journal.set_todays_mood(&profile, 3, None).await);
    assert_eq!(entry.mood_level.code(), 3);
    assert_eq!(entry.mood_emoji, "😐");
    assert_eq!(entry.mood_label, "Neutral");
    assert_eq!(entry.notes, None);
    assert_eq!(entry.entry_date, oct(15));
}

#[tokio::test]
async fn test_changing_mind_keeps_one_row() {
    let f = fixture();
    let profile = assert_ok!(f.storage.resolve_profile(&UserId::new("erin")).await);

    let first = assert_ok!(f.journal.set_todays_mood(&profile, 5, None).await);
    f.clock.advance(Duration::seconds(30));
    let second = assert_ok!(f.journal.set_todays_mood(&profile, 7, None).await);

    let rows = assert_ok!(f.storage.query_range(&profile, oct(15), oct(15)).await);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].mood_level, MoodLevel::Tired);
    assert_eq!(second.id, first.id);
    assert_eq!(second.created_at, first.created_at);
    assert!(second.updated_at > first.updated_at);
}

#[tokio::test]
async fn test_mood_for_unknown_profile_is_not_found() {
    let f = fixture();
    let err = assert_err!(f.journal.set_todays_mood(&ProfileId::new(), 2, None).await);
    assert!(matches!(err, JournalError::NotFound(_)));
}

#[tokio::test]
async fn test_mood_and_streak_do_not_touch_each_other() {
    let f = fixture();
    let user = UserId::new("frank");
    let profile = assert_ok!(f.storage.resolve_profile(&user).await);

    assert_ok!(f.journal.set_todays_mood(&profile, 1, None).await);
    assert_eq!(f.streaks.get_user_streak(&user).await, 0);

    f.streaks.update_user_streak(&user).await;
    assert!(assert_ok!(f.journal.get_todays_mood(&profile).await).is_some());
    assert_eq!(assert_ok!(f.storage.resolve_profile(&user).await), profile);
}

#[tokio::test]
async fn test_monthly_stats_for_a_populated_month() {
    let f = fixture();
    let profile = assert_ok!(f.storage.resolve_profile(&UserId::new("gina")).await);

    // Oct 1..=15 with a gap on the 8th; levels cycle through 1..=7
    f.clock.set(
        NaiveDate::from_ymd_opt(2024, 10, 1).unwrap().and_hms_opt(20, 0, 0).unwrap().and_utc().fixed_offset(),
    );
    for day in 1..=15u32 {
        if day != 8 {
            let level = i64::from((day - 1) % 7 + 1);
            assert_ok!(f.journal.set_todays_mood(&profile, level, None).await);
        }
        if day < 15 {
            f.clock.advance(Duration::days(1));
        }
    }

    let stats = assert_ok!(f.journal.get_monthly_stats(&profile, 2024, 10).await);
    assert_eq!(stats.total_entries, 14);
    assert_eq!(stats.current_streak, 7);
    assert_eq!(stats.longest_streak, 7);

    let counted: u32 = stats.distribution.iter().map(|b| b.count).sum();
    assert_eq!(counted, 14);

    let percent: u32 = stats.distribution.iter().map(|b| b.percentage).sum();
    assert!((96..=104).contains(&percent), "percentages summed to {}", percent);
}

#[tokio::test]
async fn test_empty_month_snapshot() {
    let f = fixture();
    let profile = assert_ok!(f.storage.resolve_profile(&UserId::new("hank")).await);

    let stats = assert_ok!(f.journal.get_monthly_stats(&profile, 2024, 2).await);
    assert_eq!(stats.total_entries, 0);
    assert_eq!(stats.average_mood, 0.0);
    assert_eq!(stats.current_streak, 0);
    assert_eq!(stats.longest_streak, 0);
    assert!(stats.distribution.iter().all(|b| b.count == 0 && b.percentage == 0));
}

#[tokio::test]
async fn test_data_survives_reopen() {
    let db = NamedTempFile::new().expect("Failed to create temp file");
    let user = UserId::new("ivy");

    let profile = {
        let storage = SqliteStorage::new(db.path().to_path_buf()).unwrap();
        let profile = storage.resolve_profile(&user).await.unwrap();
        storage
            .write_profile(&StreakState {
                user_id: user.clone(),
                streak: 4,
                last_activity_day: Some(oct(15)),
            })
            .await
            .unwrap();
        profile
    };

    let reopened = SqliteStorage::new(db.path().to_path_buf()).unwrap();
    assert_eq!(reopened.resolve_profile(&user).await.unwrap(), profile);
    assert_eq!(reopened.read_profile(&user).await.unwrap().streak, 4);
}

#[tokio::test]
async fn test_current_streak_runs_across_months() {
    let f = fixture();
    let profile = assert_ok!(f.storage.resolve_profile(&UserId::new("jude")).await);

    // Sept 25 through Oct 2, one entry a day
    f.clock.set(
        NaiveDate::from_ymd_opt(2024, 9, 25).unwrap().and_hms_opt(19, 0, 0).unwrap().and_utc().fixed_offset(),
    );
    for day in 0..8 {
        if day > 0 {
            f.clock.advance(Duration::days(1));
        }
        assert_ok!(f.journal.set_todays_mood(&profile, 4, None).await);
    }

    let october = assert_ok!(f.journal.get_monthly_stats(&profile, 2024, 10).await);
    assert_eq!(october.total_entries, 2);
    assert_eq!(october.current_streak, 8);
    assert_eq!(october.longest_streak, 2);

    let september = assert_ok!(f.journal.get_monthly_stats(&profile, 2024, 9).await);
    assert_eq!(september.total_entries, 6);
    assert_eq!(september.current_streak, 8);
}
