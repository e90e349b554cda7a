/// Streak continuity rules checked over a range of starting states
use chrono::{Duration, NaiveDate};
use mood_journal_mcp::*;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
}

fn state(streak: u32, last: Option<NaiveDate>) -> StreakState {
    StreakState {
        user_id: UserId::new("rules"),
        streak,
        last_activity_day: last,
    }
}

#[test]
fn test_same_day_calls_are_idempotent_for_all_states() {
    for streak in [0, 1, 2, 17, 365] {
        for days_ago in [-3, 0, 1, 2, 30] {
            let start = state(streak, Some(today() - Duration::days(days_ago)));
            let once = start.advance(today());
            assert_eq!(once.advance(today()), once, "streak {} days_ago {}", streak, days_ago);
        }
        let fresh = state(streak, None).advance(today());
        assert_eq!(fresh.advance(today()), fresh);
    }
}

#[test]
fn test_consecutive_day_adds_one() {
    for streak in [1, 5, 99] {
        let next = state(streak, Some(today() - Duration::days(1))).advance(today());
        assert_eq!(next.streak, streak + 1);
    }
}

#[test]
fn test_two_or_more_days_resets() {
    for days_ago in [2, 3, 10, 400] {
        let next = state(50, Some(today() - Duration::days(days_ago))).advance(today());
        assert_eq!(next.streak, 1);
    }
}

#[test]
fn test_year_boundary_counts_as_consecutive() {
    let new_years_eve = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
    assert_eq!(state(3, Some(new_years_eve)).advance(today()).streak, 4);
}
