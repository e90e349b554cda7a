/// Daily activity streak rules
///
/// This module defines the persisted streak state for a user and the pure
/// continuity rules that move it forward on each qualifying activity. Stores
/// and clocks live elsewhere; everything here is a function of its inputs.

use serde::{Deserialize, Serialize};
use chrono::NaiveDate;
use crate::domain::UserId;

/// Persisted streak fields on a user's profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakState {
    /// Which user this streak belongs to
    pub user_id: UserId,
    /// Consecutive calendar days with at least one qualifying activity
    pub streak: u32,
    /// Calendar day of the most recent qualifying activity (None if never active)
    pub last_activity_day: Option<NaiveDate>,
}

/// How a new activity relates to the previous one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuity {
    /// No previous activity recorded
    First,
    /// Already active today
    SameDay,
    /// Active yesterday, streak continues
    NextDay,
    /// One or more days were missed
    Gap(i64),
    /// Last activity is in the future (clock skew or bad data)
    Skewed(i64),
}

impl Continuity {
    /// Classify the day difference between the last activity and today
    pub fn between(last_activity_day: Option<NaiveDate>, today: NaiveDate) -> Self {
        let Some(last) = last_activity_day else {
            return Continuity::First;
        };

        match (today - last).num_days() {
            0 => Continuity::SameDay,
            1 => Continuity::NextDay,
            diff if diff > 1 => Continuity::Gap(diff),
            diff => Continuity::Skewed(diff),
        }
    }
}

impl StreakState {
    /// Create a state for a user with no recorded activity
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            streak: 0,
            last_activity_day: None,
        }
    }

    /// State for a user starting fresh today
    pub fn started(user_id: UserId, today: NaiveDate) -> Self {
        Self {
            user_id,
            streak: 1,
            last_activity_day: Some(today),
        }
    }

    /// Apply an activity on `today` and return the resulting state
    ///
    /// Calling this repeatedly with the same `today` yields the same streak.
    pub fn advance(&self, today: NaiveDate) -> Self {
        let streak = match Continuity::between(self.last_activity_day, today) {
            Continuity::First => 1,
            Continuity::SameDay => self.streak.max(1),
            Continuity::NextDay => self.streak.saturating_add(1),
            Continuity::Gap(_) | Continuity::Skewed(_) => 1,
        };

        Self {
            user_id: self.user_id.clone(),
            streak,
            last_activity_day: Some(today),
        }
    }

    /// Get a motivational message based on current streak length
    pub fn motivational_message(&self) -> String {
        motivational_message(self.streak)
    }
}

/// Encouragement shown alongside a streak of `streak` days
pub fn motivational_message(streak: u32) -> String {
    match streak {
        0 => "Ready to start your streak! Every journey begins with a single step.".to_string(),
        1 => "Great start! One day down, keep the momentum going.".to_string(),
        2..=6 => format!("Nice work! {} days in a row. You're building a strong routine.", streak),
        7..=13 => format!("Excellent! {} days strong. You're in the groove now!", streak),
        14..=29 => format!("Amazing! {} days straight. This is becoming second nature.", streak),
        30..=99 => format!("Incredible! {} days of consistency. You're unstoppable!", streak),
        _ => format!("Legendary! {} days of unwavering commitment. You're an inspiration!", streak),
    }
}
