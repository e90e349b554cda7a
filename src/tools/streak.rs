/// Tools for reading and advancing the session user's login streak
///
/// These never fail: streak problems are logged by the tracker and the
/// user just sees a streak of 0 or 1.

use serde::Serialize;

use crate::domain::{motivational_message, UserId};
use crate::journal::StreakTracker;

/// Response from any of the streak tools
#[derive(Debug, Serialize)]
pub struct StreakResponse {
    pub streak: u32,
    pub message: String,
}

impl StreakResponse {
    fn new(streak: u32, headline: &str) -> Self {
        Self {
            streak,
            message: format!(
                "🔥 {}: {} day{}\n{}",
                headline,
                streak,
                if streak == 1 { "" } else { "s" },
                motivational_message(streak)
            ),
        }
    }
}

/// Show the current streak without recording activity
pub async fn get_streak(tracker: &StreakTracker, user_id: &UserId) -> StreakResponse {
    let streak = tracker.get_user_streak(user_id).await;
    StreakResponse::new(streak, "Current streak")
}

/// Record today's activity
pub async fn update_streak(tracker: &StreakTracker, user_id: &UserId) -> StreakResponse {
    let streak = tracker.update_user_streak(user_id).await;
    StreakResponse::new(streak, "Activity recorded! Streak")
}

/// Restart the streak from today
pub async fn initialize_streak(tracker: &StreakTracker, user_id: &UserId) -> StreakResponse {
    let streak = tracker.initialize_user_streak(user_id).await;
    StreakResponse::new(streak, "Streak started")
}
