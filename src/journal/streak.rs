/// Login streak tracking
///
/// Streak failures never reach the caller: a login must not fail because
/// the streak could not be read or written. Errors are logged and the
/// tracker falls back to a fresh streak of one.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::{day_key, Clock, StreakState, UserId};
use crate::storage::ProfileStore;

pub struct StreakTracker {
    store: Arc<dyn ProfileStore>,
    clock: Arc<dyn Clock>,
}

impl StreakTracker {
    pub fn new(store: Arc<dyn ProfileStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Current stored streak, without touching it
    ///
    /// Unknown users and unreadable profiles report 0.
    pub async fn get_user_streak(&self, user_id: &UserId) -> u32 {
        match self.store.read_profile(user_id).await {
            Ok(state) => state.streak,
            Err(e) if e.is_not_found() => 0,
            Err(e) => {
                warn!("Failed to read streak for user {}: {}", user_id, e);
                0
            }
        }
    }

    /// Record a qualifying activity for today and return the new streak
    pub async fn update_user_streak(&self, user_id: &UserId) -> u32 {
        let today = day_key(&self.clock.now());

        let previous = match self.store.read_profile(user_id).await {
            Ok(state) => state,
            Err(e) if e.is_not_found() => StreakState::new(user_id.clone()),
            Err(e) => {
                warn!("Failed to read streak for user {}, starting a new one: {}", user_id, e);
                return self.initialize_user_streak(user_id).await;
            }
        };

        let next = previous.advance(today);
        if next == previous {
            debug!("Streak for user {} already counted today ({})", user_id, next.streak);
            return next.streak;
        }

        if let Err(e) = self.store.write_profile(&next).await {
            warn!("Failed to persist streak {} for user {}: {}", next.streak, user_id, e);
        } else {
            debug!("Streak for user {} is now {}", user_id, next.streak);
        }

        next.streak
    }

    /// Start the user's streak at one as of today
    pub async fn initialize_user_streak(&self, user_id: &UserId) -> u32 {
        let today = day_key(&self.clock.now());
        let state = StreakState::started(user_id.clone(), today);

        if let Err(e) = self.store.write_profile(&state).await {
            warn!("Failed to initialize streak for user {}: {}", user_id, e);
        }

        state.streak
    }
}
