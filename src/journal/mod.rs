/// Services exposed to callers: the streak tracker and the mood journal
///
/// Both are stateless apart from their injected stores and clock, so any
/// number of them can share one storage backend.

pub mod mood;
pub mod session;
pub mod streak;

pub use mood::{MoodJournal, MAX_RECENT_DAYS};
pub use session::{SessionProvider, StaticSession};
pub use streak::StreakTracker;

use thiserror::Error;

use crate::domain::DomainError;
use crate::storage::StorageError;

/// Errors surfaced by journal operations
#[derive(Error, Debug)]
pub enum JournalError {
    #[error("Validation error: {0}")]
    Validation(#[from] DomainError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Store error: {0}")]
    Store(StorageError),

    #[error("Conflict: {0}")]
    Conflict(String),
}

impl From<StorageError> for JournalError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::ProfileNotFound { .. } | StorageError::EntryNotFound { .. } => {
                JournalError::NotFound(err.to_string())
            }
            StorageError::Conflict { .. } => JournalError::Conflict(err.to_string()),
            other => JournalError::Store(other),
        }
    }
}
