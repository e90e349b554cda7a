/// Domain module containing core business logic and data types
///
/// This module defines the core entities (MoodEntry, StreakState, MoodLevel),
/// the calendar-day rules they are keyed on, and their validation errors.

pub mod calendar;
pub mod entry;
pub mod mood;
pub mod streak;
pub mod types;

// Re-export public types for easy access
pub use calendar::*;
pub use entry::*;
pub use mood::*;
pub use streak::*;
pub use types::*;

use thiserror::Error;

/// Errors that can occur during domain operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid mood level: {0} (expected 1-8)")]
    InvalidMoodLevel(i64),

    #[error("Notes cannot be longer than {max} characters (got {actual})")]
    NotesTooLong { max: usize, actual: usize },

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid value: {message}")]
    InvalidValue { message: String },
}
