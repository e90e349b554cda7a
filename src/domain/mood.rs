/// The fixed catalogue of mood levels
///
/// Each of the eight levels is bound to one emoji and one label. The numeric
/// code is what gets persisted and averaged; emoji and label are copied onto
/// every entry so history renders the same even if display strings change.

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// One of the eight selectable moods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum MoodLevel {
    Happy = 1,
    Calm = 2,
    Neutral = 3,
    Sad = 4,
    Anxious = 5,
    Angry = 6,
    Tired = 7,
    Excited = 8,
}

impl MoodLevel {
    /// All levels in code order
    pub const ALL: [MoodLevel; 8] = [
        MoodLevel::Happy,
        MoodLevel::Calm,
        MoodLevel::Neutral,
        MoodLevel::Sad,
        MoodLevel::Anxious,
        MoodLevel::Angry,
        MoodLevel::Tired,
        MoodLevel::Excited,
    ];

    /// Look up a level by its numeric code
    pub fn from_code(code: i64) -> Result<Self, DomainError> {
        match code {
            1 => Ok(MoodLevel::Happy),
            2 => Ok(MoodLevel::Calm),
            3 => Ok(MoodLevel::Neutral),
            4 => Ok(MoodLevel::Sad),
            5 => Ok(MoodLevel::Anxious),
            6 => Ok(MoodLevel::Angry),
            7 => Ok(MoodLevel::Tired),
            8 => Ok(MoodLevel::Excited),
            other => Err(DomainError::InvalidMoodLevel(other)),
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn emoji(self) -> &'static str {
        match self {
            MoodLevel::Happy => "😊",
            MoodLevel::Calm => "😌",
            MoodLevel::Neutral => "😐",
            MoodLevel::Sad => "😔",
            MoodLevel::Anxious => "😰",
            MoodLevel::Angry => "😠",
            MoodLevel::Tired => "😴",
            MoodLevel::Excited => "🤩",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MoodLevel::Happy => "Happy",
            MoodLevel::Calm => "Calm",
            MoodLevel::Neutral => "Neutral",
            MoodLevel::Sad => "Sad",
            MoodLevel::Anxious => "Anxious",
            MoodLevel::Angry => "Angry",
            MoodLevel::Tired => "Tired",
            MoodLevel::Excited => "Excited",
        }
    }

    /// Zero-based position, used to index distribution buckets
    pub fn index(self) -> usize {
        self.code() as usize - 1
    }
}

impl TryFrom<u8> for MoodLevel {
    type Error = DomainError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::from_code(i64::from(code))
    }
}

impl From<MoodLevel> for u8 {
    fn from(level: MoodLevel) -> Self {
        level.code()
    }
}
