/// Mood statistics over a set of journal entries
///
/// Snapshots are derived on every request and never persisted. Two streak
/// figures are reported and they are deliberately computed differently:
///
/// - `current_streak` walks calendar days backwards from today (at most 30)
///   and needs exactly one entry per day. It reads its own recent entry set,
///   so it does not depend on the period being summarised.
/// - `longest_streak` scans the period's entries in order and compares the
///   raw timestamp gap between neighbours (entry date at UTC midnight),
///   extending only when the gap is exactly one day.
///
/// The two can disagree, e.g. a 40-day run reports a current streak of 30.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::{midnight, MoodEntry, MoodLevel};

/// How far back `current_streak` looks, in calendar days
pub const CURRENT_STREAK_WINDOW_DAYS: u32 = 30;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Count and share of one mood level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionBucket {
    pub level: MoodLevel,
    pub emoji: String,
    pub label: String,
    pub count: u32,
    /// Rounded independently per bucket, so buckets need not sum to 100
    pub percentage: u32,
}

/// Read-only statistics for a profile over a period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodStatsSnapshot {
    pub total_entries: u32,
    /// Mean mood code rounded to one decimal, 0.0 when empty
    pub average_mood: f64,
    /// One bucket per level, in level order
    pub distribution: Vec<DistributionBucket>,
    pub current_streak: u32,
    pub longest_streak: u32,
}

/// Computes [`MoodStatsSnapshot`]s from entry sets
#[derive(Debug, Default, Clone, Copy)]
pub struct MoodStatsAggregator;

impl MoodStatsAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Build a snapshot of `period` as seen on `today`
    ///
    /// `recent` feeds the current streak and should cover at least the last
    /// [`CURRENT_STREAK_WINDOW_DAYS`] days up to `today`.
    pub fn snapshot(
        &self,
        period: &[MoodEntry],
        recent: &[MoodEntry],
        today: NaiveDate,
    ) -> MoodStatsSnapshot {
        MoodStatsSnapshot {
            total_entries: period.len() as u32,
            average_mood: Self::average_mood(period),
            distribution: Self::distribution(period),
            current_streak: Self::current_streak(recent, today),
            longest_streak: Self::longest_streak(period),
        }
    }

    fn average_mood(entries: &[MoodEntry]) -> f64 {
        if entries.is_empty() {
            return 0.0;
        }

        let sum: u32 = entries.iter().map(|e| u32::from(e.mood_level.code())).sum();
        let mean = f64::from(sum) / entries.len() as f64;
        (mean * 10.0).round() / 10.0
    }

    fn distribution(entries: &[MoodEntry]) -> Vec<DistributionBucket> {
        let mut counts = [0u32; MoodLevel::ALL.len()];
        for entry in entries {
            counts[entry.mood_level.index()] += 1;
        }

        let total = entries.len() as f64;
        MoodLevel::ALL
            .iter()
            .map(|&level| {
                let count = counts[level.index()];
                let percentage = if total > 0.0 {
                    (f64::from(count) / total * 100.0).round() as u32
                } else {
                    0
                };

                DistributionBucket {
                    level,
                    emoji: level.emoji().to_string(),
                    label: level.label().to_string(),
                    count,
                    percentage,
                }
            })
            .collect()
    }

    /// Contiguous days ending today with exactly one entry each
    fn current_streak(entries: &[MoodEntry], today: NaiveDate) -> u32 {
        let mut per_day: HashMap<NaiveDate, u32> = HashMap::new();
        for entry in entries {
            *per_day.entry(entry.entry_date).or_default() += 1;
        }

        let mut streak = 0;
        let mut checking_date = today;
        for _ in 0..CURRENT_STREAK_WINDOW_DAYS {
            if per_day.get(&checking_date) != Some(&1) {
                break;
            }
            streak += 1;
            checking_date -= Duration::days(1);
        }

        streak
    }

    /// Longest run of neighbouring entries exactly one day apart
    fn longest_streak(entries: &[MoodEntry]) -> u32 {
        let mut stamps: Vec<i64> = entries
            .iter()
            .map(|e| midnight(e.entry_date).and_utc().timestamp_millis())
            .collect();
        stamps.sort_unstable();

        let Some((&first, rest)) = stamps.split_first() else {
            return 0;
        };

        let mut longest = 1;
        let mut running = 1;
        let mut previous = first;
        for &stamp in rest {
            let gap_days = (stamp - previous) as f64 / MILLIS_PER_DAY;
            if gap_days == 1.0 {
                running += 1;
            } else {
                running = 1;
            }
            longest = longest.max(running);
            previous = stamp;
        }

        longest
    }
}
