/// Tool for monthly mood statistics

use chrono::Datelike;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::analytics::{MoodStatsAggregator, MoodStatsSnapshot};
use crate::domain::{day_key, month_bounds, Clock, ProfileId};
use crate::journal::{JournalError, MoodJournal};

/// Parameters for monthly statistics; omitted fields default to the current month
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct MonthlyStatsParams {
    /// Four-digit year
    pub year: Option<i32>,
    /// Month 1-12
    pub month: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct MonthlyStatsResponse {
    pub year: i32,
    pub month: u32,
    pub stats: MoodStatsSnapshot,
    pub message: String,
}

pub async fn monthly_stats(
    journal: &MoodJournal,
    clock: &dyn Clock,
    profile_id: Option<&ProfileId>,
    params: MonthlyStatsParams,
) -> Result<MonthlyStatsResponse, JournalError> {
    let now = clock.now();
    let year = params.year.unwrap_or_else(|| now.year());
    let month = params.month.unwrap_or_else(|| now.month());

    let stats = match profile_id {
        Some(profile_id) => journal.get_monthly_stats(profile_id, year, month).await?,
        None => {
            // no profile means no entries, but the month must still be valid
            month_bounds(year, month)?;
            MoodStatsAggregator::new().snapshot(&[], &[], day_key(&now))
        }
    };
    let message = format_stats(year, month, &stats);

    Ok(MonthlyStatsResponse {
        year,
        month,
        stats,
        message,
    })
}

fn format_stats(year: i32, month: u32, stats: &MoodStatsSnapshot) -> String {
    if stats.total_entries == 0 {
        return format!("No moods recorded for {}-{:02}.", year, month);
    }

    let distribution = stats
        .distribution
        .iter()
        .filter(|b| b.count > 0)
        .map(|b| format!("  {} {}: {} ({}%)", b.emoji, b.label, b.count, b.percentage))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "📊 **Mood stats for {}-{:02}**\n- Entries: {}\n- Average mood: {:.1}\n- Current streak: {} day(s)\n- Longest streak: {} day(s)\n\n{}",
        year,
        month,
        stats.total_entries,
        stats.average_mood,
        stats.current_streak,
        stats.longest_streak,
        distribution
    )
}
