//! Daily activity heatmap and streak derivation.
//!
//! # Responsibility
//! - Bucket tracked minutes and completed tasks per calendar day.
//! - Map minutes to a 0-4 activity level and derive streak lengths.
//!
//! # Invariants
//! - The heatmap spans January 1st of `today`'s year through `today`.
//! - Activity level is a stepped lookup: the highest matching threshold wins.
//! - The current streak is 0 whenever today itself has no activity.

use crate::model::workspace::Workspace;
use chrono::{Datelike, Days, NaiveDate, TimeZone, Utc};
use std::collections::HashMap;

/// How far back the current-streak walk looks, in days.
const STREAK_LOOKBACK_DAYS: u64 = 366;

/// One heatmap cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeatmapDay {
    pub date: NaiveDate,
    /// Tracked minutes summed from entries starting on this day.
    pub minutes: i64,
    /// Tasks sitting in the terminal column whose last update fell on this day.
    pub tasks_done: u32,
    /// Stepped activity level 0-4 derived from `minutes`.
    pub level: u8,
}

/// Maps tracked minutes to the 0-4 activity level.
pub fn activity_level(minutes: i64) -> u8 {
    if minutes >= 480 {
        4
    } else if minutes >= 240 {
        3
    } else if minutes >= 120 {
        2
    } else if minutes > 0 {
        1
    } else {
        0
    }
}

/// Builds the per-day heatmap from January 1st of `today`'s year to `today`.
pub fn build_heatmap(workspace: &Workspace, today: NaiveDate) -> Vec<HeatmapDay> {
    let Some(year_start) = NaiveDate::from_ymd_opt(today.year(), 1, 1) else {
        return Vec::new();
    };

    let mut minutes_by_day: HashMap<NaiveDate, i64> = HashMap::new();
    for entry in &workspace.time_entries {
        if let Some(day) = day_of(entry.start_time) {
            *minutes_by_day.entry(day).or_insert(0) += entry.duration;
        }
    }

    let mut done_by_day: HashMap<NaiveDate, u32> = HashMap::new();
    for task in &workspace.tasks {
        if !task.is_done() {
            continue;
        }
        if let Some(day) = day_of(task.updated_at) {
            *done_by_day.entry(day).or_insert(0) += 1;
        }
    }

    year_start
        .iter_days()
        .take_while(|day| *day <= today)
        .map(|date| {
            let minutes = minutes_by_day.get(&date).copied().unwrap_or(0);
            HeatmapDay {
                date,
                minutes,
                tasks_done: done_by_day.get(&date).copied().unwrap_or(0),
                level: activity_level(minutes),
            }
        })
        .collect()
}

/// Length of the unbroken run of active days ending today.
///
/// Walks backward from `today` for up to 366 days and stops at the first day
/// with level 0; an inactive today short-circuits to 0.
pub fn current_streak(heatmap: &[HeatmapDay], today: NaiveDate) -> u32 {
    let levels: HashMap<NaiveDate, u8> = heatmap
        .iter()
        .map(|day| (day.date, day.level))
        .collect();

    let mut streak = 0;
    for offset in 0..STREAK_LOOKBACK_DAYS {
        let Some(date) = today.checked_sub_days(Days::new(offset)) else {
            break;
        };
        let level = levels.get(&date).copied().unwrap_or(0);
        if level == 0 {
            break;
        }
        streak += 1;
    }
    streak
}

/// Longest run of consecutive active days anywhere in the heatmap.
pub fn longest_streak(heatmap: &[HeatmapDay]) -> u32 {
    let mut longest = 0;
    let mut run = 0;
    for day in heatmap {
        if day.level > 0 {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    longest
}

/// UTC calendar day containing the given epoch-millisecond instant.
pub(crate) fn day_of(epoch_ms: i64) -> Option<NaiveDate> {
    Utc.timestamp_millis_opt(epoch_ms)
        .single()
        .map(|instant| instant.date_naive())
}

#[cfg(test)]
mod tests {
    use super::activity_level;

    #[test]
    fn activity_level_uses_highest_matching_threshold() {
        assert_eq!(activity_level(0), 0);
        assert_eq!(activity_level(1), 1);
        assert_eq!(activity_level(119), 1);
        assert_eq!(activity_level(120), 2);
        assert_eq!(activity_level(239), 2);
        assert_eq!(activity_level(240), 3);
        assert_eq!(activity_level(479), 3);
        assert_eq!(activity_level(480), 4);
        assert_eq!(activity_level(10_000), 4);
    }
}
