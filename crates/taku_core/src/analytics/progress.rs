//! Weekly and monthly goal progress derivation.
//!
//! # Responsibility
//! - Sum trailing-window activity against the workspace's goals.
//!
//! # Invariants
//! - Windows trail the given `now` instant; they are not calendar-aligned.
//! - Percentages are capped at 100.

use crate::model::workspace::Workspace;

const WEEK_MS: i64 = 7 * 24 * 60 * 60 * 1000;
const MONTH_MS: i64 = 30 * 24 * 60 * 60 * 1000;

/// Tracked hours against the persisted weekly goal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeeklyProgress {
    pub hours: f64,
    pub goal_hours: u32,
    pub percent: f64,
}

/// Completed tasks against an ephemeral monthly goal.
///
/// The goal is caller-supplied UI state, not a persisted workspace field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlyProgress {
    pub done_count: u32,
    pub goal: u32,
    pub percent: f64,
}

/// Sums entry minutes with `start_time` in the trailing 7 days and relates
/// the hours to the workspace's weekly goal.
pub fn weekly_progress(workspace: &Workspace, now_ms: i64) -> WeeklyProgress {
    let window_start = now_ms - WEEK_MS;
    let minutes: i64 = workspace
        .time_entries
        .iter()
        .filter(|entry| entry.start_time >= window_start && entry.start_time <= now_ms)
        .map(|entry| entry.duration)
        .sum();

    let hours = minutes as f64 / 60.0;
    let goal_hours = workspace.weekly_goals;
    WeeklyProgress {
        hours,
        goal_hours,
        percent: capped_percent(hours, goal_hours),
    }
}

/// Counts terminal-column tasks updated in the trailing 30 days and relates
/// the count to the given goal.
pub fn monthly_task_progress(workspace: &Workspace, goal: u32, now_ms: i64) -> MonthlyProgress {
    let window_start = now_ms - MONTH_MS;
    let done_count = workspace
        .tasks
        .iter()
        .filter(|task| {
            task.is_done() && task.updated_at >= window_start && task.updated_at <= now_ms
        })
        .count() as u32;

    MonthlyProgress {
        done_count,
        goal,
        percent: capped_percent(done_count as f64, goal),
    }
}

fn capped_percent(value: f64, goal: u32) -> f64 {
    if goal == 0 {
        return 0.0;
    }
    (value / goal as f64 * 100.0).min(100.0)
}
