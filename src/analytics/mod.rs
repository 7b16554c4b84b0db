//! # Metrics analytics engine
//!
//! Pure functions over a slice of [`DailyEntry`] records. Nothing in this
//! module touches storage or the clock: callers fetch entries, pick `now`,
//! and hand both in.
//!
//! - [`metrics`]: the fixed metric definition table and lookups
//! - [`rollup`]: weekly/monthly totals and the trailing-months window
//! - [`score`]: relationship health score and good-day streaks
//! - [`progress`]: weekly goal progress, weekly scores, goal achievement,
//!   trend and insights

pub mod metrics;
pub mod progress;
pub mod rollup;
pub mod score;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::models::entry::DailyEntry;
use progress::{GoalAchievement, TrendPoint, WeeklyProgress};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSnapshot {
    pub health_score: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub weekly_progress_series: Vec<WeeklyProgress>,
    pub goal_achievement: Vec<GoalAchievement>,
    pub trend_series: Vec<TrendPoint>,
    pub insights: Vec<String>,
}

/// Every derived view over an already windowed entry sequence.
pub fn build_snapshot(entries: &[DailyEntry], now: NaiveDateTime) -> AnalyticsSnapshot {
    let health_score = score::compute_health_score(entries);
    let streaks = score::compute_streaks(entries, now);

    AnalyticsSnapshot {
        health_score,
        current_streak: streaks.current,
        longest_streak: streaks.longest,
        weekly_progress_series: progress::compute_weekly_progress_series(entries),
        goal_achievement: progress::compute_goal_achievement(entries),
        trend_series: progress::compute_trend_series(entries),
        insights: progress::generate_insights(entries, health_score),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    #[test]
    fn test_snapshot_of_nothing() {
        let now = NaiveDate::from_ymd_opt(2024, 1, 8)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let snapshot = build_snapshot(&[], now);
        assert_eq!(snapshot.health_score, 0);
        assert_eq!(snapshot.current_streak, 0);
        assert_eq!(snapshot.longest_streak, 0);
        assert!(snapshot.weekly_progress_series.is_empty());
        assert!(snapshot.trend_series.is_empty());
        assert_eq!(snapshot.goal_achievement.len(), 5);
        assert_eq!(snapshot.insights.len(), 1);
    }

    #[test]
    fn test_snapshot_is_deterministic() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let entries: Vec<DailyEntry> = (0..14)
            .map(|i| DailyEntry {
                love_count: (i % 3) as i32,
                quality_time_hours: 1.5 * (i % 4) as f64,
                dishes_done: (i % 2) as i32,
                trash_out_hours: (i % 5) as f64,
                pet_care_duties: 1,
                ..DailyEntry::empty(start + Duration::days(i))
            })
            .collect();
        let now = (start + Duration::days(13)).and_hms_opt(21, 0, 0).unwrap();

        let first = build_snapshot(&entries, now);
        let second = build_snapshot(&entries, now);
        assert_eq!(first, second);
        assert!(first.health_score <= 100);
        assert_eq!(first.trend_series.len(), 14);
        assert!(!first.insights.is_empty() && first.insights.len() <= 4);

        let json = serde_json::to_value(&first).unwrap();
        assert!(json.get("healthScore").is_some());
        assert!(json.get("weeklyProgressSeries").is_some());
    }
}
