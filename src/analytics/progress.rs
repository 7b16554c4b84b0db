use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::analytics::metrics::{GoalDirection, MetricDefinition, MetricKey, METRIC_DEFINITIONS};
use crate::analytics::rollup::{week_start, WeeklyRollup};
use crate::models::entry::DailyEntry;

const PROGRESS_WEEKS: usize = 8;
const MAX_INSIGHTS: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyProgress {
    pub week_start: NaiveDate,
    pub love_score: f64,
    pub chore_score: f64,
    pub overall_score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalAchievement {
    pub metric: MetricKey,
    pub label: &'static str,
    pub achieved_count: usize,
    pub total_count: usize,
    pub percentage: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub date: NaiveDate,
    /// Display label such as "Jan 7".
    pub label: String,
    pub love_subscore: f64,
    pub chore_subscore: f64,
    pub overall_subscore: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    pub metric: MetricKey,
    pub label: &'static str,
    pub value: f64,
    pub goal: f64,
    pub percent: f64,
    pub complete: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyGoalProgress {
    pub week_start: NaiveDate,
    pub metrics: Vec<GoalProgress>,
    /// Mean of the per-metric percents, rounded.
    pub overall_percent: u32,
}

/// Love and chore scores for each of the last eight weeks that have data,
/// oldest first. Weeks run Sunday to Saturday.
pub fn compute_weekly_progress_series(entries: &[DailyEntry]) -> Vec<WeeklyProgress> {
    let mut weeks: BTreeMap<NaiveDate, Vec<&DailyEntry>> = BTreeMap::new();
    for entry in entries {
        weeks.entry(week_start(entry.date)).or_default().push(entry);
    }

    let skip = weeks.len().saturating_sub(PROGRESS_WEEKS);
    weeks
        .into_iter()
        .skip(skip)
        .map(|(start, week)| {
            let love_total: i64 = week.iter().map(|e| e.love_count as i64).sum();
            let dish_days = week.iter().filter(|e| e.dishes_done > 0).count();

            let love_score = (love_total as f64 / 2.0 * 100.0).min(100.0);
            let chore_score = (dish_days as f64 / 7.0 * 100.0).min(100.0);

            WeeklyProgress {
                week_start: start,
                love_score,
                chore_score,
                overall_score: ((love_score + chore_score) / 2.0).round() as u32,
            }
        })
        .collect()
}

/// Share of days on which each metric met its per-day slice of the weekly goal.
pub fn compute_goal_achievement(entries: &[DailyEntry]) -> Vec<GoalAchievement> {
    let total = entries.len();

    METRIC_DEFINITIONS
        .iter()
        .map(|def| {
            let achieved = entries
                .iter()
                .filter(|e| def.meets_daily_target(def.key.value(e)))
                .count();
            let percentage = if total > 0 {
                (achieved as f64 / total as f64 * 100.0).round() as u32
            } else {
                0
            };

            GoalAchievement {
                metric: def.key,
                label: def.display_label,
                achieved_count: achieved,
                total_count: total,
                percentage,
            }
        })
        .collect()
}

pub fn compute_trend_series(entries: &[DailyEntry]) -> Vec<TrendPoint> {
    let mut sorted: Vec<&DailyEntry> = entries.iter().collect();
    sorted.sort_by_key(|e| e.date);

    sorted
        .into_iter()
        .map(|e| {
            let love_subscore = e.love_count as f64 * 50.0 + e.quality_time_hours * 10.0;
            let chore_subscore = e.dishes_done as f64 * 25.0
                + e.pet_care_duties as f64 * 20.0
                + (50.0 - e.trash_out_hours * 10.0).max(0.0);

            TrendPoint {
                date: e.date,
                label: e.date.format("%b %-d").to_string(),
                love_subscore,
                chore_subscore,
                overall_subscore: ((love_subscore + chore_subscore) / 2.0).round() as u32,
            }
        })
        .collect()
}

/// Percent of a weekly goal reached, in `[0, 100]`. For lower-is-better
/// metrics the percent falls as the value approaches the goal ceiling.
pub fn goal_progress_percent(definition: &MetricDefinition, value: f64) -> f64 {
    let goal = definition.weekly_goal;
    if goal <= 0.0 {
        return 100.0;
    }
    let ratio = value / goal * 100.0;
    match definition.goal_direction {
        GoalDirection::HigherIsBetter => ratio.min(100.0),
        GoalDirection::LowerIsBetter => (100.0 - ratio).max(0.0),
    }
}

pub fn compute_weekly_goal_progress(rollup: &WeeklyRollup) -> WeeklyGoalProgress {
    let metrics: Vec<GoalProgress> = METRIC_DEFINITIONS
        .iter()
        .map(|def| {
            let value = rollup.value(def.key);
            let percent = goal_progress_percent(def, value);
            GoalProgress {
                metric: def.key,
                label: def.display_label,
                value,
                goal: def.weekly_goal,
                percent,
                complete: percent >= 100.0,
            }
        })
        .collect();

    let overall = metrics.iter().map(|m| m.percent).sum::<f64>() / metrics.len() as f64;

    WeeklyGoalProgress {
        week_start: rollup.week_start,
        metrics,
        overall_percent: overall.round() as u32,
    }
}

fn health_band_message(health_score: u32) -> &'static str {
    match health_score {
        85.. => "Your relationship is thriving! Keep up the amazing work together.",
        70..=84 => "Things are going well. A little extra attention will push you even higher.",
        50..=69 => "You're on a steady path, but a few habits could use some love.",
        _ => "This has been a tough stretch. Small, consistent steps will help you reconnect.",
    }
}

/// Ordered observations: the health band first, then up to three suggestions.
pub fn generate_insights(entries: &[DailyEntry], health_score: u32) -> Vec<String> {
    let mut insights = vec![health_band_message(health_score).to_string()];

    if !entries.is_empty() {
        let days = entries.len() as f64;
        let avg_love = entries.iter().map(|e| e.love_count as f64).sum::<f64>() / days;
        let avg_quality = entries.iter().map(|e| e.quality_time_hours).sum::<f64>() / days;
        let dish_ratio = entries.iter().filter(|e| e.dishes_done > 0).count() as f64 / days;

        if avg_love < 1.0 {
            insights.push(
                "Intimacy has been infrequent lately. Try planning a date night this week.".into(),
            );
        }
        if avg_quality < 8.0 {
            insights.push(
                "Quality time is below target. Set aside some phone-free time together each day."
                    .into(),
            );
        }
        if dish_ratio < 0.70 {
            insights.push(
                "Dishes are getting skipped. A shared chore schedule can keep things consistent."
                    .into(),
            );
        }
    }

    insights.truncate(MAX_INSIGHTS);
    insights
}
