use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;

use crate::analytics::metrics::{find_definition, MetricDefinition, METRIC_DEFINITIONS};
use crate::analytics::rollup::{
    self, compute_monthly_history, compute_monthly_rollup, compute_weekly_rollup,
    get_entries_since, MonthlyRollup, WeeklyRollup, YearMonth,
};
use crate::analytics::progress::{compute_weekly_goal_progress, WeeklyGoalProgress};
use crate::analytics::{build_snapshot, AnalyticsSnapshot};
use crate::error::{AppError, AppResult};
use crate::AppState;

const MAX_MONTHS: u32 = 12;

#[derive(Debug, Deserialize)]
pub struct WindowQuery {
    pub months: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    /// "YYYY-MM"; defaults to the current month
    pub month: Option<String>,
}

pub async fn list_metrics() -> Json<&'static [MetricDefinition]> {
    Json(&METRIC_DEFINITIONS[..])
}

pub async fn get_metric(Path(key): Path<String>) -> AppResult<Json<&'static MetricDefinition>> {
    find_definition(&key)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Unknown metric '{}'", key)))
}

/// GET /api/analytics: snapshot over the trailing months window
pub async fn get_analytics(
    State(state): State<AppState>,
    Query(query): Query<WindowQuery>,
) -> AppResult<Json<AnalyticsSnapshot>> {
    let months = query
        .months
        .unwrap_or(state.config.analytics_months_back)
        .min(MAX_MONTHS);
    let now = Utc::now().naive_utc();
    let today = now.date();
    let cutoff = YearMonth::of(today).months_before(months).first_day();

    let entries = state.entries.list_entries_between(cutoff, today).await?;
    let window = get_entries_since(&entries, months, now);
    let snapshot = build_snapshot(&window, now);

    tracing::debug!(
        months,
        entries = window.len(),
        health_score = snapshot.health_score,
        "Analytics snapshot computed"
    );

    Ok(Json(snapshot))
}

pub async fn get_weekly_rollup(State(state): State<AppState>) -> AppResult<Json<WeeklyRollup>> {
    Ok(Json(current_week(&state).await?))
}

/// GET /api/rollups/weekly/goals: this week's totals against each weekly goal
pub async fn get_weekly_goal_progress(
    State(state): State<AppState>,
) -> AppResult<Json<WeeklyGoalProgress>> {
    let rollup = current_week(&state).await?;
    Ok(Json(compute_weekly_goal_progress(&rollup)))
}

async fn current_week(state: &AppState) -> AppResult<WeeklyRollup> {
    let now = Utc::now().naive_utc();
    let today = now.date();

    let entries = state
        .entries
        .list_entries_between(rollup::week_start(today), today)
        .await?;

    Ok(compute_weekly_rollup(&entries, now))
}

pub async fn get_monthly_rollup(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> AppResult<Json<MonthlyRollup>> {
    let today = Utc::now().date_naive();
    let month = match query.month.as_deref() {
        Some(raw) => raw.parse::<YearMonth>().map_err(AppError::Validation)?,
        None => YearMonth::of(today),
    };

    let entries = state
        .entries
        .list_entries_between(month.first_day(), month.last_day())
        .await?;

    Ok(Json(compute_monthly_rollup(&entries, month, today)))
}

/// GET /api/rollups/monthly/history: last N months with data, oldest first
pub async fn get_monthly_history(
    State(state): State<AppState>,
    Query(query): Query<WindowQuery>,
) -> AppResult<Json<Vec<MonthlyRollup>>> {
    let months = query.months.unwrap_or(3).clamp(1, MAX_MONTHS);
    let today = Utc::now().date_naive();
    let first = YearMonth::of(today).months_before(months - 1);

    let entries = state
        .entries
        .list_entries_between(first.first_day(), today)
        .await?;

    Ok(Json(compute_monthly_history(&entries, months, today)))
}
