use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{Duration, NaiveDate, Utc};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::entry::{AdjustMetricRequest, DailyEntry, EntryQuery};
use crate::AppState;

const MAX_RANGE_DAYS: i64 = 366;

pub async fn list_entries(
    State(state): State<AppState>,
    Query(query): Query<EntryQuery>,
) -> AppResult<Json<Vec<DailyEntry>>> {
    let today = Utc::now().date_naive();
    let (start, end) = resolve_range(&query, today)?;

    let entries = state.entries.list_entries_between(start, end).await?;
    Ok(Json(entries))
}

/// GET /api/entries/all: full history, oldest first
pub async fn list_all_entries(State(state): State<AppState>) -> AppResult<Json<Vec<DailyEntry>>> {
    let entries = state.entries.list_entries().await?;
    Ok(Json(entries))
}

/// GET /api/entries/today: created with zeroed metrics on first access
pub async fn get_today(State(state): State<AppState>) -> AppResult<Json<DailyEntry>> {
    let today = Utc::now().date_naive();
    let entry = state.entries.get_or_create(today).await?;
    Ok(Json(entry))
}

pub async fn adjust_metric(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
    Json(body): Json<AdjustMetricRequest>,
) -> AppResult<Json<DailyEntry>> {
    body.validate()?;

    let today = Utc::now().date_naive();
    if date > today + Duration::days(1) {
        return Err(AppError::Validation(
            "Cannot record metrics for future dates".into(),
        ));
    }

    let entry = state
        .entries
        .adjust_metric(date, body.metric, body.delta)
        .await?;

    tracing::info!(
        date = %date,
        metric = %body.metric,
        delta = body.delta,
        "Daily metric adjusted"
    );

    Ok(Json(entry))
}

/// Defaults to the trailing 30 days ending today.
fn resolve_range(query: &EntryQuery, today: NaiveDate) -> AppResult<(NaiveDate, NaiveDate)> {
    let start = query
        .start_date
        .unwrap_or_else(|| today - Duration::days(30));
    let end = query.end_date.unwrap_or(today);

    if start > end {
        return Err(AppError::Validation(
            "start_date must not be after end_date".into(),
        ));
    }
    if (end - start).num_days() > MAX_RANGE_DAYS {
        return Err(AppError::Validation(format!(
            "Date range may span at most {} days",
            MAX_RANGE_DAYS
        )));
    }

    Ok((start, end))
}
