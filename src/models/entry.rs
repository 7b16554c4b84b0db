use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::analytics::metrics::MetricKey;

/// One calendar day of tracked metrics. The date is the key; at most one
/// entry exists per date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DailyEntry {
    #[sqlx(rename = "entry_date")]
    pub date: NaiveDate,
    pub love_count: i32,
    pub quality_time_hours: f64,
    pub dishes_done: i32,
    /// Hours the trash sat full. Lower is better.
    pub trash_out_hours: f64,
    pub pet_care_duties: i32,
}

impl DailyEntry {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            love_count: 0,
            quality_time_hours: 0.0,
            dishes_done: 0,
            trash_out_hours: 0.0,
            pet_care_duties: 0,
        }
    }

    /// Apply `delta` to one metric, clamping the result at zero.
    pub fn adjust(&mut self, metric: MetricKey, delta: f64) {
        fn bump_count(value: &mut i32, delta: f64) {
            *value = (*value + delta.round() as i32).max(0);
        }
        fn bump_hours(value: &mut f64, delta: f64) {
            *value = (*value + delta).max(0.0);
        }

        match metric {
            MetricKey::LoveCount => bump_count(&mut self.love_count, delta),
            MetricKey::QualityTimeHours => bump_hours(&mut self.quality_time_hours, delta),
            MetricKey::DishesDone => bump_count(&mut self.dishes_done, delta),
            MetricKey::TrashOutHours => bump_hours(&mut self.trash_out_hours, delta),
            MetricKey::PetCareDuties => bump_count(&mut self.pet_care_duties, delta),
        }
    }
}

/// POST /api/entries/:date/adjust
#[derive(Debug, Deserialize, Validate)]
pub struct AdjustMetricRequest {
    pub metric: MetricKey,

    #[validate(range(min = -24.0, max = 24.0, message = "Delta must be between -24 and 24"))]
    pub delta: f64,
}

#[derive(Debug, Deserialize)]
pub struct EntryQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}
