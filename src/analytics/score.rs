use chrono::{Duration, NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::analytics::metrics::MetricKey;
use crate::models::entry::DailyEntry;

/// Composite weights. They sum to exactly 1.0.
pub const HEALTH_WEIGHTS: [(MetricKey, f64); 5] = [
    (MetricKey::LoveCount, 0.30),
    (MetricKey::QualityTimeHours, 0.25),
    (MetricKey::DishesDone, 0.20),
    (MetricKey::PetCareDuties, 0.15),
    (MetricKey::TrashOutHours, 0.10),
];

/// Days a streak entry may lag `now` and still refresh the current streak.
const CURRENT_STREAK_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Streaks {
    pub current: u32,
    pub longest: u32,
}

fn mean(entries: &[DailyEntry], key: MetricKey) -> f64 {
    entries.iter().map(|e| key.value(e)).sum::<f64>() / entries.len() as f64
}

/// Normalized 0-100 score for one metric's daily average.
fn metric_score(key: MetricKey, average: f64) -> f64 {
    match key {
        MetricKey::LoveCount => (average / 2.0 * 100.0).min(100.0),
        MetricKey::QualityTimeHours => (average / 10.0 * 100.0).min(100.0),
        MetricKey::DishesDone => (average / 0.85 * 100.0).min(100.0),
        MetricKey::PetCareDuties => (average / 1.0 * 100.0).min(100.0),
        MetricKey::TrashOutHours => (100.0 - average * 50.0).max(0.0),
    }
}

/// Weighted relationship health score in 0..=100. Empty input scores 0.
pub fn compute_health_score(entries: &[DailyEntry]) -> u32 {
    if entries.is_empty() {
        return 0;
    }

    let composite: f64 = HEALTH_WEIGHTS
        .iter()
        .map(|&(key, weight)| metric_score(key, mean(entries, key)) * weight)
        .sum();

    composite.round().clamp(0.0, 100.0) as u32
}

pub fn is_good_day(entry: &DailyEntry) -> bool {
    entry.love_count > 0 || entry.quality_time_hours >= 2.0 || entry.dishes_done > 0
}

/// Longest run of good days, and the run length last observed inside the
/// trailing week. A gap in recent data leaves `current` at its last in-window
/// value instead of resetting it.
pub fn compute_streaks(entries: &[DailyEntry], now: NaiveDateTime) -> Streaks {
    let mut sorted: Vec<&DailyEntry> = entries.iter().collect();
    sorted.sort_by_key(|e| e.date);

    let window_start = now - Duration::days(CURRENT_STREAK_WINDOW_DAYS);
    let mut streaks = Streaks::default();
    let mut run = 0u32;

    for entry in sorted {
        if is_good_day(entry) {
            run += 1;
            streaks.longest = streaks.longest.max(run);
        } else {
            run = 0;
        }

        if entry.date.and_time(NaiveTime::MIN) >= window_start {
            streaks.current = run;
        }
    }

    streaks
}
