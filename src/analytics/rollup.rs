use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::analytics::metrics::MetricKey;
use crate::models::entry::DailyEntry;

/// Sunday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_sunday() as i64)
}

/// A calendar month, stored as its first day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth(NaiveDate);

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    pub fn of(date: NaiveDate) -> Self {
        Self(date.with_day(1).unwrap_or(date))
    }

    pub fn first_day(self) -> NaiveDate {
        self.0
    }

    pub fn last_day(self) -> NaiveDate {
        self.0 + Duration::days(self.days_in_month() as i64 - 1)
    }

    pub fn days_in_month(self) -> u32 {
        self.0
            .checked_add_months(Months::new(1))
            .map(|next| (next - self.0).num_days() as u32)
            .unwrap_or(31)
    }

    /// Month `n` months earlier, saturating at the earliest representable month.
    pub fn months_before(self, n: u32) -> Self {
        self.0
            .checked_sub_months(Months::new(n))
            .map(Self)
            .unwrap_or(Self(NaiveDate::MIN.with_day(1).unwrap_or(NaiveDate::MIN)))
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.0.year() && date.month() == self.0.month()
    }

    /// Human label such as "January 2024".
    pub fn label(self) -> String {
        self.0.format("%B %Y").to_string()
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.0.year(), self.0.month())
    }
}

impl FromStr for YearMonth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || format!("Invalid month '{}', expected YYYY-MM", s);
        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        YearMonth::new(year, month).ok_or_else(invalid)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyRollup {
    pub week_start: NaiveDate,
    pub love_count: i64,
    pub quality_time_hours: f64,
    pub dishes_done: i64,
    pub trash_out_hours: f64,
    pub pet_care_duties: i64,
}

impl WeeklyRollup {
    fn empty(week_start: NaiveDate) -> Self {
        Self {
            week_start,
            love_count: 0,
            quality_time_hours: 0.0,
            dishes_done: 0,
            trash_out_hours: 0.0,
            pet_care_duties: 0,
        }
    }

    pub fn value(&self, key: MetricKey) -> f64 {
        match key {
            MetricKey::LoveCount => self.love_count as f64,
            MetricKey::QualityTimeHours => self.quality_time_hours,
            MetricKey::DishesDone => self.dishes_done as f64,
            MetricKey::TrashOutHours => self.trash_out_hours,
            MetricKey::PetCareDuties => self.pet_care_duties as f64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRollup {
    pub month: YearMonth,
    pub label: String,
    pub entry_count: usize,
    pub total_love_count: i64,
    pub total_quality_time_hours: f64,
    pub total_dishes_done: i64,
    pub average_trash_out_hours: f64,
    pub total_pet_care_duties: i64,
    pub dishes_adherence_percent: f64,
}

/// Sunday-to-now totals for the week containing `now`.
pub fn compute_weekly_rollup(entries: &[DailyEntry], now: NaiveDateTime) -> WeeklyRollup {
    let start = week_start(now.date());
    let mut rollup = WeeklyRollup::empty(start);

    for entry in entries
        .iter()
        .filter(|e| e.date >= start && e.date.and_time(chrono::NaiveTime::MIN) <= now)
    {
        rollup.love_count += entry.love_count as i64;
        rollup.quality_time_hours += entry.quality_time_hours;
        rollup.dishes_done += entry.dishes_done as i64;
        rollup.trash_out_hours += entry.trash_out_hours;
        rollup.pet_care_duties += entry.pet_care_duties as i64;
    }

    rollup
}

/// Totals for one calendar month. Adherence is measured against the days
/// elapsed so far, `min(days_in_month, today.day())`.
pub fn compute_monthly_rollup(
    entries: &[DailyEntry],
    month: YearMonth,
    today: NaiveDate,
) -> MonthlyRollup {
    let in_month: Vec<&DailyEntry> = entries.iter().filter(|e| month.contains(e.date)).collect();
    let elapsed = month.days_in_month().min(today.day()) as usize;
    summarize_month(month, &in_month, elapsed)
}

/// Rollups for the last `months` calendar months ending with `today`'s month,
/// oldest first. Months without entries are skipped. Here adherence is the
/// share of logged days with dishes done, not of calendar days.
pub fn compute_monthly_history(
    entries: &[DailyEntry],
    months: u32,
    today: NaiveDate,
) -> Vec<MonthlyRollup> {
    let current = YearMonth::of(today);

    (0..months)
        .rev()
        .map(|back| current.months_before(back))
        .filter_map(|month| {
            let in_month: Vec<&DailyEntry> =
                entries.iter().filter(|e| month.contains(e.date)).collect();
            if in_month.is_empty() {
                return None;
            }
            Some(summarize_month(month, &in_month, in_month.len()))
        })
        .collect()
}

fn summarize_month(
    month: YearMonth,
    in_month: &[&DailyEntry],
    adherence_days: usize,
) -> MonthlyRollup {
    let count = in_month.len();

    let average_trash_out_hours = if count > 0 {
        in_month.iter().map(|e| e.trash_out_hours).sum::<f64>() / count as f64
    } else {
        0.0
    };

    let dishes_adherence_percent = if count > 0 && adherence_days > 0 {
        let days_with_dishes = in_month.iter().filter(|e| e.dishes_done > 0).count();
        days_with_dishes as f64 / adherence_days as f64 * 100.0
    } else {
        0.0
    };

    MonthlyRollup {
        month,
        label: month.label(),
        entry_count: count,
        total_love_count: in_month.iter().map(|e| e.love_count as i64).sum(),
        total_quality_time_hours: in_month.iter().map(|e| e.quality_time_hours).sum(),
        total_dishes_done: in_month.iter().map(|e| e.dishes_done as i64).sum(),
        average_trash_out_hours,
        total_pet_care_duties: in_month.iter().map(|e| e.pet_care_duties as i64).sum(),
        dishes_adherence_percent,
    }
}

/// Entries on or after the first day of the month `months_back` months before
/// `now`'s month. Bounds the input of every trend computation.
pub fn get_entries_since(
    entries: &[DailyEntry],
    months_back: u32,
    now: NaiveDateTime,
) -> Vec<DailyEntry> {
    let cutoff = YearMonth::of(now.date()).months_before(months_back).first_day();
    entries.iter().filter(|e| e.date >= cutoff).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::metrics::definition;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(h, 0, 0).unwrap()
    }

    fn entry(d: NaiveDate, love: i32, quality: f64, dishes: i32, trash: f64, pets: i32) -> DailyEntry {
        DailyEntry {
            date: d,
            love_count: love,
            quality_time_hours: quality,
            dishes_done: dishes,
            trash_out_hours: trash,
            pet_care_duties: pets,
        }
    }

    #[test]
    fn test_week_start_is_sunday() {
        assert_eq!(week_start(date(2024, 1, 8)), date(2024, 1, 7));
        assert_eq!(week_start(date(2024, 1, 7)), date(2024, 1, 7));
        assert_eq!(week_start(date(2024, 1, 13)), date(2024, 1, 7));
    }

    #[test]
    fn test_weekly_rollup_example_week() {
        let entries = vec![
            entry(date(2024, 1, 7), 1, 2.0, 1, 0.0, 1),
            entry(date(2024, 1, 8), 1, 3.0, 0, 1.0, 1),
        ];
        let rollup = compute_weekly_rollup(&entries, at(2024, 1, 8, 12));
        assert_eq!(rollup.week_start, date(2024, 1, 7));
        assert_eq!(rollup.love_count, 2);
        assert_eq!(rollup.quality_time_hours, 5.0);
        assert_eq!(rollup.dishes_done, 1);
        assert_eq!(rollup.trash_out_hours, 1.0);
        assert_eq!(rollup.pet_care_duties, 2);
    }

    #[test]
    fn test_weekly_rollup_window_bounds() {
        let entries = vec![
            // exactly 7 days before week start: excluded
            entry(date(2023, 12, 31), 5, 5.0, 5, 5.0, 5),
            // exactly at week start: included
            entry(date(2024, 1, 7), 1, 0.0, 0, 0.0, 0),
            // after now: excluded
            entry(date(2024, 1, 9), 3, 0.0, 0, 0.0, 0),
        ];
        let rollup = compute_weekly_rollup(&entries, at(2024, 1, 8, 12));
        assert_eq!(rollup.love_count, 1);
        assert_eq!(rollup.dishes_done, 0);
    }

    #[test]
    fn test_weekly_rollup_empty_is_zero() {
        let rollup = compute_weekly_rollup(&[], at(2024, 1, 10, 9));
        assert_eq!(rollup.week_start, date(2024, 1, 7));
        assert!(MetricKey::ALL.into_iter().all(|key| rollup.value(key) == 0.0));
    }

    #[test]
    fn test_weekly_values_by_metric() {
        let entries = vec![entry(date(2024, 1, 8), 2, 1.5, 1, 0.5, 1)];
        let rollup = compute_weekly_rollup(&entries, at(2024, 1, 8, 20));
        for key in MetricKey::ALL {
            assert_eq!(definition(key).key, key);
            assert_eq!(rollup.value(key), key.value(&entries[0]));
        }
        assert_eq!(rollup.value(MetricKey::LoveCount), 2.0);
        assert_eq!(rollup.value(MetricKey::TrashOutHours), 0.5);
    }

    #[test]
    fn test_year_month_parse_and_display() {
        let ym: YearMonth = "2024-02".parse().unwrap();
        assert_eq!(ym.to_string(), "2024-02");
        assert_eq!(ym.days_in_month(), 29);
        assert_eq!(ym.last_day(), date(2024, 2, 29));
        assert_eq!(ym.label(), "February 2024");
        assert!("2024-13".parse::<YearMonth>().is_err());
        assert!("2024-1".parse::<YearMonth>().is_err());
        assert!("january".parse::<YearMonth>().is_err());
    }

    #[test]
    fn test_months_before_crosses_year() {
        let ym = YearMonth::of(date(2024, 2, 15));
        assert_eq!(ym.months_before(3).to_string(), "2023-11");
        assert_eq!(ym.months_before(0), ym);
    }

    #[test]
    fn test_monthly_rollup_totals_and_adherence() {
        let entries = vec![
            entry(date(2024, 1, 1), 1, 2.0, 1, 2.0, 1),
            entry(date(2024, 1, 2), 0, 1.0, 0, 4.0, 1),
            entry(date(2024, 1, 3), 2, 0.0, 1, 0.0, 0),
            entry(date(2024, 2, 1), 9, 9.0, 9, 9.0, 9),
        ];
        let month: YearMonth = "2024-01".parse().unwrap();
        let rollup = compute_monthly_rollup(&entries, month, date(2024, 1, 4));
        assert_eq!(rollup.entry_count, 3);
        assert_eq!(rollup.total_love_count, 3);
        assert_eq!(rollup.total_dishes_done, 2);
        assert_eq!(rollup.total_pet_care_duties, 2);
        assert_eq!(rollup.total_quality_time_hours, 3.0);
        assert_eq!(rollup.average_trash_out_hours, 2.0);
        // 2 dish days over 4 elapsed days
        assert_eq!(rollup.dishes_adherence_percent, 50.0);
    }

    #[test]
    fn test_monthly_rollup_empty_month_is_zero() {
        let month: YearMonth = "2024-03".parse().unwrap();
        let rollup = compute_monthly_rollup(&[], month, date(2024, 3, 10));
        assert_eq!(rollup.entry_count, 0);
        assert_eq!(rollup.average_trash_out_hours, 0.0);
        assert_eq!(rollup.dishes_adherence_percent, 0.0);
        assert!(!rollup.dishes_adherence_percent.is_nan());
    }

    #[test]
    fn test_monthly_rollup_denominator_capped_by_month_length() {
        let entries = vec![entry(date(2024, 2, 10), 0, 0.0, 1, 0.0, 0)];
        let month: YearMonth = "2024-02".parse().unwrap();
        // today's day-of-month (31) exceeds February's length
        let rollup = compute_monthly_rollup(&entries, month, date(2024, 3, 31));
        assert!((rollup.dishes_adherence_percent - 100.0 / 29.0).abs() < 1e-9);
    }

    #[test]
    fn test_monthly_history_skips_empty_months() {
        let entries = vec![
            entry(date(2023, 12, 5), 1, 0.0, 1, 0.0, 0),
            entry(date(2024, 2, 1), 1, 0.0, 1, 0.0, 0),
            entry(date(2024, 2, 2), 1, 0.0, 0, 0.0, 0),
        ];
        let history = compute_monthly_history(&entries, 3, date(2024, 2, 2));
        let months: Vec<String> = history.iter().map(|m| m.month.to_string()).collect();
        assert_eq!(months, vec!["2023-12", "2024-02"]);
        assert_eq!(history[0].dishes_adherence_percent, 100.0);
        assert_eq!(history[1].dishes_adherence_percent, 50.0);
    }

    #[test]
    fn test_monthly_history_adherence_counts_logged_days() {
        // Ten logged January days, dishes done on each
        let entries: Vec<DailyEntry> = (1..=10)
            .map(|d| entry(date(2024, 1, d), 0, 0.0, 1, 0.0, 0))
            .collect();

        let history = compute_monthly_history(&entries, 3, date(2024, 2, 15));
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].entry_count, 10);
        assert_eq!(history[0].dishes_adherence_percent, 100.0);

        // The single-month rollup still measures calendar days
        let rollup = compute_monthly_rollup(&entries, YearMonth::of(date(2024, 1, 1)), date(2024, 2, 15));
        assert!((rollup.dishes_adherence_percent - 1000.0 / 31.0).abs() < 1e-9);
    }

    #[test]
    fn test_entries_since_uses_first_of_month() {
        let entries = vec![
            entry(date(2023, 12, 31), 0, 0.0, 0, 0.0, 0),
            entry(date(2024, 1, 1), 0, 0.0, 0, 0.0, 0),
            entry(date(2024, 3, 20), 0, 0.0, 0, 0.0, 0),
        ];
        let recent = get_entries_since(&entries, 2, at(2024, 3, 20, 8));
        let dates: Vec<NaiveDate> = recent.iter().map(|e| e.date).collect();
        assert_eq!(dates, vec![date(2024, 1, 1), date(2024, 3, 20)]);
    }
}
