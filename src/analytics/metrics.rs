use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::entry::DailyEntry;

/// Every tracked daily metric. Wire names match the `DailyEntry` JSON fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricKey {
    LoveCount,
    QualityTimeHours,
    DishesDone,
    TrashOutHours,
    PetCareDuties,
}

impl MetricKey {
    pub const ALL: [MetricKey; 5] = [
        MetricKey::LoveCount,
        MetricKey::QualityTimeHours,
        MetricKey::DishesDone,
        MetricKey::TrashOutHours,
        MetricKey::PetCareDuties,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MetricKey::LoveCount => "loveCount",
            MetricKey::QualityTimeHours => "qualityTimeHours",
            MetricKey::DishesDone => "dishesDone",
            MetricKey::TrashOutHours => "trashOutHours",
            MetricKey::PetCareDuties => "petCareDuties",
        }
    }

    /// Postgres column backing this metric.
    pub fn column(self) -> &'static str {
        match self {
            MetricKey::LoveCount => "love_count",
            MetricKey::QualityTimeHours => "quality_time_hours",
            MetricKey::DishesDone => "dishes_done",
            MetricKey::TrashOutHours => "trash_out_hours",
            MetricKey::PetCareDuties => "pet_care_duties",
        }
    }

    /// Count metrics are stored as integers; hour metrics as floats.
    pub fn is_count(self) -> bool {
        matches!(
            self,
            MetricKey::LoveCount | MetricKey::DishesDone | MetricKey::PetCareDuties
        )
    }

    pub fn value(self, entry: &DailyEntry) -> f64 {
        match self {
            MetricKey::LoveCount => entry.love_count as f64,
            MetricKey::QualityTimeHours => entry.quality_time_hours,
            MetricKey::DishesDone => entry.dishes_done as f64,
            MetricKey::TrashOutHours => entry.trash_out_hours,
            MetricKey::PetCareDuties => entry.pet_care_duties as f64,
        }
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MetricKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| format!("Unknown metric: {}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GoalDirection {
    HigherIsBetter,
    LowerIsBetter,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricDefinition {
    pub key: MetricKey,
    pub display_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<&'static str>,
    pub goal_direction: GoalDirection,
    pub weekly_goal: f64,
}

impl MetricDefinition {
    /// Per-day share of the weekly goal.
    pub fn daily_target(&self) -> f64 {
        self.weekly_goal / 7.0
    }

    pub fn meets_daily_target(&self, value: f64) -> bool {
        match self.goal_direction {
            GoalDirection::HigherIsBetter => value >= self.daily_target(),
            GoalDirection::LowerIsBetter => value <= self.daily_target(),
        }
    }
}

pub const METRIC_DEFINITIONS: [MetricDefinition; 5] = [
    MetricDefinition {
        key: MetricKey::LoveCount,
        display_label: "Love Sparks",
        unit: None,
        goal_direction: GoalDirection::HigherIsBetter,
        weekly_goal: 2.0,
    },
    MetricDefinition {
        key: MetricKey::QualityTimeHours,
        display_label: "Quality Time",
        unit: Some("h"),
        goal_direction: GoalDirection::HigherIsBetter,
        weekly_goal: 10.0,
    },
    MetricDefinition {
        key: MetricKey::DishesDone,
        display_label: "Dish Duty",
        unit: None,
        goal_direction: GoalDirection::HigherIsBetter,
        // 6 days out of 7
        weekly_goal: 6.0,
    },
    MetricDefinition {
        key: MetricKey::TrashOutHours,
        display_label: "Trash Patrol",
        unit: Some("h"),
        goal_direction: GoalDirection::LowerIsBetter,
        // stay under 12 hours full per week
        weekly_goal: 12.0,
    },
    MetricDefinition {
        key: MetricKey::PetCareDuties,
        display_label: "Pet Care",
        unit: None,
        goal_direction: GoalDirection::HigherIsBetter,
        weekly_goal: 7.0,
    },
];

/// The table is laid out in `MetricKey` declaration order.
pub fn definition(key: MetricKey) -> &'static MetricDefinition {
    &METRIC_DEFINITIONS[key as usize]
}

pub fn find_definition(key: &str) -> Option<&'static MetricDefinition> {
    METRIC_DEFINITIONS.iter().find(|def| def.key.as_str() == key)
}

#[derive(Debug, thiserror::Error)]
pub enum DefinitionError {
    #[error("Metric table out of order at {0}")]
    OutOfOrder(MetricKey),

    #[error("Metric {key} has {count} definitions, expected 1")]
    Duplicate { key: MetricKey, count: usize },

    #[error("Metric {0} has invalid weekly goal")]
    InvalidGoal(MetricKey),
}

/// Startup check: each metric key has exactly one definition, in key order,
/// with a usable goal.
pub fn validate_definitions() -> Result<(), DefinitionError> {
    check_definitions(&METRIC_DEFINITIONS)
}

fn check_definitions(table: &[MetricDefinition]) -> Result<(), DefinitionError> {
    for (index, key) in MetricKey::ALL.into_iter().enumerate() {
        if table.get(index).map(|def| def.key) != Some(key) {
            return Err(DefinitionError::OutOfOrder(key));
        }
        let count = table.iter().filter(|def| def.key == key).count();
        if count != 1 {
            return Err(DefinitionError::Duplicate { key, count });
        }
    }
    if let Some(def) = table
        .iter()
        .find(|def| !(def.weekly_goal.is_finite() && def.weekly_goal > 0.0))
    {
        return Err(DefinitionError::InvalidGoal(def.key));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shipped_table_is_valid() {
        assert!(validate_definitions().is_ok());
        assert_eq!(METRIC_DEFINITIONS.len(), MetricKey::ALL.len());
    }

    #[test]
    fn test_broken_tables_are_rejected() {
        let mut swapped = METRIC_DEFINITIONS;
        swapped.swap(0, 1);
        assert!(matches!(
            check_definitions(&swapped),
            Err(DefinitionError::OutOfOrder(MetricKey::LoveCount))
        ));

        let mut duplicated = METRIC_DEFINITIONS.to_vec();
        duplicated.push(METRIC_DEFINITIONS[4]);
        assert!(matches!(
            check_definitions(&duplicated),
            Err(DefinitionError::Duplicate { key: MetricKey::PetCareDuties, count: 2 })
        ));

        let mut zero_goal = METRIC_DEFINITIONS;
        zero_goal[2].weekly_goal = 0.0;
        let err = check_definitions(&zero_goal).unwrap_err();
        assert_eq!(err.to_string(), "Metric dishesDone has invalid weekly goal");
    }

    #[test]
    fn test_lookup_by_key_and_name_agree() {
        for key in MetricKey::ALL {
            assert_eq!(definition(key).key, key);
            assert_eq!(find_definition(key.as_str()).unwrap().key, key);
            assert_eq!(key.as_str().parse::<MetricKey>().unwrap(), key);
        }
        assert!(find_definition("sexCount").is_none());
    }

    #[test]
    fn test_serde_name_matches_as_str() {
        for key in MetricKey::ALL {
            let json = serde_json::to_value(key).unwrap();
            assert_eq!(json, key.as_str());
        }
    }

    #[test]
    fn test_daily_target_direction() {
        let trash = definition(MetricKey::TrashOutHours);
        assert!(trash.meets_daily_target(0.0));
        assert!(!trash.meets_daily_target(2.0));

        let dishes = definition(MetricKey::DishesDone);
        assert!(dishes.meets_daily_target(1.0));
        assert!(!dishes.meets_daily_target(0.0));
    }

    #[test]
    fn test_value_reads_matching_field() {
        let mut entry = DailyEntry::empty(chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        entry.quality_time_hours = 2.5;
        entry.pet_care_duties = 3;
        assert_eq!(MetricKey::QualityTimeHours.value(&entry), 2.5);
        assert_eq!(MetricKey::PetCareDuties.value(&entry), 3.0);
        assert_eq!(MetricKey::LoveCount.value(&entry), 0.0);
    }
}
