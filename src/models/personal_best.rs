use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::datetime_from_timestamp;

/// Per-exercise maxima for one user, as stored in redb.
///
/// Each metric is the maximum over every logged line item for the exercise
/// name, independently of the others. `None` means no line item carried the
/// metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalBestRecord {
    pub exercise_name: String,
    pub max_weight: Option<f64>,
    pub max_reps: Option<i64>,
    pub max_duration: Option<i64>,
    pub max_distance: Option<f64>,
    /// When the set was last rebuilt (Unix timestamp)
    pub date_achieved: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalBest {
    pub exercise_name: String,
    pub max_weight: Option<f64>,
    pub max_reps: Option<i64>,
    pub max_duration: Option<i64>,
    pub max_distance: Option<f64>,
    pub date_achieved: DateTime<Utc>,
}

impl From<&PersonalBestRecord> for PersonalBest {
    fn from(record: &PersonalBestRecord) -> Self {
        Self {
            exercise_name: record.exercise_name.clone(),
            max_weight: record.max_weight,
            max_reps: record.max_reps,
            max_duration: record.max_duration,
            max_distance: record.max_distance,
            date_achieved: datetime_from_timestamp(record.date_achieved),
        }
    }
}
