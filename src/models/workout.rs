use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{
    CALORIE_FACTOR, ERR_INVALID_DURATION, ERR_INVALID_INTENSITY, ERR_WORKOUT_NAME_TOO_SHORT,
    MAX_DURATION_MINUTES, MAX_INTENSITY, MIN_NAME_LEN,
};
use crate::error::{AppError, Result};
use crate::models::exercise::{NewExercise, WorkoutExercise};
use crate::models::datetime_from_timestamp;

/// Workout record stored in redb
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutRecord {
    pub user_id: u64,
    pub workout_type_id: Option<u64>,
    pub name: String,
    /// When the session took place (Unix timestamp, UTC)
    pub performed_at: i64,
    pub notes: Option<String>,
    pub intensity: Option<f64>,
    /// Minutes
    pub duration: Option<i64>,
    pub estimated_calories: f64,
    /// Line items in insertion order
    pub exercise_ids: Vec<u64>,
}

impl WorkoutRecord {
    pub fn performed_at(&self) -> DateTime<Utc> {
        datetime_from_timestamp(self.performed_at)
    }

    /// Recompute the derived calorie estimate from duration and intensity
    pub fn refresh_calories(&mut self, body_weight_kg: f64) {
        self.estimated_calories = estimate_calories(self.duration, self.intensity, body_weight_kg);
    }
}

/// Estimated calories burned: `duration * intensity * 0.1 * body_weight`,
/// rounded to two decimals. Zero unless both inputs are present and non-zero.
pub fn estimate_calories(duration: Option<i64>, intensity: Option<f64>, body_weight_kg: f64) -> f64 {
    match (duration, intensity) {
        (Some(duration), Some(intensity)) if duration != 0 && intensity != 0.0 => {
            round2(duration as f64 * intensity * CALORIE_FACTOR * body_weight_kg)
        }
        _ => 0.0,
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Workout as returned by the API, line items included
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workout {
    pub id: u64,
    pub user_id: u64,
    pub workout_type_id: Option<u64>,
    pub workout_type_name: Option<String>,
    pub workout_name: String,
    pub date: DateTime<Utc>,
    pub notes: Option<String>,
    pub intensity: Option<f64>,
    pub duration: Option<i64>,
    pub estimated_calories: f64,
    pub exercises: Vec<WorkoutExercise>,
}

/// Payload for `RecordWorkout`
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewWorkout {
    pub workout_name: String,
    /// Defaults to the time of recording
    pub date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub intensity: Option<f64>,
    pub duration: Option<i64>,
    pub workout_type_id: Option<u64>,
    #[serde(default)]
    pub exercises: Vec<NewExercise>,
}

impl NewWorkout {
    /// Validate every field, line items included, before anything is written
    pub fn validate(&self) -> Result<()> {
        validate_workout_name(&self.workout_name)?;
        validate_intensity(self.intensity)?;
        validate_duration(self.duration)?;
        self.exercises.iter().try_for_each(NewExercise::validate)
    }
}

/// Allow-listed workout fields for `UpdateWorkout`.
///
/// `exercises`, when present, replaces the workout's line items wholesale.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkoutPatch {
    pub workout_name: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub intensity: Option<f64>,
    pub duration: Option<i64>,
    pub workout_type_id: Option<u64>,
    pub exercises: Option<Vec<NewExercise>>,
}

impl WorkoutPatch {
    pub fn is_empty(&self) -> bool {
        self.workout_name.is_none()
            && self.date.is_none()
            && self.notes.is_none()
            && self.intensity.is_none()
            && self.duration.is_none()
            && self.workout_type_id.is_none()
            && self.exercises.is_none()
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.workout_name {
            validate_workout_name(name)?;
        }
        validate_intensity(self.intensity)?;
        validate_duration(self.duration)?;
        if let Some(exercises) = &self.exercises {
            exercises.iter().try_for_each(NewExercise::validate)?;
        }
        Ok(())
    }

    /// Apply scalar fields to the record; line items are handled by the ledger
    pub fn apply(&mut self, record: &mut WorkoutRecord, body_weight_kg: f64) {
        if let Some(name) = self.workout_name.take() {
            record.name = name.trim().to_string();
        }
        if let Some(date) = self.date {
            record.performed_at = date.timestamp();
        }
        if let Some(notes) = self.notes.take() {
            record.notes = Some(notes);
        }
        if self.intensity.is_some() {
            record.intensity = self.intensity;
        }
        if self.duration.is_some() {
            record.duration = self.duration;
        }
        if self.workout_type_id.is_some() {
            record.workout_type_id = self.workout_type_id;
        }
        record.refresh_calories(body_weight_kg);
    }
}

fn validate_workout_name(name: &str) -> Result<()> {
    if name.trim().chars().count() < MIN_NAME_LEN {
        return Err(AppError::InvalidInput(ERR_WORKOUT_NAME_TOO_SHORT.to_string()));
    }
    Ok(())
}

fn validate_intensity(intensity: Option<f64>) -> Result<()> {
    match intensity {
        Some(v) if !(0.0..=MAX_INTENSITY).contains(&v) => {
            Err(AppError::InvalidInput(ERR_INVALID_INTENSITY.to_string()))
        }
        _ => Ok(()),
    }
}

fn validate_duration(duration: Option<i64>) -> Result<()> {
    match duration {
        Some(v) if !(0..=MAX_DURATION_MINUTES).contains(&v) => {
            Err(AppError::InvalidInput(ERR_INVALID_DURATION.to_string()))
        }
        _ => Ok(()),
    }
}
