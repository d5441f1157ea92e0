use serde::{Deserialize, Serialize};

use crate::constants::MAX_DURATION_MINUTES;
use crate::error::{AppError, Result};
use crate::models::catalog::ExerciseTemplateRecord;

/// Line item linking a workout to an exercise template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutExerciseRecord {
    pub workout_id: u64,
    pub template_id: u64,
    pub sets: Option<i64>,
    pub reps: Option<i64>,
    pub weight: Option<f64>,
    pub duration: Option<i64>,
    pub distance: Option<f64>,
}

/// Line item as returned by the API, with its template resolved
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutExercise {
    pub id: u64,
    pub workout_id: u64,
    pub exercise_template_id: u64,
    pub name: String,
    #[serde(rename = "type")]
    pub exercise_type: String,
    pub supports_distance: bool,
    pub sets: Option<i64>,
    pub reps: Option<i64>,
    pub weight: Option<f64>,
    pub duration: Option<i64>,
    pub distance: Option<f64>,
}

impl WorkoutExercise {
    pub fn from_record(
        id: u64,
        record: &WorkoutExerciseRecord,
        template: &ExerciseTemplateRecord,
    ) -> Self {
        Self {
            id,
            workout_id: record.workout_id,
            exercise_template_id: record.template_id,
            name: template.name.clone(),
            exercise_type: template.exercise_type.clone(),
            supports_distance: template.supports_distance,
            sets: record.sets,
            reps: record.reps,
            weight: record.weight,
            duration: record.duration,
            distance: record.distance,
        }
    }
}

/// Payload for logging one exercise within a workout
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewExercise {
    pub exercise_template_id: u64,
    pub sets: Option<i64>,
    pub reps: Option<i64>,
    pub weight: Option<f64>,
    pub duration: Option<i64>,
    pub distance: Option<f64>,
}

impl NewExercise {
    pub fn validate(&self) -> Result<()> {
        validate_count("Sets", self.sets)?;
        validate_count("Reps", self.reps)?;
        validate_minutes(self.duration)?;
        validate_amount("Weight", self.weight)?;
        validate_amount("Distance", self.distance)
    }

    pub fn into_record(self, workout_id: u64) -> WorkoutExerciseRecord {
        WorkoutExerciseRecord {
            workout_id,
            template_id: self.exercise_template_id,
            sets: self.sets,
            reps: self.reps,
            weight: self.weight,
            duration: self.duration,
            distance: self.distance,
        }
    }
}

/// Fields of a line item that may be changed after it was logged
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExercisePatch {
    pub exercise_template_id: Option<u64>,
    pub sets: Option<i64>,
    pub reps: Option<i64>,
    pub weight: Option<f64>,
    pub duration: Option<i64>,
    pub distance: Option<f64>,
}

impl ExercisePatch {
    pub fn is_empty(&self) -> bool {
        self.exercise_template_id.is_none()
            && self.sets.is_none()
            && self.reps.is_none()
            && self.weight.is_none()
            && self.duration.is_none()
            && self.distance.is_none()
    }

    pub fn validate(&self) -> Result<()> {
        validate_count("Sets", self.sets)?;
        validate_count("Reps", self.reps)?;
        validate_minutes(self.duration)?;
        validate_amount("Weight", self.weight)?;
        validate_amount("Distance", self.distance)
    }

    pub fn apply(self, record: &mut WorkoutExerciseRecord) {
        if let Some(template_id) = self.exercise_template_id {
            record.template_id = template_id;
        }
        if self.sets.is_some() {
            record.sets = self.sets;
        }
        if self.reps.is_some() {
            record.reps = self.reps;
        }
        if self.weight.is_some() {
            record.weight = self.weight;
        }
        if self.duration.is_some() {
            record.duration = self.duration;
        }
        if self.distance.is_some() {
            record.distance = self.distance;
        }
    }
}

fn validate_count(field: &str, value: Option<i64>) -> Result<()> {
    match value {
        Some(v) if v < 0 => Err(AppError::InvalidInput(format!(
            "{field} must be a non-negative integer"
        ))),
        _ => Ok(()),
    }
}

fn validate_minutes(value: Option<i64>) -> Result<()> {
    match value {
        Some(v) if !(0..=MAX_DURATION_MINUTES).contains(&v) => Err(AppError::InvalidInput(
            format!("Duration must be between 0 and {MAX_DURATION_MINUTES} minutes"),
        )),
        _ => Ok(()),
    }
}

fn validate_amount(field: &str, value: Option<f64>) -> Result<()> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(AppError::InvalidInput(format!(
            "{field} must be a non-negative number"
        ))),
        _ => Ok(()),
    }
}
