use serde::{Deserialize, Serialize};

/// Workout type record (e.g. "Cardio", "Strength")
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutTypeRecord {
    pub name: String,
}

/// Exercise template record: immutable reference data shared by all users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseTemplateRecord {
    pub name: String,
    /// Category such as "cardio", "strength" or "mobility"
    pub exercise_type: String,
    pub supports_distance: bool,
    pub workout_type_id: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutType {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseTemplate {
    pub id: u64,
    pub name: String,
    #[serde(rename = "type")]
    pub exercise_type: String,
    pub supports_distance: bool,
    pub workout_type_id: u64,
}

impl ExerciseTemplate {
    pub fn from_record(id: u64, record: &ExerciseTemplateRecord) -> Self {
        Self {
            id,
            name: record.name.clone(),
            exercise_type: record.exercise_type.clone(),
            supports_distance: record.supports_distance,
            workout_type_id: record.workout_type_id,
        }
    }
}

/// Full catalog response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub workout_types: Vec<WorkoutType>,
    pub exercise_templates: Vec<ExerciseTemplate>,
}
