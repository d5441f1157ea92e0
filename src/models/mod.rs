pub mod catalog;
pub mod exercise;
pub mod personal_best;
pub mod user;
pub mod workout;

pub use catalog::{Catalog, ExerciseTemplate, ExerciseTemplateRecord, WorkoutType, WorkoutTypeRecord};
pub use exercise::{ExercisePatch, NewExercise, WorkoutExercise, WorkoutExerciseRecord};
pub use personal_best::{PersonalBest, PersonalBestRecord};
pub use user::{ProfilePatch, User, UserRecord};
pub use workout::{NewWorkout, Workout, WorkoutPatch, WorkoutRecord};

use chrono::{DateTime, Utc};

/// Convert a stored Unix timestamp to a UTC datetime, defaulting to the epoch if invalid
pub fn datetime_from_timestamp(timestamp: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(timestamp, 0).unwrap_or_default()
}
