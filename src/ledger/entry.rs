use crate::models::{
    ExerciseTemplateRecord, Workout, WorkoutExercise, WorkoutExerciseRecord, WorkoutRecord,
};

/// A stored line item with its template resolved
#[derive(Debug, Clone)]
pub struct LoggedExercise {
    pub id: u64,
    pub record: WorkoutExerciseRecord,
    pub template: ExerciseTemplateRecord,
}

impl LoggedExercise {
    pub fn to_view(&self) -> WorkoutExercise {
        WorkoutExercise::from_record(self.id, &self.record, &self.template)
    }
}

/// A stored workout with its line items in insertion order
#[derive(Debug, Clone)]
pub struct LoggedWorkout {
    pub id: u64,
    pub record: WorkoutRecord,
    pub exercises: Vec<LoggedExercise>,
}

impl LoggedWorkout {
    pub fn into_view(self, workout_type_name: Option<String>) -> Workout {
        let exercises = self.exercises.iter().map(LoggedExercise::to_view).collect();
        let date = self.record.performed_at();
        let record = self.record;

        Workout {
            id: self.id,
            user_id: record.user_id,
            workout_type_id: record.workout_type_id,
            workout_type_name,
            workout_name: record.name,
            date,
            notes: record.notes,
            intensity: record.intensity,
            duration: record.duration,
            estimated_calories: record.estimated_calories,
            exercises,
        }
    }
}
