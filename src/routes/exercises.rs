use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use serde::Deserialize;

use crate::AppState;
use crate::error::Result;
use crate::models::{ExercisePatch, NewExercise, WorkoutExercise};
use crate::routes::AuthUser;
use crate::routes::workouts::DeletedResponse;

/// A line item to append to one of the caller's workouts
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddExerciseRequest {
    pub workout_id: u64,
    pub exercise_template_id: u64,
    pub sets: Option<i64>,
    pub reps: Option<i64>,
    pub weight: Option<f64>,
    pub duration: Option<i64>,
    pub distance: Option<f64>,
}

impl AddExerciseRequest {
    fn split(self) -> (u64, NewExercise) {
        let exercise = NewExercise {
            exercise_template_id: self.exercise_template_id,
            sets: self.sets,
            reps: self.reps,
            weight: self.weight,
            duration: self.duration,
            distance: self.distance,
        };
        (self.workout_id, exercise)
    }
}

pub async fn add_exercise(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<AddExerciseRequest>,
) -> Result<(StatusCode, Json<WorkoutExercise>)> {
    let (workout_id, exercise) = payload.split();
    let ledger = state.ledger();
    let exercise = tokio::task::spawn_blocking(move || {
        ledger.add_exercise(user_id, workout_id, exercise, Utc::now())
    })
    .await??;

    Ok((StatusCode::CREATED, Json(exercise)))
}

pub async fn update_exercise(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(exercise_id): Path<u64>,
    Json(patch): Json<ExercisePatch>,
) -> Result<Json<WorkoutExercise>> {
    let ledger = state.ledger();
    let exercise = tokio::task::spawn_blocking(move || {
        ledger.update_exercise(user_id, exercise_id, patch, Utc::now())
    })
    .await??;

    Ok(Json(exercise))
}

pub async fn delete_exercise(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(exercise_id): Path<u64>,
) -> Result<Json<DeletedResponse>> {
    let ledger = state.ledger();
    tokio::task::spawn_blocking(move || ledger.delete_exercise(user_id, exercise_id, Utc::now()))
        .await??;

    Ok(Json(DeletedResponse {
        success: true,
        id: exercise_id,
    }))
}
