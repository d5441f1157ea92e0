use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use serde::Serialize;

use crate::AppState;
use crate::error::Result;
use crate::models::{NewWorkout, Workout, WorkoutPatch};
use crate::routes::AuthUser;

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub success: bool,
    pub id: u64,
}

/// List the caller's workouts, most recent first
pub async fn list_workouts(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<Workout>>> {
    let ledger = state.ledger();
    let workouts = tokio::task::spawn_blocking(move || ledger.workouts(user_id)).await??;

    Ok(Json(workouts))
}

/// Log a workout with its exercises
///
/// Personal bests and the cached longest streak are refreshed before the
/// response is sent.
pub async fn create_workout(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<NewWorkout>,
) -> Result<(StatusCode, Json<Workout>)> {
    let ledger = state.ledger();
    let workout =
        tokio::task::spawn_blocking(move || ledger.record_workout(user_id, payload, Utc::now()))
            .await??;

    Ok((StatusCode::CREATED, Json(workout)))
}

/// Fetch one workout; another user's workout is reported as missing
pub async fn get_workout(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(workout_id): Path<u64>,
) -> Result<Json<Workout>> {
    let ledger = state.ledger();
    let workout = tokio::task::spawn_blocking(move || ledger.workout(user_id, workout_id)).await??;

    Ok(Json(workout))
}

pub async fn update_workout(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(workout_id): Path<u64>,
    Json(patch): Json<WorkoutPatch>,
) -> Result<Json<Workout>> {
    let ledger = state.ledger();
    let workout = tokio::task::spawn_blocking(move || {
        ledger.update_workout(user_id, workout_id, patch, Utc::now())
    })
    .await??;

    Ok(Json(workout))
}

pub async fn delete_workout(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(workout_id): Path<u64>,
) -> Result<Json<DeletedResponse>> {
    let ledger = state.ledger();
    tokio::task::spawn_blocking(move || ledger.delete_workout(user_id, workout_id, Utc::now()))
        .await??;

    Ok(Json(DeletedResponse {
        success: true,
        id: workout_id,
    }))
}
