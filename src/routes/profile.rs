use axum::{Json, extract::State};
use serde::Serialize;

use crate::AppState;
use crate::error::Result;
use crate::models::{ProfilePatch, User};
use crate::routes::AuthUser;

#[derive(Debug, Serialize)]
pub struct DeleteUserResponse {
    pub success: bool,
    pub message: String,
}

pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<User>> {
    let accounts = state.accounts();
    let user = tokio::task::spawn_blocking(move || accounts.profile(user_id)).await??;

    Ok(Json(user))
}

/// All registered users, without credentials; any signed-in caller may list them
pub async fn list_users(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
) -> Result<Json<Vec<User>>> {
    let accounts = state.accounts();
    let users = tokio::task::spawn_blocking(move || accounts.list_users()).await??;

    Ok(Json(users))
}

/// Change username, email or avatar; other fields are rejected
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(patch): Json<ProfilePatch>,
) -> Result<Json<User>> {
    let accounts = state.accounts();
    let user =
        tokio::task::spawn_blocking(move || accounts.update_profile(user_id, patch)).await??;

    Ok(Json(user))
}

/// Delete the caller and everything they own
///
/// This permanently removes the user record, all workouts and their line
/// items, and the personal-best set.
pub async fn delete_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<DeleteUserResponse>> {
    let accounts = state.accounts();
    tokio::task::spawn_blocking(move || accounts.delete_user(user_id)).await??;

    Ok(Json(DeleteUserResponse {
        success: true,
        message: "User and all associated data permanently deleted".to_string(),
    }))
}
