use axum::{Json, extract::State};
use chrono::Utc;

use crate::AppState;
use crate::error::Result;
use crate::models::PersonalBest;
use crate::progress::ProgressSummary;
use crate::routes::AuthUser;

/// Progress summary for the caller
///
/// Read-only: the current streak is computed against today's UTC date and
/// nothing is written.
pub async fn progress_summary(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ProgressSummary>> {
    let ledger = state.ledger();
    let summary =
        tokio::task::spawn_blocking(move || ledger.progress_summary(user_id, Utc::now()))
            .await??;

    Ok(Json(summary))
}

pub async fn personal_bests(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<PersonalBest>>> {
    let ledger = state.ledger();
    let bests = tokio::task::spawn_blocking(move || ledger.personal_bests(user_id)).await??;

    Ok(Json(bests))
}
