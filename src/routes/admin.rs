use axum::{
    Json,
    extract::{FromRequestParts, Query, State},
    http::request::Parts,
};
use redb::{Database, ReadableDatabase, ReadableTableMetadata};
use serde::{Deserialize, Serialize};

use crate::db::tables;
use crate::error::{AppError, Result};
use crate::security::keys_match;
use crate::AppState;

#[derive(Debug, Deserialize)]
struct AdminQuery {
    key: String,
}

/// Operator access, granted by `?key=` matching `ADMIN_SECRET_KEY`
///
/// Without a configured key every request is rejected with 401.
pub struct AdminAccess;

impl FromRequestParts<AppState> for AdminAccess {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let Some(expected) = state.config.admin_secret_key.as_deref() else {
            return Err(AppError::Unauthorized);
        };

        let Query(query) = Query::<AdminQuery>::try_from_uri(&parts.uri)
            .map_err(|_| AppError::Unauthorized)?;

        if !keys_match(&query.key, expected) {
            tracing::warn!("Rejected admin request with wrong key");
            return Err(AppError::Unauthorized);
        }

        Ok(AdminAccess)
    }
}

/// Ledger volume and store footprint
#[derive(Debug, Serialize)]
pub struct StoreStats {
    pub users: u64,
    pub workouts: u64,
    pub exercises: u64,
    /// Users holding at least one personal best
    pub users_with_personal_bests: u64,
    pub store_bytes: u64,
    pub store_size: String,
}

fn count_records(db: &Database) -> Result<(u64, u64, u64, u64)> {
    let read_txn = db.begin_read()?;

    Ok((
        read_txn.open_table(tables::USERS)?.len()?,
        read_txn.open_table(tables::WORKOUTS)?.len()?,
        read_txn.open_table(tables::WORKOUT_EXERCISES)?.len()?,
        read_txn.open_table(tables::PERSONAL_BESTS)?.len()?,
    ))
}

/// Render a byte count with a binary unit, two decimals above 1 KB
fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 3] = ["KB", "MB", "GB"];

    let mut size = bytes as f64;
    let mut unit = None;
    for next in UNITS {
        if size < 1024.0 {
            break;
        }
        size /= 1024.0;
        unit = Some(next);
    }

    match unit {
        Some(unit) => format!("{size:.2} {unit}"),
        None => format!("{bytes} bytes"),
    }
}

/// GET /admin/stats?key=<admin_secret_key>
pub async fn admin_stats(
    State(state): State<AppState>,
    _: AdminAccess,
) -> Result<Json<StoreStats>> {
    let store_bytes = std::fs::metadata(&state.config.database_path)
        .map(|m| m.len())
        .unwrap_or(0);

    let db = state.db.clone();
    let (users, workouts, exercises, users_with_personal_bests) =
        tokio::task::spawn_blocking(move || count_records(&db)).await??;

    tracing::info!(
        "Admin stats: {} users, {} workouts, {} exercises, {}",
        users,
        workouts,
        exercises,
        human_size(store_bytes)
    );

    Ok(Json(StoreStats {
        users,
        workouts,
        exercises,
        users_with_personal_bests,
        store_bytes,
        store_size: human_size(store_bytes),
    }))
}
