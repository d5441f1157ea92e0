use axum::{Json, extract::State};
use redb::{Database, ReadableDatabase, ReadableTableMetadata};
use serde_json::{Value, json};

use crate::AppState;
use crate::db::tables;

fn workout_type_count(db: &Database) -> Result<u64, redb::Error> {
    let read_txn = db.begin_read()?;
    Ok(read_txn.open_table(tables::WORKOUT_TYPES)?.len()?)
}

/// Health check endpoint
///
/// Opens a read transaction and counts the seeded workout types, so a store
/// that opens but lost its catalog also reports unhealthy.
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let db = state.db.clone();
    let db_status = tokio::task::spawn_blocking(move || {
        match workout_type_count(&db) {
            Ok(0) => "unseeded",
            Ok(_) => "connected",
            Err(e) => {
                tracing::error!("Database health check failed: {:?}", e);
                "disconnected"
            }
        }
    })
    .await
    .unwrap_or("error");

    Json(json!({
        "status": if db_status == "connected" { "healthy" } else { "unhealthy" },
        "database": db_status,
        "environment": state.config.environment,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
