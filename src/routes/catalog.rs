use axum::{Json, extract::State};

use crate::AppState;
use crate::db::seed::load_catalog;
use crate::error::Result;
use crate::models::Catalog;

/// Workout types and exercise templates; public reference data
pub async fn get_catalog(State(state): State<AppState>) -> Result<Json<Catalog>> {
    let db = state.db.clone();
    let catalog = tokio::task::spawn_blocking(move || load_catalog(&db)).await??;

    Ok(Json(catalog))
}
