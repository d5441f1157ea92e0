//! FitTrack Server Library
//!
//! Workout logging with streaks, personal bests and progress summaries.
//! This module exports the core types and the router for testing and reuse.

pub mod accounts;
pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod ledger;
pub mod models;
pub mod progress;
pub mod routes;
pub mod security;

pub use accounts::Accounts;
pub use config::Config;
pub use db::{Db, open_database};
pub use error::{AppError, Result};
pub use ledger::Ledger;

use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::{get, patch, post},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub config: Config,
}

impl AppState {
    /// Create a new AppState with the given database and configuration
    pub fn new(db: Db, config: Config) -> Self {
        Self { db, config }
    }

    pub fn ledger(&self) -> Ledger {
        Ledger::new(self.db.clone(), self.config.body_weight_kg)
    }

    pub fn accounts(&self) -> Accounts {
        Accounts::new(self.db.clone(), self.config.bcrypt_cost)
    }
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers(Any)
}

/// Build the application router
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.allowed_origins);

    Router::new()
        .route("/health", get(routes::health_check))
        .route("/api/register", post(routes::register))
        .route("/api/login", post(routes::login))
        .route(
            "/api/profile",
            get(routes::get_profile)
                .patch(routes::update_profile)
                .delete(routes::delete_profile),
        )
        .route("/api/users", get(routes::list_users))
        .route("/api/catalog", get(routes::get_catalog))
        .route(
            "/api/workouts",
            get(routes::list_workouts).post(routes::create_workout),
        )
        .route(
            "/api/workouts/{id}",
            get(routes::get_workout)
                .patch(routes::update_workout)
                .delete(routes::delete_workout),
        )
        .route("/api/exercises", post(routes::add_exercise))
        .route(
            "/api/exercises/{id}",
            patch(routes::update_exercise).delete(routes::delete_exercise),
        )
        .route("/api/personal-bests", get(routes::personal_bests))
        .route("/api/progress", get(routes::progress_summary))
        .route("/admin/stats", get(routes::admin_stats))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
