//! Integration tests for the FitTrack Server API
//!
//! These tests drive the full router through request/response cycles.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use fittrack_server::{AppState, Config, Db, app, open_database};

// Test configuration constants
const TEST_SECRET: &str = "test-secret-key";
const ADMIN_KEY: &str = "admin-key";

// Seeded catalog template ids
const RUNNING: u64 = 1;
const BENCH_PRESS: u64 = 6;
const SQUATS: u64 = 8;

// =============================================================================
// Test Helpers
// =============================================================================

/// Create a test configuration
fn test_config(temp_dir: &TempDir) -> Config {
    Config {
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        database_path: temp_dir.path().join("test.db").display().to_string(),
        allowed_origins: vec!["http://localhost:5173".to_string()],
        environment: "test".to_string(),
        app_secret_key: TEST_SECRET.to_string(),
        admin_secret_key: Some(ADMIN_KEY.to_string()),
        token_ttl_secs: 3600,
        body_weight_kg: 70.0,
        bcrypt_cost: 4,
    }
}

struct TestServer {
    _temp_dir: TempDir,
    db: Db,
    config: Config,
}

impl TestServer {
    fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        let db = open_database(&config.database_path).unwrap();
        Self {
            _temp_dir: temp_dir,
            db,
            config,
        }
    }

    fn app(&self) -> Router {
        app(AppState::new(self.db.clone(), self.config.clone()))
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    /// Register a user and return their bearer token
    async fn register(&self, username: &str) -> String {
        let body = json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "password": "hunter22",
        });
        let (status, body) = self.send(json_request("POST", "/api/register", None, body)).await;
        assert_eq!(status, StatusCode::CREATED);
        body["token"].as_str().unwrap().to_string()
    }

    async fn create_workout(&self, token: &str, body: Value) -> Value {
        let (status, body) = self
            .send(json_request("POST", "/api/workouts", Some(token), body))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body
    }

    async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(request("GET", uri, Some(token))).await
    }
}

fn request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

// =============================================================================
// Health & Catalog Tests
// =============================================================================

#[tokio::test]
async fn test_health_check_returns_healthy() {
    let server = TestServer::new();

    let (status, body) = server.send(request("GET", "/health", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn test_catalog_is_seeded() {
    let server = TestServer::new();

    let (status, body) = server.send(request("GET", "/api/catalog", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["workout_types"].as_array().unwrap().len(), 9);
    let templates = body["exercise_templates"].as_array().unwrap();
    assert_eq!(templates.len(), 31);
    assert_eq!(templates[0]["name"], "Running");
    assert_eq!(templates[0]["supports_distance"], true);
    assert_eq!(templates[7]["name"], "Squats");
    assert_eq!(templates[7]["type"], "strength");
}

// =============================================================================
// Account Tests
// =============================================================================

#[tokio::test]
async fn test_register_and_login() {
    let server = TestServer::new();
    server.register("alice").await;

    let login = json!({ "username": "alice", "password": "hunter22" });
    let (status, body) = server
        .send(json_request("POST", "/api/login", None, login))
        .await;
    assert_eq!(status, StatusCode::OK);

    let token = body["token"].as_str().unwrap();
    let (status, profile) = server.get("/api/profile", token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["username"], "alice");
    assert_eq!(profile["longest_streak"], 0);
}

#[tokio::test]
async fn test_register_duplicate_username_returns_conflict() {
    let server = TestServer::new();
    server.register("alice").await;

    let body = json!({
        "username": "alice",
        "email": "other@example.com",
        "password": "hunter22",
    });
    let (status, body) = server
        .send(json_request("POST", "/api/register", None, body))
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Username already exists");
}

#[tokio::test]
async fn test_register_validates_input() {
    let server = TestServer::new();

    let short_name = json!({ "username": "al", "email": "al@example.com", "password": "x" });
    let (status, _) = server
        .send(json_request("POST", "/api/register", None, short_name))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let bad_email = json!({ "username": "alice", "email": "alice", "password": "x" });
    let (status, _) = server
        .send(json_request("POST", "/api/register", None, bad_email))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_wrong_password_returns_unauthorized() {
    let server = TestServer::new();
    server.register("alice").await;

    let login = json!({ "username": "alice", "password": "wrong" });
    let (status, _) = server
        .send(json_request("POST", "/api/login", None, login))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_requests_without_valid_token_are_rejected() {
    let server = TestServer::new();

    let (status, _) = server.send(request("GET", "/api/workouts", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = server.get("/api/progress", "1.9999999999.deadbeef").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_profile_patch_rejects_unknown_fields() {
    let server = TestServer::new();
    let token = server.register("alice").await;

    let patch = json!({ "longest_streak": 100 });
    let (status, _) = server
        .send(json_request("PATCH", "/api/profile", Some(&token), patch))
        .await;
    assert!(status.is_client_error());

    let patch = json!({ "avatar": "https://example.com/a.png" });
    let (status, body) = server
        .send(json_request("PATCH", "/api/profile", Some(&token), patch))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["avatar"], "https://example.com/a.png");
    assert_eq!(body["longest_streak"], 0);
}

// =============================================================================
// Workout Tests
// =============================================================================

#[tokio::test]
async fn test_workout_round_trip_totals() {
    let server = TestServer::new();
    let token = server.register("alice").await;

    let workout = server
        .create_workout(
            &token,
            json!({
                "workout_name": "Push day",
                "exercises": [
                    { "exercise_template_id": BENCH_PRESS, "sets": 3, "reps": 5, "weight": 100.0 },
                    { "exercise_template_id": SQUATS, "sets": 3, "reps": 5, "weight": 120.0 },
                ],
            }),
        )
        .await;
    assert_eq!(workout["exercises"].as_array().unwrap().len(), 2);
    assert_eq!(workout["exercises"][0]["name"], "Bench Press");

    let (status, summary) = server.get("/api/progress", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["total_workouts"], 1);
    assert_eq!(summary["total_exercises"], 2);
    assert_eq!(summary["current_streak"], 1);
    assert_eq!(summary["longest_streak"], 1);
    assert_eq!(summary["best_squat"], "120 kg");
    assert_eq!(summary["best_run"], "N/A");
    assert_eq!(summary["personal_bests"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_calorie_estimate() {
    let server = TestServer::new();
    let token = server.register("alice").await;

    let workout = server
        .create_workout(
            &token,
            json!({ "workout_name": "Evening run", "duration": 30, "intensity": 5.0 }),
        )
        .await;
    assert_eq!(workout["estimated_calories"], 1050.0);

    let no_intensity = server
        .create_workout(&token, json!({ "workout_name": "Walk", "duration": 30 }))
        .await;
    assert_eq!(no_intensity["estimated_calories"], 0.0);
}

#[tokio::test]
async fn test_invalid_workout_is_rejected_without_writes() {
    let server = TestServer::new();
    let token = server.register("alice").await;

    for body in [
        json!({ "workout_name": "ab" }),
        json!({ "workout_name": "Leg day", "intensity": 11.0 }),
        json!({ "workout_name": "Leg day", "duration": -5 }),
        json!({
            "workout_name": "Leg day",
            "exercises": [{ "exercise_template_id": SQUATS, "weight": -1.0 }],
        }),
    ] {
        let (status, _) = server
            .send(json_request("POST", "/api/workouts", Some(&token), body))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    let (_, workouts) = server.get("/api/workouts", &token).await;
    assert!(workouts.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_other_users_workout_is_not_found() {
    let server = TestServer::new();
    let alice = server.register("alice").await;
    let mallory = server.register("mallory").await;

    let workout = server
        .create_workout(&alice, json!({ "workout_name": "Private session" }))
        .await;
    let uri = format!("/api/workouts/{}", workout["id"]);

    let (status, _) = server.get(&uri, &mallory).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = server.send(request("DELETE", &uri, Some(&mallory))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = server.get(&uri, &alice).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_update_workout_recomputes_calories_and_bests() {
    let server = TestServer::new();
    let token = server.register("alice").await;

    let workout = server
        .create_workout(
            &token,
            json!({
                "workout_name": "Bench",
                "duration": 30,
                "intensity": 5.0,
                "exercises": [{ "exercise_template_id": BENCH_PRESS, "weight": 100.0 }],
            }),
        )
        .await;
    let uri = format!("/api/workouts/{}", workout["id"]);

    let patch = json!({
        "intensity": 2.0,
        "exercises": [{ "exercise_template_id": BENCH_PRESS, "weight": 110.0 }],
    });
    let (status, updated) = server
        .send(json_request("PATCH", &uri, Some(&token), patch))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["estimated_calories"], 420.0);

    let (_, bests) = server.get("/api/personal-bests", &token).await;
    assert_eq!(bests[0]["exercise_name"], "Bench Press");
    assert_eq!(bests[0]["max_weight"], 110.0);

    let (status, _) = server
        .send(json_request("PATCH", &uri, Some(&token), json!({})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_workout_drops_personal_bests() {
    let server = TestServer::new();
    let token = server.register("alice").await;

    let workout = server
        .create_workout(
            &token,
            json!({
                "workout_name": "Morning run",
                "exercises": [{ "exercise_template_id": RUNNING, "distance": 5.0 }],
            }),
        )
        .await;
    let (_, summary) = server.get("/api/progress", &token).await;
    assert_eq!(summary["best_run"], "5 km");

    let uri = format!("/api/workouts/{}", workout["id"]);
    let (status, _) = server.send(request("DELETE", &uri, Some(&token))).await;
    assert_eq!(status, StatusCode::OK);

    let (_, bests) = server.get("/api/personal-bests", &token).await;
    assert!(bests.as_array().unwrap().is_empty());

    let (_, summary) = server.get("/api/progress", &token).await;
    assert_eq!(summary["total_workouts"], 0);
    assert_eq!(summary["average_duration_minutes"], 0);
    assert_eq!(summary["best_run"], "N/A");
}

#[tokio::test]
async fn test_workouts_listed_most_recent_first() {
    let server = TestServer::new();
    let token = server.register("alice").await;

    let earlier = Utc::now() - Duration::days(3);
    server
        .create_workout(
            &token,
            json!({ "workout_name": "Older", "date": earlier.to_rfc3339() }),
        )
        .await;
    server
        .create_workout(&token, json!({ "workout_name": "Newer" }))
        .await;

    let (_, workouts) = server.get("/api/workouts", &token).await;
    let names: Vec<&str> = workouts
        .as_array()
        .unwrap()
        .iter()
        .map(|w| w["workout_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Newer", "Older"]);
}

// =============================================================================
// Exercise Tests
// =============================================================================

#[tokio::test]
async fn test_exercise_endpoints_refresh_personal_bests() {
    let server = TestServer::new();
    let token = server.register("alice").await;

    let workout = server
        .create_workout(&token, json!({ "workout_name": "Legs" }))
        .await;

    let add = json!({ "workout_id": workout["id"], "exercise_template_id": SQUATS, "weight": 100.0 });
    let (status, exercise) = server
        .send(json_request("POST", "/api/exercises", Some(&token), add))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(exercise["name"], "Squats");

    let uri = format!("/api/exercises/{}", exercise["id"]);
    let (status, _) = server
        .send(json_request("PATCH", &uri, Some(&token), json!({ "weight": 140.0 })))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, summary) = server.get("/api/progress", &token).await;
    assert_eq!(summary["best_squat"], "140 kg");

    let (status, _) = server.send(request("DELETE", &uri, Some(&token))).await;
    assert_eq!(status, StatusCode::OK);

    let (_, summary) = server.get("/api/progress", &token).await;
    assert_eq!(summary["best_squat"], "N/A");
    assert_eq!(summary["total_exercises"], 0);
}

#[tokio::test]
async fn test_add_exercise_to_other_users_workout_is_not_found() {
    let server = TestServer::new();
    let alice = server.register("alice").await;
    let mallory = server.register("mallory").await;

    let workout = server
        .create_workout(&alice, json!({ "workout_name": "Legs" }))
        .await;

    let add = json!({ "workout_id": workout["id"], "exercise_template_id": SQUATS });
    let (status, _) = server
        .send(json_request("POST", "/api/exercises", Some(&mallory), add))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Delete User Tests
// =============================================================================

#[tokio::test]
async fn test_delete_profile_cascades() {
    let server = TestServer::new();
    let token = server.register("alice").await;
    let other = server.register("bob").await;

    server
        .create_workout(
            &token,
            json!({
                "workout_name": "Push day",
                "exercises": [{ "exercise_template_id": BENCH_PRESS, "weight": 100.0 }],
            }),
        )
        .await;
    server
        .create_workout(&other, json!({ "workout_name": "Bob's day" }))
        .await;

    let (status, body) = server
        .send(request("DELETE", "/api/profile", Some(&token)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, _) = server.get("/api/profile", &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, stats) = server
        .send(request("GET", &format!("/admin/stats?key={ADMIN_KEY}"), None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["users"], 1);
    assert_eq!(stats["workouts"], 1);
    assert_eq!(stats["exercises"], 0);
    assert_eq!(stats["users_with_personal_bests"], 0);
}

// =============================================================================
// Admin Tests
// =============================================================================

#[tokio::test]
async fn test_admin_stats_invalid_key() {
    let server = TestServer::new();

    let (status, _) = server
        .send(request("GET", "/admin/stats?key=wrong", None))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_stats_counts_personal_bests() {
    let server = TestServer::new();
    let token = server.register("alice").await;
    server
        .create_workout(
            &token,
            json!({
                "workout_name": "Legs",
                "exercises": [{ "exercise_template_id": SQUATS, "weight": 120.0 }],
            }),
        )
        .await;

    let (status, stats) = server
        .send(request("GET", &format!("/admin/stats?key={ADMIN_KEY}"), None))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["users"], 1);
    assert_eq!(stats["exercises"], 1);
    assert_eq!(stats["users_with_personal_bests"], 1);
    assert!(stats["store_bytes"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn test_admin_stats_key_prefix_rejected() {
    let server = TestServer::new();

    let (status, _) = server
        .send(request("GET", "/admin/stats?key=admin", None))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = server.send(request("GET", "/admin/stats", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_stats_disabled_without_key() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = test_config(&temp_dir);
    config.admin_secret_key = None;
    let db = open_database(&config.database_path).unwrap();

    let response = app(AppState::new(db, config))
        .oneshot(request("GET", "/admin/stats?key=", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// =============================================================================
// User Listing Tests
// =============================================================================

#[tokio::test]
async fn test_list_users_requires_token() {
    let server = TestServer::new();

    let (status, _) = server.send(request("GET", "/api/users", None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_list_users_hides_credentials() {
    let server = TestServer::new();
    let token = server.register("alice").await;
    server.register("bob").await;

    let (status, body) = server.get("/api/users", &token).await;

    assert_eq!(status, StatusCode::OK);
    let users = body.as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["username"], "alice");
    assert_eq!(users[1]["username"], "bob");
    for user in users {
        assert!(user.get("password_hash").is_none());
        assert!(user.get("password").is_none());
    }
}
