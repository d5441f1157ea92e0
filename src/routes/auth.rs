use axum::{
    Json,
    extract::{FromRequestParts, State},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::accounts::NewAccount;
use crate::error::{AppError, Result};
use crate::models::User;
use crate::security::{issue_token, verify_token};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub user_id: u64,
}

impl TokenResponse {
    fn for_user(user: &User, state: &AppState) -> Result<Self> {
        let token = issue_token(
            user.id,
            Utc::now(),
            state.config.token_ttl_secs,
            &state.config.app_secret_key,
        )?;
        Ok(Self {
            token,
            user_id: user.id,
        })
    }
}

/// Authenticated caller, taken from `Authorization: Bearer <token>`
///
/// The token is an HS256 JWT whose `sub` is the user id. Missing, malformed,
/// tampered and expired tokens are all rejected with 401.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub u64);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(AppError::Unauthorized)?;

        verify_token(token.trim(), &state.config.app_secret_key)
            .map(AuthUser)
            .ok_or(AppError::Unauthorized)
    }
}

/// Register a new user
///
/// Returns 409 Conflict if the username or email is already in use.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<NewAccount>,
) -> Result<(StatusCode, Json<TokenResponse>)> {
    let accounts = state.accounts();
    let user =
        tokio::task::spawn_blocking(move || accounts.register(payload, Utc::now())).await??;

    Ok((StatusCode::CREATED, Json(TokenResponse::for_user(&user, &state)?)))
}

/// Exchange a username and password for a bearer token
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>> {
    let accounts = state.accounts();
    let user = tokio::task::spawn_blocking(move || {
        accounts.authenticate(&payload.username, &payload.password)
    })
    .await??;

    tracing::info!("User {} logged in", user.id);

    Ok(Json(TokenResponse::for_user(&user, &state)?))
}
