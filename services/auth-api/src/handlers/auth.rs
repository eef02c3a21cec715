//! Authentication handlers (register, login, refresh, logout)

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use warden_auth_core::{AuthOutcome, Registration};
use warden_types::User;

use super::shared::{
    record_op_duration, record_outcome, validate_email, validate_name, validate_password,
};
use crate::error::{ApiError, ApiResult};
use crate::extractors::BearerToken;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
}

impl From<AuthOutcome> for SessionResponse {
    fn from(outcome: AuthOutcome) -> Self {
        Self {
            user: outcome.user,
            access_token: outcome.tokens.access_token,
            refresh_token: outcome.tokens.refresh_token,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<SessionResponse>)> {
    let start = Instant::now();

    let result = async {
        let Json(req) = payload?;
        validate_email(&req.email)?;
        validate_password(&req.password, "password")?;
        validate_name(&req.first_name, "first_name")?;
        validate_name(&req.last_name, "last_name")?;

        let outcome = state
            .auth
            .register(Registration {
                email: req.email,
                password: req.password,
                first_name: req.first_name,
                last_name: req.last_name,
            })
            .await?;

        Ok::<_, ApiError>((StatusCode::CREATED, Json(SessionResponse::from(outcome))))
    }
    .await;

    record_outcome("auth_registrations_total", &result);
    record_op_duration("register", start, result.is_ok());
    result
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<SessionResponse>> {
    let start = Instant::now();

    let result = async {
        let Json(req) = payload?;
        validate_email(&req.email)?;
        validate_password(&req.password, "password")?;

        let outcome = state.auth.login(&req.email, &req.password).await?;
        Ok::<_, ApiError>(Json(SessionResponse::from(outcome)))
    }
    .await;

    record_outcome("auth_logins_total", &result);
    record_op_duration("login", start, result.is_ok());
    result
}

/// POST /api/v1/auth/refresh
///
/// Issues a new access token; the refresh token and session stay as they are.
pub async fn refresh(
    State(state): State<AppState>,
    payload: Result<Json<RefreshRequest>, JsonRejection>,
) -> ApiResult<Json<RefreshResponse>> {
    let start = Instant::now();

    let result = async {
        let Json(req) = payload?;
        if req.refresh_token.is_empty() {
            return Err(ApiError::BadRequest("refresh_token is required".into()));
        }

        let access_token = state.auth.refresh_token(&req.refresh_token).await?;
        Ok::<_, ApiError>(Json(RefreshResponse { access_token }))
    }
    .await;

    record_outcome("auth_refreshes_total", &result);
    record_op_duration("refresh", start, result.is_ok());
    result
}

/// POST /api/v1/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> ApiResult<StatusCode> {
    let start = Instant::now();

    let result = state
        .auth
        .logout(&token)
        .await
        .map(|()| StatusCode::NO_CONTENT)
        .map_err(ApiError::from);

    record_outcome("auth_logouts_total", &result);
    record_op_duration("logout", start, result.is_ok());
    result
}
