//! Profile handlers (get, update, delete)

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use warden_auth_core::UpdateProfile;
use warden_types::{User, UserId};

use super::shared::{
    record_op_duration, validate_email, validate_name, validate_optional, validate_password,
};
use crate::error::{ApiError, ApiResult};
use crate::extractors::BearerToken;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    /// Current password
    pub password: String,
    #[serde(default)]
    pub new_email: Option<String>,
    #[serde(default)]
    pub new_password: Option<String>,
    #[serde(default)]
    pub new_first_name: Option<String>,
    #[serde(default)]
    pub new_last_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteProfileRequest {
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: User,
}

fn parse_user_id(raw: &str) -> Result<UserId, ApiError> {
    UserId::parse(raw).map_err(|_| ApiError::BadRequest("user_id must be a UUID".into()))
}

/// GET /api/v1/profile/{user_id}
pub async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    BearerToken(token): BearerToken,
) -> ApiResult<Json<ProfileResponse>> {
    let start = Instant::now();

    let result = async {
        let user_id = parse_user_id(&user_id)?;
        let user = state.profile.get(user_id, &token).await?;
        Ok::<_, ApiError>(Json(ProfileResponse { user }))
    }
    .await;

    record_op_duration("profile_get", start, result.is_ok());
    result
}

/// PATCH /api/v1/profile/{user_id}
pub async fn update_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    BearerToken(token): BearerToken,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> ApiResult<Json<ProfileResponse>> {
    let start = Instant::now();

    let result = async {
        let user_id = parse_user_id(&user_id)?;
        let Json(req) = payload?;

        validate_password(&req.password, "password")?;
        validate_optional(req.new_email.as_deref(), validate_email)?;
        validate_optional(req.new_password.as_deref(), |p| {
            validate_password(p, "new_password")
        })?;
        validate_optional(req.new_first_name.as_deref(), |n| {
            validate_name(n, "new_first_name")
        })?;
        validate_optional(req.new_last_name.as_deref(), |n| {
            validate_name(n, "new_last_name")
        })?;

        let user = state
            .profile
            .update(UpdateProfile {
                user_id,
                password: req.password,
                new_email: req.new_email,
                new_password: req.new_password,
                new_first_name: req.new_first_name,
                new_last_name: req.new_last_name,
                access_token: token,
            })
            .await?;

        Ok::<_, ApiError>(Json(ProfileResponse { user }))
    }
    .await;

    record_op_duration("profile_update", start, result.is_ok());
    result
}

/// DELETE /api/v1/profile/{user_id}
pub async fn delete_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    BearerToken(token): BearerToken,
    payload: Result<Json<DeleteProfileRequest>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let start = Instant::now();

    let result = async {
        let user_id = parse_user_id(&user_id)?;
        let Json(req) = payload?;
        validate_password(&req.password, "password")?;

        state.profile.delete(user_id, &req.password, &token).await?;
        Ok::<_, ApiError>(StatusCode::NO_CONTENT)
    }
    .await;

    record_op_duration("profile_delete", start, result.is_ok());
    result
}
