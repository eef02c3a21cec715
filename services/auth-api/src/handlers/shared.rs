//! Shared handler utilities
//!
//! Request validation and metrics helpers used across handlers.

use std::time::Instant;

use crate::error::ApiError;

// ============================================================================
// Input Validation
// ============================================================================

/// RFC 5321 path limit
const MAX_EMAIL_LEN: usize = 254;

const MIN_PASSWORD_LEN: usize = 1;
const MAX_PASSWORD_LEN: usize = 72;

const MAX_NAME_LEN: usize = 100;

/// Validate an email address shape. Deliverability is not checked.
pub fn validate_email(email: &str) -> Result<(), ApiError> {
    if email.is_empty() {
        return Err(ApiError::BadRequest("email is required".into()));
    }
    if email.len() > MAX_EMAIL_LEN {
        return Err(ApiError::BadRequest(format!(
            "email too long (max {MAX_EMAIL_LEN} chars)"
        )));
    }

    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(ApiError::BadRequest("email is not a valid address".into())),
    }
}

/// Validate password length in characters
pub fn validate_password(password: &str, field_name: &str) -> Result<(), ApiError> {
    let len = password.chars().count();
    if !(MIN_PASSWORD_LEN..=MAX_PASSWORD_LEN).contains(&len) {
        return Err(ApiError::BadRequest(format!(
            "{field_name} must be {MIN_PASSWORD_LEN}-{MAX_PASSWORD_LEN} chars"
        )));
    }
    Ok(())
}

/// Validate a first or last name
pub fn validate_name(name: &str, field_name: &str) -> Result<(), ApiError> {
    let len = name.trim().chars().count();
    if len == 0 {
        return Err(ApiError::BadRequest(format!("{field_name} is required")));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ApiError::BadRequest(format!(
            "{field_name} too long (max {MAX_NAME_LEN} chars)"
        )));
    }
    Ok(())
}

/// Validate a field only when present
pub fn validate_optional<F>(value: Option<&str>, validate: F) -> Result<(), ApiError>
where
    F: FnOnce(&str) -> Result<(), ApiError>,
{
    value.map_or(Ok(()), validate)
}

// ============================================================================
// Metrics Helpers
// ============================================================================

/// Record an auth operation outcome.
///
/// Labels: result (ok, or the error code for domain failures, or "error")
#[inline]
pub fn record_outcome<T>(counter: &'static str, result: &Result<T, ApiError>) {
    let label = match result {
        Ok(_) => "ok",
        Err(ApiError::Auth(e)) if !e.is_internal() => e.error_code(),
        Err(ApiError::BadRequest(_)) => "bad_request",
        Err(_) => "error",
    };
    metrics::counter!(counter, "result" => label).increment(1);
}

/// Record HTTP operation duration with result label.
#[inline]
pub fn record_op_duration(operation: &'static str, start: Instant, success: bool) {
    let result = if success { "ok" } else { "err" };
    metrics::histogram!(
        "auth_operation_duration_seconds",
        "operation" => operation,
        "result" => result
    )
    .record(start.elapsed().as_secs_f64());
}

// ============================================================================
// Tests
// ============================================================================
