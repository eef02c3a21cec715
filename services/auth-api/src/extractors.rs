//! Axum extractors for authentication

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use axum::http::HeaderMap;

use crate::error::ApiError;

const BEARER_PREFIX: &str = "Bearer ";

/// Raw bearer token from the `Authorization` header.
///
/// Only extraction happens here; verification belongs to the services,
/// which run the full access-token protocol against the session store.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        extract_bearer(&parts.headers).map(|token| BearerToken(token.to_string()))
    }
}

/// Pull the token out of `Authorization: Bearer <token>`
pub fn extract_bearer(headers: &HeaderMap) -> Result<&str, ApiError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(ApiError::HeaderNotProvided)?;

    let value = value.to_str().map_err(|_| ApiError::MalformedAuthorization)?;

    value
        .strip_prefix(BEARER_PREFIX)
        .filter(|token| !token.is_empty())
        .ok_or(ApiError::MalformedAuthorization)
}
