//! Health check handlers

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use std::time::Instant;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub checks: ReadyChecks,
}

#[derive(Debug, Serialize)]
pub struct ReadyChecks {
    pub database: CheckResult,
    pub session_store: CheckResult,
}

#[derive(Debug, Serialize)]
pub struct CheckResult {
    pub status: &'static str,
    pub latency_ms: u64,
}

impl CheckResult {
    fn from_outcome(ok: bool, start: Instant) -> Self {
        Self {
            status: if ok { "ok" } else { "error" },
            latency_ms: start.elapsed().as_millis() as u64,
        }
    }

    fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// GET /health - Liveness probe (fast, no dependencies)
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "auth-api",
    })
}

/// GET /ready - Readiness probe (checks PostgreSQL and Redis)
pub async fn ready(
    State(state): State<AppState>,
) -> Result<Json<ReadyResponse>, (StatusCode, Json<ReadyResponse>)> {
    let start = Instant::now();
    let db_ok = sqlx::query("SELECT 1")
        .fetch_one(&*state.pool)
        .await
        .inspect_err(|e| tracing::warn!(error = %e, "Database readiness check failed"))
        .is_ok();
    let database = CheckResult::from_outcome(db_ok, start);

    let start = Instant::now();
    let redis_ok = state
        .sessions
        .ping()
        .await
        .inspect_err(|e| tracing::warn!(error = %e, "Session store readiness check failed"))
        .is_ok();
    let session_store = CheckResult::from_outcome(redis_ok, start);

    let ready = database.is_ok() && session_store.is_ok();
    let body = Json(ReadyResponse {
        status: if ready { "ready" } else { "not_ready" },
        service: "auth-api",
        checks: ReadyChecks {
            database,
            session_store,
        },
    });

    if ready {
        Ok(body)
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, body))
    }
}
