//! Health check endpoint handlers.
//!
//! The database check goes straight to the connection pool; the storage
//! check asks the image storage backend whether it is usable.

use crate::api::doc::HEALTH_TAG;
use crate::api::dto::{ComponentHealth, HealthResponse, HealthStatus};
use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode};
use std::collections::BTreeMap;
use std::time::Instant;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// Creates health check routes.
///
/// # Routes
/// - `GET /health` - Full health report
/// - `GET /health/ready` - Readiness probe
/// - `GET /health/live` - Liveness probe
pub fn health_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(health_check))
        .routes(routes!(readiness_check))
        .routes(routes!(liveness_check))
}

/// Full health report with per-component checks.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Service is unhealthy", body = HealthResponse)
    ),
    tag = HEALTH_TAG
)]
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let mut checks = BTreeMap::new();
    checks.insert("database".to_string(), check_database(&state).await);
    checks.insert("storage".to_string(), check_storage(&state).await);

    let status = checks
        .values()
        .fold(HealthStatus::Healthy, |acc, check| acc.worst(check.status));

    let response = HealthResponse {
        status,
        version: crate::pkg_version().to_string(),
        timestamp: jiff::Timestamp::now().to_string(),
        checks,
    };

    let code = match status {
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
    };
    (code, Json(response))
}

/// Readiness probe: database and storage must both be usable.
#[utoipa::path(
    get,
    path = "/health/ready",
    responses(
        (status = 200, description = "Service is ready"),
        (status = 503, description = "Service is not ready")
    ),
    tag = HEALTH_TAG
)]
pub async fn readiness_check(State(state): State<AppState>) -> StatusCode {
    let status = check_database(&state)
        .await
        .status
        .worst(check_storage(&state).await.status);

    match status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Degraded | HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Liveness probe; does not touch any dependency.
#[utoipa::path(
    get,
    path = "/health/live",
    responses(
        (status = 200, description = "Service is alive")
    ),
    tag = HEALTH_TAG
)]
pub async fn liveness_check() -> StatusCode {
    StatusCode::OK
}

async fn check_database(state: &AppState) -> ComponentHealth {
    use diesel_async::RunQueryDsl;

    let start = Instant::now();
    let elapsed = || start.elapsed().as_millis() as u64;

    match state.db_pool.get().await {
        Ok(mut conn) => match diesel::sql_query("SELECT 1").execute(&mut conn).await {
            Ok(_) => ComponentHealth::new(HealthStatus::Healthy, "Connected", elapsed()),
            Err(e) => ComponentHealth::new(
                HealthStatus::Unhealthy,
                format!("Query failed: {}", e),
                elapsed(),
            ),
        },
        Err(e) => ComponentHealth::new(
            HealthStatus::Unhealthy,
            format!("Connection failed: {}", e),
            elapsed(),
        ),
    }
}

async fn check_storage(state: &AppState) -> ComponentHealth {
    let start = Instant::now();

    match state.services.files.check_storage().await {
        Ok(()) => ComponentHealth::new(
            HealthStatus::Healthy,
            "Writable",
            start.elapsed().as_millis() as u64,
        ),
        Err(e) => {
            tracing::warn!(error = ?e, "Image storage check failed");
            ComponentHealth::new(
                HealthStatus::Unhealthy,
                "Upload directory unavailable",
                start.elapsed().as_millis() as u64,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_liveness_check() {
        assert_eq!(liveness_check().await, StatusCode::OK);
    }
}
