//! Error handler for converting AppError to HTTP responses.
//!
//! Domain errors are reported with their detail; everything else is logged
//! here and reported to the client as an opaque message.

use axum::{
    Json,
    body::Body,
    extract::Request,
    http::{HeaderMap, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

use super::RequestId;
use crate::api::dto::ErrorResponse;
use crate::error::AppError;

/// Message returned for every error outside the client-facing tier.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "Unexpected error, check server logs";

impl IntoResponse for AppError {
    /// Converts an AppError into an HTTP response.
    ///
    /// # Status Code Mapping
    /// - NotFound → 404
    /// - Duplicate → 409
    /// - Validation, ValidationErrors, BadRequest → 400
    /// - ConnectionPool → 503
    /// - Database, Storage, Configuration, Internal → 500
    fn into_response(self) -> Response {
        let status = error_to_status_code(&self);
        let code = error_to_code(&self);

        let body = match &self {
            AppError::NotFound { entity, field, value } => ErrorResponse::new(
                code,
                format!("No {} found with {} {}", entity, field, value),
            ),
            AppError::Duplicate {
                entity,
                field,
                value,
                detail,
            } => ErrorResponse::new(
                code,
                detail
                    .clone()
                    .unwrap_or_else(|| format!("Key ({})=({}) already exists.", field, value)),
            )
            .with_details(json!({
                "entity": entity,
                "field": field,
                "value": value,
            })),
            AppError::Validation { field, reason } => {
                ErrorResponse::new(code, reason.as_str()).with_details(json!({ "field": field }))
            }
            AppError::ValidationErrors { errors } => {
                ErrorResponse::new(code, "Validation failed").with_details(json!(errors))
            }
            AppError::BadRequest { message } => ErrorResponse::new(code, message.as_str()),
            _ => {
                tracing::error!(error = ?self, "{}", self);
                ErrorResponse::new(code, UNEXPECTED_ERROR_MESSAGE)
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Maps an AppError variant to its corresponding HTTP status code.
pub fn error_to_status_code(error: &AppError) -> StatusCode {
    match error {
        AppError::NotFound { .. } => StatusCode::NOT_FOUND,
        AppError::Duplicate { .. } => StatusCode::CONFLICT,
        AppError::Validation { .. } | AppError::ValidationErrors { .. } => StatusCode::BAD_REQUEST,
        AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        AppError::ConnectionPool { .. } => StatusCode::SERVICE_UNAVAILABLE,
        AppError::Database { .. }
        | AppError::Storage { .. }
        | AppError::Configuration { .. }
        | AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Maps an AppError variant to its error code string.
pub fn error_to_code(error: &AppError) -> &'static str {
    match error {
        AppError::NotFound { .. } => "NOT_FOUND",
        AppError::Duplicate { .. } => "DUPLICATE_ENTRY",
        AppError::Validation { .. } | AppError::ValidationErrors { .. } => "VALIDATION_ERROR",
        AppError::BadRequest { .. } => "BAD_REQUEST",
        AppError::ConnectionPool { .. } => "SERVICE_UNAVAILABLE",
        AppError::Database { .. }
        | AppError::Storage { .. }
        | AppError::Configuration { .. }
        | AppError::Internal { .. } => "INTERNAL_ERROR",
    }
}

/// Global error handling middleware.
///
/// Error responses produced outside our handlers (unknown routes, wrong
/// methods, body limits) are rewritten into `ErrorResponse` JSON, and every
/// JSON error gets the request id attached.
pub async fn global_error_handler(request: Request, next: Next) -> Response {
    let request_id = request.extensions().get::<RequestId>().map(|r| r.0.clone());
    let response = next.run(request).await;

    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let (parts, body) = response.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap_or_default();

    let is_json = parts
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("application/json"));

    let mut error = match serde_json::from_slice::<ErrorResponse>(&bytes) {
        Ok(error) if is_json => error,
        _ if is_json => {
            // JSON we did not produce; pass it through untouched
            return Response::from_parts(parts, Body::from(bytes));
        }
        _ => fallback_error(status, String::from_utf8_lossy(&bytes).trim()),
    };

    if let Some(id) = request_id {
        error = error.with_request_id(&id);
    }

    let mut rebuilt = (status, Json(error)).into_response();
    copy_headers(&parts.headers, rebuilt.headers_mut());
    rebuilt
}

fn fallback_error(status: StatusCode, original: &str) -> ErrorResponse {
    let (code, default_message) = match status {
        StatusCode::BAD_REQUEST => ("BAD_REQUEST", "Bad request"),
        StatusCode::NOT_FOUND => ("NOT_FOUND", "The requested resource was not found"),
        StatusCode::METHOD_NOT_ALLOWED => {
            ("METHOD_NOT_ALLOWED", "HTTP method not allowed for this endpoint")
        }
        StatusCode::PAYLOAD_TOO_LARGE => ("PAYLOAD_TOO_LARGE", "Request payload too large"),
        StatusCode::UNSUPPORTED_MEDIA_TYPE => ("UNSUPPORTED_MEDIA_TYPE", "Unsupported media type"),
        StatusCode::UNPROCESSABLE_ENTITY => ("UNPROCESSABLE_ENTITY", "Unprocessable request"),
        s if s.is_server_error() => ("INTERNAL_ERROR", UNEXPECTED_ERROR_MESSAGE),
        _ => ("UNKNOWN_ERROR", "Request failed"),
    };

    let message = if original.is_empty() || status.is_server_error() {
        default_message.to_string()
    } else {
        original.to_string()
    };
    ErrorResponse::new(code, message)
}

fn copy_headers(from: &HeaderMap, to: &mut HeaderMap) {
    for (name, value) in from {
        if name != header::CONTENT_TYPE && name != header::CONTENT_LENGTH {
            to.insert(name.clone(), value.clone());
        }
    }
}
