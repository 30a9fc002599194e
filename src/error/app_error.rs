use crate::error::DatabaseErrorConverter;
use diesel_async::pooled_connection::bb8::RunError;
use serde::Serialize;
use thiserror::Error;

/// A single field-level validation failure.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ValidationFieldError {
    pub field: String,
    pub message: String,
}

/// Application-wide error type that represents all possible errors in the system.
///
/// Variants split into two tiers. Domain errors (`NotFound`, `Duplicate`,
/// `Validation`, `ValidationErrors`, `BadRequest`) reach the client with their
/// detail. Everything else is logged server-side and reported opaquely.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found error with entity, field, and value information
    #[error("Resource not found: {entity} with {field}={value}")]
    NotFound {
        entity: String,
        field: String,
        value: String,
    },

    /// Duplicate entry error for unique constraint violations
    #[error("Duplicate entry: {entity}.{field} = '{value}' already exists")]
    Duplicate {
        entity: String,
        field: String,
        value: String,
        /// Detail line reported by the database, when available
        detail: Option<String>,
    },

    /// Validation error with field-specific details
    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Validation errors collected from a request payload
    #[error("Validation failed for {} field(s)", errors.len())]
    ValidationErrors { errors: Vec<ValidationFieldError> },

    /// Bad request error with descriptive message
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    /// Database operation error with operation context
    #[error("Database operation failed: {operation}")]
    Database {
        operation: String,
        #[source]
        source: anyhow::Error,
    },

    /// File storage error
    #[error("Storage operation failed: {operation}")]
    Storage {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration error with key information
    #[error("Configuration error: {key}")]
    Configuration {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// Connection pool error
    #[error("Connection pool error")]
    ConnectionPool {
        #[source]
        source: anyhow::Error,
    },

    /// Internal error for unexpected failures
    #[error("Internal error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    /// Shorthand for a missing product looked up by `field`.
    pub fn product_not_found(field: &str, value: impl Into<String>) -> Self {
        AppError::NotFound {
            entity: "product".to_string(),
            field: field.to_string(),
            value: value.into(),
        }
    }

    /// Shorthand for a storage failure.
    pub fn storage(operation: impl Into<String>, source: std::io::Error) -> Self {
        AppError::Storage {
            operation: operation.into(),
            source,
        }
    }

    /// Whether the error belongs to the client-facing tier.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::NotFound { .. }
                | AppError::Duplicate { .. }
                | AppError::Validation { .. }
                | AppError::ValidationErrors { .. }
                | AppError::BadRequest { .. }
        )
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

impl From<diesel::result::Error> for AppError {
    fn from(error: diesel::result::Error) -> Self {
        DatabaseErrorConverter::convert_diesel_error(error, "database operation")
    }
}

impl From<RunError> for AppError {
    fn from(error: RunError) -> Self {
        AppError::ConnectionPool {
            source: anyhow::Error::msg(error.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut collected: Vec<ValidationFieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, field_errors)| {
                field_errors.iter().map(move |error| ValidationFieldError {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value ({})", error.code)),
                })
            })
            .collect();
        collected.sort_by(|a, b| a.field.cmp(&b.field));
        AppError::ValidationErrors { errors: collected }
    }
}

impl From<crate::config::error::ConfigError> for AppError {
    fn from(error: crate::config::error::ConfigError) -> Self {
        let key = match &error {
            crate::config::error::ConfigError::ValidationError { field, .. } => field.clone(),
            _ => "settings".to_string(),
        };
        AppError::Configuration {
            key,
            source: anyhow::Error::new(error),
        }
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "Title cannot be empty"))]
        title: String,
        #[validate(range(min = 0.0))]
        price: f64,
    }

    #[test]
    fn test_validation_errors_are_collected_per_field() {
        let sample = Sample {
            title: String::new(),
            price: -1.0,
        };
        let error = AppError::from(sample.validate().unwrap_err());

        match error {
            AppError::ValidationErrors { errors } => {
                assert_eq!(errors.len(), 2);
                assert_eq!(errors[0].field, "price");
                assert!(errors[0].message.contains("range"));
                assert_eq!(errors[1].field, "title");
                assert_eq!(errors[1].message, "Title cannot be empty");
            }
            other => panic!("Expected ValidationErrors, got {:?}", other),
        }
    }

    #[test]
    fn test_client_error_tier() {
        assert!(AppError::product_not_found("id", "x").is_client_error());
        assert!(AppError::BadRequest { message: "no".into() }.is_client_error());
        assert!(
            !AppError::Internal {
                source: anyhow::anyhow!("boom")
            }
            .is_client_error()
        );
        assert!(
            !AppError::storage("write", std::io::Error::other("disk full")).is_client_error()
        );
    }
}
