use crate::error::{AppError, ConstraintParser};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// Utility for converting database errors to structured AppError variants.
///
/// Every unique violation becomes [`AppError::Duplicate`] carrying the
/// database's detail line (or its message when no detail is reported). Other
/// errors the parser cannot classify stay an opaque [`AppError::Database`].
pub struct DatabaseErrorConverter;

impl DatabaseErrorConverter {
    /// Converts a Diesel error to an appropriate AppError variant.
    ///
    /// # Arguments
    /// * `error` - The Diesel error to convert
    /// * `operation` - Description of the database operation that failed
    pub fn convert_diesel_error(error: DieselError, operation: &str) -> AppError {
        match error {
            DieselError::DatabaseError(kind, info) => {
                Self::convert_database_error(kind, info.as_ref(), operation)
            }
            DieselError::NotFound => AppError::NotFound {
                entity: "resource".to_string(),
                field: "id".to_string(),
                value: "unknown".to_string(),
            },
            other => AppError::Database {
                operation: operation.to_string(),
                source: anyhow::Error::from(other),
            },
        }
    }

    fn convert_database_error(
        kind: DatabaseErrorKind,
        info: &(dyn DatabaseErrorInformation + Send + Sync),
        operation: &str,
    ) -> AppError {
        let message = info.message();
        let details = info.details();
        let table = info.table_name();
        let constraint_name = info.constraint_name();

        let parsed = match kind {
            DatabaseErrorKind::UniqueViolation => {
                let (entity, field, value) = ConstraintParser::parse_unique_violation(
                    message,
                    details,
                    table,
                    constraint_name,
                )
                .unwrap_or_else(|| {
                    (
                        "resource".to_string(),
                        "unknown".to_string(),
                        "duplicate_value".to_string(),
                    )
                });
                Some(AppError::Duplicate {
                    entity,
                    field,
                    value,
                    detail: Some(details.unwrap_or(message).to_string()),
                })
            }
            DatabaseErrorKind::NotNullViolation => {
                ConstraintParser::parse_not_null_violation(message, table, info.column_name()).map(
                    |(entity, field)| AppError::Validation {
                        field,
                        reason: format!("Field is required for {}", entity),
                    },
                )
            }
            DatabaseErrorKind::ForeignKeyViolation => {
                ConstraintParser::parse_foreign_key_violation(
                    message,
                    details,
                    table,
                    constraint_name,
                )
                .map(|(entity, field, value)| AppError::Validation {
                    field,
                    reason: format!("Invalid reference from {} with value '{}'", entity, value),
                })
            }
            DatabaseErrorKind::CheckViolation => constraint_name
                .and_then(|c| ConstraintParser::parse_constraint_name(c, table))
                .map(|(entity, field)| AppError::Validation {
                    field,
                    reason: format!("Check constraint failed for {}", entity),
                }),
            _ => None,
        };

        parsed.unwrap_or_else(|| AppError::Database {
            operation: operation.to_string(),
            source: anyhow::Error::msg(format!("{:?}: {}", kind, message)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Mock database error information for testing
    #[derive(Default)]
    struct MockDatabaseErrorInfo {
        message: String,
        details: Option<String>,
        table_name: Option<String>,
        column_name: Option<String>,
        constraint_name: Option<String>,
    }

    impl DatabaseErrorInformation for MockDatabaseErrorInfo {
        fn message(&self) -> &str {
            &self.message
        }

        fn details(&self) -> Option<&str> {
            self.details.as_deref()
        }

        fn hint(&self) -> Option<&str> {
            None
        }

        fn table_name(&self) -> Option<&str> {
            self.table_name.as_deref()
        }

        fn column_name(&self) -> Option<&str> {
            self.column_name.as_deref()
        }

        fn constraint_name(&self) -> Option<&str> {
            self.constraint_name.as_deref()
        }

        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn database_error(kind: DatabaseErrorKind, info: MockDatabaseErrorInfo) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(info))
    }

    #[test]
    fn test_convert_not_found_error() {
        let result = DatabaseErrorConverter::convert_diesel_error(DieselError::NotFound, "find");

        match result {
            AppError::NotFound { entity, field, .. } => {
                assert_eq!(entity, "resource");
                assert_eq!(field, "id");
            }
            _ => panic!("Expected NotFound error"),
        }
    }

    #[test]
    fn test_convert_unique_violation_on_product_title() {
        let info = MockDatabaseErrorInfo {
            message: "duplicate key value violates unique constraint \"products_title_key\""
                .to_string(),
            details: Some("Key (title)=(Teslo Hoodie) already exists.".to_string()),
            table_name: Some("products".to_string()),
            constraint_name: Some("products_title_key".to_string()),
            ..Default::default()
        };

        let result = DatabaseErrorConverter::convert_diesel_error(
            database_error(DatabaseErrorKind::UniqueViolation, info),
            "insert product",
        );

        match result {
            AppError::Duplicate {
                entity,
                field,
                value,
                detail,
            } => {
                assert_eq!(entity, "products");
                assert_eq!(field, "title");
                assert_eq!(value, "Teslo Hoodie");
                assert_eq!(
                    detail.as_deref(),
                    Some("Key (title)=(Teslo Hoodie) already exists.")
                );
            }
            _ => panic!("Expected Duplicate error, got: {:?}", result),
        }
    }

    #[test]
    fn test_convert_unique_violation_on_slug_without_table() {
        let info = MockDatabaseErrorInfo {
            message: "duplicate key value violates unique constraint \"products_slug_key\""
                .to_string(),
            details: Some("Key (slug)=(teslo_hoodie) already exists.".to_string()),
            constraint_name: Some("products_slug_key".to_string()),
            ..Default::default()
        };

        let result = DatabaseErrorConverter::convert_diesel_error(
            database_error(DatabaseErrorKind::UniqueViolation, info),
            "insert product",
        );

        assert!(matches!(
            result,
            AppError::Duplicate { ref field, ref value, .. } if field == "slug" && value == "teslo_hoodie"
        ));
    }

    #[test]
    fn test_unique_violation_without_constraint_details_is_duplicate() {
        let info = MockDatabaseErrorInfo {
            message: "duplicate key value violates unique constraint".to_string(),
            ..Default::default()
        };

        let result = DatabaseErrorConverter::convert_diesel_error(
            database_error(DatabaseErrorKind::UniqueViolation, info),
            "insert product",
        );

        match result {
            AppError::Duplicate {
                entity,
                field,
                detail,
                ..
            } => {
                assert_eq!(entity, "resource");
                assert_eq!(field, "unknown");
                assert_eq!(
                    detail.as_deref(),
                    Some("duplicate key value violates unique constraint")
                );
            }
            _ => panic!("Expected Duplicate error, got: {:?}", result),
        }
    }

    #[test]
    fn test_convert_not_null_violation() {
        let info = MockDatabaseErrorInfo {
            message: "null value in column \"gender\" of relation \"products\" violates not-null constraint".to_string(),
            ..Default::default()
        };

        let result = DatabaseErrorConverter::convert_diesel_error(
            database_error(DatabaseErrorKind::NotNullViolation, info),
            "insert product",
        );

        match result {
            AppError::Validation { field, reason } => {
                assert_eq!(field, "gender");
                assert!(reason.contains("required"));
            }
            _ => panic!("Expected Validation error, got: {:?}", result),
        }
    }

    #[test]
    fn test_convert_foreign_key_violation() {
        let info = MockDatabaseErrorInfo {
            message: "insert or update on table \"product_images\" violates foreign key constraint \"product_images_product_id_fkey\"".to_string(),
            details: Some("Key (product_id)=(999) is not present in table \"products\".".to_string()),
            table_name: Some("product_images".to_string()),
            constraint_name: Some("product_images_product_id_fkey".to_string()),
            ..Default::default()
        };

        let result = DatabaseErrorConverter::convert_diesel_error(
            database_error(DatabaseErrorKind::ForeignKeyViolation, info),
            "insert image",
        );

        match result {
            AppError::Validation { field, reason } => {
                assert_eq!(field, "product_id");
                assert!(reason.contains("Invalid reference"));
                assert!(reason.contains("999"));
            }
            _ => panic!("Expected Validation error, got: {:?}", result),
        }
    }

    #[test]
    fn test_unclassified_errors_stay_opaque() {
        let info = MockDatabaseErrorInfo {
            message: "could not serialize access".to_string(),
            ..Default::default()
        };

        let result = DatabaseErrorConverter::convert_diesel_error(
            database_error(DatabaseErrorKind::SerializationFailure, info),
            "update product",
        );

        match result {
            AppError::Database { operation, .. } => assert_eq!(operation, "update product"),
            _ => panic!("Expected Database error, got: {:?}", result),
        }
    }
}
