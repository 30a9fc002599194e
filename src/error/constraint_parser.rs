use std::sync::OnceLock;

use regex::Regex;

/// Utility for parsing PostgreSQL constraint violation details.
///
/// Postgres reports the violated constraint name separately from the
/// human-readable message and the `DETAIL` line. The parser combines the three
/// to recover the table, column and offending value.
pub struct ConstraintParser;

/// Compiled regex patterns for constraint parsing, cached for performance
struct RegexPatterns {
    key_value: Regex,
    column_name: Regex,
    relation_name: Regex,
}

impl RegexPatterns {
    fn new() -> Self {
        Self {
            // "Key (title)=(Shirt (Blue)) already exists." - values may contain parentheses
            key_value: Regex::new(
                r"Key \(([^)]+)\)=\((.*)\) (?:already exists|is not present|is still referenced)",
            )
            .expect("key/value pattern is valid"),
            column_name: Regex::new(r#"column "([^"]+)""#).expect("column pattern is valid"),
            relation_name: Regex::new(r#"(?:relation|table) "([^"]+)""#)
                .expect("relation pattern is valid"),
        }
    }
}

/// Global regex patterns cache
static REGEX_PATTERNS: OnceLock<RegexPatterns> = OnceLock::new();

/// Suffixes Postgres appends to generated constraint names.
const CONSTRAINT_SUFFIXES: &[&str] = &["_pkey", "_fkey", "_key", "_check", "_idx", "_excl"];

impl ConstraintParser {
    fn patterns() -> &'static RegexPatterns {
        REGEX_PATTERNS.get_or_init(RegexPatterns::new)
    }

    /// Parses a unique violation into `(entity, field, value)`.
    ///
    /// # Arguments
    /// * `message` - Primary error message
    /// * `details` - The `DETAIL` line, if the driver exposes it separately
    /// * `table` - Table name reported by the database
    /// * `constraint_name` - Violated constraint
    pub fn parse_unique_violation(
        message: &str,
        details: Option<&str>,
        table: Option<&str>,
        constraint_name: Option<&str>,
    ) -> Option<(String, String, String)> {
        let key_value = details
            .and_then(Self::extract_key_value)
            .or_else(|| Self::extract_key_value(message));

        let from_constraint =
            constraint_name.and_then(|c| Self::parse_constraint_name(c, table));

        match (from_constraint, key_value) {
            (Some((entity, field)), Some((_, value))) => Some((entity, field, value)),
            (Some((entity, field)), None) => Some((entity, field, "duplicate_value".to_string())),
            (None, Some((field, value))) => {
                let entity = table
                    .map(str::to_string)
                    .or_else(|| Self::extract_relation(message))
                    .unwrap_or_else(|| "resource".to_string());
                Some((entity, field, value))
            }
            (None, None) => None,
        }
    }

    /// Parses a not-null violation into `(entity, field)`.
    pub fn parse_not_null_violation(
        message: &str,
        table: Option<&str>,
        column: Option<&str>,
    ) -> Option<(String, String)> {
        let field = column
            .map(str::to_string)
            .or_else(|| Self::extract_column(message))?;
        let entity = table
            .map(str::to_string)
            .or_else(|| Self::extract_relation(message))
            .unwrap_or_else(|| "resource".to_string());
        Some((entity, field))
    }

    /// Parses a foreign key violation into `(entity, field, referenced_value)`.
    pub fn parse_foreign_key_violation(
        message: &str,
        details: Option<&str>,
        table: Option<&str>,
        constraint_name: Option<&str>,
    ) -> Option<(String, String, String)> {
        let key_value = details
            .and_then(Self::extract_key_value)
            .or_else(|| Self::extract_key_value(message));

        if let Some((entity, field)) =
            constraint_name.and_then(|c| Self::parse_constraint_name(c, table))
        {
            let value = key_value
                .map(|(_, value)| value)
                .unwrap_or_else(|| "invalid_reference".to_string());
            return Some((entity, field, value));
        }

        let (field, value) = key_value?;
        let entity = table
            .map(str::to_string)
            .or_else(|| Self::extract_relation(message))
            .unwrap_or_else(|| "resource".to_string());
        Some((entity, field, value))
    }

    /// Splits a generated constraint name into `(table, column)`.
    ///
    /// - `products_title_key` -> `("products", "title")`
    /// - `product_images_product_id_fkey` with table `product_images`
    ///   -> `("product_images", "product_id")`
    ///
    /// Without a known table the name is split at its first underscore.
    pub fn parse_constraint_name(
        constraint_name: &str,
        table: Option<&str>,
    ) -> Option<(String, String)> {
        let stem = CONSTRAINT_SUFFIXES
            .iter()
            .find_map(|suffix| constraint_name.strip_suffix(suffix))?;

        if let Some(table) = table
            && let Some(column) = stem
                .strip_prefix(table)
                .and_then(|rest| rest.strip_prefix('_'))
            && !column.is_empty()
        {
            return Some((table.to_string(), column.to_string()));
        }

        let (entity, field) = stem.split_once('_')?;
        if entity.is_empty() || field.is_empty() {
            return None;
        }
        Some((entity.to_string(), field.to_string()))
    }

    /// Extracts `(field, value)` from a `Key (field)=(value) ...` fragment.
    pub fn extract_key_value(text: &str) -> Option<(String, String)> {
        Self::patterns().key_value.captures(text).and_then(|caps| {
            let field = caps.get(1)?.as_str().to_string();
            let value = caps.get(2)?.as_str().to_string();
            Some((field, value))
        })
    }

    /// Extracts a quoted column name from an error message.
    pub fn extract_column(message: &str) -> Option<String> {
        Self::patterns()
            .column_name
            .captures(message)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    /// Extracts a quoted table or relation name from an error message.
    pub fn extract_relation(message: &str) -> Option<String> {
        Self::patterns()
            .relation_name
            .captures(message)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }
}
