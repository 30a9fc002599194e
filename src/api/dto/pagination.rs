//! Pagination-related DTOs for API requests.

use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

/// Query parameters for offset pagination.
#[derive(Debug, Clone, Copy, Deserialize, IntoParams, Validate)]
pub struct PaginationParams {
    /// Maximum number of items to return
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    #[param(minimum = 1, maximum = 100, example = 10)]
    pub limit: i64,

    /// Number of items to skip
    #[serde(default)]
    #[validate(range(min = 0, message = "offset must not be negative"))]
    #[param(minimum = 0, example = 0)]
    pub offset: i64,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}
