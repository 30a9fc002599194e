//! Data Transfer Objects for API requests and responses.
//!
//! DTOs are organized by domain:
//! - `product` - Product request/response DTOs
//! - `file` - Image upload DTOs
//! - `health` - Health probe responses
//! - `error` - Common error response DTOs
//! - `pagination` - Pagination query parameters

mod error;
mod file;
mod health;
mod pagination;
mod product;

pub use error::ErrorResponse;
pub use file::{UploadFileForm, UploadFileResponse};
pub use health::{ComponentHealth, HealthResponse, HealthStatus};
pub use pagination::{DEFAULT_LIMIT, MAX_LIMIT, PaginationParams};
pub use product::{
    CreateProductRequest, DeleteProductResponse, GENDERS, ProductResponse, UpdateProductRequest,
};
