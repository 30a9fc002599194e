//! Product DTOs for API requests and responses.

use crate::models::{NewProduct, PlainProduct, UpdateProduct};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Genders a product can be listed under.
pub const GENDERS: &[&str] = &["men", "women", "kid", "unisex"];

fn validate_gender(gender: &str) -> Result<(), ValidationError> {
    if GENDERS.contains(&gender) {
        Ok(())
    } else {
        let mut error = ValidationError::new("gender");
        error.message = Some(format!("gender must be one of: {}", GENDERS.join(", ")).into());
        Err(error)
    }
}

/// Keeps an explicit `null` apart from an absent field: absent stays `None`
/// through `#[serde(default)]`, `null` becomes `Some(None)`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// ============================================================================
// Request DTOs
// ============================================================================

/// Request body for creating a product.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, message = "title must not be empty"))]
    #[schema(min_length = 1, example = "Men's Chill Crew Neck Sweatshirt")]
    pub title: String,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "price must not be negative"))]
    #[schema(minimum = 0, example = 75)]
    pub price: f64,
    pub description: Option<String>,
    /// Derived from the title when omitted
    #[validate(length(min = 1, message = "slug must not be empty"))]
    pub slug: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0, message = "stock must not be negative"))]
    #[schema(minimum = 0, example = 7)]
    pub stock: i32,
    #[validate(length(min = 1, message = "sizes must contain at least one size"))]
    #[schema(example = json!(["S", "M", "L"]))]
    pub sizes: Vec<String>,
    #[validate(custom(function = "validate_gender"))]
    #[schema(example = "men")]
    pub gender: String,
    /// Image URLs or file names
    #[serde(default)]
    pub images: Vec<String>,
}

impl CreateProductRequest {
    /// Splits the request into the product row and its image URLs.
    pub fn into_parts(self) -> (NewProduct, Vec<String>) {
        let product = NewProduct {
            title: self.title,
            price: self.price,
            description: self.description,
            slug: self.slug.unwrap_or_default(),
            stock: self.stock,
            sizes: self.sizes,
            gender: self.gender,
        };
        (product, self.images)
    }
}

/// Request body for a partial product update.
///
/// Absent fields are left untouched. When `images` is present it replaces
/// every image of the product; an empty list removes them all.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: Option<String>,
    #[validate(range(min = 0.0, message = "price must not be negative"))]
    pub price: Option<f64>,
    /// `null` clears the description
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[validate(length(min = 1, message = "slug must not be empty"))]
    pub slug: Option<String>,
    #[validate(range(min = 0, message = "stock must not be negative"))]
    pub stock: Option<i32>,
    #[validate(length(min = 1, message = "sizes must contain at least one size"))]
    pub sizes: Option<Vec<String>>,
    #[validate(custom(function = "validate_gender"))]
    pub gender: Option<String>,
    pub images: Option<Vec<String>>,
}

impl UpdateProductRequest {
    /// Splits the request into column changes and the optional image set.
    pub fn into_parts(self) -> (UpdateProduct, Option<Vec<String>>) {
        let changes = UpdateProduct {
            title: self.title,
            price: self.price,
            description: self.description,
            slug: self.slug,
            stock: self.stock,
            sizes: self.sizes,
            gender: self.gender,
        };
        (changes, self.images)
    }
}

// ============================================================================
// Response DTOs
// ============================================================================

/// A product with its images as plain URLs.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductResponse {
    pub id: Uuid,
    pub title: String,
    pub price: f64,
    pub description: Option<String>,
    pub slug: String,
    pub stock: i32,
    pub sizes: Vec<String>,
    pub gender: String,
    pub images: Vec<String>,
}

impl From<PlainProduct> for ProductResponse {
    fn from(product: PlainProduct) -> Self {
        Self {
            id: product.id,
            title: product.title,
            price: product.price,
            description: product.description,
            slug: product.slug,
            stock: product.stock,
            sizes: product.sizes,
            gender: product.gender,
            images: product.images,
        }
    }
}

/// Confirmation returned after deleting a product.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteProductResponse {
    #[schema(example = "Men's Chill Crew Neck Sweatshirt deleted")]
    pub message: String,
}
