//! Product service for catalog business logic.
//!
//! Resolves lookup terms, applies partial updates in memory before any write,
//! and reshapes image rows into URL lists for callers.

use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{NewProduct, PlainProduct, ProductWithImages, UpdateProduct};
use crate::repositories::ProductRepository;

/// Product service wrapping the `ProductRepository`.
///
/// Cloning is cheap since the repository only holds the pooled connection handle.
#[derive(Clone)]
pub struct ProductService {
    repo: ProductRepository,
}

impl ProductService {
    pub fn new(repo: ProductRepository) -> Self {
        Self { repo }
    }

    /// Creates a product together with its images.
    ///
    /// The slug is derived from the title when empty and normalized before
    /// the insert. A taken title or slug yields `AppError::Duplicate`.
    pub async fn create(
        &self,
        new_product: NewProduct,
        image_urls: Vec<String>,
    ) -> AppResult<PlainProduct> {
        let product = self
            .repo
            .create(new_product.before_insert(), image_urls)
            .await?;

        tracing::info!(product_id = %product.product.id, slug = %product.product.slug, "Product created");
        Ok(product.into_plain())
    }

    /// Lists one page of products with images flattened to URLs.
    pub async fn find_all(&self, limit: i64, offset: i64) -> AppResult<Vec<PlainProduct>> {
        let page = self.repo.list_paginated(limit, offset).await?;
        Ok(page.into_iter().map(ProductWithImages::into_plain).collect())
    }

    /// Finds a product by id, title or slug.
    ///
    /// A term that parses as a UUID is only ever matched against the id;
    /// anything else matches the title case-insensitively or the slug.
    pub async fn find_one(&self, term: &str) -> AppResult<ProductWithImages> {
        let (found, field) = match Uuid::parse_str(term) {
            Ok(id) => (self.repo.find_by_id(id).await?, "id"),
            Err(_) => (self.repo.find_by_term(term).await?, "term"),
        };

        found.ok_or_else(|| AppError::product_not_found(field, term))
    }

    /// [`find_one`](Self::find_one) flattened for responses.
    pub async fn find_one_plain(&self, term: &str) -> AppResult<PlainProduct> {
        Ok(self.find_one(term).await?.into_plain())
    }

    /// Applies a partial update and, when `image_urls` is present, replaces
    /// the product's images in the same transaction.
    ///
    /// Fails with `NotFound` before touching the database if `id` does not
    /// resolve. The slug is stored as given; it is only normalized on insert.
    pub async fn update(
        &self,
        id: Uuid,
        changes: UpdateProduct,
        image_urls: Option<Vec<String>>,
    ) -> AppResult<PlainProduct> {
        let existing = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::product_not_found("id", id.to_string()))?;

        let save_row = !changes.is_empty();
        let merged = existing.product.merged(&changes);

        if save_row || image_urls.is_some() {
            self.repo
                .update_with_images(merged, image_urls, save_row)
                .await?;
            tracing::info!(product_id = %id, "Product updated");
        }

        self.find_one_plain(&id.to_string()).await
    }

    /// Deletes the product matched by `term`; its images go by cascade.
    ///
    /// Returns a confirmation message naming the removed product.
    pub async fn remove(&self, term: &str) -> AppResult<String> {
        let product = self.find_one(term).await?.product;
        self.repo.delete(product.id).await?;

        tracing::info!(product_id = %product.id, "Product deleted");
        Ok(format!("{} deleted", product.title))
    }

    /// Deletes every product; used by seeding and test cleanup.
    pub async fn delete_all_products(&self) -> AppResult<usize> {
        let removed = self.repo.delete_all().await?;
        tracing::warn!(removed, "All products deleted");
        Ok(removed)
    }
}
