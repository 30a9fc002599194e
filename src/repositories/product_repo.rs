//! Product repository for async database operations.
//!
//! Products and their image rows are always read and written together;
//! multi-statement writes run inside a single transaction.

use diesel::prelude::*;
use diesel::sql_types::Text;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::db::AsyncDbPool;
use crate::error::{AppError, DatabaseErrorConverter};
use crate::models::{NewProduct, NewProductImage, Product, ProductImage, ProductWithImages};
use crate::schema::{product_images, products};

// Case-insensitive title lookup
diesel::define_sql_function! {
    fn upper(x: Text) -> Text;
}

/// Product repository holding an async connection pool.
///
/// Cloning is cheap; the pool is reference counted.
#[derive(Clone)]
pub struct ProductRepository {
    pool: AsyncDbPool,
}

impl ProductRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    /// Inserts a product and its images atomically.
    ///
    /// `new_product` is expected to have gone through
    /// [`NewProduct::before_insert`] already.
    pub async fn create(
        &self,
        new_product: NewProduct,
        image_urls: Vec<String>,
    ) -> Result<ProductWithImages, AppError> {
        let mut conn = self.pool.get().await?;

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                let product = diesel::insert_into(products::table)
                    .values(&new_product)
                    .returning(Product::as_returning())
                    .get_result(conn)
                    .await?;

                let rows = NewProductImage::for_product(product.id, &image_urls);
                let images = if rows.is_empty() {
                    Vec::new()
                } else {
                    diesel::insert_into(product_images::table)
                        .values(&rows)
                        .returning(ProductImage::as_returning())
                        .get_results(conn)
                        .await?
                };

                Ok(ProductWithImages { product, images })
            }
            .scope_boxed()
        })
        .await
        .inspect_err(|e| tracing::debug!(error = %e, "create product transaction rolled back"))
        .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "create product"))
    }

    /// Returns one page of products ordered by title, images included.
    ///
    /// Images are fetched with one extra query for the whole page.
    pub async fn list_paginated(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ProductWithImages>, AppError> {
        let mut conn = self.pool.get().await?;

        let page = products::table
            .order((products::title.asc(), products::id.asc()))
            .limit(limit)
            .offset(offset)
            .select(Product::as_select())
            .load(&mut conn)
            .await?;

        let images = ProductImage::belonging_to(&page)
            .order(product_images::id.asc())
            .select(ProductImage::as_select())
            .load(&mut conn)
            .await?;

        Ok(images
            .grouped_by(&page)
            .into_iter()
            .zip(page)
            .map(|(images, product)| ProductWithImages { product, images })
            .collect())
    }

    pub async fn find_by_id(&self, product_id: Uuid) -> Result<Option<ProductWithImages>, AppError> {
        let mut conn = self.pool.get().await?;

        let product = products::table
            .find(product_id)
            .select(Product::as_select())
            .first(&mut conn)
            .await
            .optional()?;

        with_images(&mut conn, product).await
    }

    /// Finds a product whose title matches `term` case-insensitively, or whose
    /// slug equals `term` lower-cased.
    pub async fn find_by_term(&self, term: &str) -> Result<Option<ProductWithImages>, AppError> {
        let mut conn = self.pool.get().await?;

        let product = products::table
            .filter(
                upper(products::title)
                    .eq(upper(term))
                    .or(products::slug.eq(term.to_lowercase())),
            )
            .order(products::title.asc())
            .select(Product::as_select())
            .first(&mut conn)
            .await
            .optional()?;

        with_images(&mut conn, product).await
    }

    /// Persists an already merged product, optionally replacing its images.
    ///
    /// Runs in one transaction: when `image_urls` is `Some`, every existing
    /// image row is deleted and the new set inserted (an empty list clears the
    /// images). The product row is written only when `save_row` is set. Any
    /// failure rolls the whole unit back.
    pub async fn update_with_images(
        &self,
        product: Product,
        image_urls: Option<Vec<String>>,
        save_row: bool,
    ) -> Result<(), AppError> {
        let mut conn = self.pool.get().await?;
        let product_id = product.id;

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                if let Some(urls) = image_urls {
                    diesel::delete(
                        product_images::table.filter(product_images::product_id.eq(product.id)),
                    )
                    .execute(conn)
                    .await?;

                    let rows = NewProductImage::for_product(product.id, &urls);
                    if !rows.is_empty() {
                        diesel::insert_into(product_images::table)
                            .values(&rows)
                            .execute(conn)
                            .await?;
                    }
                }

                if save_row {
                    diesel::update(&product).set(&product).execute(conn).await?;
                }

                Ok(())
            }
            .scope_boxed()
        })
        .await
        .inspect_err(|e| {
            tracing::warn!(product_id = %product_id, error = %e, "update product transaction rolled back")
        })
        .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "update product"))
    }

    /// Deletes a product; its images go with it by cascade.
    ///
    /// Returns the number of affected rows (0 or 1).
    pub async fn delete(&self, product_id: Uuid) -> Result<usize, AppError> {
        let mut conn = self.pool.get().await?;

        diesel::delete(products::table.find(product_id))
            .execute(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "delete product"))
    }

    /// Deletes every product (and by cascade every image).
    pub async fn delete_all(&self) -> Result<usize, AppError> {
        let mut conn = self.pool.get().await?;

        diesel::delete(products::table)
            .execute(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "delete all products"))
    }
}

async fn with_images(
    conn: &mut AsyncPgConnection,
    product: Option<Product>,
) -> Result<Option<ProductWithImages>, AppError> {
    let Some(product) = product else {
        return Ok(None);
    };

    let images = ProductImage::belonging_to(&product)
        .order(product_images::id.asc())
        .select(ProductImage::as_select())
        .load(conn)
        .await?;

    Ok(Some(ProductWithImages { product, images }))
}
