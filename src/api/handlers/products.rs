//! Product catalog request handlers.

use crate::api::doc::PRODUCT_TAG;
use crate::api::dto::{
    CreateProductRequest, DeleteProductResponse, ErrorResponse, PaginationParams, ProductResponse,
    UpdateProductRequest,
};
use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::utils::validate::{ValidatedJson, ValidatedQuery};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use uuid::Uuid;

/// Creates product routes.
///
/// `{term}` is an id, a title or a slug for reads and deletes; updates only
/// accept an id.
pub fn product_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(create_product))
        .routes(routes!(list_products))
        .routes(routes!(get_product))
        .routes(routes!(update_product))
        .routes(routes!(delete_product))
}

/// POST /api/products - Create a product with its images
#[utoipa::path(
    post,
    path = "/",
    tag = PRODUCT_TAG,
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Title or slug already taken", body = ErrorResponse)
    )
)]
async fn create_product(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateProductRequest>,
) -> AppResult<(StatusCode, Json<ProductResponse>)> {
    let (product, images) = req.into_parts();
    let created = state.services.products.create(product, images).await?;
    Ok((StatusCode::CREATED, Json(ProductResponse::from(created))))
}

/// GET /api/products - List products by page
#[utoipa::path(
    get,
    path = "/",
    tag = PRODUCT_TAG,
    params(PaginationParams),
    responses(
        (status = 200, description = "One page of products", body = Vec<ProductResponse>),
        (status = 400, description = "Invalid pagination", body = ErrorResponse)
    )
)]
async fn list_products(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<PaginationParams>,
) -> AppResult<Json<Vec<ProductResponse>>> {
    let products = state
        .services
        .products
        .find_all(params.limit, params.offset)
        .await?;
    Ok(Json(products.into_iter().map(ProductResponse::from).collect()))
}

/// GET /api/products/{term} - Find a product by id, title or slug
#[utoipa::path(
    get,
    path = "/{term}",
    tag = PRODUCT_TAG,
    params(("term" = String, Path, description = "Product id, title or slug")),
    responses(
        (status = 200, description = "Product found", body = ProductResponse),
        (status = 404, description = "Product not found", body = ErrorResponse)
    )
)]
async fn get_product(
    State(state): State<AppState>,
    Path(term): Path<String>,
) -> AppResult<Json<ProductResponse>> {
    let product = state.services.products.find_one_plain(&term).await?;
    Ok(Json(ProductResponse::from(product)))
}

/// PATCH /api/products/{term} - Partially update a product by id
#[utoipa::path(
    patch,
    path = "/{term}",
    tag = PRODUCT_TAG,
    params(("term" = Uuid, Path, description = "Product id")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 400, description = "Invalid id or request", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse),
        (status = 409, description = "Title or slug already taken", body = ErrorResponse)
    )
)]
async fn update_product(
    State(state): State<AppState>,
    Path(term): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateProductRequest>,
) -> AppResult<Json<ProductResponse>> {
    let id = parse_product_id(&term)?;
    let (changes, images) = req.into_parts();
    let product = state.services.products.update(id, changes, images).await?;
    Ok(Json(ProductResponse::from(product)))
}

/// DELETE /api/products/{term} - Delete a product and its images
#[utoipa::path(
    delete,
    path = "/{term}",
    tag = PRODUCT_TAG,
    params(("term" = String, Path, description = "Product id, title or slug")),
    responses(
        (status = 200, description = "Product deleted", body = DeleteProductResponse),
        (status = 404, description = "Product not found", body = ErrorResponse)
    )
)]
async fn delete_product(
    State(state): State<AppState>,
    Path(term): Path<String>,
) -> AppResult<Json<DeleteProductResponse>> {
    let message = state.services.products.remove(&term).await?;
    Ok(Json(DeleteProductResponse { message }))
}

fn parse_product_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::BadRequest {
        message: format!("Validation failed (uuid is expected): {}", raw),
    })
}
