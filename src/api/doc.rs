use utoipa::OpenApi;

pub const PRODUCT_TAG: &str = "Products";
pub const FILE_TAG: &str = "Files";
pub const HEALTH_TAG: &str = "Health";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Shop",
        description = "Product catalog and image API",
    ),
    components(
        schemas(
            crate::api::dto::ErrorResponse,
        )
    ),
    tags(
        (name = PRODUCT_TAG, description = "Product catalog endpoints"),
        (name = FILE_TAG, description = "Product image upload and download"),
        (name = HEALTH_TAG, description = "Health check endpoints"),
    )
)]
pub struct ApiDoc;
