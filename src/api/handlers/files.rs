//! Product image upload and download handlers.

use crate::api::doc::FILE_TAG;
use crate::api::dto::{ErrorResponse, UploadFileForm, UploadFileResponse};
use crate::error::{AppError, AppResult};
use crate::services::UploadedFile;
use crate::state::AppState;
use axum::{
    Json,
    body::Body,
    extract::{Multipart, Path, State, multipart::MultipartRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tokio_util::io::ReaderStream;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// Multipart field carrying the image.
const FILE_FIELD: &str = "file";

/// Creates file routes.
pub fn file_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(upload_product_image))
        .routes(routes!(find_product_image))
}

/// POST /api/files/product - Upload a product image
#[utoipa::path(
    post,
    path = "/product",
    tag = FILE_TAG,
    request_body(content = UploadFileForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Image stored", body = UploadFileResponse),
        (status = 400, description = "Missing file or not an image", body = ErrorResponse)
    )
)]
async fn upload_product_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<(StatusCode, Json<UploadFileResponse>)> {
    let file = match multipart {
        Ok(multipart) => read_file_field(multipart).await?,
        Err(rejection) => {
            tracing::debug!(error = %rejection.body_text(), "Upload without a multipart body");
            None
        }
    };

    let secure_url = state.services.files.upload_product_image(file).await?;
    Ok((StatusCode::CREATED, Json(UploadFileResponse { secure_url })))
}

/// GET /api/files/product/{image_name} - Download a product image
#[utoipa::path(
    get,
    path = "/product/{image_name}",
    tag = FILE_TAG,
    params(("image_name" = String, Path, description = "Stored image file name")),
    responses(
        (status = 200, description = "Image content", content_type = "image/*"),
        (status = 400, description = "Invalid image name", body = ErrorResponse),
        (status = 404, description = "Image not found", body = ErrorResponse)
    )
)]
async fn find_product_image(
    State(state): State<AppState>,
    Path(image_name): Path<String>,
) -> AppResult<Response> {
    let served = state.services.files.find_product_image(&image_name).await?;

    let mut response = (
        [(header::CONTENT_TYPE, served.content_type)],
        Body::from_stream(ReaderStream::new(served.image.reader)),
    )
        .into_response();
    if let Some(len) = served.image.len {
        response
            .headers_mut()
            .insert(header::CONTENT_LENGTH, header::HeaderValue::from(len));
    }
    Ok(response)
}

/// Reads the first part named `file`, ignoring any other parts.
async fn read_file_field(mut multipart: Multipart) -> AppResult<Option<UploadedFile>> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let contents = field.bytes().await.map_err(multipart_error)?;

        return Ok(Some(UploadedFile {
            file_name,
            content_type,
            contents,
        }));
    }
    Ok(None)
}

fn multipart_error(error: axum::extract::multipart::MultipartError) -> AppError {
    AppError::BadRequest {
        message: error.body_text(),
    }
}
