//! Product image upload and lookup.

use std::sync::Arc;

use axum::body::Bytes;

use crate::config::FilesConfig;
use crate::error::{AppError, AppResult};
use crate::services::image_storage::{ImageStorage, LocalImageStorage, StoredImage};
use crate::utils::file::{content_type_for, generate_file_name, image_extension, is_plain_file_name};

/// Public path segment under which product images are served.
pub const PRODUCT_IMAGE_PATH: &str = "files/product";

const NOT_AN_IMAGE: &str = "Make sure that the file is an image";

/// A file part received from a multipart upload.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub contents: Bytes,
}

/// An image ready to be streamed back to the client.
#[derive(Debug)]
pub struct ServedImage {
    pub image: StoredImage,
    pub content_type: &'static str,
}

#[derive(Clone)]
pub struct FileService {
    storage: Arc<dyn ImageStorage>,
    host_api: String,
}

impl FileService {
    pub fn new(storage: Arc<dyn ImageStorage>, host_api: impl Into<String>) -> Self {
        Self {
            storage,
            host_api: host_api.into(),
        }
    }

    /// Builds the service over a local directory from configuration.
    pub fn from_config(config: &FilesConfig) -> Self {
        Self::new(
            Arc::new(LocalImageStorage::new(config.upload_path())),
            config.host_api.clone(),
        )
    }

    /// Public URL of a stored image.
    pub fn secure_url(&self, file_name: &str) -> String {
        format!("{}/{}/{}", self.host_api, PRODUCT_IMAGE_PATH, file_name)
    }

    /// Stores an uploaded product image and returns its public URL.
    ///
    /// The file is rejected before anything is written when it is missing or
    /// not one of the allowed image types.
    pub async fn upload_product_image(&self, file: Option<UploadedFile>) -> AppResult<String> {
        let file = file.ok_or_else(not_an_image)?;
        let extension = image_extension(file.content_type.as_deref(), file.file_name.as_deref())
            .ok_or_else(not_an_image)?;

        let file_name = generate_file_name(&extension);
        self.storage
            .save(&file_name, &file.contents)
            .await
            .map_err(|e| AppError::storage(format!("save image {}", file_name), e))?;

        tracing::info!(file_name = %file_name, size = file.contents.len(), "Product image stored");
        Ok(self.secure_url(&file_name))
    }

    /// Opens a stored product image by name.
    pub async fn find_product_image(&self, image_name: &str) -> AppResult<ServedImage> {
        if !is_plain_file_name(image_name) {
            return Err(AppError::BadRequest {
                message: format!("Invalid image name {}", image_name),
            });
        }

        let image = self
            .storage
            .open(image_name)
            .await
            .map_err(|e| AppError::storage(format!("open image {}", image_name), e))?
            .ok_or_else(|| missing_image(image_name))?;

        Ok(ServedImage {
            image,
            content_type: content_type_for(image_name),
        })
    }

    /// Readiness check of the underlying storage.
    pub async fn check_storage(&self) -> AppResult<()> {
        self.storage
            .check()
            .await
            .map_err(|e| AppError::storage("check image storage", e))
    }
}

fn not_an_image() -> AppError {
    AppError::BadRequest {
        message: NOT_AN_IMAGE.to_string(),
    }
}

fn missing_image(image_name: &str) -> AppError {
    AppError::NotFound {
        entity: "product".to_string(),
        field: "image".to_string(),
        value: image_name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn service(dir: &std::path::Path) -> FileService {
        FileService::new(
            Arc::new(LocalImageStorage::new(dir)),
            "http://localhost:3000/api",
        )
    }

    fn upload(content_type: Option<&str>, file_name: Option<&str>) -> UploadedFile {
        UploadedFile {
            file_name: file_name.map(String::from),
            content_type: content_type.map(String::from),
            contents: Bytes::from_static(b"GIF89a"),
        }
    }

    #[tokio::test]
    async fn test_upload_returns_secure_url_and_stores_file() {
        let dir = tempdir().unwrap();
        let files = service(dir.path());

        let url = files
            .upload_product_image(Some(upload(Some("image/gif"), Some("a.gif"))))
            .await
            .unwrap();

        let name = url
            .strip_prefix("http://localhost:3000/api/files/product/")
            .unwrap();
        assert!(name.ends_with(".gif"));
        assert!(dir.path().join(name).is_file());
    }

    #[tokio::test]
    async fn test_upload_missing_file_is_rejected() {
        let dir = tempdir().unwrap();
        let err = service(dir.path()).upload_product_image(None).await.unwrap_err();

        match err {
            AppError::BadRequest { message } => assert_eq!(message, NOT_AN_IMAGE),
            other => panic!("Expected BadRequest, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_upload_non_image_writes_nothing() {
        let dir = tempdir().unwrap();
        let err = service(dir.path())
            .upload_product_image(Some(upload(Some("text/plain"), Some("notes.txt"))))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::BadRequest { .. }));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_find_image_content_type() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("shirt.jpg"), b"jpeg").unwrap();

        let served = service(dir.path()).find_product_image("shirt.jpg").await.unwrap();
        assert_eq!(served.content_type, "image/jpeg");
        assert_eq!(served.image.len, Some(4));
    }

    #[tokio::test]
    async fn test_find_missing_image_is_not_found() {
        let dir = tempdir().unwrap();
        let err = service(dir.path())
            .find_product_image("nope.png")
            .await
            .unwrap_err();

        match err {
            AppError::NotFound { value, .. } => assert_eq!(value, "nope.png"),
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_find_rejects_traversal() {
        let dir = tempdir().unwrap();
        let err = service(dir.path())
            .find_product_image("../Cargo.toml")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::BadRequest { .. }));
    }
}
