//! Service layer for business logic operations.
//!
//! Services encapsulate business logic and coordinate between
//! repositories, storage and handlers.

mod file_service;
pub mod image_storage;
mod product_service;
mod seed_service;

pub use file_service::{FileService, PRODUCT_IMAGE_PATH, ServedImage, UploadedFile};
pub use image_storage::{ImageStorage, LocalImageStorage, StoredImage};
pub use product_service::ProductService;
pub use seed_service::{SeedReport, SeedService};

use crate::config::FilesConfig;
use crate::repositories::Repositories;

/// Aggregates all services for convenient access.
///
/// Cloning is cheap since underlying pools and storage use `Arc` internally.
#[derive(Clone)]
pub struct Services {
    pub products: ProductService,
    pub files: FileService,
    pub seed: SeedService,
}

impl Services {
    /// Creates a new Services instance from Repositories and file settings.
    pub fn new(repos: Repositories, files: &FilesConfig) -> Self {
        let products = ProductService::new(repos.products);
        Self {
            seed: SeedService::new(products.clone(), repos.users),
            products,
            files: FileService::from_config(files),
        }
    }
}
