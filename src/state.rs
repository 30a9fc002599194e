//! Application state for Axum web framework.
//!
//! Contains shared services and resources that are accessible
//! across all request handlers.

use crate::config::FilesConfig;
use crate::db::AsyncDbPool;
use crate::repositories::Repositories;
use crate::services::Services;

/// Application state containing all shared services and resources.
///
/// Cloning is cheap since both Services and AsyncDbPool use Arc internally.
#[derive(Clone)]
pub struct AppState {
    /// All business logic services
    pub services: Services,
    /// Direct access to the database connection pool
    pub db_pool: AsyncDbPool,
    /// Upload settings (directory, public host, size limit)
    pub files: FilesConfig,
}

impl AppState {
    /// Creates a new AppState from a database connection pool and file settings.
    ///
    /// Initializes all repositories and services from the provided pool.
    ///
    /// # Example
    /// ```ignore
    /// let pool = establish_async_connection_pool(&settings.database).await?;
    /// let state = AppState::new(pool, settings.files.clone());
    /// ```
    pub fn new(pool: AsyncDbPool, files: FilesConfig) -> Self {
        let repos = Repositories::new(pool.clone());
        let services = Services::new(repos, &files);
        Self {
            services,
            db_pool: pool,
            files,
        }
    }
}
