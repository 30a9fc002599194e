//! Repository layer for data access operations.
//!
//! Provides async CRUD operations for all domain entities.

mod product_repo;
mod user_repo;

pub use product_repo::ProductRepository;
pub use user_repo::UserRepository;

use crate::db::AsyncDbPool;

/// Aggregates all repositories for convenient access.
///
/// Since `AsyncDbPool` uses `Arc` internally, cloning is cheap.
#[derive(Clone)]
pub struct Repositories {
    pub products: ProductRepository,
    pub users: UserRepository,
}

impl Repositories {
    /// Creates a new Repositories instance with all repositories initialized.
    pub fn new(pool: AsyncDbPool) -> Self {
        Self {
            products: ProductRepository::new(pool.clone()),
            users: UserRepository::new(pool),
        }
    }
}
