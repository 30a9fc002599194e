//! User repository for async database operations.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::{AppError, DatabaseErrorConverter};
use crate::models::{NewUser, User};
use crate::schema::users;

/// User repository holding an async connection pool.
///
/// Since `AsyncDbPool` (bb8::Pool) internally uses `Arc`, cloning is cheap
/// (just reference count increment). No need for `Arc<UserRepository>`.
#[derive(Clone)]
pub struct UserRepository {
    pool: AsyncDbPool,
}

impl UserRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    /// Inserts a batch of users, returning them with generated ids.
    pub async fn create_many(&self, new_users: &[NewUser]) -> Result<Vec<User>, AppError> {
        if new_users.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await?;

        diesel::insert_into(users::table)
            .values(new_users)
            .returning(User::as_returning())
            .get_results(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "insert users"))
    }

    /// Finds a user by email address.
    ///
    /// # Returns
    /// `Some(User)` if found, `None` otherwise
    pub async fn find_by_email(&self, user_email: &str) -> Result<Option<User>, AppError> {
        let mut conn = self.pool.get().await?;

        users::table
            .filter(users::email.eq(user_email))
            .select(User::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    pub async fn delete_all(&self) -> Result<usize, AppError> {
        let mut conn = self.pool.get().await?;

        diesel::delete(users::table)
            .execute(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "delete all users"))
    }
}
