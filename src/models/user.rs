use diesel::prelude::*;
use serde::Deserialize;
use uuid::Uuid;

/// Role assigned to every user unless stated otherwise.
pub const DEFAULT_ROLE: &str = "user";

/// User model for reading from database
/// Derives Queryable for SELECT operations and Selectable for type-safe column selection
#[derive(Debug, Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub is_active: bool,
    pub roles: Vec<String>,
}

/// NewUser model for inserting new records
/// Derives Insertable for INSERT operations
#[derive(Debug, Insertable, Deserialize, Clone)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser {
    pub email: String,
    /// Argon2 hash, never the plain password
    pub password: String,
    pub full_name: String,
    pub is_active: bool,
    pub roles: Vec<String>,
}

impl NewUser {
    /// Creates an active user with the default role.
    pub fn new(email: impl Into<String>, password_hash: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password_hash.into(),
            full_name: full_name.into(),
            is_active: true,
            roles: vec![DEFAULT_ROLE.to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_defaults() {
        let user = NewUser::new("a@b.com", "hash", "Test One");
        assert!(user.is_active);
        assert_eq!(user.roles, vec!["user".to_string()]);
        assert_eq!(user.full_name, "Test One");
    }
}
