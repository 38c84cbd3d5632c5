//! Persistence adapter: user rows and their stored career data.
//!
//! Handlers only see the `UserStore` trait; `AppState` carries an
//! `Arc<dyn UserStore>` (Postgres in production, in-memory in tests).

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::{NewUser, User, UserField};

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgUserStore;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a user. Fails with `AppError::Conflict` if the email is taken.
    async fn create_user(&self, user: NewUser) -> Result<User, AppError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Fails with `AppError::NotFound` if no such user exists.
    async fn get_user_by_id(&self, id: Uuid) -> Result<User, AppError>;

    /// Overwrites one career column. Fails with `AppError::NotFound` if no such user exists.
    async fn update_user_field(&self, id: Uuid, field: UserField) -> Result<(), AppError>;
}

/// Emails are compared case-insensitively and stored lower-cased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Asha@Example.COM "), "asha@example.com");
    }
}
