//! In-memory `UserStore` for handler tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::{NewUser, User, UserField};
use crate::store::{normalize_email, UserStore};

#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<Vec<User>>,
}

impl MemoryUserStore {
    /// Snapshot of a stored user, for assertions.
    pub fn user(&self, id: Uuid) -> Option<User> {
        self.users.lock().unwrap().iter().find(|u| u.id == id).cloned()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create_user(&self, user: NewUser) -> Result<User, AppError> {
        let email = normalize_email(&user.email);
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == email) {
            return Err(AppError::Conflict(format!(
                "An account with email {email} already exists"
            )));
        }
        let created = User {
            id: Uuid::new_v4(),
            full_name: user.full_name,
            email,
            password_hash: user.password_hash,
            career_result: None,
            career: None,
            career_details: None,
            created_at: Utc::now(),
        };
        users.push(created.clone());
        Ok(created)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let email = normalize_email(email);
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn get_user_by_id(&self, id: Uuid) -> Result<User, AppError> {
        self.user(id)
            .ok_or_else(|| AppError::NotFound(format!("User {id} not found")))
    }

    async fn update_user_field(&self, id: Uuid, field: UserField) -> Result<(), AppError> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| AppError::NotFound(format!("User {id} not found")))?;
        match field {
            UserField::CareerResult(options) => user.career_result = Some(Json(options)),
            UserField::Choice { career, roadmap } => {
                user.career = Some(career);
                user.career_details = Some(Json(roadmap));
            }
        }
        Ok(())
    }
}
