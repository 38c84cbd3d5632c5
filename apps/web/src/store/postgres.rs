use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::{NewUser, User, UserField};
use crate::store::{normalize_email, UserStore};

/// `UserStore` backed by the `users` table.
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create_user(&self, user: NewUser) -> Result<User, AppError> {
        let email = normalize_email(&user.email);
        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (full_name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&user.full_name)
        .bind(&email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict(format!("An account with email {email} already exists"))
            }
            other => AppError::Database(other),
        })?;

        info!("Created user {}", created.id);
        Ok(created)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
                .bind(normalize_email(email))
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn get_user_by_id(&self, id: Uuid) -> Result<User, AppError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {id} not found")))
    }

    async fn update_user_field(&self, id: Uuid, field: UserField) -> Result<(), AppError> {
        let columns = field.columns();
        let result = match field {
            UserField::CareerResult(options) => {
                sqlx::query("UPDATE users SET career_result = $1 WHERE id = $2")
                    .bind(Json(options))
                    .bind(id)
                    .execute(&self.pool)
                    .await?
            }
            UserField::Choice { career, roadmap } => {
                sqlx::query("UPDATE users SET career = $1, career_details = $2 WHERE id = $3")
                    .bind(career)
                    .bind(Json(roadmap))
                    .bind(id)
                    .execute(&self.pool)
                    .await?
            }
        };

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User {id} not found")));
        }

        info!("Updated {} for user {id}", columns.join(", "));
        Ok(())
    }
}
