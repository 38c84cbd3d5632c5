use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::career::models::{CareerOptions, CareerRoadmap};

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    /// argon2 PHC string.
    pub password_hash: String,
    pub career_result: Option<Json<CareerOptions>>,
    pub career: Option<String>,
    pub career_details: Option<Json<CareerRoadmap>>,
    pub created_at: DateTime<Utc>,
}

/// Fields needed to insert a user row.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
}

/// A career-data update, carrying its new value.
///
/// `Choice` writes `career` and `career_details` together so a roadmap is
/// never stored under another career's name.
#[derive(Debug, Clone)]
pub enum UserField {
    CareerResult(CareerOptions),
    Choice {
        career: String,
        roadmap: CareerRoadmap,
    },
}

impl UserField {
    /// Columns written by this update.
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            UserField::CareerResult(_) => &["career_result"],
            UserField::Choice { .. } => &["career", "career_details"],
        }
    }
}
