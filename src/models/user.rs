use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// A registered account. Owns an ordered collection of lists.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_name: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// bcrypt hash. Never leaves the server.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// IDs of the lists this user owns, in creation order.
    pub lists: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        user_name: String,
        email: String,
        first_name: String,
        last_name: String,
        password_hash: String,
    ) -> Self {
        Self {
            user_name,
            email,
            first_name,
            last_name,
            password_hash,
            lists: Vec::new(),
            created_at: Utc::now(),
        }
    }
}
