use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// A named collection of tasks owned by one user.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TodoList {
    #[serde(rename = "listID")]
    pub list_id: String,
    #[serde(rename = "listName")]
    pub list_name: String,
    pub color: Option<String>,
    /// IDs of the tasks in this list, in creation order.
    pub tasks: Vec<String>,
    /// userName of the owner.
    #[serde(rename = "user")]
    pub user_name: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a list.
#[derive(Debug, Deserialize, Validate)]
pub struct ListInput {
    /// Optional client-chosen ID; a UUID is generated when absent.
    #[serde(rename = "listID")]
    #[validate(length(min = 1, max = 64, message = "listID must be 1-64 characters"))]
    pub list_id: Option<String>,

    #[serde(rename = "listName", default)]
    #[validate(
        length(min = 1, message = "List name is required"),
        custom = "validate_list_name_length"
    )]
    pub list_name: String,

    #[validate(length(max = 32, message = "color must be at most 32 characters"))]
    pub color: Option<String>,
}

/// Payload for updating a list. Absent fields are left untouched.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ListUpdate {
    #[serde(rename = "listName")]
    #[validate(length(min = 1, max = 100, message = "listName must be 1-100 characters"))]
    pub list_name: Option<String>,

    #[validate(length(max = 32, message = "color must be at most 32 characters"))]
    pub color: Option<String>,
}

fn validate_list_name_length(list_name: &str) -> Result<(), ValidationError> {
    if list_name.chars().count() > 100 {
        let mut err = ValidationError::new("length");
        err.message = Some("listName must be at most 100 characters".into());
        return Err(err);
    }
    Ok(())
}

impl TodoList {
    pub fn new(input: ListInput, user_name: &str) -> Self {
        Self {
            list_id: input
                .list_id
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            list_name: input.list_name,
            color: input.color,
            tasks: Vec::new(),
            user_name: user_name.to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn apply(&mut self, update: &ListUpdate) {
        if let Some(name) = &update.list_name {
            self.list_name = name.clone();
        }
        if let Some(color) = &update.color {
            self.color = Some(color.clone());
        }
    }
}
