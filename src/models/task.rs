use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Represents the priority of a task.
/// Corresponds to the `task_priority` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
    Urgent,
}

/// A single to-do item belonging to a list.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Task {
    #[serde(rename = "taskID")]
    pub task_id: String,
    #[serde(rename = "taskName")]
    pub task_name: String,
    pub notes: Option<String>,
    pub priority: Option<TaskPriority>,
    pub completed: bool,
    /// listID of the owning list.
    #[serde(rename = "list")]
    pub list_id: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Input structure for creating a task.
#[derive(Debug, Deserialize, Validate)]
pub struct TaskInput {
    /// Optional client-chosen ID; a UUID is generated when absent.
    #[serde(rename = "taskID")]
    #[validate(length(min = 1, max = 64, message = "taskID must be 1-64 characters"))]
    pub task_id: Option<String>,

    #[serde(rename = "taskName", default)]
    #[validate(
        length(min = 1, message = "Task name is required"),
        custom = "validate_task_name_length"
    )]
    pub task_name: String,

    #[validate(length(max = 1000, message = "notes must be at most 1000 characters"))]
    pub notes: Option<String>,

    pub priority: Option<TaskPriority>,

    pub completed: Option<bool>,
}

/// Input structure for updating a task. Absent fields are left untouched.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct TaskUpdate {
    #[serde(rename = "taskName")]
    #[validate(length(min = 1, max = 200, message = "taskName must be 1-200 characters"))]
    pub task_name: Option<String>,

    #[validate(length(max = 1000, message = "notes must be at most 1000 characters"))]
    pub notes: Option<String>,

    pub priority: Option<TaskPriority>,

    pub completed: Option<bool>,
}

fn validate_task_name_length(task_name: &str) -> Result<(), ValidationError> {
    if task_name.chars().count() > 200 {
        let mut err = ValidationError::new("length");
        err.message = Some("taskName must be at most 200 characters".into());
        return Err(err);
    }
    Ok(())
}

impl Task {
    /// Creates a new `Task` owned by `list_id`. `completed` defaults to false.
    pub fn new(input: TaskInput, list_id: &str) -> Self {
        let now = Utc::now();
        Self {
            task_id: input
                .task_id
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            task_name: input.task_name,
            notes: input.notes,
            priority: input.priority,
            completed: input.completed.unwrap_or(false),
            list_id: list_id.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, update: &TaskUpdate) {
        if let Some(name) = &update.task_name {
            self.task_name = name.clone();
        }
        if let Some(notes) = &update.notes {
            self.notes = Some(notes.clone());
        }
        if let Some(priority) = update.priority {
            self.priority = Some(priority);
        }
        if let Some(completed) = update.completed {
            self.completed = completed;
        }
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn input(name: &str) -> TaskInput {
        TaskInput {
            task_id: None,
            task_name: name.to_string(),
            notes: Some("Two litres".to_string()),
            priority: Some(TaskPriority::High),
            completed: None,
        }
    }

    #[test]
    fn test_task_creation() {
        let task = Task::new(input("Buy milk"), "groceries");
        assert_eq!(task.task_name, "Buy milk");
        assert_eq!(task.list_id, "groceries");
        assert!(!task.completed);
        assert!(Uuid::parse_str(&task.task_id).is_ok());
    }

    #[test]
    fn test_task_validation() {
        assert!(input("Buy milk").validate().is_ok());
        assert!(input("").validate().is_err());
        assert!(input(&"a".repeat(201)).validate().is_err());

        let mut long_notes = input("Buy milk");
        long_notes.notes = Some("b".repeat(1001));
        assert!(long_notes.validate().is_err());
    }

    #[test]
    fn test_apply_update() {
        let mut task = Task::new(input("Buy milk"), "groceries");
        task.apply(&TaskUpdate {
            completed: Some(true),
            ..Default::default()
        });
        assert!(task.completed);
        assert_eq!(task.task_name, "Buy milk");
        assert_eq!(task.priority, Some(TaskPriority::High));
    }

    #[test]
    fn test_priority_wire_format() {
        let parsed: TaskUpdate = serde_json::from_str(r#"{"priority":"urgent"}"#).unwrap();
        assert_eq!(parsed.priority, Some(TaskPriority::Urgent));
        assert!(serde_json::from_str::<TaskUpdate>(r#"{"priority":"someday"}"#).is_err());
    }

    #[test]
    fn test_task_name_messages() {
        let missing = AppError::from(input("").validate().unwrap_err());
        assert_eq!(missing.message(), "Task name is required");

        let too_long = AppError::from(input(&"a".repeat(201)).validate().unwrap_err());
        assert_eq!(too_long.message(), "taskName must be at most 200 characters");
    }
}
