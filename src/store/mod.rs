//! Persistence for users, lists, and tasks.
//!
//! Handlers only see the [`TodoStore`] trait. [`PostgresStore`] backs the
//! server when `DATABASE_URL` is set; [`MemoryStore`] is used otherwise and by
//! the test suite.
//!
//! Lookups of lists are always scoped to the owning user and lookups of tasks
//! to the owning list, so a resource addressed under the wrong parent is
//! simply not found.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{ListUpdate, Task, TaskUpdate, TodoList, User};

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Short name of the backend, reported by `/health`.
    fn backend(&self) -> &'static str;
    async fn ping(&self) -> Result<(), AppError>;

    async fn insert_user(&self, user: &User) -> Result<User, AppError>;
    async fn find_user(&self, user_name: &str) -> Result<Option<User>, AppError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    /// All users, ordered by `userName`.
    async fn list_users(&self) -> Result<Vec<User>, AppError>;

    /// Lists owned by `user_name`, in creation order.
    async fn lists_for_user(&self, user_name: &str) -> Result<Vec<TodoList>, AppError>;
    async fn find_list(&self, user_name: &str, list_id: &str)
        -> Result<Option<TodoList>, AppError>;
    /// Whether any user already owns a list with this ID.
    async fn list_exists(&self, list_id: &str) -> Result<bool, AppError>;
    async fn insert_list(&self, list: &TodoList) -> Result<TodoList, AppError>;
    async fn update_list(
        &self,
        user_name: &str,
        list_id: &str,
        update: &ListUpdate,
    ) -> Result<Option<TodoList>, AppError>;
    /// Deletes the list and every task in it. Returns the number of tasks
    /// removed, or `None` if the list was not found.
    async fn delete_list(&self, user_name: &str, list_id: &str) -> Result<Option<u64>, AppError>;

    /// Tasks in `list_id`, in creation order.
    async fn tasks_for_list(&self, list_id: &str) -> Result<Vec<Task>, AppError>;
    async fn find_task(&self, list_id: &str, task_id: &str) -> Result<Option<Task>, AppError>;
    /// Whether a task with this ID exists in any list.
    async fn task_exists(&self, task_id: &str) -> Result<bool, AppError>;
    async fn insert_task(&self, task: &Task) -> Result<Task, AppError>;
    async fn update_task(
        &self,
        list_id: &str,
        task_id: &str,
        update: &TaskUpdate,
    ) -> Result<Option<Task>, AppError>;
    async fn delete_task(&self, list_id: &str, task_id: &str) -> Result<bool, AppError>;
}
