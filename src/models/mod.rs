pub mod list;
pub mod task;
pub mod user;

pub use list::{ListInput, ListUpdate, TodoList};
pub use task::{Task, TaskInput, TaskPriority, TaskUpdate};
pub use user::User;
