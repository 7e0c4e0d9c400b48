#![doc = "The `tasklists` library crate."]
#![doc = ""]
#![doc = "Domain models, authentication, persistence, routing and error handling for a"]
#![doc = "personal task/list API. Users own lists, lists own tasks, and every route under"]
#![doc = "`/api/users/{userName}/...` is restricted to the user named in the path."]
#![doc = "The binary (`main.rs`) assembles these pieces into an `HttpServer`."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod store;

pub use crate::error::AppError;
pub use crate::store::{MemoryStore, PostgresStore, TodoStore};
