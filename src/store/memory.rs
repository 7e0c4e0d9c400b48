use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::TodoStore;
use crate::error::AppError;
use crate::models::{ListUpdate, Task, TaskUpdate, TodoList, User};

#[derive(Default)]
struct Inner {
    users: BTreeMap<String, User>,
    // Vecs keep insertion order, which is the order of the reference collections.
    lists: Vec<TodoList>,
    tasks: Vec<Task>,
}

impl Inner {
    fn list_mut(&mut self, user_name: &str, list_id: &str) -> Option<&mut TodoList> {
        self.lists
            .iter_mut()
            .find(|l| l.list_id == list_id && l.user_name == user_name)
    }

    fn user_with_lists(&self, user: &User) -> User {
        let mut user = user.clone();
        user.lists = self
            .lists
            .iter()
            .filter(|l| l.user_name == user.user_name)
            .map(|l| l.list_id.clone())
            .collect();
        user
    }
}

/// Process-local store. State is lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn insert_user(&self, user: &User) -> Result<User, AppError> {
        let mut inner = self.inner.write().await;
        if inner.users.contains_key(&user.user_name) {
            return Err(AppError::Conflict("Username already exists".into()));
        }
        if inner.users.values().any(|u| u.email == user.email) {
            return Err(AppError::Conflict("Email already exists".into()));
        }
        let mut stored = user.clone();
        stored.lists.clear();
        inner.users.insert(stored.user_name.clone(), stored.clone());
        Ok(stored)
    }

    async fn find_user(&self, user_name: &str) -> Result<Option<User>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner.users.get(user_name).map(|u| inner.user_with_lists(u)))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner
            .users
            .values()
            .find(|u| u.email == email)
            .map(|u| inner.user_with_lists(u)))
    }

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner
            .users
            .values()
            .map(|u| inner.user_with_lists(u))
            .collect())
    }

    async fn lists_for_user(&self, user_name: &str) -> Result<Vec<TodoList>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner
            .lists
            .iter()
            .filter(|l| l.user_name == user_name)
            .cloned()
            .collect())
    }

    async fn find_list(
        &self,
        user_name: &str,
        list_id: &str,
    ) -> Result<Option<TodoList>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner
            .lists
            .iter()
            .find(|l| l.list_id == list_id && l.user_name == user_name)
            .cloned())
    }

    async fn list_exists(&self, list_id: &str) -> Result<bool, AppError> {
        let inner = self.inner.read().await;
        Ok(inner.lists.iter().any(|l| l.list_id == list_id))
    }

    async fn insert_list(&self, list: &TodoList) -> Result<TodoList, AppError> {
        let mut inner = self.inner.write().await;
        if !inner.users.contains_key(&list.user_name) {
            return Err(AppError::NotFound("User not found".into()));
        }
        if inner.lists.iter().any(|l| l.list_id == list.list_id) {
            return Err(AppError::Conflict("List already exists".into()));
        }
        let mut stored = list.clone();
        stored.tasks.clear();
        inner.lists.push(stored.clone());
        Ok(stored)
    }

    async fn update_list(
        &self,
        user_name: &str,
        list_id: &str,
        update: &ListUpdate,
    ) -> Result<Option<TodoList>, AppError> {
        let mut inner = self.inner.write().await;
        Ok(inner.list_mut(user_name, list_id).map(|list| {
            list.apply(update);
            list.clone()
        }))
    }

    async fn delete_list(&self, user_name: &str, list_id: &str) -> Result<Option<u64>, AppError> {
        let mut inner = self.inner.write().await;
        let Some(index) = inner
            .lists
            .iter()
            .position(|l| l.list_id == list_id && l.user_name == user_name)
        else {
            return Ok(None);
        };
        inner.lists.remove(index);
        let before = inner.tasks.len();
        inner.tasks.retain(|t| t.list_id != list_id);
        Ok(Some((before - inner.tasks.len()) as u64))
    }

    async fn tasks_for_list(&self, list_id: &str) -> Result<Vec<Task>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner
            .tasks
            .iter()
            .filter(|t| t.list_id == list_id)
            .cloned()
            .collect())
    }

    async fn find_task(&self, list_id: &str, task_id: &str) -> Result<Option<Task>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner
            .tasks
            .iter()
            .find(|t| t.task_id == task_id && t.list_id == list_id)
            .cloned())
    }

    async fn task_exists(&self, task_id: &str) -> Result<bool, AppError> {
        let inner = self.inner.read().await;
        Ok(inner.tasks.iter().any(|t| t.task_id == task_id))
    }

    async fn insert_task(&self, task: &Task) -> Result<Task, AppError> {
        let mut inner = self.inner.write().await;
        if inner.tasks.iter().any(|t| t.task_id == task.task_id) {
            return Err(AppError::Conflict("Task already exists".into()));
        }
        let list = inner
            .lists
            .iter_mut()
            .find(|l| l.list_id == task.list_id)
            .ok_or_else(|| AppError::NotFound("List not found".into()))?;
        list.tasks.push(task.task_id.clone());
        inner.tasks.push(task.clone());
        Ok(task.clone())
    }

    async fn update_task(
        &self,
        list_id: &str,
        task_id: &str,
        update: &TaskUpdate,
    ) -> Result<Option<Task>, AppError> {
        let mut inner = self.inner.write().await;
        Ok(inner
            .tasks
            .iter_mut()
            .find(|t| t.task_id == task_id && t.list_id == list_id)
            .map(|task| {
                task.apply(update);
                task.clone()
            }))
    }

    async fn delete_task(&self, list_id: &str, task_id: &str) -> Result<bool, AppError> {
        let mut inner = self.inner.write().await;
        let Some(index) = inner
            .tasks
            .iter()
            .position(|t| t.task_id == task_id && t.list_id == list_id)
        else {
            return Ok(false);
        };
        inner.tasks.remove(index);
        if let Some(list) = inner.lists.iter_mut().find(|l| l.list_id == list_id) {
            list.tasks.retain(|id| id != task_id);
        }
        Ok(true)
    }
}
