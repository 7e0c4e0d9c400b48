use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use super::TodoStore;
use crate::error::AppError;
use crate::models::{ListUpdate, Task, TaskUpdate, TodoList, User};

const USER_COLUMNS: &str = "u.user_name, u.email, u.first_name, u.last_name, u.password_hash, \
     ARRAY(SELECT l.list_id FROM lists l WHERE l.user_name = u.user_name ORDER BY l.id) AS lists, \
     u.created_at";

const LIST_COLUMNS: &str = "l.list_id, l.list_name, l.color, \
     ARRAY(SELECT t.task_id FROM tasks t WHERE t.list_id = l.list_id ORDER BY t.id) AS tasks, \
     l.user_name, l.created_at";

const TASK_COLUMNS: &str =
    "task_id, task_name, notes, priority, completed, list_id, created_at, updated_at";

pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects and applies the migrations in `migrations/`.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        sqlx::migrate!()
            .run(&pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("migration failed: {}", e)))?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl TodoStore for PostgresStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn insert_user(&self, user: &User) -> Result<User, AppError> {
        let created = sqlx::query_as::<_, User>(
            "INSERT INTO users (user_name, email, first_name, last_name, password_hash, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING user_name, email, first_name, last_name, password_hash, \
                       ARRAY[]::TEXT[] AS lists, created_at",
        )
        .bind(&user.user_name)
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn find_user(&self, user_name: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users u WHERE u.user_name = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(user_name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users u WHERE u.email = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let sql = format!("SELECT {} FROM users u ORDER BY u.user_name", USER_COLUMNS);
        let users = sqlx::query_as::<_, User>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn lists_for_user(&self, user_name: &str) -> Result<Vec<TodoList>, AppError> {
        let sql = format!(
            "SELECT {} FROM lists l WHERE l.user_name = $1 ORDER BY l.id",
            LIST_COLUMNS
        );
        let lists = sqlx::query_as::<_, TodoList>(&sql)
            .bind(user_name)
            .fetch_all(&self.pool)
            .await?;
        Ok(lists)
    }

    async fn find_list(
        &self,
        user_name: &str,
        list_id: &str,
    ) -> Result<Option<TodoList>, AppError> {
        let sql = format!(
            "SELECT {} FROM lists l WHERE l.list_id = $1 AND l.user_name = $2",
            LIST_COLUMNS
        );
        let list = sqlx::query_as::<_, TodoList>(&sql)
            .bind(list_id)
            .bind(user_name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(list)
    }

    async fn list_exists(&self, list_id: &str) -> Result<bool, AppError> {
        let (exists,) = sqlx::query_as::<_, (bool,)>(
            "SELECT EXISTS (SELECT 1 FROM lists WHERE list_id = $1)",
        )
        .bind(list_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn insert_list(&self, list: &TodoList) -> Result<TodoList, AppError> {
        let created = sqlx::query_as::<_, TodoList>(
            "INSERT INTO lists (list_id, list_name, color, user_name, created_at) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING list_id, list_name, color, ARRAY[]::TEXT[] AS tasks, user_name, created_at",
        )
        .bind(&list.list_id)
        .bind(&list.list_name)
        .bind(&list.color)
        .bind(&list.user_name)
        .bind(list.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn update_list(
        &self,
        user_name: &str,
        list_id: &str,
        update: &ListUpdate,
    ) -> Result<Option<TodoList>, AppError> {
        let result = sqlx::query(
            "UPDATE lists \
             SET list_name = COALESCE($1, list_name), color = COALESCE($2, color) \
             WHERE list_id = $3 AND user_name = $4",
        )
        .bind(&update.list_name)
        .bind(&update.color)
        .bind(list_id)
        .bind(user_name)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.find_list(user_name, list_id).await
    }

    async fn delete_list(&self, user_name: &str, list_id: &str) -> Result<Option<u64>, AppError> {
        let mut tx = self.pool.begin().await?;

        let owned = sqlx::query_as::<_, (i64,)>(
            "SELECT id FROM lists WHERE list_id = $1 AND user_name = $2 FOR UPDATE",
        )
        .bind(list_id)
        .bind(user_name)
        .fetch_optional(&mut *tx)
        .await?;
        if owned.is_none() {
            return Ok(None);
        }

        let tasks = sqlx::query("DELETE FROM tasks WHERE list_id = $1")
            .bind(list_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM lists WHERE list_id = $1 AND user_name = $2")
            .bind(list_id)
            .bind(user_name)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(tasks.rows_affected()))
    }

    async fn tasks_for_list(&self, list_id: &str) -> Result<Vec<Task>, AppError> {
        let sql = format!(
            "SELECT {} FROM tasks WHERE list_id = $1 ORDER BY id",
            TASK_COLUMNS
        );
        let tasks = sqlx::query_as::<_, Task>(&sql)
            .bind(list_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(tasks)
    }

    async fn find_task(&self, list_id: &str, task_id: &str) -> Result<Option<Task>, AppError> {
        let sql = format!(
            "SELECT {} FROM tasks WHERE task_id = $1 AND list_id = $2",
            TASK_COLUMNS
        );
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(task_id)
            .bind(list_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    async fn task_exists(&self, task_id: &str) -> Result<bool, AppError> {
        let (exists,) = sqlx::query_as::<_, (bool,)>(
            "SELECT EXISTS (SELECT 1 FROM tasks WHERE task_id = $1)",
        )
        .bind(task_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn insert_task(&self, task: &Task) -> Result<Task, AppError> {
        let sql = format!(
            "INSERT INTO tasks (task_id, task_name, notes, priority, completed, list_id, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {}",
            TASK_COLUMNS
        );
        let created = sqlx::query_as::<_, Task>(&sql)
            .bind(&task.task_id)
            .bind(&task.task_name)
            .bind(&task.notes)
            .bind(task.priority)
            .bind(task.completed)
            .bind(&task.list_id)
            .bind(task.created_at)
            .bind(task.updated_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn update_task(
        &self,
        list_id: &str,
        task_id: &str,
        update: &TaskUpdate,
    ) -> Result<Option<Task>, AppError> {
        let sql = format!(
            "UPDATE tasks \
             SET task_name = COALESCE($1, task_name), notes = COALESCE($2, notes), \
                 priority = COALESCE($3, priority), completed = COALESCE($4, completed), \
                 updated_at = NOW() \
             WHERE task_id = $5 AND list_id = $6 \
             RETURNING {}",
            TASK_COLUMNS
        );
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(&update.task_name)
            .bind(&update.notes)
            .bind(update.priority)
            .bind(update.completed)
            .bind(task_id)
            .bind(list_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    async fn delete_task(&self, list_id: &str, task_id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM tasks WHERE task_id = $1 AND list_id = $2")
            .bind(task_id)
            .bind(list_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
