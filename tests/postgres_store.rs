//! Runs against a live database: `DATABASE_URL=postgres://... cargo test -- --ignored`

use dotenv::dotenv;
use tasklists::models::{ListInput, ListUpdate, Task, TaskInput, TaskUpdate, TodoList, User};
use tasklists::store::{PostgresStore, TodoStore};
use uuid::Uuid;

async fn connect() -> PostgresStore {
    dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");
    PostgresStore::connect(&database_url, 2)
        .await
        .expect("Failed to connect to test DB")
}

async fn cleanup_user(store: &PostgresStore, user_name: &str) {
    let _ = sqlx::query(
        "DELETE FROM tasks WHERE list_id IN (SELECT list_id FROM lists WHERE user_name = $1)",
    )
    .bind(user_name)
    .execute(store.pool())
    .await;
    let _ = sqlx::query("DELETE FROM lists WHERE user_name = $1")
        .bind(user_name)
        .execute(store.pool())
        .await;
    let _ = sqlx::query("DELETE FROM users WHERE user_name = $1")
        .bind(user_name)
        .execute(store.pool())
        .await;
}

#[ignore]
#[actix_rt::test]
async fn test_postgres_round_trip_and_cascade() {
    let store = connect().await;
    let suffix = Uuid::new_v4().simple().to_string();
    let user_name = format!("pg_{}", &suffix[..12]);
    cleanup_user(&store, &user_name).await;

    let user = store
        .insert_user(&User::new(
            user_name.clone(),
            format!("{}@example.com", user_name),
            "Pg".into(),
            "Test".into(),
            "hash".into(),
        ))
        .await
        .unwrap();
    assert!(user.lists.is_empty());
    assert!(store.ping().await.is_ok());

    let list = store
        .insert_list(&TodoList::new(
            ListInput {
                list_id: None,
                list_name: "Groceries".into(),
                color: None,
            },
            &user_name,
        ))
        .await
        .unwrap();
    assert!(store.list_exists(&list.list_id).await.unwrap());

    let updated = store
        .update_list(
            &user_name,
            &list.list_id,
            &ListUpdate {
                color: Some("green".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.list_name, "Groceries");
    assert_eq!(updated.color.as_deref(), Some("green"));

    let mut task_ids = Vec::new();
    for name in ["milk", "eggs"] {
        let task = Task::new(
            TaskInput {
                task_id: None,
                task_name: name.into(),
                notes: None,
                priority: None,
                completed: None,
            },
            &list.list_id,
        );
        task_ids.push(store.insert_task(&task).await.unwrap().task_id);
    }

    let fetched = store.find_list(&user_name, &list.list_id).await.unwrap().unwrap();
    assert_eq!(fetched.tasks, task_ids);
    assert_eq!(
        store.find_user(&user_name).await.unwrap().unwrap().lists,
        vec![list.list_id.clone()]
    );

    let task = store
        .update_task(
            &list.list_id,
            &task_ids[0],
            &TaskUpdate {
                completed: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert!(task.completed);

    assert_eq!(store.delete_list("someone_else", &list.list_id).await.unwrap(), None);
    assert_eq!(store.delete_list(&user_name, &list.list_id).await.unwrap(), Some(2));
    for task_id in &task_ids {
        assert!(!store.task_exists(task_id).await.unwrap());
    }

    cleanup_user(&store, &user_name).await;
}
