//! Database query functions (Data Access Objects).
//!
//! This module centralizes all direct database operations, providing reusable
//! functions for interacting with the database and abstracting the query logic
//! from higher-level services and API handlers. Task queries always filter on
//! the owner so one user's rows are never visible to another.

use chrono::Utc;
use sqlx::{Executor, Sqlite, SqlitePool};

use super::models::{Task, TaskRecord, User, UserRecord};

const USER_COLUMNS: &str = "id, name, email, hashed_password, created, edited";
const TASK_COLUMNS: &str = "id, title, description, done, parent_id, owner_id, created, edited";

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

pub async fn insert_user(pool: &SqlitePool, user: &UserRecord) -> Result<User, sqlx::Error> {
    let now = Utc::now();
    sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (name, email, hashed_password, created, edited)
         VALUES (?, ?, ?, ?, ?)
         RETURNING {USER_COLUMNS}"
    ))
    .bind(&user.name)
    .bind(&user.email)
    .bind(&user.hashed_password)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn get_user(pool: &SqlitePool, id: i64) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn get_user_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn list_users(pool: &SqlitePool, skip: i64, limit: i64) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users ORDER BY id LIMIT ? OFFSET ?"
    ))
    .bind(limit)
    .bind(skip)
    .fetch_all(pool)
    .await
}

pub async fn update_user(
    pool: &SqlitePool,
    id: i64,
    user: &UserRecord,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "UPDATE users SET name = ?, email = ?, hashed_password = ?, edited = ?
         WHERE id = ?
         RETURNING {USER_COLUMNS}"
    ))
    .bind(&user.name)
    .bind(&user.email)
    .bind(&user.hashed_password)
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Delete a user; their tasks go with them.
pub async fn delete_user(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

pub async fn insert_task(
    pool: &SqlitePool,
    owner_id: i64,
    task: &TaskRecord,
) -> Result<Task, sqlx::Error> {
    let now = Utc::now();
    sqlx::query_as::<_, Task>(&format!(
        "INSERT INTO tasks (title, description, done, parent_id, owner_id, created, edited)
         VALUES (?, ?, ?, ?, ?, ?, ?)
         RETURNING {TASK_COLUMNS}"
    ))
    .bind(&task.title)
    .bind(&task.description)
    .bind(task.done)
    .bind(task.parent_id)
    .bind(owner_id)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn get_task<'e, E>(executor: E, owner_id: i64, id: i64) -> Result<Option<Task>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Task>(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks WHERE id = ? AND owner_id = ?"
    ))
    .bind(id)
    .bind(owner_id)
    .fetch_optional(executor)
    .await
}

pub async fn list_tasks(
    pool: &SqlitePool,
    owner_id: i64,
    skip: i64,
    limit: i64,
) -> Result<Vec<Task>, sqlx::Error> {
    sqlx::query_as::<_, Task>(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks WHERE owner_id = ? ORDER BY id LIMIT ? OFFSET ?"
    ))
    .bind(owner_id)
    .bind(limit)
    .bind(skip)
    .fetch_all(pool)
    .await
}

pub async fn list_children(
    pool: &SqlitePool,
    owner_id: i64,
    parent_id: i64,
    skip: i64,
    limit: i64,
) -> Result<Vec<Task>, sqlx::Error> {
    sqlx::query_as::<_, Task>(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks
         WHERE owner_id = ? AND parent_id = ?
         ORDER BY id LIMIT ? OFFSET ?"
    ))
    .bind(owner_id)
    .bind(parent_id)
    .bind(limit)
    .bind(skip)
    .fetch_all(pool)
    .await
}

pub async fn update_task<'e, E>(
    executor: E,
    owner_id: i64,
    id: i64,
    task: &TaskRecord,
) -> Result<Option<Task>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Task>(&format!(
        "UPDATE tasks SET title = ?, description = ?, done = ?, parent_id = ?, edited = ?
         WHERE id = ? AND owner_id = ?
         RETURNING {TASK_COLUMNS}"
    ))
    .bind(&task.title)
    .bind(&task.description)
    .bind(task.done)
    .bind(task.parent_id)
    .bind(Utc::now())
    .bind(id)
    .bind(owner_id)
    .fetch_optional(executor)
    .await
}

/// Delete a task and, through the foreign key, its whole subtree.
pub async fn delete_task(pool: &SqlitePool, owner_id: i64, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM tasks WHERE id = ? AND owner_id = ?")
        .bind(id)
        .bind(owner_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// True if `ancestor_id` is `task_id` itself or any task above it.
///
/// `UNION` drops rows already visited, so the walk terminates even if the
/// parent links loop.
pub async fn is_ancestor_or_self<'e, E>(
    executor: E,
    ancestor_id: i64,
    task_id: i64,
) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let (found,): (i64,) = sqlx::query_as(
        "WITH RECURSIVE lineage(id, parent_id) AS (
             SELECT id, parent_id FROM tasks WHERE id = ?
             UNION
             SELECT t.id, t.parent_id FROM tasks t JOIN lineage l ON t.id = l.parent_id
         )
         SELECT EXISTS(SELECT 1 FROM lineage WHERE id = ?)",
    )
    .bind(task_id)
    .bind(ancestor_id)
    .fetch_one(executor)
    .await?;
    Ok(found != 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{is_unique_violation, Database};

    fn user_record(email: &str) -> UserRecord {
        UserRecord {
            name: "Test".to_string(),
            email: email.to_string(),
            hashed_password: "$argon2id$placeholder".to_string(),
        }
    }

    fn task_record(title: &str, parent_id: Option<i64>) -> TaskRecord {
        TaskRecord {
            title: title.to_string(),
            parent_id,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn user_crud() {
        let db = Database::in_memory().await.unwrap();
        let pool = db.pool();

        let user = insert_user(pool, &user_record("a@example.com")).await.unwrap();
        assert_eq!(get_user(pool, user.id).await.unwrap(), Some(user.clone()));
        assert_eq!(
            get_user_by_email(pool, "a@example.com").await.unwrap().map(|u| u.id),
            Some(user.id)
        );

        let updated = update_user(
            pool,
            user.id,
            &UserRecord { name: "Renamed".into(), ..user_record("b@example.com") },
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.email, "b@example.com");
        assert!(updated.edited >= user.edited);

        assert!(delete_user(pool, user.id).await.unwrap());
        assert!(!delete_user(pool, user.id).await.unwrap());
        assert_eq!(get_user(pool, user.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn duplicate_email_is_a_unique_violation() {
        let db = Database::in_memory().await.unwrap();
        insert_user(db.pool(), &user_record("dup@example.com")).await.unwrap();
        let err = insert_user(db.pool(), &user_record("dup@example.com")).await.unwrap_err();
        assert!(is_unique_violation(&err));
    }

    #[tokio::test]
    async fn user_ids_are_not_reused() {
        let db = Database::in_memory().await.unwrap();
        let first = insert_user(db.pool(), &user_record("x@example.com")).await.unwrap();
        delete_user(db.pool(), first.id).await.unwrap();
        let second = insert_user(db.pool(), &user_record("x@example.com")).await.unwrap();
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn list_users_paginates() {
        let db = Database::in_memory().await.unwrap();
        for i in 0..5 {
            insert_user(db.pool(), &user_record(&format!("u{i}@example.com"))).await.unwrap();
        }
        let page = list_users(db.pool(), 2, 2).await.unwrap();
        let emails: Vec<_> = page.iter().map(|u| u.email.as_str()).collect();
        assert_eq!(emails, ["u2@example.com", "u3@example.com"]);
    }

    #[tokio::test]
    async fn tasks_are_scoped_to_owner() {
        let db = Database::in_memory().await.unwrap();
        let pool = db.pool();
        let alice = insert_user(pool, &user_record("alice@example.com")).await.unwrap();
        let bob = insert_user(pool, &user_record("bob@example.com")).await.unwrap();

        let task = insert_task(pool, alice.id, &task_record("groceries", None)).await.unwrap();
        assert_eq!(task.owner_id, alice.id);
        assert!(!task.done);

        assert!(get_task(pool, bob.id, task.id).await.unwrap().is_none());
        assert!(list_tasks(pool, bob.id, 0, 100).await.unwrap().is_empty());
        assert!(update_task(pool, bob.id, task.id, &task_record("hijack", None))
            .await
            .unwrap()
            .is_none());
        assert!(!delete_task(pool, bob.id, task.id).await.unwrap());

        assert_eq!(list_tasks(pool, alice.id, 0, 100).await.unwrap(), vec![task]);
    }

    #[tokio::test]
    async fn deleting_parent_removes_subtree() {
        let db = Database::in_memory().await.unwrap();
        let pool = db.pool();
        let owner = insert_user(pool, &user_record("o@example.com")).await.unwrap();
        let root = insert_task(pool, owner.id, &task_record("root", None)).await.unwrap();
        let child = insert_task(pool, owner.id, &task_record("child", Some(root.id))).await.unwrap();
        let grandchild = insert_task(pool, owner.id, &task_record("leaf", Some(child.id))).await.unwrap();

        assert_eq!(
            list_children(pool, owner.id, root.id, 0, 100).await.unwrap(),
            vec![child.clone()]
        );

        assert!(delete_task(pool, owner.id, root.id).await.unwrap());
        assert!(get_task(pool, owner.id, child.id).await.unwrap().is_none());
        assert!(get_task(pool, owner.id, grandchild.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn deleting_user_removes_their_tasks() {
        let db = Database::in_memory().await.unwrap();
        let pool = db.pool();
        let owner = insert_user(pool, &user_record("gone@example.com")).await.unwrap();
        let task = insert_task(pool, owner.id, &task_record("orphan?", None)).await.unwrap();
        delete_user(pool, owner.id).await.unwrap();
        assert!(get_task(pool, owner.id, task.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn lineage_detection() {
        let db = Database::in_memory().await.unwrap();
        let pool = db.pool();
        let owner = insert_user(pool, &user_record("l@example.com")).await.unwrap();
        let a = insert_task(pool, owner.id, &task_record("a", None)).await.unwrap();
        let b = insert_task(pool, owner.id, &task_record("b", Some(a.id))).await.unwrap();
        let c = insert_task(pool, owner.id, &task_record("c", Some(b.id))).await.unwrap();
        let other = insert_task(pool, owner.id, &task_record("other", None)).await.unwrap();

        assert!(is_ancestor_or_self(pool, a.id, c.id).await.unwrap());
        assert!(is_ancestor_or_self(pool, c.id, c.id).await.unwrap());
        assert!(!is_ancestor_or_self(pool, c.id, a.id).await.unwrap());
        assert!(!is_ancestor_or_self(pool, other.id, c.id).await.unwrap());
    }

    #[tokio::test]
    async fn lineage_walk_terminates_on_a_loop() {
        let db = Database::in_memory().await.unwrap();
        let pool = db.pool();
        let owner = insert_user(pool, &user_record("loop@example.com")).await.unwrap();
        let a = insert_task(pool, owner.id, &task_record("a", None)).await.unwrap();
        let b = insert_task(pool, owner.id, &task_record("b", Some(a.id))).await.unwrap();
        let c = insert_task(pool, owner.id, &task_record("c", None)).await.unwrap();
        // Close the loop behind the service layer's back.
        update_task(pool, owner.id, a.id, &task_record("a", Some(b.id)))
            .await
            .unwrap()
            .unwrap();

        let outside = tokio::time::timeout(
            std::time::Duration::from_secs(5),
            is_ancestor_or_self(pool, c.id, a.id),
        )
        .await
        .expect("lineage query did not finish");
        assert!(!outside.unwrap());

        let inside = tokio::time::timeout(
            std::time::Duration::from_secs(5),
            is_ancestor_or_self(pool, b.id, a.id),
        )
        .await
        .expect("lineage query did not finish");
        assert!(inside.unwrap());
    }
}
