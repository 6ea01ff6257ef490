//! User accounts: registered reviewers and their credential hashes.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub created_at: String,
}

/// Insert a new user. The username's UNIQUE constraint surfaces as a
/// database error when the name is already taken; callers translate it
/// into the duplicate-username message.
pub async fn create_user(
    db: &SqlitePool,
    username: &str,
    password_hash: &str,
) -> Result<User, sqlx::Error> {
    let id = uuid::Uuid::new_v4().to_string();
    let now = chrono::Utc::now().to_rfc3339();

    sqlx::query("INSERT INTO users (id, username, password_hash, created_at) VALUES (?, ?, ?, ?)")
        .bind(&id)
        .bind(username)
        .bind(password_hash)
        .bind(&now)
        .execute(db)
        .await?;

    Ok(User {
        id,
        username: username.to_string(),
        password_hash: password_hash.to_string(),
        created_at: now,
    })
}

pub async fn find_user_by_username(
    db: &SqlitePool,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(db)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{is_unique_violation, test_pool};

    #[tokio::test]
    async fn test_create_and_find_user() {
        let db = test_pool().await;

        let created = create_user(&db, "alice", "argon2-hash").await.unwrap();
        assert!(!created.id.is_empty());

        let found = find_user_by_username(&db, "alice").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.username, "alice");
        assert_eq!(found.password_hash, "argon2-hash");

        assert!(find_user_by_username(&db, "bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected_without_write() {
        let db = test_pool().await;

        create_user(&db, "alice", "hash-one").await.unwrap();
        let err = create_user(&db, "alice", "hash-two").await.unwrap_err();
        assert!(is_unique_violation(&err));

        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&db)
            .await
            .unwrap();
        assert_eq!(count.0, 1);

        // The original hash is untouched
        let user = find_user_by_username(&db, "alice").await.unwrap().unwrap();
        assert_eq!(user.password_hash, "hash-one");
    }
}
