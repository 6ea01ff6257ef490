//! Review ledger: one rating + comment per (user, book) pair, plus the
//! per-book aggregate used by the JSON API.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Review {
    pub id: String,
    pub user_id: String,
    pub book_id: String,
    pub rating: i64,
    pub comment: String,
    pub created_at: String,
}

/// A review joined to the author's username for display.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReviewWithAuthor {
    pub username: String,
    pub rating: i64,
    pub comment: String,
    pub created_at: String,
}

/// Count and average rating for one book. `average` is None when the book
/// has no reviews (SQL AVG over an empty set is NULL).
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewAggregate {
    pub count: i64,
    pub average: Option<f64>,
}

pub async fn has_reviewed(
    db: &SqlitePool,
    user_id: &str,
    book_id: &str,
) -> Result<bool, sqlx::Error> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM reviews WHERE user_id = ? AND book_id = ?")
            .bind(user_id)
            .bind(book_id)
            .fetch_one(db)
            .await?;
    Ok(count > 0)
}

/// Insert a review with a server-assigned id and timestamp. A concurrent
/// duplicate slips past `has_reviewed` into the UNIQUE(user_id, book_id)
/// index and comes back as a constraint violation.
pub async fn insert_review(
    db: &SqlitePool,
    user_id: &str,
    book_id: &str,
    rating: i64,
    comment: &str,
) -> Result<Review, sqlx::Error> {
    let id = uuid::Uuid::new_v4().to_string();
    let now = chrono::Utc::now().to_rfc3339();

    sqlx::query(
        r#"
        INSERT INTO reviews (id, user_id, book_id, rating, comment, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(user_id)
    .bind(book_id)
    .bind(rating)
    .bind(comment)
    .bind(&now)
    .execute(db)
    .await?;

    Ok(Review {
        id,
        user_id: user_id.to_string(),
        book_id: book_id.to_string(),
        rating,
        comment: comment.to_string(),
        created_at: now,
    })
}

/// All reviews for a book with their authors, oldest first.
pub async fn list_reviews(
    db: &SqlitePool,
    book_id: &str,
) -> Result<Vec<ReviewWithAuthor>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT u.username, r.rating, r.comment, r.created_at
        FROM reviews r
        JOIN users u ON u.id = r.user_id
        WHERE r.book_id = ?
        ORDER BY r.created_at
        "#,
    )
    .bind(book_id)
    .fetch_all(db)
    .await
}

pub async fn review_aggregate(
    db: &SqlitePool,
    book_id: &str,
) -> Result<ReviewAggregate, sqlx::Error> {
    let (count, average): (i64, Option<f64>) =
        sqlx::query_as("SELECT COUNT(rating), AVG(rating) FROM reviews WHERE book_id = ?")
            .bind(book_id)
            .fetch_one(db)
            .await?;
    Ok(ReviewAggregate { count, average })
}
