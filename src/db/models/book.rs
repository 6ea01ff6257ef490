//! Book catalog: lookup by ISBN and wildcard search.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Book {
    pub id: String,
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub year: i64,
}

pub async fn find_book_by_isbn(db: &SqlitePool, isbn: &str) -> Result<Option<Book>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM books WHERE isbn = ?")
        .bind(isbn)
        .fetch_optional(db)
        .await
}

/// Substring search against ISBN, title, and author, capped at 15 rows.
/// The term is matched as `%term%`; callers normalize casing beforehand.
pub async fn search_books(db: &SqlitePool, term: &str) -> Result<Vec<Book>, sqlx::Error> {
    let pattern = format!("%{}%", term);

    sqlx::query_as(
        r#"
        SELECT * FROM books
        WHERE isbn LIKE ? OR title LIKE ? OR author LIKE ?
        LIMIT 15
        "#,
    )
    .bind(&pattern)
    .bind(&pattern)
    .bind(&pattern)
    .fetch_all(db)
    .await
}

#[cfg(test)]
pub(crate) async fn insert_book(
    db: &SqlitePool,
    isbn: &str,
    title: &str,
    author: &str,
    year: i64,
) -> Book {
    let id = uuid::Uuid::new_v4().to_string();
    sqlx::query("INSERT INTO books (id, isbn, title, author, year) VALUES (?, ?, ?, ?, ?)")
        .bind(&id)
        .bind(isbn)
        .bind(title)
        .bind(author)
        .bind(year)
        .execute(db)
        .await
        .expect("insert book");
    Book {
        id,
        isbn: isbn.to_string(),
        title: title.to_string(),
        author: author.to_string(),
        year,
    }
}
