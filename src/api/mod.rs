//! Public JSON API.
//!
//! One endpoint: `GET /api/:isbn` returns a book's catalog data together
//! with review statistics computed from our own reviews. No authentication
//! is required; the endpoint exposes nothing about who wrote the reviews.

pub mod error;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

use crate::db;
use crate::AppState;

use self::error::ApiError;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/:isbn", get(book_stats))
        .route("/health", get(health_check))
        .with_state(state)
}

/// Catalog data plus local review statistics for one book.
#[derive(Debug, Serialize)]
pub struct BookStats {
    pub title: String,
    pub author: String,
    pub year: i64,
    pub isbn: String,
    pub review_count: i64,
    /// Mean rating rendered with two decimals, None when unreviewed.
    pub average_score: Option<String>,
}

/// GET /api/:isbn
async fn book_stats(
    State(state): State<Arc<AppState>>,
    Path(isbn): Path<String>,
) -> Result<Json<BookStats>, ApiError> {
    let book = db::find_book_by_isbn(&state.db, &isbn)
        .await?
        .ok_or_else(|| ApiError::not_found("Invalid ISBN"))?;

    let stats = db::review_aggregate(&state.db, &book.id).await?;

    Ok(Json(BookStats {
        title: book.title,
        author: book.author,
        year: book.year,
        isbn: book.isbn,
        review_count: stats.count,
        average_score: stats.average.map(|avg| format!("{:.2}", avg)),
    }))
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::db::{create_user, insert_book, insert_review, test_pool};
    use crate::goodreads::GoodreadsClient;
    use axum::http::StatusCode;

    async fn test_state() -> Arc<AppState> {
        let db = test_pool().await;
        Arc::new(AppState::new(
            Config::default(),
            db,
            GoodreadsClient::new(String::new(), "http://127.0.0.1:0".to_string()),
        ))
    }

    #[tokio::test]
    async fn test_unknown_isbn_is_404() {
        let state = test_state().await;

        let err = book_stats(State(state), Path("0000000000".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.message(), "Invalid ISBN");
    }

    #[tokio::test]
    async fn test_stats_average_reviews() {
        let state = test_state().await;
        let book = insert_book(&state.db, "0441172717", "Dune", "Frank Herbert", 1965).await;
        let alice = create_user(&state.db, "alice", "hash").await.unwrap();
        let bob = create_user(&state.db, "bob", "hash").await.unwrap();
        insert_review(&state.db, &alice.id, &book.id, 3, "fine").await.unwrap();
        insert_review(&state.db, &bob.id, &book.id, 5, "loved it").await.unwrap();

        let Json(stats) = book_stats(State(state), Path("0441172717".to_string()))
            .await
            .unwrap();
        assert_eq!(stats.title, "Dune");
        assert_eq!(stats.author, "Frank Herbert");
        assert_eq!(stats.year, 1965);
        assert_eq!(stats.isbn, "0441172717");
        assert_eq!(stats.review_count, 2);
        assert_eq!(stats.average_score.as_deref(), Some("4.00"));
    }

    #[tokio::test]
    async fn test_unreviewed_book_serializes_null_average() {
        let state = test_state().await;
        insert_book(&state.db, "0451524934", "1984", "George Orwell", 1949).await;

        let Json(stats) = book_stats(State(state), Path("0451524934".to_string()))
            .await
            .unwrap();
        assert_eq!(stats.review_count, 0);
        assert_eq!(stats.average_score, None);

        let value = serde_json::to_value(&stats).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "title": "1984",
                "author": "George Orwell",
                "year": 1949,
                "isbn": "0451524934",
                "review_count": 0,
                "average_score": null,
            })
        );
    }
}
