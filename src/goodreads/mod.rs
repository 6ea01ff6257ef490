//! Goodreads API client for community rating lookups.
//!
//! The book page shows how the wider Goodreads community rated a title next
//! to our own reviews. Only the `review_counts.json` endpoint is used; the
//! caller decides what to do when Goodreads is unreachable.

use serde::Deserialize;
use thiserror::Error;

/// Failure modes of a rating lookup.
#[derive(Debug, Error)]
pub enum GoodreadsError {
    #[error("goodreads request failed: {0}")]
    Unavailable(String),
    #[error("goodreads response malformed: {0}")]
    Malformed(String),
}

/// Community rating figures for a single ISBN.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RatingCounts {
    pub ratings_count: i64,
    pub work_ratings_count: i64,
    pub average_rating: String,
}

#[derive(Debug, Deserialize)]
struct ReviewCountsResponse {
    books: Vec<RatingCounts>,
}

impl ReviewCountsResponse {
    /// Goodreads answers with a `books` array even for a single ISBN; the
    /// first entry is the one requested.
    fn into_first(self) -> Result<RatingCounts, GoodreadsError> {
        self.books
            .into_iter()
            .next()
            .ok_or_else(|| GoodreadsError::Malformed("empty books array".to_string()))
    }
}

/// Client for the Goodreads REST API.
pub struct GoodreadsClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl GoodreadsClient {
    /// Create a new client against the given API root.
    pub fn new(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// Fetch rating counts for one ISBN.
    pub async fn fetch_rating_counts(&self, isbn: &str) -> Result<RatingCounts, GoodreadsError> {
        let url = format!("{}/book/review_counts.json", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("isbns", isbn)])
            .send()
            .await
            .map_err(|e| GoodreadsError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GoodreadsError::Unavailable(format!(
                "status {}",
                response.status()
            )));
        }

        let body: ReviewCountsResponse = response
            .json()
            .await
            .map_err(|e| GoodreadsError::Malformed(e.to_string()))?;

        body.into_first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_review_counts() {
        let json = r#"{
            "books": [{
                "id": 29207858,
                "isbn": "0441172717",
                "isbn13": "9780441172719",
                "ratings_count": 9528,
                "reviews_count": 25737,
                "text_reviews_count": 562,
                "work_ratings_count": 783801,
                "work_reviews_count": 1665876,
                "work_text_reviews_count": 18837,
                "average_rating": "4.23"
            }]
        }"#;

        let parsed: ReviewCountsResponse = serde_json::from_str(json).unwrap();
        let book = parsed.into_first().unwrap();
        assert_eq!(book.ratings_count, 9528);
        assert_eq!(book.work_ratings_count, 783_801);
        assert_eq!(book.average_rating, "4.23");
    }

    #[test]
    fn test_parse_rejects_missing_fields() {
        let json = r#"{"books": [{"ratings_count": 5}]}"#;
        assert!(serde_json::from_str::<ReviewCountsResponse>(json).is_err());
    }

    #[test]
    fn test_empty_books_array_is_malformed() {
        let parsed: ReviewCountsResponse = serde_json::from_str(r#"{"books": []}"#).unwrap();
        let err = parsed.into_first().unwrap_err();
        assert!(matches!(err, GoodreadsError::Malformed(_)));
        assert_eq!(
            err.to_string(),
            "goodreads response malformed: empty books array"
        );
    }
}
