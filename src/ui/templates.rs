// Askama template definitions

use askama::Template;

use crate::db::{Book, ReviewWithAuthor};
use crate::goodreads::RatingCounts;

// Landing page with the search form
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub username: String,
}

// Login form
#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub flash: Option<String>,
}

// Registration form
#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterTemplate;

// Full-page error view
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub message: String,
}

// Search results table
#[derive(Template)]
#[template(path = "results.html")]
pub struct ResultsTemplate {
    pub term: String,
    pub books: Vec<Book>,
}

// Review row for the book page (timestamps pre-formatted for display)
pub struct ReviewDisplay {
    pub username: String,
    pub rating: i64,
    pub comment: String,
    pub submitted: String,
}

impl From<ReviewWithAuthor> for ReviewDisplay {
    fn from(review: ReviewWithAuthor) -> Self {
        Self {
            submitted: format_review_time(&review.created_at),
            username: review.username,
            rating: review.rating,
            comment: review.comment,
        }
    }
}

// Book detail page
#[derive(Template)]
#[template(path = "book.html")]
pub struct BookTemplate {
    pub book: Book,
    pub external: Option<RatingCounts>,
    pub reviews: Vec<ReviewDisplay>,
    pub flash: Option<String>,
}

/// Render a stored RFC 3339 timestamp for review rows. Unparseable values
/// are shown as stored.
pub fn format_review_time(raw: &str) -> String {
    match chrono::DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => dt.format("%d %b %y - %H:%M:%S").to_string(),
        Err(_) => raw.to_string(),
    }
}
