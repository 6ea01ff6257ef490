// Server-rendered pages
// Uses Askama templates; every route below answers with HTML or a redirect

mod forms;
mod templates;

use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use axum_extra::extract::CookieJar;
use std::sync::Arc;

use crate::auth::{
    clear_session, create_session, hash_password, session_cookie, set_flash, take_flash,
    verify_password, CurrentUser, Flash,
};
use crate::db::{
    create_user, find_book_by_isbn, find_user_by_username, has_reviewed, insert_review,
    is_unique_violation, list_reviews, search_books,
};
use crate::AppState;

use forms::{title_case, LoginForm, RegisterForm, ReviewForm, SearchQuery};

pub use templates::*;

// Helper to render templates and handle errors
fn render_template<T: Template>(template: T) -> Response {
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Template error: {}", e),
        )
            .into_response(),
    }
}

pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        // Public routes
        .route("/login", get(login_page))
        .route("/login", post(login_submit))
        .route("/register", get(register_page))
        .route("/register", post(register_submit))
        .route("/logout", get(logout))
        // Protected routes (CurrentUser extractor redirects to /login)
        .route("/", get(index))
        .route("/search", get(search))
        .route("/book/:isbn", get(book_page))
        .route("/book/:isbn", post(book_review))
}

/// A page failure rendered through the error view with its status code.
#[derive(Debug)]
pub struct PageError {
    status: StatusCode,
    message: String,
}

impl PageError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    /// Generic 500 page. Details stay in the log.
    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "something went wrong")
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let template = ErrorTemplate {
            message: self.message,
        };
        match template.render() {
            Ok(html) => (self.status, Html(html)).into_response(),
            Err(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Template error: {}", e),
            )
                .into_response(),
        }
    }
}

impl From<sqlx::Error> for PageError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Database error: {}", err);
        Self::internal()
    }
}

/// GET / - landing page with the search form.
async fn index(user: CurrentUser) -> Response {
    render_template(IndexTemplate {
        username: user.username,
    })
}

/// GET /login - login form. Entering the page drops any existing session.
async fn login_page(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Response) {
    let jar = clear_session(&state.db, jar).await;
    let (jar, flash) = take_flash(jar);
    (jar, render_template(LoginTemplate { flash }))
}

/// POST /login
async fn login_submit(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<(CookieJar, Redirect), PageError> {
    let jar = clear_session(&state.db, jar).await;
    let (username, password) = form.credentials().map_err(PageError::bad_request)?;

    let user = match find_user_by_username(&state.db, username).await? {
        Some(user) if verify_password(password, &user.password_hash) => user,
        _ => return Err(PageError::unauthorized("invalid username and/or password")),
    };

    let token = create_session(&state.db, &user.id).await?;
    tracing::info!(username = %user.username, "user logged in");
    Ok((jar.add(session_cookie(token)), Redirect::to("/")))
}

/// GET /register - registration form. Also drops any existing session.
async fn register_page(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Response) {
    let jar = clear_session(&state.db, jar).await;
    (jar, render_template(RegisterTemplate))
}

/// POST /register
async fn register_submit(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<RegisterForm>,
) -> Result<(CookieJar, Redirect), PageError> {
    let jar = clear_session(&state.db, jar).await;

    let username = form.username().map_err(PageError::bad_request)?;
    if find_user_by_username(&state.db, username).await?.is_some() {
        return Err(PageError::conflict("username already exist"));
    }
    let password = form.password().map_err(PageError::bad_request)?;

    let password_hash = hash_password(password).map_err(|e| {
        tracing::error!(error = %e, "password hashing failed");
        PageError::internal()
    })?;

    // The UNIQUE column catches a username racing in after the probe above.
    let user = match create_user(&state.db, username, &password_hash).await {
        Ok(user) => user,
        Err(e) if is_unique_violation(&e) => {
            return Err(PageError::conflict("username already exist"))
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(username = %user.username, "account created");
    Ok((set_flash(jar, Flash::AccountCreated), Redirect::to("/login")))
}

/// GET /logout - the index then bounces the signed-out visitor to /login.
async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Redirect) {
    let jar = clear_session(&state.db, jar).await;
    (jar, Redirect::to("/"))
}

/// GET /search?book=term
///
/// The term is title-cased before matching so lowercase input still finds
/// catalog entries; matching is a substring LIKE over isbn, title, and
/// author, capped at 15 rows.
async fn search(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    Query(query): Query<SearchQuery>,
) -> Result<Response, PageError> {
    let term = query.term().map_err(PageError::bad_request)?;

    let books = search_books(&state.db, &title_case(term)).await?;
    if books.is_empty() {
        return Err(PageError::not_found(
            "we can not find the book in our database",
        ));
    }

    Ok(render_template(ResultsTemplate {
        term: term.to_string(),
        books,
    }))
}

/// GET /book/:isbn - detail page with community ratings and reviews.
///
/// A Goodreads outage only costs the external ratings block; the rest of
/// the page still renders.
async fn book_page(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    jar: CookieJar,
    Path(isbn): Path<String>,
) -> Result<(CookieJar, Response), PageError> {
    let book = find_book_by_isbn(&state.db, &isbn).await?.ok_or_else(|| {
        PageError::not_found("we can not find the book in our database")
    })?;

    let external = match state.goodreads.fetch_rating_counts(&book.isbn).await {
        Ok(counts) => Some(counts),
        Err(e) => {
            tracing::warn!(error = %e, isbn = %book.isbn, "goodreads lookup failed");
            None
        }
    };

    let reviews = list_reviews(&state.db, &book.id)
        .await?
        .into_iter()
        .map(ReviewDisplay::from)
        .collect();

    let (jar, flash) = take_flash(jar);
    Ok((
        jar,
        render_template(BookTemplate {
            book,
            external,
            reviews,
            flash,
        }),
    ))
}

/// POST /book/:isbn - submit a review, one per user per book.
async fn book_review(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    jar: CookieJar,
    Path(isbn): Path<String>,
    Form(form): Form<ReviewForm>,
) -> Result<(CookieJar, Redirect), PageError> {
    let book = find_book_by_isbn(&state.db, &isbn).await?.ok_or_else(|| {
        PageError::not_found("we can not find the book in our database")
    })?;

    let (rating, comment) = form.validate().map_err(PageError::bad_request)?;

    if has_reviewed(&state.db, &user.id, &book.id).await? {
        return Err(PageError::conflict(
            "You already submitted a review for this book",
        ));
    }

    // The UNIQUE(user_id, book_id) index catches a duplicate racing in
    // after the check above.
    match insert_review(&state.db, &user.id, &book.id, rating, &comment).await {
        Ok(_) => {}
        Err(e) if is_unique_violation(&e) => {
            return Err(PageError::conflict(
                "You already submitted a review for this book",
            ))
        }
        Err(e) => return Err(e.into()),
    }

    tracing::info!(username = %user.username, isbn = %book.isbn, "review submitted");
    Ok((
        set_flash(jar, Flash::ReviewSubmitted),
        Redirect::to(&format!("/book/{}", book.isbn)),
    ))
}
