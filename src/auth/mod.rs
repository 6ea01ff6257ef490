//! Credential hashing and cookie sessions.
//!
//! Passwords are stored as salted Argon2 hashes, never as plaintext. A login
//! creates a sessions row keyed by the SHA-256 digest of a random token; the
//! raw token only ever lives in the client's cookie.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{async_trait, extract::FromRequestParts, http::request::Parts, response::Redirect};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use rand::Rng;
use sha2::{Digest, Sha256};
use std::sync::Arc;

use crate::db::DbPool;
use crate::AppState;

/// Session token cookie name
pub const SESSION_COOKIE: &str = "bookden_session";

/// One-shot notice cookie name
const FLASH_COOKIE: &str = "bookden_flash";

/// Sessions expire a week after login
const SESSION_TTL_DAYS: i64 = 7;

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Generate a random token
fn generate_token() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();
    hex::encode(bytes)
}

/// Hash a token for storage
fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Create a session for the user and return the raw token for the cookie.
pub async fn create_session(db: &DbPool, user_id: &str) -> Result<String, sqlx::Error> {
    let token = generate_token();
    let token_hash = hash_token(&token);
    let expires_at = (chrono::Utc::now() + chrono::Duration::days(SESSION_TTL_DAYS)).to_rfc3339();
    let now = chrono::Utc::now().to_rfc3339();

    sqlx::query(
        "INSERT INTO sessions (id, user_id, token_hash, expires_at, created_at) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(uuid::Uuid::new_v4().to_string())
    .bind(user_id)
    .bind(&token_hash)
    .bind(&expires_at)
    .bind(&now)
    .execute(db)
    .await?;

    Ok(token)
}

/// Delete the session behind a raw token. Idempotent.
pub async fn delete_session(db: &DbPool, token: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM sessions WHERE token_hash = ?")
        .bind(hash_token(token))
        .execute(db)
        .await?;
    Ok(())
}

/// Resolve a raw token to the logged-in user, if the session is unexpired.
pub async fn session_user(db: &DbPool, token: &str) -> Result<Option<CurrentUser>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT u.id, u.username
        FROM sessions s
        JOIN users u ON u.id = s.user_id
        WHERE s.token_hash = ? AND datetime(s.expires_at) > datetime('now')
        "#,
    )
    .bind(hash_token(token))
    .fetch_optional(db)
    .await
}

/// Drop whatever session the client presented, server side and cookie both.
/// Login and registration call this on entry so stale sessions never survive
/// a re-authentication; logout is just this plus a redirect.
pub async fn clear_session(db: &DbPool, jar: CookieJar) -> CookieJar {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        if let Err(e) = delete_session(db, cookie.value()).await {
            tracing::warn!(error = %e, "failed to delete session row");
        }
        return jar.remove(Cookie::build(SESSION_COOKIE).path("/").build());
    }
    jar
}

/// Build the session cookie carrying a raw token.
pub fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// One-shot notices shown on the page after a redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flash {
    AccountCreated,
    ReviewSubmitted,
}

impl Flash {
    fn as_str(&self) -> &'static str {
        match self {
            Flash::AccountCreated => "account_created",
            Flash::ReviewSubmitted => "review_submitted",
        }
    }

    fn from_str(value: &str) -> Option<Self> {
        match value {
            "account_created" => Some(Flash::AccountCreated),
            "review_submitted" => Some(Flash::ReviewSubmitted),
            _ => None,
        }
    }

    /// The text the next rendered page displays.
    pub fn message(&self) -> &'static str {
        match self {
            Flash::AccountCreated => "Account created",
            Flash::ReviewSubmitted => "Review submitted!",
        }
    }
}

/// Queue a notice for the next page render.
pub fn set_flash(jar: CookieJar, flash: Flash) -> CookieJar {
    jar.add(
        Cookie::build((FLASH_COOKIE, flash.as_str()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .build(),
    )
}

/// Consume the pending notice, if any.
pub fn take_flash(jar: CookieJar) -> (CookieJar, Option<String>) {
    let message = jar
        .get(FLASH_COOKIE)
        .and_then(|c| Flash::from_str(c.value()))
        .map(|f| f.message().to_string());
    if message.is_some() {
        let jar = jar.remove(Cookie::build(FLASH_COOKIE).path("/").build());
        return (jar, message);
    }
    (jar, None)
}

/// The authenticated user, extracted from the session cookie.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CurrentUser {
    pub id: String,
    pub username: String,
}

/// Extractor guarding protected routes: anything short of a live session
/// redirects to the login page instead of rendering the target.
#[async_trait]
impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = Redirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(SESSION_COOKIE)
            .map(|c| c.value().to_string())
            .ok_or_else(|| Redirect::to("/login"))?;

        match session_user(&state.db, &token).await {
            Ok(Some(user)) => Ok(user),
            Ok(None) => Err(Redirect::to("/login")),
            Err(e) => {
                tracing::error!(error = %e, "session lookup failed");
                Err(Redirect::to("/login"))
            }
        }
    }
}
