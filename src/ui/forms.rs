//! Form payloads and their validation.
//!
//! HTML forms post empty strings for untouched fields, so every check
//! treats an empty value the same as a missing one. Error strings are the
//! exact texts the pages display.

use serde::Deserialize;

/// POST /login body.
#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl LoginForm {
    /// Validate presence of both fields, username first.
    pub fn credentials(&self) -> Result<(&str, &str), &'static str> {
        let username = match self.username.as_deref() {
            Some(u) if !u.is_empty() => u,
            _ => return Err("Please enter a username"),
        };
        let password = match self.password.as_deref() {
            Some(p) if !p.is_empty() => p,
            _ => return Err("Please enter a password"),
        };
        Ok((username, password))
    }
}

/// POST /register body.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterForm {
    pub username: Option<String>,
    pub password: Option<String>,
    pub confirmation: Option<String>,
}

impl RegisterForm {
    /// The requested username. Checked before anything password-related;
    /// the handler probes for duplicates between this and `password`.
    pub fn username(&self) -> Result<&str, &'static str> {
        match self.username.as_deref() {
            Some(u) if !u.is_empty() => Ok(u),
            _ => Err("Please enter a username"),
        }
    }

    /// The chosen password, once present, confirmed, and matching.
    pub fn password(&self) -> Result<&str, &'static str> {
        let password = match self.password.as_deref() {
            Some(p) if !p.is_empty() => p,
            _ => return Err("Please enter a password"),
        };
        let confirmation = match self.confirmation.as_deref() {
            Some(c) if !c.is_empty() => c,
            _ => return Err("Please confirm password"),
        };
        if password != confirmation {
            return Err("passwords did not match");
        }
        Ok(password)
    }
}

/// GET /search query string.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub book: Option<String>,
}

impl SearchQuery {
    /// The raw search term, exactly as typed.
    pub fn term(&self) -> Result<&str, &'static str> {
        match self.book.as_deref() {
            Some(t) if !t.is_empty() => Ok(t),
            _ => Err("you must provide a book name."),
        }
    }
}

/// POST /book/:isbn body.
#[derive(Debug, Default, Deserialize)]
pub struct ReviewForm {
    pub rating: Option<String>,
    pub comment: Option<String>,
}

impl ReviewForm {
    /// Parse the rating and default the comment to empty.
    pub fn validate(&self) -> Result<(i64, String), &'static str> {
        let rating = self
            .rating
            .as_deref()
            .and_then(|r| r.parse::<i64>().ok())
            .filter(|r| (1..=5).contains(r))
            .ok_or("rating must be between 1 and 5")?;
        let comment = self.comment.clone().unwrap_or_default();
        Ok((rating, comment))
    }
}

/// Uppercase the first letter of every alphabetic run, lowercase the rest.
/// Search terms are normalized this way to match the casing the catalog
/// stores titles and authors in.
pub fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut prev_alpha = false;
    for ch in input.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_username_checked_first() {
        let form = LoginForm::default();
        assert_eq!(form.credentials(), Err("Please enter a username"));

        let form = LoginForm {
            username: Some("alice".to_string()),
            password: Some(String::new()),
        };
        assert_eq!(form.credentials(), Err("Please enter a password"));

        let form = LoginForm {
            username: Some("alice".to_string()),
            password: Some("hunter2".to_string()),
        };
        assert_eq!(form.credentials(), Ok(("alice", "hunter2")));
    }

    #[test]
    fn test_register_validation_order() {
        let form = RegisterForm::default();
        assert_eq!(form.username(), Err("Please enter a username"));

        let form = RegisterForm {
            username: Some("alice".to_string()),
            ..Default::default()
        };
        assert_eq!(form.username(), Ok("alice"));
        assert_eq!(form.password(), Err("Please enter a password"));

        let form = RegisterForm {
            username: Some("alice".to_string()),
            password: Some("hunter2".to_string()),
            confirmation: None,
        };
        assert_eq!(form.password(), Err("Please confirm password"));

        let form = RegisterForm {
            username: Some("alice".to_string()),
            password: Some("hunter2".to_string()),
            confirmation: Some("hunter3".to_string()),
        };
        assert_eq!(form.password(), Err("passwords did not match"));

        let form = RegisterForm {
            username: Some("alice".to_string()),
            password: Some("hunter2".to_string()),
            confirmation: Some("hunter2".to_string()),
        };
        assert_eq!(form.password(), Ok("hunter2"));
    }

    #[test]
    fn test_search_term_required() {
        assert_eq!(
            SearchQuery::default().term(),
            Err("you must provide a book name.")
        );
        assert_eq!(
            SearchQuery {
                book: Some(String::new())
            }
            .term(),
            Err("you must provide a book name.")
        );
        // The term is not trimmed
        assert_eq!(
            SearchQuery {
                book: Some(" dune ".to_string())
            }
            .term(),
            Ok(" dune ")
        );
    }

    #[test]
    fn test_review_rating_bounds() {
        for bad in ["0", "6", "-1", "abc", ""] {
            let form = ReviewForm {
                rating: Some(bad.to_string()),
                comment: None,
            };
            assert_eq!(form.validate(), Err("rating must be between 1 and 5"));
        }
        assert_eq!(
            ReviewForm::default().validate(),
            Err("rating must be between 1 and 5")
        );

        let form = ReviewForm {
            rating: Some("3".to_string()),
            comment: None,
        };
        assert_eq!(form.validate(), Ok((3, String::new())));

        let form = ReviewForm {
            rating: Some("5".to_string()),
            comment: Some("a classic".to_string()),
        };
        assert_eq!(form.validate(), Ok((5, "a classic".to_string())));
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("the great gatsby"), "The Great Gatsby");
        assert_eq!(title_case("harry POTTER"), "Harry Potter");
        assert_eq!(title_case("o'neill"), "O'Neill");
        assert_eq!(title_case("1984"), "1984");
        // Digits end a word, so the letter after one is uppercased
        assert_eq!(title_case("abc3de"), "Abc3De");
        assert_eq!(title_case("isbn 0441172717"), "Isbn 0441172717");
        assert_eq!(title_case(""), "");
    }
}
