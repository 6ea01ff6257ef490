//! Database seeders for built-in data
//!
//! The catalog has no create/update surface of its own, so a small starter
//! set of books is inserted on first run. Operators load a real catalog by
//! pointing DATABASE_URL at an already-populated database.

use anyhow::Result;
use sqlx::SqlitePool;
use tracing::info;

/// Seed the starter catalog when the books table is empty.
pub async fn seed_books(pool: &SqlitePool) -> Result<()> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM books")
        .fetch_one(pool)
        .await?;
    if count.0 > 0 {
        return Ok(());
    }

    info!("Books table is empty, seeding starter catalog...");

    // Format: (isbn, title, author, year)
    let books: Vec<(&str, &str, &str, i64)> = vec![
        ("0316769487", "The Catcher In The Rye", "J.D. Salinger", 1951),
        ("0061120081", "To Kill A Mockingbird", "Harper Lee", 1960),
        ("0451524934", "1984", "George Orwell", 1949),
        ("0743273567", "The Great Gatsby", "F. Scott Fitzgerald", 1925),
        ("0141439513", "Pride And Prejudice", "Jane Austen", 1813),
        ("0618260307", "The Hobbit", "J.R.R. Tolkien", 1937),
        ("0441172717", "Dune", "Frank Herbert", 1965),
        ("0385121679", "The Shining", "Stephen King", 1977),
        ("0060850524", "Brave New World", "Aldous Huxley", 1932),
        ("0142437239", "Don Quixote", "Miguel De Cervantes", 1605),
    ];

    for (isbn, title, author, year) in &books {
        sqlx::query(
            "INSERT OR IGNORE INTO books (id, isbn, title, author, year) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(uuid::Uuid::new_v4().to_string())
        .bind(isbn)
        .bind(title)
        .bind(author)
        .bind(year)
        .execute(pool)
        .await?;
    }

    info!("Seeded {} books", books.len());
    Ok(())
}
