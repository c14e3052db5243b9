use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::str::FromStr;

use crate::error::StoreError;
use crate::models::{
    Author, AuthorView, Book, BookAuthor, BookView, NewAuthor, NewBook, PairingView,
};

/// Initialize database connection pool with recommended pragmas.
pub async fn init_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(5))
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await
}

/// Run database migrations.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(include_str!("../migrations/001_create_library.sql"))
        .execute(pool)
        .await?;
    Ok(())
}

/// Establish a book/author pairing inside one transaction.
///
/// The book must be new: an exact (title, number_of_pages) match fails with
/// `DuplicateBook`. The author is reused when the exact (first_name,
/// last_name) already exists, inserted otherwise. Any failure after the
/// first insert rolls the whole unit back; no orphan book or author row
/// survives a failed call.
pub async fn add_pairing(
    pool: &SqlitePool,
    book: &NewBook,
    author: &NewAuthor,
) -> Result<PairingView, StoreError> {
    let mut tx = pool.begin().await?;

    let existing_book = sqlx::query_as::<_, Book>(
        "SELECT book_id, title, number_of_pages FROM books WHERE title = ? AND number_of_pages = ?",
    )
    .bind(&book.title)
    .bind(book.number_of_pages)
    .fetch_optional(&mut *tx)
    .await?;

    if existing_book.is_some() {
        return Err(StoreError::DuplicateBook);
    }

    let book_id = insert_book(&mut tx, book).await?;
    let author_id = resolve_author(&mut tx, author).await?;

    let existing_pairing = sqlx::query_as::<_, BookAuthor>(
        "SELECT pairing_id, book_id, author_id FROM book_authors WHERE book_id = ? AND author_id = ?",
    )
    .bind(book_id)
    .bind(author_id)
    .fetch_optional(&mut *tx)
    .await?;

    if existing_pairing.is_some() {
        return Err(StoreError::DuplicatePairing);
    }

    insert_pairing(&mut tx, book_id, author_id).await?;

    tx.commit().await?;

    Ok(PairingView {
        book: BookView {
            title: book.title.clone(),
            number_of_pages: book.number_of_pages,
        },
        author: AuthorView {
            first_name: author.first_name.clone(),
            last_name: author.last_name.clone(),
        },
    })
}

/// Insert a book and return its generated id.
async fn insert_book(tx: &mut Transaction<'_, Sqlite>, book: &NewBook) -> Result<i64, sqlx::Error> {
    let result = sqlx::query("INSERT INTO books (title, number_of_pages) VALUES (?, ?)")
        .bind(&book.title)
        .bind(book.number_of_pages)
        .execute(&mut **tx)
        .await?;

    Ok(result.last_insert_rowid())
}

/// Reuse an existing author by exact name, inserting a new row otherwise.
async fn resolve_author(
    tx: &mut Transaction<'_, Sqlite>,
    author: &NewAuthor,
) -> Result<i64, sqlx::Error> {
    let existing = sqlx::query_as::<_, Author>(
        "SELECT author_id, first_name, last_name FROM authors WHERE first_name = ? AND last_name = ?",
    )
    .bind(&author.first_name)
    .bind(&author.last_name)
    .fetch_optional(&mut **tx)
    .await?;

    if let Some(existing) = existing {
        return Ok(existing.author_id);
    }

    let result = sqlx::query("INSERT INTO authors (first_name, last_name) VALUES (?, ?)")
        .bind(&author.first_name)
        .bind(&author.last_name)
        .execute(&mut **tx)
        .await?;

    Ok(result.last_insert_rowid())
}

/// Insert the pairing row. A unique violation here means a concurrent writer
/// created the same pairing after our check; report it as the duplicate it is.
async fn insert_pairing(
    tx: &mut Transaction<'_, Sqlite>,
    book_id: i64,
    author_id: i64,
) -> Result<i64, StoreError> {
    let result = sqlx::query("INSERT INTO book_authors (book_id, author_id) VALUES (?, ?)")
        .bind(book_id)
        .bind(author_id)
        .execute(&mut **tx)
        .await
        .map_err(|e| {
            if e.as_database_error()
                .is_some_and(|db| db.is_unique_violation())
            {
                StoreError::DuplicatePairing
            } else {
                StoreError::Database(e)
            }
        })?;

    Ok(result.last_insert_rowid())
}

/// Flat row produced by joining a pairing to its book and author.
#[derive(sqlx::FromRow)]
struct PairingRow {
    title: String,
    number_of_pages: i64,
    first_name: String,
    last_name: String,
}

impl From<PairingRow> for PairingView {
    fn from(row: PairingRow) -> Self {
        PairingView {
            book: BookView {
                title: row.title,
                number_of_pages: row.number_of_pages,
            },
            author: AuthorView {
                first_name: row.first_name,
                last_name: row.last_name,
            },
        }
    }
}

/// Combined view for the first pairing referencing `book_id`.
///
/// A book with several authors still yields a single author here (oldest
/// pairing wins): one association, not an aggregate of co-authors.
pub async fn get_book(pool: &SqlitePool, book_id: i64) -> Result<Option<PairingView>, sqlx::Error> {
    let row = sqlx::query_as::<_, PairingRow>(
        r#"
        SELECT b.title, b.number_of_pages, a.first_name, a.last_name
        FROM book_authors ba
        JOIN books b ON b.book_id = ba.book_id
        JOIN authors a ON a.author_id = ba.author_id
        WHERE ba.book_id = ?
        ORDER BY ba.pairing_id ASC
        LIMIT 1
        "#,
    )
    .bind(book_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(PairingView::from))
}

/// Combined view for every pairing, in insertion order.
pub async fn get_all_books(pool: &SqlitePool) -> Result<Vec<PairingView>, sqlx::Error> {
    let rows = sqlx::query_as::<_, PairingRow>(
        r#"
        SELECT b.title, b.number_of_pages, a.first_name, a.last_name
        FROM book_authors ba
        JOIN books b ON b.book_id = ba.book_id
        JOIN authors a ON a.author_id = ba.author_id
        ORDER BY ba.pairing_id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(PairingView::from).collect())
}

/// Case-insensitive substring search on book titles, joined through
/// pairings. An empty keyword matches every row.
pub async fn search_books_by_title(
    pool: &SqlitePool,
    keyword: &str,
) -> Result<Vec<PairingView>, sqlx::Error> {
    let pattern = format!("%{}%", keyword.to_lowercase());

    let rows = sqlx::query_as::<_, PairingRow>(
        r#"
        SELECT b.title, b.number_of_pages, a.first_name, a.last_name
        FROM book_authors ba
        JOIN books b ON b.book_id = ba.book_id
        JOIN authors a ON a.author_id = ba.author_id
        WHERE LOWER(b.title) LIKE ?
        ORDER BY ba.pairing_id ASC
        "#,
    )
    .bind(pattern)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(PairingView::from).collect())
}

/// Overwrite a book's title and page count in place.
///
/// Unlike creation there is no duplicate check against other books; an
/// update may collide with an existing (title, pages) pair. Returns the
/// updated book together with its first pairing's author, if any.
pub async fn update_book(
    pool: &SqlitePool,
    book_id: i64,
    new_title: &str,
    new_pages: i64,
) -> Result<(BookView, Option<AuthorView>), StoreError> {
    let mut tx = pool.begin().await?;

    let book = sqlx::query_as::<_, Book>(
        "SELECT book_id, title, number_of_pages FROM books WHERE book_id = ?",
    )
    .bind(book_id)
    .fetch_optional(&mut *tx)
    .await?;

    if book.is_none() {
        return Err(StoreError::NotFound);
    }

    sqlx::query("UPDATE books SET title = ?, number_of_pages = ? WHERE book_id = ?")
        .bind(new_title)
        .bind(new_pages)
        .bind(book_id)
        .execute(&mut *tx)
        .await?;

    let author = sqlx::query_as::<_, Author>(
        r#"
        SELECT a.author_id, a.first_name, a.last_name
        FROM book_authors ba
        JOIN authors a ON a.author_id = ba.author_id
        WHERE ba.book_id = ?
        ORDER BY ba.pairing_id ASC
        LIMIT 1
        "#,
    )
    .bind(book_id)
    .fetch_optional(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok((
        BookView {
            title: new_title.to_string(),
            number_of_pages: new_pages,
        },
        author.map(|a| AuthorView {
            first_name: a.first_name,
            last_name: a.last_name,
        }),
    ))
}

/// Delete a book and every pairing referencing it, pairings first, in one
/// transaction. An absent id fails with `NotFound` and writes nothing.
pub async fn delete_book(pool: &SqlitePool, book_id: i64) -> Result<(), StoreError> {
    let mut tx = pool.begin().await?;

    let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books WHERE book_id = ?")
        .bind(book_id)
        .fetch_one(&mut *tx)
        .await?;

    if exists == 0 {
        return Err(StoreError::NotFound);
    }

    sqlx::query("DELETE FROM book_authors WHERE book_id = ?")
        .bind(book_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM books WHERE book_id = ?")
        .bind(book_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(())
}
