use thiserror::Error;

/// Failures surfaced by the store. The duplicate variants are named so the
/// HTTP layer can map them to client errors instead of a generic 500.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Book already exists")]
    DuplicateBook,

    #[error("This book-author pair already exists")]
    DuplicatePairing,

    #[error("Book not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
