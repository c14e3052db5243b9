use serde::{Deserialize, Serialize};

/// A book row.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Book {
    pub book_id: i64,
    pub title: String,
    pub number_of_pages: i64,
}

/// An author row.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Author {
    pub author_id: i64,
    pub first_name: String,
    pub last_name: String,
}

/// Association row linking one book to one author.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BookAuthor {
    pub pairing_id: i64,
    pub book_id: i64,
    pub author_id: i64,
}

/// Candidate book in a create request (no id yet).
#[derive(Debug, Clone, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub number_of_pages: i64,
}

/// Candidate author in a create request (no id yet).
#[derive(Debug, Clone, Deserialize)]
pub struct NewAuthor {
    pub first_name: String,
    pub last_name: String,
}

/// Request to create a new book/author pairing.
#[derive(Debug, Deserialize)]
pub struct CreatePairingRequest {
    pub book: NewBook,
    pub author: NewAuthor,
}

/// Request to update a book in place.
#[derive(Debug, Deserialize)]
pub struct UpdateBookRequest {
    pub title: String,
    pub number_of_pages: i64,
}

/// Book half of the combined view.
#[derive(Debug, Clone, Serialize)]
pub struct BookView {
    pub title: String,
    pub number_of_pages: i64,
}

/// Author half of the combined view.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorView {
    pub first_name: String,
    pub last_name: String,
}

/// Combined book+author view returned by the book-bearing endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct PairingView {
    pub book: BookView,
    pub author: AuthorView,
}

/// Response for updating a book. The author comes from the book's first
/// pairing, or null when no pairing exists.
#[derive(Debug, Serialize)]
pub struct UpdatedBookResponse {
    pub book: BookView,
    pub author: Option<AuthorView>,
}

/// Query parameters for the title search endpoint.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub title: String,
}
