use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::db;
use crate::error::StoreError;
use crate::models::{CreatePairingRequest, SearchQuery, UpdateBookRequest, UpdatedBookResponse};
use crate::state::AppState;

/// POST /book/ - Create a book together with its author pairing.
pub async fn create_pairing(
    State(state): State<AppState>,
    Json(req): Json<CreatePairingRequest>,
) -> Response {
    match db::add_pairing(&state.pool, &req.book, &req.author).await {
        Ok(view) => (StatusCode::CREATED, Json(view)).into_response(),
        Err(e @ (StoreError::DuplicateBook | StoreError::DuplicatePairing)) => {
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to create pairing: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database error").into_response()
        }
    }
}

/// GET /book/:book_id - Combined view for one book.
pub async fn get_book(State(state): State<AppState>, Path(book_id): Path<i64>) -> Response {
    match db::get_book(&state.pool, book_id).await {
        Ok(Some(view)) => Json(view).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Book not found").into_response(),
        Err(e) => {
            tracing::error!("Failed to get book: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database error").into_response()
        }
    }
}

/// GET /books - Combined view for every pairing.
pub async fn get_all_books(State(state): State<AppState>) -> Response {
    match db::get_all_books(&state.pool).await {
        Ok(views) => Json(views).into_response(),
        Err(e) => {
            tracing::error!("Failed to list books: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database error").into_response()
        }
    }
}

/// PUT /book/:book_id - Update a book's title and page count.
pub async fn update_book(
    State(state): State<AppState>,
    Path(book_id): Path<i64>,
    Json(req): Json<UpdateBookRequest>,
) -> Response {
    match db::update_book(&state.pool, book_id, &req.title, req.number_of_pages).await {
        Ok((book, author)) => Json(UpdatedBookResponse { book, author }).into_response(),
        Err(StoreError::NotFound) => (StatusCode::NOT_FOUND, "Book not found").into_response(),
        Err(e) => {
            tracing::error!("Failed to update book: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database error").into_response()
        }
    }
}

/// DELETE /book/:book_id - Delete a book and its pairings.
pub async fn delete_book(State(state): State<AppState>, Path(book_id): Path<i64>) -> Response {
    match db::delete_book(&state.pool, book_id).await {
        Ok(()) => Json(serde_json::json!({
            "message": format!("Book {} deleted successfully", book_id)
        }))
        .into_response(),
        Err(StoreError::NotFound) => (StatusCode::NOT_FOUND, "Book not found").into_response(),
        Err(e) => {
            tracing::error!("Failed to delete book: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database error").into_response()
        }
    }
}

/// GET /books/search?title=<keyword> - Case-insensitive title search.
pub async fn search_books(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Response {
    match db::search_books_by_title(&state.pool, &query.title).await {
        Ok(views) => Json(views).into_response(),
        Err(e) => {
            tracing::error!("Failed to search books: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database error").into_response()
        }
    }
}
