pub mod books;

use axum::{
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Index page
        .route("/", get(index))
        // Book/author pairing CRUD
        .route("/book/", post(books::create_pairing))
        .route("/book/{book_id}", get(books::get_book))
        .route("/book/{book_id}", put(books::update_book))
        .route("/book/{book_id}", delete(books::delete_book))
        // Read surface
        .route("/books", get(books::get_all_books))
        .route("/books/search", get(books::search_books))
        // Health check
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn index() -> impl IntoResponse {
    "Welcome to the books api!"
}

async fn health() -> &'static str {
    "OK"
}
