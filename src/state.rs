use sqlx::SqlitePool;

/// Application state shared across handlers.
///
/// The pool is built once at startup and injected here; handlers never reach
/// for a process-global connection.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
}

impl AppState {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}
