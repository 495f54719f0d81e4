mod account_doc_store;
mod db;
mod local_store;
mod repository;
pub mod traits;

pub use account_doc_store::AccountDocStore;
pub use db::Database;
pub use local_store::LocalNotesStore;
pub use repository::NotesRepository;

use std::time::{SystemTime, UNIX_EPOCH};

/// Errors from the persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("remote store unavailable: {0}")]
    Remote(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migration(String),
    #[error("remote operation requires a non-empty account id")]
    AccountRequired,
}

/// Get the current unix timestamp in milliseconds.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
