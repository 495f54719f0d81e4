//! Async store trait definitions for the persistence layer.
//!
//! The two traits abstract over where the notes collection lives,
//! allowing the file-backed and SQLite-backed adapters to be swapped
//! for in-memory doubles via static dispatch (the repository is generic
//! over both).
//!
//! Methods return `impl Future + Send` rather than using `async fn` so
//! that the futures are guaranteed `Send` — required by `tokio::spawn`.

use super::StoreError;
use crate::model::NotesCollection;
use std::future::Future;

/// On-device store holding the whole collection under one fixed key.
///
/// Implementations must fail open on reads: a missing or malformed
/// stored value yields an empty collection, never an error.
pub trait LocalStore: Send + Sync {
    fn read(&self) -> impl Future<Output = Result<NotesCollection, StoreError>> + Send;
    fn write(
        &self,
        notes: &NotesCollection,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Per-account document store addressed by account identifier.
///
/// A missing document reads as an empty collection. Writes replace the
/// stored collection wholesale but must preserve unrelated fields of
/// the surrounding document.
pub trait RemoteStore: Send + Sync {
    fn read(
        &self,
        account_id: &str,
    ) -> impl Future<Output = Result<NotesCollection, StoreError>> + Send;
    fn write(
        &self,
        account_id: &str,
        notes: &NotesCollection,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}
