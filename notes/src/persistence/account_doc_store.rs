//! SQLite-backed remote store: one JSON document per account.

use sqlx::SqlitePool;

use super::traits::RemoteStore;
use super::{now_millis, StoreError};
use crate::model::NotesCollection;

/// Document field the collection is stored under.
const NOTES_FIELD: &str = "notes";

/// Remote store adapter holding one document row per account.
///
/// The canonical document shape wraps the collection as
/// `{"notes": {...}}`. Reads also accept the older bare-collection
/// shape (a top-level object with no `notes` field) so documents
/// written before the wrapper existed keep loading.
pub struct AccountDocStore {
    pool: SqlitePool,
}

impl AccountDocStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch_doc(&self, account_id: &str) -> Result<Option<String>, StoreError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT doc FROM account_docs WHERE account_id = ?")
                .bind(account_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(doc,)| doc))
    }
}

fn ensure_account(account_id: &str) -> Result<(), StoreError> {
    if account_id.is_empty() {
        return Err(StoreError::AccountRequired);
    }
    Ok(())
}

/// Decode a stored document body, accepting both historical shapes.
///
/// A body that fails to parse at all is treated as an empty collection;
/// per-entry recovery happens inside the collection's deserializer.
fn decode_doc(account_id: &str, body: &str) -> NotesCollection {
    let value: serde_json::Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(
                "Malformed document for account {:?}, treating as empty: {}",
                account_id,
                err
            );
            return NotesCollection::default();
        }
    };

    let notes = match value {
        serde_json::Value::Object(mut doc) if doc.contains_key(NOTES_FIELD) => {
            doc.remove(NOTES_FIELD).unwrap_or_default()
        }
        other => other,
    };

    match serde_json::from_value(notes) {
        Ok(collection) => collection,
        Err(err) => {
            tracing::warn!(
                "Malformed notes field for account {:?}, treating as empty: {}",
                account_id,
                err
            );
            NotesCollection::default()
        }
    }
}

impl RemoteStore for AccountDocStore {
    async fn read(&self, account_id: &str) -> Result<NotesCollection, StoreError> {
        ensure_account(account_id)?;
        match self.fetch_doc(account_id).await? {
            Some(body) => Ok(decode_doc(account_id, &body)),
            None => Ok(NotesCollection::default()),
        }
    }

    async fn write(&self, account_id: &str, notes: &NotesCollection) -> Result<(), StoreError> {
        ensure_account(account_id)?;

        // Merge at document level: only the notes field is replaced.
        // A legacy bare-shape document is superseded wholesale, since
        // its top-level keys were the old collection representation.
        let mut doc = match self.fetch_doc(account_id).await? {
            Some(body) => match serde_json::from_str::<serde_json::Value>(&body) {
                Ok(serde_json::Value::Object(existing))
                    if existing.contains_key(NOTES_FIELD) =>
                {
                    existing
                }
                _ => serde_json::Map::new(),
            },
            None => serde_json::Map::new(),
        };
        doc.insert(NOTES_FIELD.to_string(), serde_json::to_value(notes)?);

        let body = serde_json::Value::Object(doc).to_string();
        sqlx::query(
            "INSERT OR REPLACE INTO account_docs (account_id, doc, updated_at) VALUES (?, ?, ?)",
        )
        .bind(account_id)
        .bind(&body)
        .bind(now_millis() as i64)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
