use super::traits::LocalStore;
use super::StoreError;
use crate::model::NotesCollection;
use std::path::PathBuf;

/// Fixed file name the whole collection is stored under, mirroring the
/// single storage key the web client used.
const NOTES_FILE: &str = "matchup_notes.json";

/// Local store adapter: one JSON file holding the entire collection.
///
/// Reads fail open — a missing, unreadable, or unparseable file yields
/// an empty collection. Writes replace the file wholesale.
pub struct LocalNotesStore {
    path: PathBuf,
}

impl LocalNotesStore {
    /// Create a store rooted at the given data directory.
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            path: data_dir.join(NOTES_FILE),
        }
    }

    fn read_sync(&self) -> NotesCollection {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return NotesCollection::default();
            }
            Err(err) => {
                tracing::warn!("Failed to read notes file {:?}: {}", self.path, err);
                return NotesCollection::default();
            }
        };
        match serde_json::from_str(&contents) {
            Ok(notes) => notes,
            Err(err) => {
                tracing::warn!(
                    "Malformed notes file {:?}, starting empty: {}",
                    self.path,
                    err
                );
                NotesCollection::default()
            }
        }
    }

    fn write_sync(&self, notes: &NotesCollection) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(notes)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

impl LocalStore for LocalNotesStore {
    async fn read(&self) -> Result<NotesCollection, StoreError> {
        Ok(self.read_sync())
    }

    async fn write(&self, notes: &NotesCollection) -> Result<(), StoreError> {
        self.write_sync(notes)
    }
}
