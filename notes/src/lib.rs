//! Matchup notes core: the data model and the persistence layer.
//!
//! UI collaborators obtain the full notes collection through
//! [`NotesRepository`], mutate it with the collection's merge helpers,
//! and persist it back as a whole. Derived statistics over the
//! collection live in the sibling `stats` crate.

pub mod config;
mod model;
pub mod persistence;

pub use model::{
    Account, InvalidMatchupKey, MatchupKey, NoteDraft, NoteRecord, NotesCollection, Outcome,
};
pub use persistence::traits::{LocalStore, RemoteStore};
pub use persistence::{
    now_millis, AccountDocStore, Database, LocalNotesStore, NotesRepository, StoreError,
};
