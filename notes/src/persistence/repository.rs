//! The merge layer: chooses local vs remote persistence and performs
//! the one-time guest-to-account migration.

use tracing::info;

use super::traits::{LocalStore, RemoteStore};
use super::StoreError;
use crate::model::{Account, NotesCollection};

/// Public persistence surface for UI collaborators.
///
/// Holds both store adapters; the presence of an account decides which
/// one a call touches. Store handles are injected at construction so
/// tests can swap in doubles without process-wide state.
pub struct NotesRepository<L, R> {
    local: L,
    remote: R,
}

impl<L: LocalStore, R: RemoteStore> NotesRepository<L, R> {
    pub fn new(local: L, remote: R) -> Self {
        Self { local, remote }
    }

    /// Load the full notes collection.
    ///
    /// Guest mode reads the local store. With an account, the remote
    /// document wins whenever it has any entries. An empty remote
    /// combined with non-empty guest data means a first login on a
    /// device with prior guest notes: the guest collection is written
    /// to the account document once and returned. The migration never
    /// runs when the remote already holds anything, so stale guest
    /// data cannot clobber cloud data.
    pub async fn load_notes(
        &self,
        account: Option<&Account>,
    ) -> Result<NotesCollection, StoreError> {
        let Some(account) = account else {
            return self.local.read().await;
        };

        let remote = self.remote.read(&account.id).await?;
        if !remote.is_empty() {
            return Ok(remote);
        }

        let local = self.local.read().await?;
        if local.is_empty() {
            return Ok(remote);
        }

        info!(
            account_id = %account.id,
            entries = local.entry_count(),
            "Migrating guest notes to account document"
        );
        self.remote.write(&account.id, &local).await?;
        Ok(local)
    }

    /// Persist the entire collection, replacing whatever was stored.
    ///
    /// Callers must have merged any in-progress edits into `notes`
    /// before calling. Concurrent writers racing on the same account
    /// resolve last-write-wins at document granularity; this layer
    /// adds no locking and no retries.
    pub async fn save_notes(
        &self,
        account: Option<&Account>,
        notes: &NotesCollection,
    ) -> Result<(), StoreError> {
        match account {
            Some(account) => self.remote.write(&account.id, notes).await,
            None => self.local.write(notes).await,
        }
    }
}
