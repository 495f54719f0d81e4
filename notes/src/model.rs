//! Data model for matchup notes.
//!
//! The stored shape is a single flat JSON object: the reserved
//! `"favorites"` key maps to a list of champion ids, every other key is
//! a `"<player>_<opponent>"` matchup key mapping to a note record.
//! [`NotesCollection`] keeps that shape on the wire while exposing typed
//! entries internally, and carries the merge helpers callers use to fold
//! edits into the full mapping before saving it.

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Reserved collection key holding the starred champion list.
const FAVORITES_KEY: &str = "favorites";

/// Error returned for a matchup key that cannot be parsed or built.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid matchup key: {0:?}")]
pub struct InvalidMatchupKey(pub String);

/// An ordered (player champion, opponent champion) pair.
///
/// The storage form is the composite key `"<player>_<opponent>"`; the
/// player side must not contain the separator so the key splits back
/// unambiguously.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct MatchupKey {
    player: String,
    opponent: String,
}

impl MatchupKey {
    pub fn new(
        player: impl Into<String>,
        opponent: impl Into<String>,
    ) -> Result<Self, InvalidMatchupKey> {
        let player = player.into();
        let opponent = opponent.into();
        if player.is_empty() || opponent.is_empty() || player.contains('_') {
            return Err(InvalidMatchupKey(format!("{player}_{opponent}")));
        }
        Ok(Self { player, opponent })
    }

    /// Parse a storage key, splitting on the first separator.
    pub fn parse(key: &str) -> Result<Self, InvalidMatchupKey> {
        let (player, opponent) = key
            .split_once('_')
            .ok_or_else(|| InvalidMatchupKey(key.to_string()))?;
        Self::new(player, opponent)
    }

    pub fn player(&self) -> &str {
        &self.player
    }

    pub fn opponent(&self) -> &str {
        &self.opponent
    }
}

impl fmt::Display for MatchupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.player, self.opponent)
    }
}

/// Lane outcome recorded when a game is logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Loss,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Win => write!(f, "Win"),
            Outcome::Loss => write!(f, "Loss"),
        }
    }
}

/// Stored outcome and tag data for one matchup.
///
/// Every field is defaulted on deserialize so partial or legacy records
/// coerce to a well-formed shape instead of failing the collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteRecord {
    /// Games won in this matchup.
    #[serde(default)]
    pub wins: u32,
    /// Games lost in this matchup.
    #[serde(default)]
    pub losses: u32,
    /// Lane outcome of the most recently logged game.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
    /// Tags for what succeeded, in selection order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub worked: Vec<String>,
    /// Tags for what went wrong, in selection order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub struggles: Vec<String>,
    /// Item identifiers that helped, in selection order. Duplicates are
    /// not prevented at this layer.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<String>,
    /// Free-text notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<String>,
    /// Epoch milliseconds of the last mutating save of this record.
    /// Monotonically non-decreasing across saves of the same key.
    #[serde(
        default,
        rename = "lastUpdated",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_updated: Option<u64>,
}

impl NoteRecord {
    /// Games played in this matchup.
    pub fn total_games(&self) -> u32 {
        self.wins + self.losses
    }
}

/// Fields captured by the notes form for a single game.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
    pub outcome: Option<Outcome>,
    pub worked: Vec<String>,
    pub struggles: Vec<String>,
    pub items: Vec<String>,
    pub extra: Option<String>,
}

/// The full notes mapping for one player: matchup entries plus the
/// reserved favorites list.
///
/// Persisted and loaded as a whole; the mutation helpers fold one edit
/// into the mapping so a subsequent save replaces the stored collection
/// without losing unrelated entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotesCollection {
    favorites: Vec<String>,
    entries: BTreeMap<String, NoteRecord>,
}

impl NotesCollection {
    /// True when there are no matchup entries and no favorites.
    ///
    /// The favorites list counts: a collection holding only starred
    /// champions is guest data worth migrating on first login.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.favorites.is_empty()
    }

    /// Number of matchup entries, excluding the favorites list.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, key: &MatchupKey) -> Option<&NoteRecord> {
        self.entries.get(key.to_string().as_str())
    }

    /// Matchup entries in sorted key order. Favorites are not included.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &NoteRecord)> {
        self.entries.iter().map(|(key, record)| (key.as_str(), record))
    }

    /// Replace one entry wholesale.
    pub fn insert(&mut self, key: &MatchupKey, record: NoteRecord) {
        self.entries.insert(key.to_string(), record);
    }

    /// Remove an entry; the deletion takes effect when the collection is
    /// next saved as a whole.
    pub fn remove(&mut self, key: &MatchupKey) -> Option<NoteRecord> {
        self.entries.remove(key.to_string().as_str())
    }

    /// Fold a newly played game into the mapping: the counter the
    /// outcome selects is incremented and the form fields replace the
    /// stored ones.
    pub fn log_game(&mut self, key: &MatchupKey, draft: NoteDraft, now_ms: u64) {
        let entry = self.entries.entry(key.to_string()).or_default();
        match draft.outcome {
            Some(Outcome::Win) => entry.wins += 1,
            Some(Outcome::Loss) => entry.losses += 1,
            None => {}
        }
        apply_draft(entry, draft);
        touch(entry, now_ms);
    }

    /// Replace the form fields of an entry without counting a game.
    pub fn edit_note(&mut self, key: &MatchupKey, draft: NoteDraft, now_ms: u64) {
        let entry = self.entries.entry(key.to_string()).or_default();
        apply_draft(entry, draft);
        touch(entry, now_ms);
    }

    /// Manual win/loss override from the matchup details screen.
    /// Counters are unsigned; UI decrements saturate before they land
    /// here.
    pub fn set_counts(&mut self, key: &MatchupKey, wins: u32, losses: u32, now_ms: u64) {
        let entry = self.entries.entry(key.to_string()).or_default();
        entry.wins = wins;
        entry.losses = losses;
        touch(entry, now_ms);
    }

    /// Starred champion ids, in starring order.
    pub fn favorites(&self) -> &[String] {
        &self.favorites
    }

    pub fn set_favorites(&mut self, favorites: Vec<String>) {
        self.favorites = favorites;
    }

    /// Star or unstar a champion. Returns whether it is now starred.
    pub fn toggle_favorite(&mut self, champion: &str) -> bool {
        if let Some(idx) = self.favorites.iter().position(|c| c == champion) {
            self.favorites.remove(idx);
            false
        } else {
            self.favorites.push(champion.to_string());
            true
        }
    }

    /// Build a collection from the raw wire mapping, skipping entries
    /// that fail to parse.
    fn from_wire(raw: BTreeMap<String, serde_json::Value>) -> Self {
        let mut collection = Self::default();
        for (key, value) in raw {
            if key == FAVORITES_KEY {
                match serde_json::from_value::<Vec<String>>(value) {
                    Ok(favorites) => collection.favorites = favorites,
                    Err(err) => {
                        tracing::warn!("Discarding malformed favorites list: {}", err);
                    }
                }
                continue;
            }
            match serde_json::from_value::<NoteRecord>(value) {
                Ok(record) => {
                    collection.entries.insert(key, record);
                }
                Err(err) => {
                    tracing::warn!("Skipping malformed note record {:?}: {}", key, err);
                }
            }
        }
        collection
    }
}

fn apply_draft(entry: &mut NoteRecord, draft: NoteDraft) {
    entry.outcome = draft.outcome;
    entry.worked = draft.worked;
    entry.struggles = draft.struggles;
    entry.items = draft.items;
    entry.extra = draft.extra;
}

/// Stamp `last_updated`, never moving it backwards.
fn touch(entry: &mut NoteRecord, now_ms: u64) {
    let prev = entry.last_updated.unwrap_or(0);
    entry.last_updated = Some(prev.max(now_ms));
}

impl Serialize for NotesCollection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let extra = usize::from(!self.favorites.is_empty());
        let mut map = serializer.serialize_map(Some(self.entries.len() + extra))?;
        if !self.favorites.is_empty() {
            map.serialize_entry(FAVORITES_KEY, &self.favorites)?;
        }
        for (key, record) in &self.entries {
            map.serialize_entry(key, record)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for NotesCollection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;
        Ok(Self::from_wire(raw))
    }
}

/// Authenticated identity produced by an external auth collaborator.
///
/// Presence of an account switches persistence to the remote store;
/// absence means guest (local-only) mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Stable account identifier.
    pub id: String,
    /// Display email, when known.
    pub email: Option<String>,
}

impl Account {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: None,
        }
    }

    /// Short display name: the local part of the email, falling back to
    /// the account id.
    pub fn display_name(&self) -> &str {
        match &self.email {
            Some(email) => email.split('@').next().unwrap_or(email),
            None => &self.id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(player: &str, opponent: &str) -> MatchupKey {
        MatchupKey::new(player, opponent).unwrap()
    }

    fn win_draft() -> NoteDraft {
        NoteDraft {
            outcome: Some(Outcome::Win),
            worked: vec!["Won early trades".to_string()],
            struggles: vec![],
            items: vec!["3075".to_string()],
            extra: None,
        }
    }

    #[test]
    fn test_matchup_key_roundtrip() {
        let key = key("Ahri", "Zed");
        assert_eq!(key.to_string(), "Ahri_Zed");
        let parsed = MatchupKey::parse("Ahri_Zed").unwrap();
        assert_eq!(parsed, key);
        assert_eq!(parsed.player(), "Ahri");
        assert_eq!(parsed.opponent(), "Zed");
    }

    #[test]
    fn test_matchup_key_rejects_invalid() {
        assert!(MatchupKey::parse("NoSeparator").is_err());
        assert!(MatchupKey::parse("_Zed").is_err());
        assert!(MatchupKey::new("", "Zed").is_err());
        assert!(MatchupKey::new("Ahri", "").is_err());
        assert!(MatchupKey::new("Ah_ri", "Zed").is_err());
    }

    #[test]
    fn test_log_game_counts_outcome() {
        let mut notes = NotesCollection::default();
        let key = key("Ahri", "Zed");
        notes.log_game(&key, win_draft(), 1_000);
        notes.log_game(
            &key,
            NoteDraft {
                outcome: Some(Outcome::Loss),
                ..NoteDraft::default()
            },
            2_000,
        );

        let record = notes.get(&key).unwrap();
        assert_eq!(record.wins, 1);
        assert_eq!(record.losses, 1);
        assert_eq!(record.outcome, Some(Outcome::Loss));
        assert_eq!(record.last_updated, Some(2_000));
    }

    #[test]
    fn test_edit_does_not_count_a_game() {
        let mut notes = NotesCollection::default();
        let key = key("Ahri", "Zed");
        notes.log_game(&key, win_draft(), 1_000);
        notes.edit_note(
            &key,
            NoteDraft {
                outcome: Some(Outcome::Win),
                extra: Some("respect level 6".to_string()),
                ..NoteDraft::default()
            },
            2_000,
        );

        let record = notes.get(&key).unwrap();
        assert_eq!(record.wins, 1);
        assert_eq!(record.losses, 0);
        assert_eq!(record.extra.as_deref(), Some("respect level 6"));
    }

    #[test]
    fn test_last_updated_never_moves_backwards() {
        let mut notes = NotesCollection::default();
        let key = key("Ahri", "Zed");
        notes.log_game(&key, win_draft(), 5_000);
        // A clock that jumped backwards must not rewind the stamp.
        notes.edit_note(&key, NoteDraft::default(), 3_000);
        assert_eq!(notes.get(&key).unwrap().last_updated, Some(5_000));
    }

    #[test]
    fn test_toggle_favorite_preserves_entries() {
        let mut notes = NotesCollection::default();
        notes.log_game(&key("Ahri", "Zed"), win_draft(), 1_000);

        assert!(notes.toggle_favorite("Ahri"));
        assert!(notes.toggle_favorite("Jax"));
        assert!(!notes.toggle_favorite("Ahri"));

        assert_eq!(notes.favorites(), ["Jax".to_string()]);
        assert_eq!(notes.entry_count(), 1);
    }

    #[test]
    fn test_wire_roundtrip() {
        let mut notes = NotesCollection::default();
        notes.log_game(&key("Ahri", "Zed"), win_draft(), 1_000);
        notes.set_favorites(vec!["Ahri".to_string(), "Jax".to_string()]);

        let json = serde_json::to_string(&notes).unwrap();
        let back: NotesCollection = serde_json::from_str(&json).unwrap();
        assert_eq!(back, notes);
    }

    #[test]
    fn test_wire_shape_is_flat() {
        let mut notes = NotesCollection::default();
        notes.set_counts(&key("Ahri", "Zed"), 3, 1, 1_000);
        notes.set_favorites(vec!["Ahri".to_string()]);

        let value: serde_json::Value = serde_json::to_value(&notes).unwrap();
        assert_eq!(value["favorites"], serde_json::json!(["Ahri"]));
        assert_eq!(value["Ahri_Zed"]["wins"], 3);
        assert_eq!(value["Ahri_Zed"]["lastUpdated"], 1_000);
    }

    #[test]
    fn test_malformed_entry_is_skipped() {
        let json = r#"{
            "Ahri_Zed": {"wins": 2, "losses": 1},
            "Jax_Garen": "not a record",
            "favorites": ["Ahri"]
        }"#;
        let notes: NotesCollection = serde_json::from_str(json).unwrap();
        assert_eq!(notes.entry_count(), 1);
        assert_eq!(notes.favorites(), ["Ahri".to_string()]);
    }

    #[test]
    fn test_malformed_favorites_discarded() {
        let json = r#"{"favorites": 42, "Ahri_Zed": {"wins": 1, "losses": 0}}"#;
        let notes: NotesCollection = serde_json::from_str(json).unwrap();
        assert!(notes.favorites().is_empty());
        assert_eq!(notes.entry_count(), 1);
    }

    #[test]
    fn test_partial_record_coerces_to_defaults() {
        let json = r#"{"Ahri_Zed": {}}"#;
        let notes: NotesCollection = serde_json::from_str(json).unwrap();
        let record = notes.get(&key("Ahri", "Zed")).unwrap();
        assert_eq!(record.wins, 0);
        assert_eq!(record.losses, 0);
        assert_eq!(record.last_updated, None);
    }

    #[test]
    fn test_is_empty_counts_favorites() {
        let mut notes = NotesCollection::default();
        assert!(notes.is_empty());
        notes.set_favorites(vec!["Ahri".to_string()]);
        assert!(!notes.is_empty());
    }

    #[test]
    fn test_account_display_name() {
        let mut account = Account::new("uid-1");
        assert_eq!(account.display_name(), "uid-1");
        account.email = Some("toplaner@example.com".to_string());
        assert_eq!(account.display_name(), "toplaner");
    }
}
