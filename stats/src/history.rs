//! History and recency views over saved matchups.

use notes::{NoteRecord, NotesCollection};

/// Ordering for the matchup history list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HistoryOrder {
    /// Collection iteration order (sorted by key).
    #[default]
    Default,
    /// Highest winrate first.
    BestWinrate,
    /// Lowest winrate first.
    WorstWinrate,
}

/// The history page view: case-insensitive substring filter on the
/// matchup key, then the requested winrate ordering.
pub fn history<'a>(
    notes: &'a NotesCollection,
    search: Option<&str>,
    order: HistoryOrder,
) -> Vec<(&'a str, &'a NoteRecord)> {
    let needle = search.map(str::to_lowercase);
    let mut rows: Vec<(&str, &NoteRecord)> = notes
        .iter()
        .filter(|(key, _)| match &needle {
            Some(needle) => key.to_lowercase().contains(needle),
            None => true,
        })
        .collect();

    match order {
        HistoryOrder::Default => {}
        HistoryOrder::BestWinrate => {
            rows.sort_by(|a, b| winrate_fraction(b.1).total_cmp(&winrate_fraction(a.1)));
        }
        HistoryOrder::WorstWinrate => {
            rows.sort_by(|a, b| winrate_fraction(a.1).total_cmp(&winrate_fraction(b.1)));
        }
    }
    rows
}

/// Winrate as a fraction for ordering; unplayed matchups sort as zero.
fn winrate_fraction(record: &NoteRecord) -> f64 {
    let total = record.total_games();
    if total == 0 {
        0.0
    } else {
        f64::from(record.wins) / f64::from(total)
    }
}

/// The `n` most recently updated matchups, newest first. Entries that
/// were never stamped are excluded.
pub fn recent_matchups<'a>(
    notes: &'a NotesCollection,
    n: usize,
) -> Vec<(&'a str, &'a NoteRecord)> {
    let mut rows: Vec<(&str, &NoteRecord)> = notes
        .iter()
        .filter(|(_, record)| record.last_updated.is_some())
        .collect();
    rows.sort_by(|a, b| b.1.last_updated.cmp(&a.1.last_updated));
    rows.truncate(n);
    rows
}

/// Relative-time label for a last-updated timestamp, both in epoch
/// milliseconds.
pub fn time_ago(now_ms: u64, then_ms: u64) -> String {
    let diff_ms = now_ms.saturating_sub(then_ms);
    let minutes = diff_ms / 60_000;
    let hours = diff_ms / 3_600_000;
    let days = diff_ms / 86_400_000;

    if minutes < 1 {
        "Just now".to_string()
    } else if minutes < 60 {
        format!("{} min{} ago", minutes, if minutes > 1 { "s" } else { "" })
    } else if hours < 24 {
        format!("{} hour{} ago", hours, if hours > 1 { "s" } else { "" })
    } else {
        format!("{} day{} ago", days, if days > 1 { "s" } else { "" })
    }
}
