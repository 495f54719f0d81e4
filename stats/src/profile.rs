//! Profile-level aggregates: lifetime games, winrate, level, most-played.

use std::collections::BTreeMap;

use notes::{NoteRecord, NotesCollection};
use serde::{Deserialize, Serialize};

/// Lifetime games played: wins plus losses summed over every matchup.
pub fn total_games(notes: &NotesCollection) -> u64 {
    notes
        .iter()
        .map(|(_, record)| u64::from(record.total_games()))
        .sum()
}

/// Aggregate winrate as a rounded percentage, or `None` when no games
/// have been recorded.
pub fn aggregate_winrate(notes: &NotesCollection) -> Option<u8> {
    let (wins, total) = notes.iter().fold((0u64, 0u64), |(wins, total), (_, r)| {
        (wins + u64::from(r.wins), total + u64::from(r.total_games()))
    });
    winrate_percent(wins, total)
}

/// Winrate for a single matchup card.
pub fn matchup_winrate(record: &NoteRecord) -> Option<u8> {
    winrate_percent(u64::from(record.wins), u64::from(record.total_games()))
}

fn winrate_percent(wins: u64, total: u64) -> Option<u8> {
    if total == 0 {
        return None;
    }
    Some((100.0 * wins as f64 / total as f64).round() as u8)
}

/// Progression level for a lifetime game count: one level per game up
/// to 10, then one level every 3 games.
///
/// The breakpoint at 10 and the stride of 3 are user-facing progression
/// rules and must not drift.
pub fn level(total_games: u64) -> u64 {
    if total_games <= 10 {
        total_games
    } else {
        10 + (total_games - 10) / 3
    }
}

/// Champion with the most saved matchups on the player side of the key.
///
/// Ties resolve to the lexicographically smallest champion id, which is
/// stable across calls because the collection iterates its keys in
/// sorted order.
pub fn most_played(notes: &NotesCollection) -> Option<&str> {
    let mut counts: BTreeMap<&str, u32> = BTreeMap::new();
    for (key, _) in notes.iter() {
        let player = key.split_once('_').map_or(key, |(player, _)| player);
        *counts.entry(player).or_insert(0) += 1;
    }

    let mut best: Option<(&str, u32)> = None;
    for (champion, count) in counts {
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((champion, count));
        }
    }
    best.map(|(champion, _)| champion)
}

/// The profile header numbers in one bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub level: u64,
    pub total_games: u64,
    pub wins: u64,
    pub losses: u64,
    /// Rounded percentage; absent when no games are recorded.
    pub winrate: Option<u8>,
    /// Player-side champion with the most saved matchups.
    pub most_played: Option<String>,
}

/// Compute the full profile header for a collection.
pub fn profile_summary(notes: &NotesCollection) -> ProfileSummary {
    let (wins, losses) = notes.iter().fold((0u64, 0u64), |(wins, losses), (_, r)| {
        (wins + u64::from(r.wins), losses + u64::from(r.losses))
    });
    let total = wins + losses;
    ProfileSummary {
        level: level(total),
        total_games: total,
        wins,
        losses,
        winrate: winrate_percent(wins, total),
        most_played: most_played(notes).map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notes::{MatchupKey, NotesCollection};

    fn collection(entries: &[(&str, &str, u32, u32)]) -> NotesCollection {
        let mut notes = NotesCollection::default();
        for &(player, opponent, wins, losses) in entries {
            notes.set_counts(
                &MatchupKey::new(player, opponent).unwrap(),
                wins,
                losses,
                1_000,
            );
        }
        notes
    }

    #[test]
    fn test_total_games_excludes_favorites() {
        let mut notes = collection(&[("Ahri", "Zed", 3, 1), ("Jax", "Garen", 0, 2)]);
        notes.set_favorites(vec!["Ahri".to_string()]);
        assert_eq!(total_games(&notes), 6);
    }

    #[test]
    fn test_level_boundaries() {
        assert_eq!(level(0), 0);
        assert_eq!(level(10), 10);
        assert_eq!(level(11), 10);
        assert_eq!(level(13), 11);
        assert_eq!(level(100), 40);
    }

    #[test]
    fn test_level_is_monotonic() {
        let mut prev = level(0);
        for games in 1..200 {
            let next = level(games);
            assert!(next >= prev, "level regressed at {games} games");
            prev = next;
        }
    }

    #[test]
    fn test_winrate_rounds() {
        let notes = collection(&[("Ahri", "Zed", 2, 1)]);
        // 2/3 = 66.67% rounds to 67
        assert_eq!(aggregate_winrate(&notes), Some(67));
    }

    #[test]
    fn test_winrate_unavailable_with_zero_games() {
        let notes = collection(&[("Ahri", "Zed", 0, 0)]);
        assert_eq!(aggregate_winrate(&notes), None);
        assert_eq!(aggregate_winrate(&NotesCollection::default()), None);
    }

    #[test]
    fn test_matchup_winrate() {
        let notes = collection(&[("Ahri", "Zed", 3, 1)]);
        let record = notes.get(&MatchupKey::new("Ahri", "Zed").unwrap()).unwrap();
        assert_eq!(matchup_winrate(record), Some(75));
        assert_eq!(matchup_winrate(&Default::default()), None);
    }

    #[test]
    fn test_most_played_counts_entries_per_player_side() {
        let notes = collection(&[
            ("Ahri", "Zed", 0, 0),
            ("Ahri", "Yasuo", 0, 0),
            ("Jax", "Garen", 5, 5),
        ]);
        assert_eq!(most_played(&notes), Some("Ahri"));
    }

    #[test]
    fn test_most_played_tie_break_is_deterministic() {
        let notes = collection(&[
            ("Zed", "Ahri", 0, 0),
            ("Ahri", "Zed", 0, 0),
            ("Jax", "Garen", 0, 0),
        ]);
        // Three-way tie: lexicographically smallest champion wins,
        // repeatedly.
        for _ in 0..5 {
            assert_eq!(most_played(&notes), Some("Ahri"));
        }
    }

    #[test]
    fn test_most_played_empty() {
        assert_eq!(most_played(&NotesCollection::default()), None);
    }

    #[test]
    fn test_profile_summary() {
        let notes = collection(&[("Ahri", "Zed", 8, 4), ("Ahri", "Yasuo", 1, 1)]);
        let summary = profile_summary(&notes);
        assert_eq!(summary.total_games, 14);
        assert_eq!(summary.wins, 9);
        assert_eq!(summary.losses, 5);
        assert_eq!(summary.level, 11);
        assert_eq!(summary.winrate, Some(64));
        assert_eq!(summary.most_played.as_deref(), Some("Ahri"));
    }
}
