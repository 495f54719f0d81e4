//! Matchup notes CLI.
//!
//! Thin collaborator over the notes repository: each subcommand maps to
//! one screen of the companion app (log a game, browse history, check
//! the profile header, manage favorites). Every save is awaited before
//! the process exits, so a reported save has actually persisted.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use notes::{
    config, now_millis, Account, AccountDocStore, Database, LocalNotesStore, MatchupKey,
    NoteDraft, NotesRepository, Outcome,
};
use stats::{
    history, matchup_winrate, profile_summary, recent_matchups, time_ago, HistoryOrder,
};

#[derive(Parser)]
#[command(name = "lanenotes", about = "Matchup notes and win/loss tracker")]
struct Cli {
    /// Account id for cloud-backed persistence. Omit for guest mode,
    /// which keeps everything in the local data directory.
    #[arg(long, global = true)]
    account: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log a finished game for a matchup.
    Log {
        /// Your champion.
        player: String,
        /// The opposing champion.
        opponent: String,
        /// Lane outcome of the game.
        #[arg(long, value_enum)]
        outcome: OutcomeArg,
        /// What worked; repeat the flag for multiple tags.
        #[arg(long)]
        worked: Vec<String>,
        /// What gave you trouble; repeat the flag for multiple tags.
        #[arg(long)]
        struggled: Vec<String>,
        /// Item that helped; repeat the flag for multiple items.
        #[arg(long)]
        item: Vec<String>,
        /// Free-text notes.
        #[arg(long)]
        extra: Option<String>,
    },
    /// List saved matchups with winrates.
    History {
        /// Case-insensitive champion filter.
        #[arg(long)]
        search: Option<String>,
        /// Ordering of the list.
        #[arg(long, value_enum, default_value_t = SortArg::Default)]
        sort: SortArg,
    },
    /// Delete a saved matchup.
    Delete {
        player: String,
        opponent: String,
    },
    /// Show the profile header: level, games, winrate, recent matchups.
    Profile,
    /// List favorite champions, or toggle one.
    Favorites {
        /// Champion to star or unstar.
        #[arg(long)]
        toggle: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutcomeArg {
    Win,
    Loss,
}

impl From<OutcomeArg> for Outcome {
    fn from(arg: OutcomeArg) -> Self {
        match arg {
            OutcomeArg::Win => Outcome::Win,
            OutcomeArg::Loss => Outcome::Loss,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
enum SortArg {
    #[default]
    Default,
    Best,
    Worst,
}

impl From<SortArg> for HistoryOrder {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Default => HistoryOrder::Default,
            SortArg::Best => HistoryOrder::BestWinrate,
            SortArg::Worst => HistoryOrder::WorstWinrate,
        }
    }
}

fn winrate_label(record: &notes::NoteRecord) -> String {
    match matchup_winrate(record) {
        Some(pct) => format!("{pct}%"),
        None => "N/A".to_string(),
    }
}

fn print_matchup_row(key: &str, record: &notes::NoteRecord) {
    let (player, opponent) = key.split_once('_').unwrap_or((key, ""));
    println!(
        "{} vs {} — {} Games | Winrate: {} ({}W / {}L)",
        player,
        opponent,
        record.total_games(),
        winrate_label(record),
        record.wins,
        record.losses
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let data_dir = config::get_data_dir();
    tracing::debug!("Using data directory: {}", data_dir.display());

    let local = LocalNotesStore::new(data_dir.clone());
    let db = Database::open(&data_dir.join("accounts.db"))
        .await
        .context("opening account database")?;
    let repo = NotesRepository::new(local, AccountDocStore::new(db.pool().clone()));

    let account = cli.account.map(Account::new);
    let account = account.as_ref();

    match cli.command {
        Commands::Log {
            player,
            opponent,
            outcome,
            worked,
            struggled,
            item,
            extra,
        } => {
            let key = MatchupKey::new(player, opponent)?;
            let mut notes = repo.load_notes(account).await?;
            notes.log_game(
                &key,
                NoteDraft {
                    outcome: Some(outcome.into()),
                    worked,
                    struggles: struggled,
                    items: item,
                    extra,
                },
                now_millis(),
            );
            repo.save_notes(account, &notes).await?;

            if let Some(record) = notes.get(&key) {
                println!("Logged {} for {}", Outcome::from(outcome), key);
                print_matchup_row(&key.to_string(), record);
            }
        }

        Commands::History { search, sort } => {
            let notes = repo.load_notes(account).await?;
            let rows = history(&notes, search.as_deref(), sort.into());
            if rows.is_empty() {
                println!("No saved matchups yet.");
            }
            for (key, record) in rows {
                print_matchup_row(key, record);
            }
        }

        Commands::Delete { player, opponent } => {
            let key = MatchupKey::new(player, opponent)?;
            let mut notes = repo.load_notes(account).await?;
            match notes.remove(&key) {
                Some(_) => {
                    repo.save_notes(account, &notes).await?;
                    println!("Deleted {key}");
                }
                None => println!("No notes for {key}"),
            }
        }

        Commands::Profile => {
            let notes = repo.load_notes(account).await?;
            let summary = profile_summary(&notes);

            let name = account.map(Account::display_name).unwrap_or("Guest");
            println!("{} — Level {}", name, summary.level);
            println!(
                "{} Games | {}W / {}L | Winrate: {}",
                summary.total_games,
                summary.wins,
                summary.losses,
                summary
                    .winrate
                    .map(|pct| format!("{pct}%"))
                    .unwrap_or_else(|| "N/A".to_string())
            );
            if let Some(champion) = &summary.most_played {
                println!("Most played: {champion}");
            }

            let recent = recent_matchups(&notes, 3);
            if !recent.is_empty() {
                let now = now_millis();
                println!("Recent matchups:");
                for (key, record) in recent {
                    let when = record
                        .last_updated
                        .map(|ts| time_ago(now, ts))
                        .unwrap_or_default();
                    println!("  {key} — {when}");
                }
            }
        }

        Commands::Favorites { toggle } => {
            let mut notes = repo.load_notes(account).await?;
            if let Some(champion) = toggle {
                let starred = notes.toggle_favorite(&champion);
                repo.save_notes(account, &notes).await?;
                println!(
                    "{} {}",
                    if starred { "Starred" } else { "Unstarred" },
                    champion
                );
            } else if notes.favorites().is_empty() {
                println!("No favorites yet.");
            } else {
                for champion in notes.favorites() {
                    println!("{champion}");
                }
            }
        }
    }

    Ok(())
}
