use clap::Subcommand;
use fitpulse_core::{ClearToken, Database, WorkoutStore};
use serde_json::json;

use super::{print_json, CliResult};

#[derive(Subcommand)]
pub enum HistoryAction {
    /// List stored workout rows
    List {
        /// Only rows from this session id
        #[arg(long)]
        session: Option<i64>,
    },
    /// Totals and per-exercise breakdown
    Stats,
    /// Delete all history (run once to get a token, again with --confirm)
    Clear {
        #[arg(long)]
        confirm: Option<String>,
    },
}

pub fn run(action: HistoryAction) -> CliResult {
    let db = Database::open()?;
    match action {
        HistoryAction::List { session } => {
            let rows: Vec<_> = db
                .load_all()?
                .into_iter()
                .filter(|row| session.map_or(true, |id| row.session_id == id))
                .collect();
            print_json(&rows)
        }
        HistoryAction::Stats => print_json(&db.stats()?),
        HistoryAction::Clear { confirm: None } => {
            let token = db.arm_clear()?;
            eprintln!("this deletes all workout history; confirm with:");
            eprintln!("  fitpulse-cli history clear --confirm {token}");
            print_json(&json!({ "token": token.to_string() }))
        }
        HistoryAction::Clear {
            confirm: Some(token),
        } => {
            let token: ClearToken = token.parse()?;
            let deleted = db.clear(&token)?;
            print_json(&json!({ "deleted": deleted }))
        }
    }
}
