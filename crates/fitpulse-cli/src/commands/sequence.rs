use clap::Subcommand;
use fitpulse_core::Category;
use serde_json::json;

use super::{print_json, with_session, CliResult};

#[derive(Subcommand)]
pub enum SequenceAction {
    /// Append an exercise to the planned sequence
    Add {
        /// Exercise name (e.g. "Running")
        name: String,
        /// Duration in seconds (1-3600)
        #[arg(long, short, default_value = "60")]
        seconds: u32,
        /// Cardio, Strength, Flexibility or Other
        #[arg(long, short, default_value = "Cardio")]
        category: Category,
    },
    /// Remove the exercise at a zero-based index
    Remove { index: usize },
    /// Print the planned sequence as JSON
    List,
    /// Remove every planned exercise
    Clear,
    /// Show quick-pick exercise names
    Catalog {
        #[arg(long, short)]
        category: Option<Category>,
    },
}

pub fn run(action: SequenceAction) -> CliResult {
    match action {
        SequenceAction::Add {
            name,
            seconds,
            category,
        } => with_session(|_, _, session| {
            let spec = session.add_exercise(&name, seconds, category)?;
            print_json(&json!({
                "added": spec,
                "index": session.builder().len() - 1,
            }))
        }),
        SequenceAction::Remove { index } => with_session(|_, _, session| {
            let spec = session.remove_exercise(index)?;
            print_json(&json!({ "removed": spec }))
        }),
        SequenceAction::List => with_session(|_, _, session| {
            let sequence = session.builder().sequence();
            let items: Vec<_> = sequence
                .exercises()
                .iter()
                .enumerate()
                .map(|(index, e)| {
                    json!({
                        "index": index,
                        "name": e.name(),
                        "duration_seconds": e.duration_seconds(),
                        "category": e.category(),
                    })
                })
                .collect();
            print_json(&json!({
                "exercises": items,
                "total_seconds": sequence.total_duration_seconds(),
            }))
        }),
        SequenceAction::Clear => with_session(|_, _, session| {
            session.clear_sequence();
            print_json(&json!({ "cleared": true }))
        }),
        SequenceAction::Catalog { category } => catalog(category),
    }
}

fn catalog(category: Option<Category>) -> CliResult {
    let categories: Vec<Category> = match category {
        Some(c) => vec![c],
        None => Category::ALL.to_vec(),
    };
    let map: serde_json::Map<String, serde_json::Value> = categories
        .into_iter()
        .map(|c| (c.to_string(), json!(c.common_exercises())))
        .collect();
    print_json(&map)
}
