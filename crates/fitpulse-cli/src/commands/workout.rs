use std::sync::Arc;
use std::time::Duration;

use clap::Subcommand;
use fitpulse_core::{run_ticks, Config, Database, Phase, WorkoutSession};
use serde_json::json;
use tokio::sync::Mutex;

use super::{print_json, with_session, CliResult};

#[derive(Subcommand)]
pub enum WorkoutAction {
    /// Start the planned sequence
    Start {
        /// Rest between exercises in seconds (0 disables rest)
        #[arg(long)]
        rest: Option<u32>,
        /// Body weight in kg for calorie estimates
        #[arg(long)]
        weight: Option<f64>,
        /// Session note, saved with the workout
        #[arg(long)]
        note: Option<String>,
    },
    /// Pause the running workout
    Pause,
    /// Resume a paused workout
    Resume,
    /// Pause if running, resume if paused
    Toggle,
    /// Deliver timer ticks (one per elapsed second)
    Tick {
        #[arg(long, short, default_value = "1")]
        count: u64,
    },
    /// Print the current timer snapshot as JSON
    Status,
    /// Clear run state
    Reset {
        /// Also discard the planned sequence and note
        #[arg(long)]
        full: bool,
    },
    /// Set the session note. A run in progress keeps the note it was
    /// started with; the new note applies from the next start.
    Note { text: String },
    /// Run the workout live until it completes or the tick limit is hit.
    /// Starts an idle workout and resumes a paused one.
    Run,
}

pub fn run(action: WorkoutAction) -> CliResult {
    match action {
        WorkoutAction::Start { rest, weight, note } => with_session(|_, _, session| {
            if let Some(rest) = rest {
                session.set_rest_seconds(rest)?;
            }
            if let Some(weight) = weight {
                session.set_weight_kg(weight)?;
            }
            if let Some(note) = note {
                session.set_note(note);
            }
            print_json(&session.start()?)
        }),
        WorkoutAction::Pause => with_session(|_, _, session| print_json(&session.pause()?)),
        WorkoutAction::Resume => with_session(|_, _, session| print_json(&session.resume()?)),
        WorkoutAction::Toggle => {
            with_session(|_, _, session| print_json(&session.toggle_pause()?))
        }
        WorkoutAction::Tick { count } => with_session(|db, _, session| {
            let mut events = Vec::new();
            let mut save = None;
            for _ in 0..count {
                let report = session.tick(db);
                events.extend(report.events);
                save = save.or(report.save);
            }
            print_json(&json!({
                "events": events,
                "save": save,
                "snapshot": session.snapshot(),
            }))
        }),
        WorkoutAction::Status => with_session(|_, _, session| print_json(&session.snapshot())),
        WorkoutAction::Reset { full } => with_session(|_, _, session| {
            print_json(&session.reset(full))
        }),
        WorkoutAction::Note { text } => with_session(|_, _, session| {
            session.set_note(text);
            if session.timer().is_running() {
                let running_note = &session.timer().state().session_note;
                tracing::warn!("note saved for the next run; the current run keeps its note");
                return print_json(&json!({
                    "note": session.note(),
                    "current_run_note": running_note,
                }));
            }
            print_json(&json!({ "note": session.note() }))
        }),
        WorkoutAction::Run => with_session(run_live),
    }
}

fn run_live(db: &Database, config: &Config, session: &mut WorkoutSession) -> CliResult {
    if session.timer().phase() == Phase::Idle {
        print_json(&session.start()?)?;
    } else if session.timer().is_paused() {
        print_json(&session.resume()?)?;
    }

    let period = Duration::from_millis(config.timer.tick_interval_ms);
    let limit = config.timer.tick_limit;
    let shared = Arc::new(Mutex::new(session.clone()));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    let (outcome, finished) = runtime.block_on(async {
        let outcome = run_ticks(shared.clone(), db, period, limit, |report, snapshot| {
            for event in &report.events {
                if let Ok(line) = serde_json::to_string(event) {
                    println!("{line}");
                }
            }
            tracing::debug!(
                phase = ?snapshot.phase,
                remaining = snapshot.remaining_seconds,
                "tick"
            );
        })
        .await;
        let finished = shared.lock().await.clone();
        (outcome, finished)
    });

    *session = finished;
    print_json(&json!({
        "outcome": outcome,
        "snapshot": session.snapshot(),
    }))
}
