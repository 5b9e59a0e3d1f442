pub mod config;
pub mod history;
pub mod sequence;
pub mod workout;

use fitpulse_core::{Config, Database, WorkoutSession};
use serde::Serialize;

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Restore the session saved by the previous invocation, or start a fresh
/// one. Unless a run is in flight, the configured weight and rest replace
/// whatever the stored session carried.
fn load_session(db: &Database, config: &Config) -> WorkoutSession {
    let mut session = match db.load_session_state() {
        Ok(Some(session)) => session,
        Ok(None) => WorkoutSession::new(),
        Err(e) => {
            tracing::warn!(error = %e, "stored session is unreadable, starting fresh");
            WorkoutSession::new()
        }
    };
    if !session.timer().is_running() {
        apply_config(&mut session, config);
    }
    session
}

fn apply_config(session: &mut WorkoutSession, config: &Config) {
    if let Err(e) = session.set_weight_kg(config.profile.weight_kg) {
        tracing::warn!(error = %e, "ignoring configured weight");
    }
    if let Err(e) = session.set_rest_seconds(config.timer.rest_seconds) {
        tracing::warn!(error = %e, "ignoring configured rest");
    }
}

/// Run `f` against the stored session and persist whatever it changed.
pub fn with_session<F>(f: F) -> CliResult
where
    F: FnOnce(&Database, &Config, &mut WorkoutSession) -> CliResult,
{
    let db = Database::open()?;
    let config = Config::load()?;
    let mut session = load_session(&db, &config);
    let result = f(&db, &config, &mut session);
    db.save_session_state(&session)?;
    result
}

pub fn print_json<T: Serialize>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
