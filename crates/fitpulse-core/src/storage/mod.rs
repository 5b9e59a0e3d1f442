mod config;
pub mod database;
pub mod migrations;

pub use config::{Config, LogConfig, ProfileConfig, TimerConfig};
pub use database::{Database, ExerciseTotal, Stats, REQUIRED_COLUMNS};

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DatabaseError;
use crate::sequence::Category;
use crate::session::CompletedSession;

/// One stored exercise row of a completed workout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutRow {
    pub session_id: i64,
    pub exercise: String,
    pub time_seconds: u32,
    pub date: String,
    pub time: String,
    /// Free text; rows written by older versions may hold unknown names.
    pub category: String,
    pub calories: f64,
    pub note: String,
    pub weight_kg: f64,
}

impl WorkoutRow {
    pub fn category(&self) -> Option<Category> {
        self.category.parse().ok()
    }
}

/// Confirmation handed out by [`WorkoutStore::arm_clear`] and required by
/// [`WorkoutStore::clear`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearToken(Uuid);

impl ClearToken {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ClearToken {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClearToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ClearToken {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Append-only history of completed workouts.
pub trait WorkoutStore {
    /// Append every exercise of `record` under a fresh session id
    /// (max existing + 1, or 1 for an empty store) and return that id.
    fn save(&self, record: &CompletedSession) -> Result<i64, DatabaseError>;

    /// All stored rows. A store whose layout lacks required columns yields
    /// an empty list rather than an error.
    fn load_all(&self) -> Result<Vec<WorkoutRow>, DatabaseError>;

    /// First step of the destructive clear.
    fn arm_clear(&self) -> Result<ClearToken, DatabaseError>;

    /// Second step: delete all history if `token` matches the armed one.
    /// Returns the number of deleted rows.
    fn clear(&self, token: &ClearToken) -> Result<usize, DatabaseError>;
}

/// Returns the data directory, creating it if needed.
///
/// `FITPULSE_DATA_DIR` overrides the location. Otherwise this is
/// `~/.config/fitpulse[-dev]/`, where FITPULSE_ENV=dev selects the
/// development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = match std::env::var_os("FITPULSE_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("FITPULSE_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("fitpulse-dev")
            } else {
                base_dir.join("fitpulse")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_token_round_trips_through_text() {
        let token = ClearToken::new();
        let parsed: ClearToken = token.to_string().parse().unwrap();
        assert_eq!(parsed, token);
        assert!("not-a-token".parse::<ClearToken>().is_err());
    }

    #[test]
    fn row_category_tolerates_unknown_text() {
        let row = WorkoutRow {
            session_id: 1,
            exercise: "Running".into(),
            time_seconds: 60,
            date: "2024-01-01".into(),
            time: "08:00:00".into(),
            category: "Aerobics".into(),
            calories: 1.0,
            note: String::new(),
            weight_kg: 70.0,
        };
        assert_eq!(row.category(), None);
    }
}
