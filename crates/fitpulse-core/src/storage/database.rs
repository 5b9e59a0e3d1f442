//! SQLite-based workout history.
//!
//! Provides persistent storage for:
//! - Completed workouts, one row per exercise
//! - History statistics (totals and per-exercise time)
//! - Key-value store for CLI state and the pending clear confirmation

use std::collections::BTreeMap;
use std::path::Path;

use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{data_dir, migrations, ClearToken, WorkoutRow, WorkoutStore};
use crate::error::{DatabaseError, Result};
use crate::session::{CompletedSession, WorkoutSession};

/// Columns a `workouts` table must have to be read.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    "session_id",
    "exercise",
    "time_seconds",
    "date",
    "time",
    "category",
    "calories",
    "note",
    "weight_kg",
];

const CLEAR_TOKEN_KEY: &str = "pending_clear_token";
const SESSION_KEY: &str = "workout_session";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseTotal {
    pub exercise: String,
    pub total_seconds: u64,
    /// Any session with this exercise was noted as "very intense".
    pub intense: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Stats {
    pub total_workouts: u64,
    pub total_seconds: u64,
    pub total_calories: f64,
    /// Sorted by ascending total time.
    pub by_exercise: Vec<ExerciseTotal>,
}

/// SQLite database for workout history.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `<data dir>/fitpulse.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, DatabaseError> {
        let dir = data_dir().map_err(|e| DatabaseError::DataDir(e.to_string()))?;
        Self::open_at(&dir.join("fitpulse.db"))
    }

    pub fn open_at(path: &Path) -> Result<Self, DatabaseError> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_connection(conn)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self, DatabaseError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    /// Wrap an existing connection, applying pending migrations.
    pub fn from_connection(conn: Connection) -> Result<Self, DatabaseError> {
        migrations::migrate(&conn).map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    fn has_required_columns(&self) -> Result<bool, DatabaseError> {
        let mut stmt = self.conn.prepare("PRAGMA table_info(workouts)")?;
        let columns = stmt
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<Result<Vec<_>, _>>()?;
        let missing: Vec<_> = REQUIRED_COLUMNS
            .iter()
            .filter(|c| !columns.iter().any(|have| have == *c))
            .collect();
        if missing.is_empty() {
            Ok(true)
        } else {
            warn!(?missing, "workouts table is missing columns, ignoring stored history");
            Ok(false)
        }
    }

    pub fn next_session_id(&self) -> Result<i64, DatabaseError> {
        Ok(self.conn.query_row(
            "SELECT COALESCE(MAX(session_id), 0) + 1 FROM workouts",
            [],
            |row| row.get(0),
        )?)
    }

    /// Aggregate the stored history.
    pub fn stats(&self) -> Result<Stats, DatabaseError> {
        Ok(summarize(&self.load_all()?))
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn kv_delete(&self, key: &str) -> Result<(), DatabaseError> {
        self.conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }

    /// The session persisted by [`Database::save_session_state`], if any.
    ///
    /// # Errors
    /// Returns an error if the kv lookup fails or the stored JSON is not a
    /// session.
    pub fn load_session_state(&self) -> Result<Option<WorkoutSession>> {
        match self.kv_get(SESSION_KEY)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    pub fn save_session_state(&self, session: &WorkoutSession) -> Result<()> {
        let json = serde_json::to_string(session)?;
        self.kv_set(SESSION_KEY, &json)?;
        Ok(())
    }

    /// Whether a clear is armed and waiting for confirmation.
    pub fn clear_pending(&self) -> Result<Option<ClearToken>, DatabaseError> {
        Ok(self
            .kv_get(CLEAR_TOKEN_KEY)?
            .and_then(|t| t.parse::<ClearToken>().ok()))
    }
}

impl WorkoutStore for Database {
    fn save(&self, record: &CompletedSession) -> Result<i64, DatabaseError> {
        if record.exercises.is_empty() {
            return Err(DatabaseError::EmptyRecord);
        }
        let tx = self.conn.unchecked_transaction()?;
        let session_id: i64 = tx.query_row(
            "SELECT COALESCE(MAX(session_id), 0) + 1 FROM workouts",
            [],
            |row| row.get(0),
        )?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO workouts
                    (session_id, exercise, time_seconds, date, time, category, calories, note, weight_kg)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;
            for exercise in &record.exercises {
                stmt.execute(params![
                    session_id,
                    exercise.exercise_name,
                    exercise.duration_seconds,
                    record.date,
                    record.time,
                    exercise.category.as_str(),
                    exercise.calories,
                    record.note,
                    record.weight_kg,
                ])?;
            }
        }
        tx.commit()?;
        Ok(session_id)
    }

    fn load_all(&self) -> Result<Vec<WorkoutRow>, DatabaseError> {
        if !self.has_required_columns()? {
            return Ok(Vec::new());
        }
        let mut stmt = self.conn.prepare(
            "SELECT session_id, exercise, time_seconds, date, time, category, calories, note, weight_kg
             FROM workouts
             ORDER BY session_id, rowid",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(WorkoutRow {
                session_id: row.get(0)?,
                exercise: row.get(1)?,
                time_seconds: row.get(2)?,
                date: row.get(3)?,
                time: row.get(4)?,
                category: row.get(5)?,
                calories: row.get(6)?,
                note: row.get(7)?,
                weight_kg: row.get(8)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn arm_clear(&self) -> Result<ClearToken, DatabaseError> {
        let token = ClearToken::new();
        self.kv_set(CLEAR_TOKEN_KEY, &token.to_string())?;
        info!("history clear armed");
        Ok(token)
    }

    fn clear(&self, token: &ClearToken) -> Result<usize, DatabaseError> {
        if self.clear_pending()?.as_ref() != Some(token) {
            return Err(DatabaseError::ClearNotArmed);
        }
        let tx = self.conn.unchecked_transaction()?;
        let deleted = tx.execute("DELETE FROM workouts", [])?;
        tx.execute("DELETE FROM kv WHERE key = ?1", params![CLEAR_TOKEN_KEY])?;
        tx.commit()?;
        warn!(deleted, "workout history cleared");
        Ok(deleted)
    }
}

fn summarize(rows: &[WorkoutRow]) -> Stats {
    let mut sessions: Vec<i64> = rows.iter().map(|r| r.session_id).collect();
    sessions.sort_unstable();
    sessions.dedup();

    let mut per_exercise: BTreeMap<&str, (u64, bool)> = BTreeMap::new();
    for row in rows {
        let entry = per_exercise.entry(row.exercise.as_str()).or_default();
        entry.0 += u64::from(row.time_seconds);
        entry.1 |= row.note.to_lowercase().contains("very intense");
    }
    let mut by_exercise: Vec<ExerciseTotal> = per_exercise
        .into_iter()
        .map(|(exercise, (total_seconds, intense))| ExerciseTotal {
            exercise: exercise.to_string(),
            total_seconds,
            intense,
        })
        .collect();
    // Stable sort keeps names alphabetical within equal totals.
    by_exercise.sort_by_key(|e| e.total_seconds);

    let total_calories: f64 = rows.iter().map(|r| r.calories).sum();
    Stats {
        total_workouts: sessions.len() as u64,
        total_seconds: rows.iter().map(|r| u64::from(r.time_seconds)).sum(),
        total_calories: (total_calories * 10.0).round() / 10.0,
        by_exercise,
    }
}
