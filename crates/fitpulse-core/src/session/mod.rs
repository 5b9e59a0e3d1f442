//! Per-user workout session context.
//!
//! Owns the planned sequence, the interval timer and the settings the timer
//! is started with. Callers hold one `WorkoutSession` per user and pass it
//! explicitly; there is no process-wide state.

mod record;

pub use record::{CompletedExercise, CompletedSession};

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::error::{ValidationError, WorkoutError};
use crate::events::Event;
use crate::sequence::{Category, ExerciseSpec, SequenceBuilder};
use crate::storage::WorkoutStore;
use crate::timer::{IntervalTimer, TimerSnapshot};

pub const DEFAULT_WEIGHT_KG: f64 = 70.0;
pub const MIN_WEIGHT_KG: f64 = 25.0;
pub const MAX_WEIGHT_KG: f64 = 200.0;
pub const MAX_REST_SECONDS: u32 = 300;

/// Result of handing a completed run to the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SaveOutcome {
    Saved { session_id: i64 },
    /// The run stays Complete; the record was not durably stored.
    Failed { message: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    pub events: Vec<Event>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save: Option<SaveOutcome>,
}

impl TickReport {
    pub fn completed(&self) -> bool {
        self.events.iter().any(Event::is_completion)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutSession {
    builder: SequenceBuilder,
    timer: IntervalTimer,
    weight_kg: f64,
    rest_seconds: u32,
    #[serde(default)]
    note: String,
}

impl Default for WorkoutSession {
    fn default() -> Self {
        Self {
            builder: SequenceBuilder::new(),
            timer: IntervalTimer::new(),
            weight_kg: DEFAULT_WEIGHT_KG,
            rest_seconds: 0,
            note: String::new(),
        }
    }
}

impl WorkoutSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(weight_kg: f64, rest_seconds: u32) -> Result<Self, ValidationError> {
        let mut session = Self::new();
        session.set_weight_kg(weight_kg)?;
        session.set_rest_seconds(rest_seconds)?;
        Ok(session)
    }

    pub fn builder(&self) -> &SequenceBuilder {
        &self.builder
    }

    pub fn timer(&self) -> &IntervalTimer {
        &self.timer
    }

    pub fn weight_kg(&self) -> f64 {
        self.weight_kg
    }

    pub fn rest_seconds(&self) -> u32 {
        self.rest_seconds
    }

    pub fn note(&self) -> &str {
        &self.note
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        self.timer.snapshot()
    }

    // ── Planning ─────────────────────────────────────────────────────

    pub fn add_exercise(
        &mut self,
        name: &str,
        duration_seconds: u32,
        category: Category,
    ) -> Result<ExerciseSpec, WorkoutError> {
        self.builder.add(name, duration_seconds, category)
    }

    /// # Errors
    /// `State` while a run is in flight, `Index` when out of range.
    pub fn remove_exercise(&mut self, index: usize) -> Result<ExerciseSpec, WorkoutError> {
        if self.timer.is_running() {
            return Err(WorkoutError::State(
                "reset the running workout before removing exercises".into(),
            ));
        }
        self.builder.remove(index)
    }

    pub fn clear_sequence(&mut self) {
        self.builder.clear();
    }

    pub fn set_note(&mut self, note: impl Into<String>) {
        self.note = note.into();
    }

    pub fn set_weight_kg(&mut self, weight_kg: f64) -> Result<(), ValidationError> {
        if !(MIN_WEIGHT_KG..=MAX_WEIGHT_KG).contains(&weight_kg) {
            return Err(ValidationError::InvalidValue {
                field: "weight_kg".into(),
                message: format!("{weight_kg} is outside {MIN_WEIGHT_KG}..={MAX_WEIGHT_KG}"),
            });
        }
        self.weight_kg = weight_kg;
        Ok(())
    }

    pub fn set_rest_seconds(&mut self, rest_seconds: u32) -> Result<(), ValidationError> {
        if rest_seconds > MAX_REST_SECONDS {
            return Err(ValidationError::InvalidValue {
                field: "rest_seconds".into(),
                message: format!("{rest_seconds} is above {MAX_REST_SECONDS}"),
            });
        }
        self.rest_seconds = rest_seconds;
        Ok(())
    }

    // ── Running ──────────────────────────────────────────────────────

    pub fn start(&mut self) -> Result<Event, WorkoutError> {
        self.timer.start(
            self.builder.sequence(),
            self.rest_seconds,
            self.weight_kg,
            &self.note,
        )
    }

    pub fn pause(&mut self) -> Result<Event, WorkoutError> {
        self.timer.pause()
    }

    pub fn resume(&mut self) -> Result<Event, WorkoutError> {
        self.timer.resume()
    }

    pub fn toggle_pause(&mut self) -> Result<Event, WorkoutError> {
        self.timer.toggle_pause()
    }

    /// Deliver one tick. A completed run is handed to `store` here, once.
    pub fn tick(&mut self, store: &dyn WorkoutStore) -> TickReport {
        let events = self.timer.tick();
        let save = events.iter().find_map(|event| match event {
            Event::WorkoutCompleted { record, .. } => Some(match store.save(record) {
                Ok(session_id) => {
                    info!(session_id, "workout saved");
                    SaveOutcome::Saved { session_id }
                }
                Err(e) => {
                    error!(error = %e, "failed to save workout");
                    SaveOutcome::Failed {
                        message: e.to_string(),
                    }
                }
            }),
            _ => None,
        });
        TickReport { events, save }
    }

    /// `full` also discards the planned sequence and the note.
    pub fn reset(&mut self, full: bool) -> Event {
        if full {
            self.builder.clear();
            self.note.clear();
        }
        self.timer.reset(full)
    }
}
