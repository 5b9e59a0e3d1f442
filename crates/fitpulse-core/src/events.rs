use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::sequence::Category;
use crate::session::CompletedSession;

/// Every timer state change produces an Event.
/// Front-ends render them; the session context reacts to `WorkoutCompleted`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    WorkoutStarted {
        exercises: usize,
        rest_seconds: u32,
        total_seconds: u64,
        at: DateTime<Utc>,
    },
    WorkoutPaused {
        remaining_seconds: u32,
        at: DateTime<Utc>,
    },
    WorkoutResumed {
        remaining_seconds: u32,
        at: DateTime<Utc>,
    },
    ExerciseStarted {
        index: usize,
        exercise: String,
        category: Category,
        duration_seconds: u32,
        at: DateTime<Utc>,
    },
    ExerciseCompleted {
        index: usize,
        exercise: String,
        calories: f64,
        at: DateTime<Utc>,
    },
    RestStarted {
        after_index: usize,
        rest_seconds: u32,
        at: DateTime<Utc>,
    },
    /// Emitted exactly once per run, on the tick that reaches Complete.
    WorkoutCompleted {
        record: CompletedSession,
        at: DateTime<Utc>,
    },
    WorkoutReset {
        full: bool,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn is_completion(&self) -> bool {
        matches!(self, Event::WorkoutCompleted { .. })
    }
}
