//! Interval timer implementation.
//!
//! A tick-driven state machine with no internal threads. The caller delivers
//! one `tick()` per elapsed second (see [`crate::driver`]).
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Exercising -> (Resting -> Exercising)* -> Complete -> (reset) Idle
//! ```
//!
//! Every tick performs at most one phase transition. The countdown is
//! decremented first; when it reaches zero the transition happens on the same
//! tick, so a run takes exactly `sum(durations) + rest * (exercises - 1)`
//! ticks.
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = IntervalTimer::new();
//! timer.start(builder.sequence(), 10, 70.0, "")?;
//! // Once per second:
//! for event in timer.tick() { /* render, persist on WorkoutCompleted */ }
//! ```

use chrono::{Local, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::calories::estimate_calories;
use crate::error::WorkoutError;
use crate::events::Event;
use crate::sequence::{Category, ExerciseSpec, Sequence};
use crate::session::{CompletedExercise, CompletedSession, DEFAULT_WEIGHT_KG};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Exercising,
    Resting,
    /// Terminal until `reset`.
    Complete,
}

impl Phase {
    pub fn is_running(self) -> bool {
        matches!(self, Phase::Exercising | Phase::Resting)
    }
}

/// Mutable run state.
///
/// `current_index` equals the sequence length only once the run is Complete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerState {
    pub phase: Phase,
    pub current_index: usize,
    pub remaining_seconds: u32,
    pub paused: bool,
    pub rest_seconds_config: u32,
    pub session_note: String,
    pub weight_kg: f64,
}

impl Default for TimerState {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            current_index: 0,
            remaining_seconds: 0,
            paused: false,
            rest_seconds_config: 0,
            session_note: String::new(),
            weight_kg: DEFAULT_WEIGHT_KG,
        }
    }
}

/// Read-only projection of the timer for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub phase: Phase,
    pub current_index: usize,
    pub total_exercises: usize,
    /// Exercise being performed, or the one just finished while resting.
    pub exercise: Option<String>,
    pub category: Option<Category>,
    /// Exercise that follows the current phase.
    pub up_next: Option<String>,
    pub remaining_seconds: u32,
    pub phase_total_seconds: u32,
    /// 0.0 .. 1.0 progress within the current phase.
    pub progress: f64,
    pub paused: bool,
    /// Full-duration estimate for the current exercise.
    pub estimated_calories: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntervalTimer {
    state: TimerState,
    /// Copy taken at `start`; later edits to the builder don't reach it.
    sequence: Sequence,
    #[serde(default)]
    completed: Vec<CompletedExercise>,
}

impl IntervalTimer {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn is_running(&self) -> bool {
        self.state.phase.is_running()
    }

    pub fn is_paused(&self) -> bool {
        self.state.paused
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    pub fn current_exercise(&self) -> Option<&ExerciseSpec> {
        if self.state.phase.is_running() {
            self.sequence.get(self.state.current_index)
        } else {
            None
        }
    }

    /// Length of the current phase in seconds.
    pub fn phase_total_seconds(&self) -> u32 {
        match self.state.phase {
            Phase::Exercising => self
                .current_exercise()
                .map(ExerciseSpec::duration_seconds)
                .unwrap_or(0),
            Phase::Resting => self.state.rest_seconds_config,
            Phase::Idle | Phase::Complete => 0,
        }
    }

    pub fn progress(&self) -> f64 {
        match self.state.phase {
            Phase::Idle => 0.0,
            Phase::Complete => 1.0,
            Phase::Exercising | Phase::Resting => {
                let total = self.phase_total_seconds();
                if total == 0 {
                    return 0.0;
                }
                1.0 - (f64::from(self.state.remaining_seconds) / f64::from(total))
            }
        }
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        let current = self.current_exercise();
        let up_next = if self.state.phase.is_running() {
            self.sequence
                .get(self.state.current_index + 1)
                .map(|e| e.name().to_string())
        } else {
            None
        };
        TimerSnapshot {
            phase: self.state.phase,
            current_index: self.state.current_index,
            total_exercises: self.sequence.len(),
            exercise: current.map(|e| e.name().to_string()),
            category: current.map(ExerciseSpec::category),
            up_next,
            remaining_seconds: self.state.remaining_seconds,
            phase_total_seconds: self.phase_total_seconds(),
            progress: self.progress(),
            paused: self.state.paused,
            estimated_calories: current.map(|e| {
                estimate_calories(
                    e.name(),
                    e.duration_seconds(),
                    e.category(),
                    self.state.weight_kg,
                    &self.state.session_note,
                )
            }),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a run over a copy of `sequence`.
    ///
    /// # Errors
    /// `AlreadyRunning` while a run is in flight, `State` after completion
    /// without a reset, `EmptySequence` when there is nothing to run.
    pub fn start(
        &mut self,
        sequence: &Sequence,
        rest_seconds: u32,
        weight_kg: f64,
        note: &str,
    ) -> Result<Event, WorkoutError> {
        match self.state.phase {
            Phase::Exercising | Phase::Resting => return Err(WorkoutError::AlreadyRunning),
            Phase::Complete => {
                return Err(WorkoutError::State(
                    "workout is complete; reset before starting again".into(),
                ))
            }
            Phase::Idle => {}
        }
        let first = sequence.get(0).ok_or(WorkoutError::EmptySequence)?;

        self.state = TimerState {
            phase: Phase::Exercising,
            current_index: 0,
            remaining_seconds: first.duration_seconds(),
            paused: false,
            rest_seconds_config: rest_seconds,
            session_note: note.to_string(),
            weight_kg,
        };
        self.sequence = sequence.clone();
        self.completed.clear();

        info!(exercises = sequence.len(), rest_seconds, "workout started");
        Ok(Event::WorkoutStarted {
            exercises: sequence.len(),
            rest_seconds,
            total_seconds: sequence.total_ticks(rest_seconds),
            at: Utc::now(),
        })
    }

    /// Freeze the countdown. Pausing an already paused run changes nothing.
    pub fn pause(&mut self) -> Result<Event, WorkoutError> {
        if !self.state.phase.is_running() {
            return Err(WorkoutError::NotRunning);
        }
        self.state.paused = true;
        Ok(Event::WorkoutPaused {
            remaining_seconds: self.state.remaining_seconds,
            at: Utc::now(),
        })
    }

    pub fn resume(&mut self) -> Result<Event, WorkoutError> {
        if !self.state.phase.is_running() {
            return Err(WorkoutError::NotRunning);
        }
        self.state.paused = false;
        Ok(Event::WorkoutResumed {
            remaining_seconds: self.state.remaining_seconds,
            at: Utc::now(),
        })
    }

    pub fn toggle_pause(&mut self) -> Result<Event, WorkoutError> {
        if self.state.paused {
            self.resume()
        } else {
            self.pause()
        }
    }

    /// Clear run state. `full` also drops the sequence copy and the note.
    pub fn reset(&mut self, full: bool) -> Event {
        self.state.phase = Phase::Idle;
        self.state.current_index = 0;
        self.state.remaining_seconds = 0;
        self.state.paused = false;
        self.completed.clear();
        if full {
            self.sequence = Sequence::default();
            self.state.session_note.clear();
        }
        info!(full, "workout reset");
        Event::WorkoutReset {
            full,
            at: Utc::now(),
        }
    }

    /// Advance one second. Returns the events produced by this tick; no-op
    /// ticks (idle, complete, paused) return an empty list.
    pub fn tick(&mut self) -> Vec<Event> {
        if !self.state.phase.is_running() || self.state.paused {
            return Vec::new();
        }
        if self.state.remaining_seconds > 0 {
            self.state.remaining_seconds -= 1;
            if self.state.remaining_seconds > 0 {
                return Vec::new();
            }
        }
        self.transition()
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn transition(&mut self) -> Vec<Event> {
        let index = self.state.current_index;
        let stale = match self.state.phase {
            Phase::Exercising => index >= self.sequence.len(),
            // Rest always has an exercise after it.
            Phase::Resting => index + 1 >= self.sequence.len(),
            Phase::Idle | Phase::Complete => false,
        };
        if stale {
            return self.recover_stale_index();
        }
        match self.state.phase {
            Phase::Exercising => self.finish_exercise(),
            Phase::Resting => self.advance(),
            Phase::Idle | Phase::Complete => Vec::new(),
        }
    }

    fn finish_exercise(&mut self) -> Vec<Event> {
        let index = self.state.current_index;
        let Some(spec) = self.sequence.get(index) else {
            return self.recover_stale_index();
        };
        let done = CompletedExercise::from_spec(spec, self.state.weight_kg, &self.state.session_note);
        let mut events = vec![Event::ExerciseCompleted {
            index,
            exercise: done.exercise_name.clone(),
            calories: done.calories,
            at: Utc::now(),
        }];
        self.completed.push(done);

        let rest = self.state.rest_seconds_config;
        if rest > 0 && index + 1 < self.sequence.len() {
            self.state.phase = Phase::Resting;
            self.state.remaining_seconds = rest;
            debug!(after_index = index, rest, "rest started");
            events.push(Event::RestStarted {
                after_index: index,
                rest_seconds: rest,
                at: Utc::now(),
            });
        } else {
            events.extend(self.advance());
        }
        events
    }

    fn advance(&mut self) -> Vec<Event> {
        self.state.current_index += 1;
        let index = self.state.current_index;
        match self.sequence.get(index) {
            Some(next) => {
                self.state.phase = Phase::Exercising;
                self.state.remaining_seconds = next.duration_seconds();
                debug!(index, exercise = next.name(), "exercise started");
                vec![Event::ExerciseStarted {
                    index,
                    exercise: next.name().to_string(),
                    category: next.category(),
                    duration_seconds: next.duration_seconds(),
                    at: Utc::now(),
                }]
            }
            None => {
                self.state.phase = Phase::Complete;
                self.state.remaining_seconds = 0;
                self.state.paused = false;
                let record = CompletedSession::new(
                    self.completed.clone(),
                    self.state.session_note.clone(),
                    self.state.weight_kg,
                    Local::now(),
                );
                info!(
                    exercises = record.exercises.len(),
                    calories = record.total_calories(),
                    "workout complete"
                );
                vec![Event::WorkoutCompleted {
                    record,
                    at: Utc::now(),
                }]
            }
        }
    }

    /// The index no longer points into the sequence (e.g. restored from
    /// corrupted state). Drop the run and keep the plan.
    fn recover_stale_index(&mut self) -> Vec<Event> {
        warn!(
            index = self.state.current_index,
            len = self.sequence.len(),
            "timer index out of range, resetting run"
        );
        vec![self.reset(false)]
    }
}
