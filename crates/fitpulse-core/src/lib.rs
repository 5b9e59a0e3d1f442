//! # FitPulse Core Library
//!
//! Core logic for the FitPulse workout logger: users plan a sequence of
//! timed exercises, run it through an interval timer with optional rest
//! between exercises, and keep a history of completed sessions with calorie
//! estimates. The `fitpulse-cli` binary is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Sequence**: validated, ordered list of planned exercises
//! - **Timer**: tick-driven state machine; the caller delivers one `tick()`
//!   per second
//! - **Session**: per-user context tying the sequence, timer and settings
//!   together and handing completed runs to storage exactly once
//! - **Storage**: SQLite history and TOML configuration
//! - **Driver**: tokio-based 1 Hz trigger for live runs
//!
//! ## Key Components
//!
//! - [`IntervalTimer`]: Workout timer state machine
//! - [`WorkoutSession`]: Session context
//! - [`Database`]: Workout history persistence
//! - [`Config`]: Application configuration management
//! - [`estimate_calories`]: MET-based calorie estimate

pub mod calories;
pub mod driver;
pub mod error;
pub mod events;
pub mod sequence;
pub mod session;
pub mod storage;
pub mod timer;

pub use calories::{estimate_calories, estimate_calories_str, NoteIntensity};
pub use driver::{run_ticks, DriveOutcome};
pub use error::{ConfigError, CoreError, DatabaseError, ValidationError, WorkoutError};
pub use events::Event;
pub use sequence::{Category, ExerciseSpec, Sequence, SequenceBuilder};
pub use session::{CompletedExercise, CompletedSession, SaveOutcome, TickReport, WorkoutSession};
pub use storage::{ClearToken, Config, Database, Stats, WorkoutRow, WorkoutStore};
pub use timer::{IntervalTimer, Phase, TimerSnapshot, TimerState};
