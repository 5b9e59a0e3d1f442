mod engine;

pub use engine::{IntervalTimer, Phase, TimerSnapshot, TimerState};
