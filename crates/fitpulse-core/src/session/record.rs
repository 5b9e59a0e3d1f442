//! Completed-session record handed to persistence.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::calories::estimate_calories;
use crate::sequence::{Category, ExerciseSpec};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedExercise {
    pub exercise_name: String,
    pub duration_seconds: u32,
    pub category: Category,
    pub calories: f64,
}

impl CompletedExercise {
    pub fn from_spec(spec: &ExerciseSpec, weight_kg: f64, note: &str) -> Self {
        Self {
            exercise_name: spec.name().to_string(),
            duration_seconds: spec.duration_seconds(),
            category: spec.category(),
            calories: estimate_calories(
                spec.name(),
                spec.duration_seconds(),
                spec.category(),
                weight_kg,
                note,
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedSession {
    pub exercises: Vec<CompletedExercise>,
    /// Local date, `YYYY-MM-DD`.
    pub date: String,
    /// Local time, `HH:MM:SS`.
    pub time: String,
    pub note: String,
    pub weight_kg: f64,
}

impl CompletedSession {
    pub fn new(
        exercises: Vec<CompletedExercise>,
        note: String,
        weight_kg: f64,
        finished_at: DateTime<Local>,
    ) -> Self {
        Self {
            exercises,
            date: finished_at.format("%Y-%m-%d").to_string(),
            time: finished_at.format("%H:%M:%S").to_string(),
            note,
            weight_kg,
        }
    }

    pub fn total_seconds(&self) -> u64 {
        self.exercises
            .iter()
            .map(|e| u64::from(e.duration_seconds))
            .sum()
    }

    pub fn total_calories(&self) -> f64 {
        let sum: f64 = self.exercises.iter().map(|e| e.calories).sum();
        (sum * 100.0).round() / 100.0
    }
}
