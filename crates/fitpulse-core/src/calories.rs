//! MET-based calorie estimation.
//!
//! `kcal = MET * 3.5 * weight_kg / 200 * minutes`, adjusted by how the user
//! described the session in the note. Pure and total: unknown exercises and
//! categories fall back to defaults instead of failing.

use serde::{Deserialize, Serialize};

use crate::sequence::Category;

/// MET used when neither the exercise nor the category is known.
pub const DEFAULT_MET: f64 = 3.0;

const MET_TABLE: &[(&str, f64)] = &[
    ("Running", 9.8),
    ("Cycling", 7.5),
    ("Jumping Jacks", 8.0),
    ("Burpees", 8.8),
    ("Mountain Climbers", 8.0),
    ("Skipping", 12.3),
    ("Rowing", 7.0),
    ("Push-ups", 8.0),
    ("Squats", 5.0),
    ("Lunges", 5.0),
    ("Plank", 3.3),
    ("Yoga Stretch", 2.5),
    ("Side Bends", 2.8),
];

const INTENSE_WORDS: &[&str] = &["very intense", "hard", "exhausted", "maximum"];
const EASY_WORDS: &[&str] = &["easy", "light", "moderate"];

/// How the session note shifts the estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteIntensity {
    Intense,
    Easy,
    Neutral,
}

impl NoteIntensity {
    /// Intensity words are checked first, so a note containing both kinds
    /// counts as intense.
    pub fn classify(note: &str) -> Self {
        let lower = note.to_lowercase();
        if INTENSE_WORDS.iter().any(|w| lower.contains(w)) {
            NoteIntensity::Intense
        } else if EASY_WORDS.iter().any(|w| lower.contains(w)) {
            NoteIntensity::Easy
        } else {
            NoteIntensity::Neutral
        }
    }

    pub fn multiplier(self) -> f64 {
        match self {
            NoteIntensity::Intense => 1.1,
            NoteIntensity::Easy => 0.9,
            NoteIntensity::Neutral => 1.0,
        }
    }
}

pub fn category_met(category: Category) -> f64 {
    match category {
        Category::Cardio => 6.0,
        Category::Strength => 3.5,
        Category::Flexibility => 2.5,
        Category::Other => 3.0,
    }
}

/// Exact-name lookup in the MET table.
pub fn exercise_met(exercise_name: &str) -> Option<f64> {
    MET_TABLE
        .iter()
        .find(|(name, _)| *name == exercise_name)
        .map(|(_, met)| *met)
}

pub fn estimate_calories(
    exercise_name: &str,
    duration_seconds: u32,
    category: Category,
    weight_kg: f64,
    note: &str,
) -> f64 {
    let met = exercise_met(exercise_name).unwrap_or_else(|| category_met(category));
    compute(met, duration_seconds, weight_kg, note)
}

/// Same as [`estimate_calories`] but takes the category as free text, as
/// stored history rows do. Unrecognised categories use [`DEFAULT_MET`].
pub fn estimate_calories_str(
    exercise_name: &str,
    duration_seconds: u32,
    category: &str,
    weight_kg: f64,
    note: &str,
) -> f64 {
    let met = exercise_met(exercise_name).unwrap_or_else(|| {
        category
            .parse::<Category>()
            .map(category_met)
            .unwrap_or(DEFAULT_MET)
    });
    compute(met, duration_seconds, weight_kg, note)
}

fn compute(met: f64, duration_seconds: u32, weight_kg: f64, note: &str) -> f64 {
    let minutes = f64::from(duration_seconds) / 60.0;
    let base = met * 3.5 * weight_kg / 200.0 * minutes;
    round2(base * NoteIntensity::classify(note).multiplier())
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
