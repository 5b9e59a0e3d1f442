//! Planned exercise sequence.
//!
//! The builder is a plain data container with validation. It knows nothing
//! about time; the interval timer takes its own copy of the sequence when a
//! workout starts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, WorkoutError};

/// Shortest allowed exercise, in seconds.
pub const MIN_EXERCISE_SECONDS: u32 = 1;
/// Longest allowed exercise, in seconds.
pub const MAX_EXERCISE_SECONDS: u32 = 3600;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Cardio,
    Strength,
    Flexibility,
    Other,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Cardio,
        Category::Strength,
        Category::Flexibility,
        Category::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Cardio => "Cardio",
            Category::Strength => "Strength",
            Category::Flexibility => "Flexibility",
            Category::Other => "Other",
        }
    }

    /// Quick-pick exercise names offered for this category.
    pub fn common_exercises(self) -> &'static [&'static str] {
        match self {
            Category::Cardio => &[
                "Running",
                "Cycling",
                "Jumping Jacks",
                "Burpees",
                "Mountain Climbers",
                "Skipping",
                "Rowing",
            ],
            Category::Strength => &["Push-ups", "Squats", "Lunges", "Plank"],
            Category::Flexibility => &["Yoga Stretch", "Side Bends"],
            Category::Other => &[],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "category".into(),
                message: format!("unknown category '{s}'"),
            })
    }
}

/// One planned exercise. Fields are private so a spec cannot be changed
/// after it has been validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseSpec {
    name: String,
    duration_seconds: u32,
    category: Category,
}

impl ExerciseSpec {
    /// Validate and build a spec. The name is trimmed.
    pub fn new(
        name: &str,
        duration_seconds: u32,
        category: Category,
    ) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if !(MIN_EXERCISE_SECONDS..=MAX_EXERCISE_SECONDS).contains(&duration_seconds) {
            return Err(ValidationError::DurationOutOfRange {
                seconds: duration_seconds,
                min: MIN_EXERCISE_SECONDS,
                max: MAX_EXERCISE_SECONDS,
            });
        }
        Ok(Self {
            name: name.to_string(),
            duration_seconds,
            category,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn duration_seconds(&self) -> u32 {
        self.duration_seconds
    }

    pub fn category(&self) -> Category {
        self.category
    }
}

/// Ordered exercises; insertion order is execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequence {
    exercises: Vec<ExerciseSpec>,
}

impl Sequence {
    pub fn exercises(&self) -> &[ExerciseSpec] {
        &self.exercises
    }

    pub fn get(&self, index: usize) -> Option<&ExerciseSpec> {
        self.exercises.get(index)
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    pub fn total_duration_seconds(&self) -> u64 {
        self.exercises
            .iter()
            .map(|e| u64::from(e.duration_seconds))
            .sum()
    }

    /// Ticks needed to run this sequence with `rest_seconds` between
    /// consecutive exercises (no rest after the last one).
    pub fn total_ticks(&self, rest_seconds: u32) -> u64 {
        let gaps = self.exercises.len().saturating_sub(1) as u64;
        self.total_duration_seconds() + gaps * u64::from(rest_seconds)
    }
}

impl FromIterator<ExerciseSpec> for Sequence {
    fn from_iter<I: IntoIterator<Item = ExerciseSpec>>(iter: I) -> Self {
        Self {
            exercises: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SequenceBuilder {
    sequence: Sequence,
}

impl SequenceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an exercise. Repeats are allowed.
    pub fn add(
        &mut self,
        name: &str,
        duration_seconds: u32,
        category: Category,
    ) -> Result<ExerciseSpec, WorkoutError> {
        let spec = ExerciseSpec::new(name, duration_seconds, category)?;
        self.sequence.exercises.push(spec.clone());
        Ok(spec)
    }

    pub fn remove(&mut self, index: usize) -> Result<ExerciseSpec, WorkoutError> {
        let len = self.sequence.len();
        if index >= len {
            return Err(WorkoutError::Index { index, len });
        }
        Ok(self.sequence.exercises.remove(index))
    }

    pub fn clear(&mut self) {
        self.sequence.exercises.clear();
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_trims_and_appends_in_order() {
        let mut builder = SequenceBuilder::new();
        builder.add("  Push-ups ", 30, Category::Strength).unwrap();
        builder.add("Running", 60, Category::Cardio).unwrap();
        builder.add("Running", 60, Category::Cardio).unwrap();

        let names: Vec<_> = builder
            .sequence()
            .exercises()
            .iter()
            .map(|e| e.name())
            .collect();
        assert_eq!(names, ["Push-ups", "Running", "Running"]);
    }

    #[test]
    fn add_rejects_blank_name() {
        let mut builder = SequenceBuilder::new();
        let err = builder.add("", 30, Category::Cardio).unwrap_err();
        assert_eq!(err, WorkoutError::Validation(ValidationError::EmptyName));
        let err = builder.add("   ", 30, Category::Cardio).unwrap_err();
        assert_eq!(err, WorkoutError::Validation(ValidationError::EmptyName));
        assert!(builder.is_empty());
    }

    #[test]
    fn add_rejects_out_of_range_duration() {
        let mut builder = SequenceBuilder::new();
        assert!(matches!(
            builder.add("Squats", 0, Category::Strength),
            Err(WorkoutError::Validation(
                ValidationError::DurationOutOfRange { seconds: 0, .. }
            ))
        ));
        assert!(builder.add("Squats", 3601, Category::Strength).is_err());
        assert!(builder.add("Squats", 3600, Category::Strength).is_ok());
        assert!(builder.add("Squats", 1, Category::Strength).is_ok());
    }

    #[test]
    fn remove_checks_bounds() {
        let mut builder = SequenceBuilder::new();
        builder.add("Plank", 45, Category::Strength).unwrap();
        assert_eq!(
            builder.remove(1).unwrap_err(),
            WorkoutError::Index { index: 1, len: 1 }
        );
        let removed = builder.remove(0).unwrap();
        assert_eq!(removed.name(), "Plank");
        assert!(builder.is_empty());
    }

    #[test]
    fn clear_empties_sequence() {
        let mut builder = SequenceBuilder::new();
        builder.add("Plank", 45, Category::Strength).unwrap();
        builder.clear();
        assert!(builder.is_empty());
    }

    #[test]
    fn category_parses_case_insensitively() {
        assert_eq!("cardio".parse::<Category>().unwrap(), Category::Cardio);
        assert_eq!(" FLEXIBILITY ".parse::<Category>().unwrap(), Category::Flexibility);
        assert!("Swimming".parse::<Category>().is_err());
    }

    #[test]
    fn total_ticks_counts_internal_gaps_only() {
        let seq: Sequence = [
            ExerciseSpec::new("Push-ups", 5, Category::Strength).unwrap(),
            ExerciseSpec::new("Running", 3, Category::Cardio).unwrap(),
        ]
        .into_iter()
        .collect();
        assert_eq!(seq.total_ticks(2), 10);
        assert_eq!(seq.total_ticks(0), 8);
    }
}
