//! Program and exercise catalogs.
//!
//! The program catalog is the read-only source of workout days; sessions
//! never modify it. The exercise catalog maps exercise slots to display
//! names and plays no part in session control flow.

use crate::sequencer::flatten;
use crate::types::*;
use crate::{Error, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Cached default programs - built once and reused across all operations
static DEFAULT_PROGRAMS: Lazy<ProgramCatalog> = Lazy::new(build_default_programs);

/// Cached default exercises
static DEFAULT_EXERCISES: Lazy<ExerciseCatalog> = Lazy::new(build_default_exercises);

/// Get a reference to the cached default program catalog
pub fn get_default_programs() -> &'static ProgramCatalog {
    &DEFAULT_PROGRAMS
}

/// Get a reference to the cached default exercise catalog
pub fn get_default_exercises() -> &'static ExerciseCatalog {
    &DEFAULT_EXERCISES
}

// ============================================================================
// Program Catalog
// ============================================================================

/// Ordered collection of workout days
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ProgramCatalog {
    pub days: Vec<WorkoutDay>,
}

impl ProgramCatalog {
    pub fn new(days: Vec<WorkoutDay>) -> Self {
        Self { days }
    }

    /// Load a catalog from a JSON file of the form `{ "days": [...] }`
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let catalog: ProgramCatalog = serde_json::from_str(&contents)?;
        tracing::info!("Loaded {} days from {:?}", catalog.days.len(), path);
        Ok(catalog)
    }

    pub fn day(&self, id: &str) -> Option<&WorkoutDay> {
        self.days.iter().find(|d| d.id == id)
    }

    /// Look up a day that can actually be run.
    ///
    /// Malformed days are reported as [`Error::MalformedDay`] here rather
    /// than failing later inside a session.
    pub fn selectable_day(&self, id: &str) -> Result<&WorkoutDay> {
        let day = self
            .day(id)
            .ok_or_else(|| Error::CatalogValidation(format!("Unknown day '{}'", id)))?;
        let sequence = flatten(day)?;
        if sequence.is_empty() {
            return Err(Error::MalformedDay {
                day_id: day.id.clone(),
                reason: "day has no exercises".into(),
            });
        }
        Ok(day)
    }

    /// Days that pass validation, in catalog order
    pub fn selectable_days(&self) -> Vec<&WorkoutDay> {
        self.days
            .iter()
            .filter(|d| self.selectable_day(&d.id).is_ok())
            .collect()
    }

    /// Validate the catalog for consistency
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self, exercises: &ExerciseCatalog) -> Vec<String> {
        let mut errors = Vec::new();
        let mut seen = HashSet::new();

        for day in &self.days {
            if day.id.is_empty() {
                errors.push("Day has empty ID".to_string());
            }
            if !seen.insert(day.id.as_str()) {
                errors.push(format!("Duplicate day ID '{}'", day.id));
            }
            if day.name.is_empty() {
                errors.push(format!("Day '{}' has empty name", day.id));
            }

            match flatten(day) {
                Ok(seq) if seq.is_empty() => {
                    errors.push(format!("Day '{}' has no exercises", day.id));
                }
                Ok(_) => {}
                Err(e) => errors.push(e.to_string()),
            }

            for exercise in day.sections.iter().flat_map(|s| &s.exercises) {
                if exercises.resolve(&exercise.exercise_slot).is_none() {
                    errors.push(format!(
                        "Day '{}' references unknown exercise '{}'",
                        day.id, exercise.exercise_slot
                    ));
                }
            }
        }

        errors
    }
}

// ============================================================================
// Exercise Catalog
// ============================================================================

/// A concrete exercise a slot resolves to
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Debug, Default)]
pub struct ExerciseCatalog {
    exercises: HashMap<String, Exercise>,
}

impl ExerciseCatalog {
    pub fn insert(&mut self, exercise: Exercise) {
        self.exercises.insert(exercise.id.clone(), exercise);
    }

    pub fn resolve(&self, slot: &str) -> Option<&Exercise> {
        self.exercises.get(slot)
    }

    /// Name to show for a slot, falling back to the slot itself
    pub fn display_name<'a>(&'a self, slot: &'a str) -> &'a str {
        self.resolve(slot).map_or(slot, |e| e.name.as_str())
    }
}

fn build_default_exercises() -> ExerciseCatalog {
    let mut catalog = ExerciseCatalog::default();
    for (id, name) in [
        ("back_squat", "Back Squat"),
        ("romanian_deadlift", "Romanian Deadlift"),
        ("walking_lunge", "Walking Lunge"),
        ("hanging_leg_raise", "Hanging Leg Raise"),
        ("bench_press", "Bench Press"),
        ("barbell_row", "Barbell Row"),
        ("overhead_press", "Overhead Press"),
        ("chin_up", "Chin-up"),
        ("db_curl", "Dumbbell Curl"),
        ("triceps_pushdown", "Triceps Pushdown"),
        ("goblet_squat", "Goblet Squat"),
        ("rower", "Rower"),
        ("assault_bike", "Assault Bike"),
        ("plank", "Plank"),
        ("kb_swing", "Kettlebell Swing"),
    ] {
        catalog.insert(Exercise {
            id: id.into(),
            name: name.into(),
        });
    }
    catalog
}

// ============================================================================
// Default programs
// ============================================================================

fn sets(count: u32, target: &str) -> Vec<TargetSet> {
    (1..=count).map(|n| TargetSet::new(n, target)).collect()
}

fn exercise(slot: &str, category: &str, group: Option<&str>, sets: Vec<TargetSet>) -> WorkoutExercise {
    WorkoutExercise {
        exercise_slot: slot.into(),
        category_slot: category.into(),
        superset_group: group.map(String::from),
        sets,
        is_per_side: false,
    }
}

fn build_default_programs() -> ProgramCatalog {
    let mut lunge = exercise("walking_lunge", "single_leg", Some("2"), sets(3, "10"));
    lunge.is_per_side = true;

    let lower_a = WorkoutDay {
        id: "lower_a".into(),
        name: "Lower A".into(),
        sections: vec![
            Section {
                name: "Main".into(),
                exercises: vec![
                    exercise("back_squat", "squat", None, sets(3, "5")),
                    exercise("romanian_deadlift", "hinge", None, sets(3, "8")),
                ],
            },
            Section {
                name: "Accessories".into(),
                exercises: vec![
                    lunge,
                    exercise("hanging_leg_raise", "core", Some("2"), sets(3, "12")),
                ],
            },
        ],
    };

    let upper_a = WorkoutDay {
        id: "upper_a".into(),
        name: "Upper A".into(),
        sections: vec![
            Section {
                name: "Main".into(),
                exercises: vec![
                    exercise("bench_press", "horizontal_push", Some("1"), sets(3, "5")),
                    exercise("barbell_row", "horizontal_pull", Some("1"), sets(3, "8")),
                    exercise("overhead_press", "vertical_push", None, sets(3, "8-10")),
                ],
            },
            Section {
                name: "Arms".into(),
                exercises: vec![
                    exercise("db_curl", "biceps", Some("3"), sets(2, "12")),
                    exercise("triceps_pushdown", "triceps", Some("3"), sets(2, "12")),
                ],
            },
        ],
    };

    let mut intervals = sets(4, "15 cal");
    for set in &mut intervals {
        set.rest_seconds = Some(60);
    }

    let conditioning = WorkoutDay {
        id: "conditioning".into(),
        name: "Conditioning".into(),
        sections: vec![
            Section {
                name: "Warm-up".into(),
                exercises: vec![exercise("rower", "cardio", None, sets(1, "5 min"))],
            },
            Section {
                name: "Intervals".into(),
                exercises: vec![
                    exercise("assault_bike", "cardio", None, intervals),
                    exercise("kb_swing", "hinge", Some("1"), sets(3, "15")),
                    exercise("plank", "core", Some("1"), sets(3, "45s")),
                ],
            },
        ],
    };

    ProgramCatalog::new(vec![lower_a, upper_a, conditioning])
}
