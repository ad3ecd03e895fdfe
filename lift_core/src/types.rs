//! Core domain types for the Lift workout system.
//!
//! This module defines the fundamental types used throughout the system:
//! - Program definitions (days, sections, exercises, target sets)
//! - Session position and rest clock state
//! - The durable workout log handed to the log store

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Program Types
// ============================================================================

/// A single prescribed set within an exercise
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TargetSet {
    /// 1-based set number
    pub set_number: u32,
    /// Free-form target: "8", "8-10", "5RM", "45s", "15 cal", "AMRAP"
    pub target_reps: String,
    /// Explicit rest before this set, when the program author gave one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest_seconds: Option<u32>,
}

impl TargetSet {
    pub fn new(set_number: u32, target_reps: impl Into<String>) -> Self {
        Self {
            set_number,
            target_reps: target_reps.into(),
            rest_seconds: None,
        }
    }

    /// Interpret the target string
    pub fn kind(&self) -> TargetKind {
        TargetKind::parse(&self.target_reps)
    }
}

/// What a target string asks the athlete to do
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TargetKind {
    /// Repetitions; `None` when the target has no leading number (e.g. "AMRAP")
    Reps(Option<u32>),
    /// Hold or work for a duration
    Time { seconds: u32 },
    /// Calorie target on a machine
    Calories(u32),
}

impl TargetKind {
    pub fn parse(target: &str) -> Self {
        let lower = target.trim().to_lowercase();
        let number = leading_number(&lower);

        if lower.contains("cal") {
            return TargetKind::Calories(number.unwrap_or(0));
        }

        // "1:30" style durations
        if let Some((min, sec)) = lower.split_once(':') {
            if let (Ok(m), Ok(s)) = (min.trim().parse::<u32>(), sec.trim().parse::<u32>()) {
                if let Some(seconds) = m.checked_mul(60).and_then(|t| t.checked_add(s)) {
                    return TargetKind::Time { seconds };
                }
            }
        }

        if let Some(n) = number {
            let unit = lower
                .trim_start_matches(|c: char| c.is_ascii_digit())
                .trim_start();
            if unit.starts_with("min") {
                if let Some(seconds) = n.checked_mul(60) {
                    return TargetKind::Time { seconds };
                }
            }
            if unit.starts_with("sec") || unit == "s" {
                return TargetKind::Time { seconds: n };
            }
        }

        TargetKind::Reps(number)
    }
}

fn leading_number(s: &str) -> Option<u32> {
    let digits: String = s.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// One exercise slot in a workout day
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutExercise {
    pub exercise_slot: String,
    pub category_slot: String,
    /// Exercises sharing a tag and appearing consecutively form one superset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superset_group: Option<String>,
    pub sets: Vec<TargetSet>,
    #[serde(default)]
    pub is_per_side: bool,
}

/// A named block of exercises (warm-up, main, accessories...)
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Section {
    pub name: String,
    pub exercises: Vec<WorkoutExercise>,
}

/// A complete workout day definition
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutDay {
    pub id: String,
    pub name: String,
    pub sections: Vec<Section>,
}

impl WorkoutDay {
    /// Total prescribed sets across every section
    pub fn total_sets(&self) -> usize {
        self.sections
            .iter()
            .flat_map(|s| &s.exercises)
            .map(|e| e.sets.len())
            .sum()
    }
}

// ============================================================================
// Session Types
// ============================================================================

/// Lifecycle state of a workout session
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Collecting the result of the current set
    Logging,
    /// Rest clock active, cursor move pending
    Resting,
    /// Every set has been visited
    Complete,
    /// Discarded without a log
    Cancelled,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::Complete | SessionState::Cancelled)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Logging => "logging",
            SessionState::Resting => "resting",
            SessionState::Complete => "complete",
            SessionState::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// Position within the flattened exercise sequence
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionCursor {
    pub exercise_index: usize,
    pub set_index: usize,
}

impl SessionCursor {
    pub fn new(exercise_index: usize, set_index: usize) -> Self {
        Self {
            exercise_index,
            set_index,
        }
    }
}

impl fmt::Display for SessionCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.exercise_index, self.set_index)
    }
}

/// Snapshot of the rest clock. `total_time == 0` means no active rest.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RestClockState {
    pub is_running: bool,
    pub time_remaining: u32,
    pub total_time: u32,
}

impl RestClockState {
    pub fn is_active(&self) -> bool {
        self.total_time > 0
    }
}

/// What the athlete actually did on a set
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Measurement {
    pub weight: Option<f64>,
    pub reps: Option<u32>,
    pub duration_seconds: Option<u32>,
}

impl Measurement {
    pub fn reps(weight: Option<f64>, reps: u32) -> Self {
        Self {
            weight,
            reps: Some(reps),
            duration_seconds: None,
        }
    }

    pub fn duration(seconds: u32) -> Self {
        Self {
            weight: None,
            reps: None,
            duration_seconds: Some(seconds),
        }
    }

    /// Measurement that meets the given target exactly
    pub fn from_target(target: &TargetSet) -> Self {
        match target.kind() {
            TargetKind::Time { seconds } => Self::duration(seconds),
            TargetKind::Reps(reps) => Self {
                weight: None,
                reps,
                duration_seconds: None,
            },
            TargetKind::Calories(calories) => Self {
                weight: None,
                reps: Some(calories),
                duration_seconds: None,
            },
        }
    }
}

// ============================================================================
// Log Types
// ============================================================================

/// A set as recorded during the session
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LoggedSet {
    pub set_number: u32,
    pub weight: Option<f64>,
    pub reps: Option<u32>,
    pub duration_seconds: Option<u32>,
    pub completed: bool,
    pub timestamp: DateTime<Utc>,
}

/// All sets logged for one entry of the flattened sequence
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LoggedExercise {
    /// Position in the flattened sequence
    pub position: usize,
    pub exercise_id: String,
    pub sets: Vec<LoggedSet>,
}

/// The durable record of a finished workout
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkoutLog {
    pub id: Uuid,
    pub user_id: String,
    pub day_id: String,
    pub day_name: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub exercises: Vec<LoggedExercise>,
}

impl WorkoutLog {
    pub fn completed_sets(&self) -> usize {
        self.exercises
            .iter()
            .flat_map(|e| &e.sets)
            .filter(|s| s.completed)
            .count()
    }
}
