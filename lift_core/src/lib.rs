#![forbid(unsafe_code)]

//! Core domain model and session engine for the Lift workout system.
//!
//! This crate provides:
//! - Domain types (days, sections, exercises, logs)
//! - Sequencing of a day into one ordered exercise list, with superset groups
//! - The rest clock and the live session state machine
//! - Persistence of finished workouts (WAL, CSV export) and configuration

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod sequencer;
pub mod superset;
pub mod rest_clock;
pub mod rest_policy;
pub mod session;
pub mod ticker;
pub mod wal;
pub mod history;
pub mod csv_export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{get_default_exercises, get_default_programs, ExerciseCatalog, ProgramCatalog};
pub use config::Config;
pub use sequencer::{flatten, FlatExerciseEntry, FlatSequence, GroupId};
pub use superset::{resolve, SupersetInfo};
pub use rest_clock::{ClockEvent, RestClock};
pub use rest_policy::RestPolicy;
pub use session::{Progress, SessionSnapshot, Transition, WorkoutSession};
pub use ticker::Ticker;
pub use wal::{JsonlSink, LogSink};
pub use history::{query_logs, LogFilter};
