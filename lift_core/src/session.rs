//! Live workout session.
//!
//! A [`WorkoutSession`] owns the flattened day, the cursor, the rest clock
//! and the sets logged so far. Every mutation goes through one of its
//! operations; callers observe it through [`WorkoutSession::snapshot`].
//!
//! ## Transitions
//!
//! After a set is completed the next cursor is chosen as follows:
//!
//! 1. **Superset alternation** (superset mode on, entry in a group):
//!    - another member still has this round → move to it immediately, no rest
//!    - otherwise, if any member has another round → rest, then resume at the
//!      first member that has it
//!    - otherwise → rest, then continue after the group (or complete)
//! 2. **Straight sets**: next set of the same exercise, else the first set of
//!    the next entry, else complete. Every move rests first.
//!
//! Operations called in a state that does not accept them return
//! [`Transition::Ignored`]. The exception is [`WorkoutSession::complete_set`]
//! after the session has ended, which is a caller bug and returns
//! [`Error::InvalidTransition`].

use crate::rest_clock::{ClockEvent, RestClock};
use crate::rest_policy::RestPolicy;
use crate::sequencer::{flatten, FlatExerciseEntry, FlatSequence};
use crate::superset;
use crate::wal::LogSink;
use crate::{
    Error, LoggedExercise, LoggedSet, Measurement, RestClockState, Result, SessionCursor,
    SessionState, TargetSet, WorkoutDay, WorkoutLog,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

/// What an operation did to the session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Operation not valid in the current state; nothing changed
    Ignored,
    /// Cursor moved without resting
    Advanced(SessionCursor),
    /// Rest clock started; the cursor moves to `pending` when it ends
    RestStarted {
        pending: SessionCursor,
        seconds: u32,
    },
    /// One second of rest elapsed
    RestTick { remaining: u32 },
    /// Rest clock paused, resumed or extended
    RestAdjusted(RestClockState),
    /// Rest ended and the pending cursor was applied
    Resumed(SessionCursor),
    Completed,
    Cancelled,
}

/// Sets completed versus sets prescribed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}

/// "k of n" within a superset group, 1-based
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SupersetPosition {
    pub index: usize,
    pub size: usize,
}

/// Read-only view of a session for display
#[derive(Clone, Debug, Serialize)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub cursor: SessionCursor,
    pub section_name: String,
    pub exercise_slot: String,
    pub set_number: u32,
    pub set_count: usize,
    pub target_reps: String,
    pub is_per_side: bool,
    pub superset: Option<SupersetPosition>,
    pub pending: Option<SessionCursor>,
    pub rest: RestClockState,
    pub progress: Progress,
}

enum Step {
    Immediate(SessionCursor),
    Rest(SessionCursor),
    Done,
}

pub struct WorkoutSession {
    day_id: String,
    day_name: String,
    sequence: FlatSequence,
    state: SessionState,
    cursor: SessionCursor,
    pending: Option<SessionCursor>,
    clock: RestClock,
    rest_policy: RestPolicy,
    logged: BTreeMap<usize, LoggedExercise>,
    started_at: DateTime<Utc>,
    finished: bool,
}

impl WorkoutSession {
    /// Open a session on `day`, positioned at its first set.
    ///
    /// Fails with [`Error::MalformedDay`] if the day cannot be flattened or
    /// has no exercises.
    pub fn new(day: &WorkoutDay, rest_policy: RestPolicy) -> Result<Self> {
        let sequence = flatten(day)?;
        if sequence.is_empty() {
            return Err(Error::MalformedDay {
                day_id: day.id.clone(),
                reason: "day has no exercises".into(),
            });
        }

        tracing::info!(
            "Starting session for '{}' ({} exercises, {} sets)",
            day.id,
            sequence.len(),
            sequence.total_sets()
        );

        Ok(Self {
            day_id: day.id.clone(),
            day_name: day.name.clone(),
            sequence,
            state: SessionState::Logging,
            cursor: SessionCursor::default(),
            pending: None,
            clock: RestClock::new(),
            rest_policy,
            logged: BTreeMap::new(),
            started_at: Utc::now(),
            finished: false,
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn cursor(&self) -> SessionCursor {
        self.cursor
    }

    pub fn pending(&self) -> Option<SessionCursor> {
        self.pending
    }

    pub fn sequence(&self) -> &FlatSequence {
        &self.sequence
    }

    pub fn rest_clock(&self) -> RestClockState {
        self.clock.state()
    }

    pub fn day_id(&self) -> &str {
        &self.day_id
    }

    pub fn current_entry(&self) -> &FlatExerciseEntry {
        &self.sequence.entries()[self.cursor.exercise_index]
    }

    pub fn current_target(&self) -> &TargetSet {
        &self.current_entry().exercise.sets[self.cursor.set_index]
    }

    /// Logged exercises in sequence order
    pub fn logged(&self) -> impl Iterator<Item = &LoggedExercise> {
        self.logged.values()
    }

    pub fn progress(&self) -> Progress {
        let completed = self
            .logged
            .values()
            .flat_map(|e| &e.sets)
            .filter(|s| s.completed)
            .count();
        Progress {
            completed,
            total: self.sequence.total_sets(),
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let entry = self.current_entry();
        let target = self.current_target();
        let superset = superset::resolve(self.sequence.entries(), self.cursor.exercise_index)
            .map(|info| SupersetPosition {
                index: info.index_in_group + 1,
                size: info.size,
            });

        SessionSnapshot {
            state: self.state,
            cursor: self.cursor,
            section_name: entry.section_name.clone(),
            exercise_slot: entry.exercise.exercise_slot.clone(),
            set_number: target.set_number,
            set_count: entry.set_count(),
            target_reps: target.target_reps.clone(),
            is_per_side: entry.exercise.is_per_side,
            superset,
            pending: self.pending,
            rest: self.clock.state(),
            progress: self.progress(),
        }
    }

    /// Record the current set and move on.
    ///
    /// `superset_mode` is read on every call; changing it mid-session only
    /// affects later transitions.
    pub fn complete_set(
        &mut self,
        measured: Measurement,
        superset_mode: bool,
    ) -> Result<Transition> {
        match self.state {
            SessionState::Logging => {}
            SessionState::Resting => {
                tracing::debug!("complete_set ignored while resting");
                return Ok(Transition::Ignored);
            }
            state @ (SessionState::Complete | SessionState::Cancelled) => {
                return Err(Error::InvalidTransition {
                    operation: "complete_set",
                    state,
                });
            }
        }

        self.record(measured);

        let transition = match self.next_step(superset_mode) {
            Step::Immediate(next) => {
                self.cursor = next;
                Transition::Advanced(next)
            }
            Step::Rest(next) => self.begin_rest(next),
            Step::Done => {
                self.clock.clear();
                self.state = SessionState::Complete;
                tracing::info!("Session for '{}' complete", self.day_id);
                Transition::Completed
            }
        };

        tracing::debug!("complete_set at {} -> {:?}", self.cursor, transition);
        Ok(transition)
    }

    /// End the rest now
    pub fn skip_rest(&mut self) -> Transition {
        if self.state != SessionState::Resting {
            return Transition::Ignored;
        }
        self.clock.skip();
        self.end_rest()
    }

    /// Advance the rest clock by one second
    pub fn tick(&mut self) -> Transition {
        if self.state != SessionState::Resting {
            return Transition::Ignored;
        }
        match self.clock.tick() {
            ClockEvent::Expired => self.end_rest(),
            ClockEvent::Running { remaining } => Transition::RestTick { remaining },
            ClockEvent::Idle => Transition::Ignored,
        }
    }

    pub fn add_rest_time(&mut self, seconds: u32) -> Transition {
        if self.state != SessionState::Resting {
            return Transition::Ignored;
        }
        self.clock.add_time(seconds);
        Transition::RestAdjusted(self.clock.state())
    }

    pub fn pause_rest(&mut self) -> Transition {
        if self.state != SessionState::Resting {
            return Transition::Ignored;
        }
        self.clock.pause();
        Transition::RestAdjusted(self.clock.state())
    }

    pub fn resume_rest(&mut self) -> Transition {
        if self.state != SessionState::Resting {
            return Transition::Ignored;
        }
        self.clock.resume();
        Transition::RestAdjusted(self.clock.state())
    }

    /// Abandon the session. Sets logged so far still count toward progress
    /// but never reach the log store.
    pub fn cancel(&mut self) -> Transition {
        if self.state.is_terminal() {
            return Transition::Ignored;
        }
        self.clock.clear();
        self.pending = None;
        self.state = SessionState::Cancelled;
        tracing::info!("Session for '{}' cancelled", self.day_id);
        Transition::Cancelled
    }

    /// Hand the finished workout to the log store.
    ///
    /// Only valid once, from `Complete`; returns `Ok(None)` otherwise. A
    /// failed append is returned as is and may be retried by calling again.
    pub fn finish(
        &mut self,
        user_id: &str,
        sink: &mut dyn LogSink,
    ) -> Result<Option<WorkoutLog>> {
        if self.state != SessionState::Complete || self.finished {
            return Ok(None);
        }

        let log = WorkoutLog {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            day_id: self.day_id.clone(),
            day_name: self.day_name.clone(),
            started_at: self.started_at,
            completed_at: Utc::now(),
            exercises: self.logged.values().cloned().collect(),
        };

        sink.append(&log)?;
        self.finished = true;

        tracing::info!(
            "Logged workout {} ({} sets) for '{}'",
            log.id,
            log.completed_sets(),
            user_id
        );
        Ok(Some(log))
    }

    fn record(&mut self, measured: Measurement) {
        let entry = &self.sequence.entries()[self.cursor.exercise_index];
        let set_number = entry.exercise.sets[self.cursor.set_index].set_number;

        let exercise = self
            .logged
            .entry(entry.position)
            .or_insert_with(|| LoggedExercise {
                position: entry.position,
                exercise_id: entry.exercise.exercise_slot.clone(),
                sets: Vec::new(),
            });

        let set = LoggedSet {
            set_number,
            weight: measured.weight,
            reps: measured.reps,
            duration_seconds: measured.duration_seconds,
            completed: true,
            timestamp: Utc::now(),
        };

        match exercise
            .sets
            .binary_search_by_key(&set_number, |s| s.set_number)
        {
            Ok(i) => exercise.sets[i] = set,
            Err(i) => exercise.sets.insert(i, set),
        }
    }

    fn next_step(&self, superset_mode: bool) -> Step {
        let entries = self.sequence.entries();
        let SessionCursor {
            exercise_index,
            set_index,
        } = self.cursor;

        if superset_mode {
            if let Some(info) = superset::resolve(entries, exercise_index) {
                if let Some(next) = info.next_member_with_set(entries, set_index) {
                    return Step::Immediate(SessionCursor::new(next, set_index));
                }
                if let Some(first) = info.first_member_with_set(entries, set_index + 1) {
                    return Step::Rest(SessionCursor::new(first, set_index + 1));
                }
                let after = info.after_group();
                return if after < entries.len() {
                    Step::Rest(SessionCursor::new(after, 0))
                } else {
                    Step::Done
                };
            }
        }

        if set_index + 1 < entries[exercise_index].set_count() {
            Step::Rest(SessionCursor::new(exercise_index, set_index + 1))
        } else if exercise_index + 1 < entries.len() {
            Step::Rest(SessionCursor::new(exercise_index + 1, 0))
        } else {
            Step::Done
        }
    }

    fn begin_rest(&mut self, pending: SessionCursor) -> Transition {
        let exercise = &self.sequence.entries()[pending.exercise_index].exercise;
        let seconds = self
            .rest_policy
            .rest_before(&exercise.sets[0], &exercise.sets[pending.set_index]);

        if seconds == 0 {
            self.cursor = pending;
            return Transition::Advanced(pending);
        }

        self.pending = Some(pending);
        self.state = SessionState::Resting;
        self.clock.start(seconds);
        Transition::RestStarted { pending, seconds }
    }

    fn end_rest(&mut self) -> Transition {
        self.clock.clear();
        match self.pending.take() {
            Some(next) => {
                self.cursor = next;
                self.state = SessionState::Logging;
                tracing::debug!("Rest over, now at {}", next);
                Transition::Resumed(next)
            }
            None => {
                self.state = SessionState::Complete;
                Transition::Completed
            }
        }
    }
}
