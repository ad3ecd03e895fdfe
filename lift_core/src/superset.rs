//! Superset queries over a flattened sequence.
//!
//! Everything here is derived from `(sequence, position)` alone, so the
//! session never has to store its own superset bookkeeping.

use crate::sequencer::{FlatExerciseEntry, GroupId};

/// Where an entry sits inside its superset group
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SupersetInfo {
    pub group: GroupId,
    /// Flat positions of every member, in sequence order
    pub members: Vec<usize>,
    /// 0-based index of the queried entry within `members`
    pub index_in_group: usize,
    pub is_first: bool,
    pub is_last: bool,
    pub size: usize,
}

impl SupersetInfo {
    /// Next member after the queried one that prescribes `set_index`.
    ///
    /// Members with fewer sets are skipped for the rounds they do not have.
    pub fn next_member_with_set(
        &self,
        entries: &[FlatExerciseEntry],
        set_index: usize,
    ) -> Option<usize> {
        self.members[self.index_in_group + 1..]
            .iter()
            .copied()
            .find(|&p| has_set(entries, p, set_index))
    }

    /// First member of the group that prescribes `set_index`
    pub fn first_member_with_set(
        &self,
        entries: &[FlatExerciseEntry],
        set_index: usize,
    ) -> Option<usize> {
        self.members
            .iter()
            .copied()
            .find(|&p| has_set(entries, p, set_index))
    }

    /// Flat position just past the group
    pub fn after_group(&self) -> usize {
        self.members.last().map_or(0, |&p| p + 1)
    }
}

fn has_set(entries: &[FlatExerciseEntry], position: usize, set_index: usize) -> bool {
    entries
        .get(position)
        .is_some_and(|e| set_index < e.set_count())
}

/// Describe the superset group of the entry at `index`.
///
/// Returns `None` when the entry is not part of a multi-member group or the
/// index is out of range.
pub fn resolve(entries: &[FlatExerciseEntry], index: usize) -> Option<SupersetInfo> {
    let entry = entries.get(index)?;
    let group = entry.group?;

    let index_in_group = entry.members.iter().position(|&p| p == index)?;
    let size = entry.members.len();

    Some(SupersetInfo {
        group,
        members: entry.members.clone(),
        index_in_group,
        is_first: index_in_group == 0,
        is_last: index_in_group + 1 == size,
        size,
    })
}
