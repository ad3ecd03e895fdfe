//! Flattening of a workout day into one ordered exercise sequence.
//!
//! Sections are walked in order and exercises left to right. Consecutive
//! exercises in the same section that carry the same superset tag form one
//! group. A tag that reappears later, after a different exercise, starts a
//! new group; every group gets its own [`GroupId`] so two groups never alias
//! even when the source reused the tag string.

use crate::{Error, Result, WorkoutDay, WorkoutExercise};
use serde::Serialize;

/// Identity of a superset group within one flattened sequence.
///
/// The value is the flat position of the group's first member.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct GroupId(pub usize);

/// One exercise of the flattened sequence
#[derive(Clone, Debug, Serialize)]
pub struct FlatExerciseEntry {
    /// Absolute position in the sequence
    pub position: usize,
    pub section_index: usize,
    pub section_name: String,
    pub exercise: WorkoutExercise,
    /// Set only for groups with more than one member
    pub group: Option<GroupId>,
    /// Flat positions of every group member, in order (empty when not a superset)
    pub members: Vec<usize>,
}

impl FlatExerciseEntry {
    pub fn is_superset(&self) -> bool {
        self.group.is_some()
    }

    pub fn set_count(&self) -> usize {
        self.exercise.sets.len()
    }
}

/// The flattened, cached form of a [`WorkoutDay`]
#[derive(Clone, Debug, Default, Serialize)]
pub struct FlatSequence {
    entries: Vec<FlatExerciseEntry>,
}

impl FlatSequence {
    pub fn entries(&self) -> &[FlatExerciseEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of prescribed sets over every entry
    pub fn total_sets(&self) -> usize {
        self.entries.iter().map(|e| e.set_count()).sum()
    }
}

/// Flatten a day into an ordered sequence.
///
/// Fails with [`Error::MalformedDay`] when an exercise has no sets, when set
/// numbers are not `1..=n` in order, or when a superset tag is blank.
pub fn flatten(day: &WorkoutDay) -> Result<FlatSequence> {
    validate_day(day)?;

    let mut entries: Vec<FlatExerciseEntry> = Vec::with_capacity(
        day.sections.iter().map(|s| s.exercises.len()).sum(),
    );

    for (section_index, section) in day.sections.iter().enumerate() {
        let exercises = &section.exercises;
        let mut i = 0;

        while i < exercises.len() {
            // Extent of the run of exercises sharing this exercise's tag
            let end = match exercises[i].superset_group.as_deref() {
                Some(tag) => {
                    let mut end = i + 1;
                    while end < exercises.len()
                        && exercises[end].superset_group.as_deref() == Some(tag)
                    {
                        end += 1;
                    }
                    end
                }
                None => i + 1,
            };

            let first = entries.len();
            let run = end - i;
            let (group, members) = if run > 1 {
                (Some(GroupId(first)), (first..first + run).collect())
            } else {
                (None, Vec::new())
            };

            for exercise in &exercises[i..end] {
                entries.push(FlatExerciseEntry {
                    position: entries.len(),
                    section_index,
                    section_name: section.name.clone(),
                    exercise: exercise.clone(),
                    group,
                    members: members.clone(),
                });
            }

            i = end;
        }
    }

    tracing::debug!(
        "Flattened day '{}' into {} entries ({} sets)",
        day.id,
        entries.len(),
        entries.iter().map(|e| e.set_count()).sum::<usize>()
    );

    Ok(FlatSequence { entries })
}

fn validate_day(day: &WorkoutDay) -> Result<()> {
    let malformed = |reason: String| Error::MalformedDay {
        day_id: day.id.clone(),
        reason,
    };

    for section in &day.sections {
        for exercise in &section.exercises {
            if exercise.sets.is_empty() {
                return Err(malformed(format!(
                    "exercise '{}' in section '{}' has no sets",
                    exercise.exercise_slot, section.name
                )));
            }

            if let Some(tag) = &exercise.superset_group {
                if tag.trim().is_empty() {
                    return Err(malformed(format!(
                        "exercise '{}' in section '{}' has a blank superset tag",
                        exercise.exercise_slot, section.name
                    )));
                }
            }

            for (i, set) in exercise.sets.iter().enumerate() {
                if set.set_number as usize != i + 1 {
                    return Err(malformed(format!(
                        "exercise '{}' has set number {} at position {}",
                        exercise.exercise_slot,
                        set.set_number,
                        i + 1
                    )));
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{Section, TargetSet};

    pub(crate) fn exercise(slot: &str, group: Option<&str>, sets: u32) -> WorkoutExercise {
        WorkoutExercise {
            exercise_slot: slot.into(),
            category_slot: "main".into(),
            superset_group: group.map(String::from),
            sets: (1..=sets).map(|n| TargetSet::new(n, "8")).collect(),
            is_per_side: false,
        }
    }

    pub(crate) fn day(sections: Vec<Vec<WorkoutExercise>>) -> WorkoutDay {
        WorkoutDay {
            id: "test_day".into(),
            name: "Test Day".into(),
            sections: sections
                .into_iter()
                .enumerate()
                .map(|(i, exercises)| Section {
                    name: format!("Section {}", i + 1),
                    exercises,
                })
                .collect(),
        }
    }

    #[test]
    fn test_flatten_preserves_order_and_sets() {
        let day = day(vec![
            vec![exercise("squat", None, 3), exercise("bench", None, 2)],
            vec![],
            vec![exercise("row", Some("1"), 2), exercise("curl", Some("1"), 2)],
        ]);

        let seq = flatten(&day).unwrap();

        let slots: Vec<_> = seq
            .entries()
            .iter()
            .map(|e| e.exercise.exercise_slot.as_str())
            .collect();
        assert_eq!(slots, vec!["squat", "bench", "row", "curl"]);
        assert_eq!(seq.total_sets(), day.total_sets());
        assert_eq!(seq.entries()[2].section_index, 2);
        for (i, entry) in seq.entries().iter().enumerate() {
            assert_eq!(entry.position, i);
        }
    }

    #[test]
    fn test_consecutive_tags_form_one_group() {
        let day = day(vec![vec![
            exercise("a", Some("1"), 2),
            exercise("b", Some("1"), 2),
            exercise("c", Some("1"), 2),
        ]]);

        let seq = flatten(&day).unwrap();

        for entry in seq.entries() {
            assert!(entry.is_superset());
            assert_eq!(entry.group, Some(GroupId(0)));
            assert_eq!(entry.members, vec![0, 1, 2]);
        }
    }

    #[test]
    fn test_reused_tag_after_gap_is_distinct_group() {
        let day = day(vec![vec![
            exercise("a", Some("1"), 2),
            exercise("b", Some("1"), 2),
            exercise("c", Some("2"), 2),
            exercise("d", Some("1"), 2),
            exercise("e", Some("1"), 2),
        ]]);

        let seq = flatten(&day).unwrap();
        let e = seq.entries();

        assert_eq!(e[0].group, Some(GroupId(0)));
        assert_eq!(e[1].group, Some(GroupId(0)));
        // "2" alone is a group of one
        assert!(!e[2].is_superset());
        assert_eq!(e[3].group, Some(GroupId(3)));
        assert_eq!(e[3].members, vec![3, 4]);
        assert_ne!(e[0].group, e[3].group);
    }

    #[test]
    fn test_same_tag_across_sections_does_not_join() {
        let day = day(vec![
            vec![exercise("a", Some("1"), 1)],
            vec![exercise("b", Some("1"), 1)],
        ]);

        let seq = flatten(&day).unwrap();

        assert!(!seq.entries()[0].is_superset());
        assert!(!seq.entries()[1].is_superset());
    }

    #[test]
    fn test_empty_set_list_is_malformed() {
        let day = day(vec![vec![exercise("a", None, 0)]]);

        let err = flatten(&day).unwrap_err();
        assert!(matches!(err, Error::MalformedDay { .. }));
    }

    #[test]
    fn test_blank_tag_is_malformed() {
        let day = day(vec![vec![exercise("a", Some("  "), 1)]]);

        assert!(matches!(
            flatten(&day),
            Err(Error::MalformedDay { .. })
        ));
    }

    #[test]
    fn test_out_of_order_set_numbers_are_malformed() {
        let mut ex = exercise("a", None, 2);
        ex.sets[1].set_number = 5;
        let day = day(vec![vec![ex]]);

        assert!(matches!(
            flatten(&day),
            Err(Error::MalformedDay { .. })
        ));
    }

    #[test]
    fn test_empty_day_flattens_to_nothing() {
        let day = day(vec![vec![], vec![]]);
        let seq = flatten(&day).unwrap();
        assert!(seq.is_empty());
        assert_eq!(seq.total_sets(), 0);
    }
}
