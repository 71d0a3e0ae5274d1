//! Diff calculation between grade snapshots.
//!
//! Computes the field-level differences between the previously known
//! semesters of a student and a freshly walked set. Semesters and subjects
//! that did not exist before are reported as new and never diffed field by
//! field; only subjects present in both snapshots produce change events.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::{ChangeEvent, FieldKind, Semester, Subject};

/// A subject that appeared in an already known semester.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewSubject {
    pub semester: u32,
    pub name: String,
}

/// Result of comparing two snapshots.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct DiffResult {
    /// Field-level changes of pre-existing subjects
    pub changes: Vec<ChangeEvent>,
    /// Semesters with no previous counterpart
    pub new_semesters: Vec<u32>,
    /// Subjects with no previous counterpart in a known semester
    pub new_subjects: Vec<NewSubject>,
    /// Previously known semesters the current walk did not reach
    pub missing_semesters: Vec<u32>,
}

impl DiffResult {
    /// Check if any field changed.
    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    /// Get the number of field changes.
    pub fn change_count(&self) -> usize {
        self.changes.len()
    }
}

/// Compare `current` against `previous` for one student.
///
/// Fails with [`AppError::NoSemesters`] when `current` is empty: an empty walk
/// means nothing was read, which must not be mistaken for "no changes".
pub fn calculate_diff(
    student: &str,
    previous: &[Semester],
    current: &[Semester],
) -> Result<DiffResult> {
    if current.is_empty() {
        return Err(AppError::NoSemesters);
    }

    let mut prev_map: HashMap<u32, &Semester> = HashMap::new();
    for semester in previous {
        prev_map.entry(semester.number).or_insert(semester);
    }

    let mut result = DiffResult::default();

    for semester in current {
        let Some(known) = prev_map.get(&semester.number) else {
            result.new_semesters.push(semester.number);
            continue;
        };

        for subject in &semester.subjects {
            match known.subject(&subject.name) {
                Some(existing) => result
                    .changes
                    .extend(diff_subject(student, semester.number, existing, subject)),
                None => result.new_subjects.push(NewSubject {
                    semester: semester.number,
                    name: subject.name.clone(),
                }),
            }
        }
    }

    result.missing_semesters = previous
        .iter()
        .map(|s| s.number)
        .filter(|n| !current.iter().any(|s| s.number == *n))
        .collect();

    if !result.missing_semesters.is_empty() {
        log::warn!(
            "Walk for {} did not reach known semesters {:?}",
            student,
            result.missing_semesters
        );
    }

    Ok(result)
}

/// Events for every scored field whose text differs between the two records.
fn diff_subject<'a>(
    student: &'a str,
    semester: u32,
    previous: &'a Subject,
    current: &'a Subject,
) -> impl Iterator<Item = ChangeEvent> + 'a {
    FieldKind::ALL.into_iter().filter_map(move |field| {
        let old = field.value(previous);
        let new = field.value(current);
        (old != new).then(|| ChangeEvent {
            student: student.to_string(),
            semester,
            subject: current.name.clone(),
            field,
            previous_value: old.to_string(),
            new_value: new.to_string(),
        })
    })
}
