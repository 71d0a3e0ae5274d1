//! Field-level change events.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Subject;

/// A scored column of the grades table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    Test1,
    Test2,
    Test3,
    Test4,
    Rating,
    Exam,
    Total,
}

impl FieldKind {
    /// Every scored field, in table column order.
    pub const ALL: [FieldKind; 7] = [
        FieldKind::Test1,
        FieldKind::Test2,
        FieldKind::Test3,
        FieldKind::Test4,
        FieldKind::Rating,
        FieldKind::Exam,
        FieldKind::Total,
    ];

    /// Read this field from a subject.
    pub fn value<'a>(&self, subject: &'a Subject) -> &'a str {
        match self {
            FieldKind::Test1 => &subject.test1,
            FieldKind::Test2 => &subject.test2,
            FieldKind::Test3 => &subject.test3,
            FieldKind::Test4 => &subject.test4,
            FieldKind::Rating => &subject.rating,
            FieldKind::Exam => &subject.exam,
            FieldKind::Total => &subject.grade,
        }
    }

    /// Column label used by the portal.
    pub fn label(&self) -> &'static str {
        match self {
            FieldKind::Test1 => "TK1",
            FieldKind::Test2 => "PK1",
            FieldKind::Test3 => "TK2",
            FieldKind::Test4 => "PK2",
            FieldKind::Rating => "Rating",
            FieldKind::Exam => "Exam",
            FieldKind::Total => "Total",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single detected difference in one field of one subject.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChangeEvent {
    /// Portal login of the student
    pub student: String,

    pub semester: u32,

    pub subject: String,

    pub field: FieldKind,

    pub previous_value: String,

    pub new_value: String,
}

impl ChangeEvent {
    /// Format the event for display using a template.
    ///
    /// Supported placeholders:
    /// - `{student}`, `{semester}`, `{subject}`, `{field}`
    /// - `{previous}`, `{value}`
    pub fn format(&self, template: &str) -> String {
        template
            .replace("{student}", &self.student)
            .replace("{semester}", &self.semester.to_string())
            .replace("{subject}", &self.subject)
            .replace("{field}", self.field.label())
            .replace("{previous}", &self.previous_value)
            .replace("{value}", &self.new_value)
    }
}
