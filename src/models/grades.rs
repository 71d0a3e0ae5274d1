//! Grade records as rendered by the portal.

use serde::{Deserialize, Serialize};

/// One course's record within one term.
///
/// Score fields hold the cell text exactly as the portal renders it; blanks,
/// letters and numbers are all kept as text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Subject {
    /// Term this subject belongs to
    pub semester: u32,

    /// Course name, unique within a term
    pub name: String,

    pub test1: String,
    pub test2: String,
    pub test3: String,
    pub test4: String,
    pub rating: String,
    pub exam: String,

    /// Final grade
    pub grade: String,
}

impl Subject {
    /// Build a subject from one table row in column order
    /// name/test1/test2/test3/test4/rating/exam/grade.
    pub fn from_row(semester: u32, row: &[String; 8]) -> Self {
        let [name, test1, test2, test3, test4, rating, exam, grade] = row.clone();
        Self {
            semester,
            name,
            test1,
            test2,
            test3,
            test4,
            rating,
            exam,
            grade,
        }
    }
}

/// One term's subjects. Never empty when produced by the walker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Semester {
    /// 1-based term number
    pub number: u32,

    #[serde(default)]
    pub subjects: Vec<Subject>,
}

impl Semester {
    pub fn new(number: u32, subjects: Vec<Subject>) -> Self {
        Self { number, subjects }
    }

    /// Find a subject by name. The first match wins on duplicate names.
    pub fn subject(&self, name: &str) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.name == name)
    }
}
