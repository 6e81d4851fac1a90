//! Grade domain model.
//!
//! # Invariants
//! - At most one grade exists per `(student_id, course_id)` pair.
//! - `value` is finite and within `[0, 100]`.

use crate::grading::{to_gpa_point, to_letter, LetterGrade};
use crate::model::course::CourseId;
use crate::model::student::StudentId;
use crate::model::validation::ValidationError;
use serde::{Deserialize, Serialize};

/// System-assigned grade handle.
pub type GradeId = i64;

pub const MIN_GRADE: f64 = 0.0;
pub const MAX_GRADE: f64 = 100.0;

/// Grade read model joined with its student and course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeRecord {
    pub id: GradeId,
    pub student_id: StudentId,
    pub student_name: String,
    pub course_id: CourseId,
    pub course_name: String,
    /// Credit weight of the course at read time.
    pub course_credits: u32,
    /// Raw score in `[0, 100]`.
    pub value: f64,
}

impl GradeRecord {
    pub fn letter(&self) -> LetterGrade {
        to_letter(self.value)
    }

    pub fn gpa_point(&self) -> f64 {
        to_gpa_point(self.value)
    }
}

/// Rejects NaN, infinities and values outside `[0, 100]`.
pub fn validate_grade_value(value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() && (MIN_GRADE..=MAX_GRADE).contains(&value) {
        Ok(value)
    } else {
        Err(ValidationError::GradeOutOfRange(value))
    }
}
