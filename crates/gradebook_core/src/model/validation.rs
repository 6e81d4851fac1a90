//! Field-level validation errors.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Input shape or range problem detected before touching storage.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Student name is blank after trim.
    EmptyStudentName,
    /// Enrollment code is not exactly three ASCII digits.
    InvalidEnrollmentCode(String),
    /// Email is blank after trim.
    EmptyEmail,
    /// Email does not look like `local@domain.tld`.
    InvalidEmail(String),
    /// Student identifier does not match `DDD-DDDD`.
    InvalidStudentId(String),
    /// Course name is blank after trim.
    EmptyCourseName,
    /// Course code is blank after trim.
    EmptyCourseCode,
    /// Credit count is zero, negative or too large.
    InvalidCredits(i64),
    /// Grade is NaN, infinite or outside `[0, 100]`.
    GradeOutOfRange(f64),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyStudentName => write!(f, "student name cannot be empty"),
            Self::InvalidEnrollmentCode(value) => {
                write!(f, "enrollment code must be a 3-digit number, got `{value}`")
            }
            Self::EmptyEmail => write!(f, "email cannot be empty"),
            Self::InvalidEmail(value) => write!(f, "invalid email format: `{value}`"),
            Self::InvalidStudentId(value) => {
                write!(f, "student ID must be in format DDD-DDDD, got `{value}`")
            }
            Self::EmptyCourseName => write!(f, "course name cannot be empty"),
            Self::EmptyCourseCode => write!(f, "course code is required"),
            Self::InvalidCredits(value) => {
                write!(f, "credits must be a positive number, got {value}")
            }
            Self::GradeOutOfRange(value) => {
                write!(f, "grade must be between 0 and 100, got {value}")
            }
        }
    }
}

impl Error for ValidationError {}
