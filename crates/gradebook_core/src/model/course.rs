//! Course domain model.
//!
//! # Invariants
//! - `code` is unique across courses (enforced by storage).
//! - `credits` is strictly positive.

use crate::model::validation::ValidationError;
use serde::{Deserialize, Serialize};

/// System-assigned sequential course handle.
pub type CourseId = i64;

/// Canonical course record as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub name: String,
    pub code: String,
    pub credits: u32,
}

/// Validated course fields for create/update writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseDraft {
    pub name: String,
    pub code: String,
    pub credits: u32,
}

impl CourseDraft {
    /// Validates raw form input into a draft.
    ///
    /// Name and code are trimmed; credits must fit in `1..=u32::MAX`.
    pub fn new(name: &str, code: &str, credits: i64) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyCourseName);
        }
        let code = code.trim();
        if code.is_empty() {
            return Err(ValidationError::EmptyCourseCode);
        }
        let credits = u32::try_from(credits)
            .ok()
            .filter(|value| *value > 0)
            .ok_or(ValidationError::InvalidCredits(credits))?;

        Ok(Self {
            name: name.to_string(),
            code: code.to_string(),
            credits,
        })
    }

    /// Materializes the persisted record once storage assigned an id.
    pub fn into_course(self, id: CourseId) -> Course {
        Course {
            id,
            name: self.name,
            code: self.code,
            credits: self.credits,
        }
    }
}
