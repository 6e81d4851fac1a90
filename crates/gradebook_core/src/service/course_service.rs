//! Course use-case service.
//!
//! # Invariants
//! - Field validation runs before any storage access.
//! - Code uniqueness is enforced by the store's unique constraint, so a
//!   concurrent duplicate cannot slip between a check and the write.

use crate::model::course::{Course, CourseDraft, CourseId};
use crate::repo::course_repo::CourseRepository;
use crate::service::error::ServiceResult;

/// Course service facade over repository implementations.
pub struct CourseService<R: CourseRepository> {
    repo: R,
}

impl<R: CourseRepository> CourseService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn add_course(&self, name: &str, code: &str, credits: i64) -> ServiceResult<Course> {
        let draft = CourseDraft::new(name, code, credits)?;
        let id = self.repo.create_course(&draft)?;
        Ok(draft.into_course(id))
    }

    /// Replaces name, code and credits of an existing course.
    pub fn update_course(
        &self,
        id: CourseId,
        name: &str,
        code: &str,
        credits: i64,
    ) -> ServiceResult<Course> {
        let draft = CourseDraft::new(name, code, credits)?;
        self.repo.update_course(id, &draft)?;
        Ok(draft.into_course(id))
    }

    /// Deletes a course and, by cascade, all grades recorded for it.
    pub fn delete_course(&self, id: CourseId) -> ServiceResult<()> {
        self.repo.delete_course(id)?;
        Ok(())
    }

    pub fn get_course(&self, id: CourseId) -> ServiceResult<Option<Course>> {
        Ok(self.repo.get_course(id)?)
    }

    pub fn find_course_by_code(&self, code: &str) -> ServiceResult<Option<Course>> {
        Ok(self.repo.find_course_by_code(code)?)
    }

    /// Lists all courses ordered by id.
    pub fn list_courses(&self) -> ServiceResult<Vec<Course>> {
        Ok(self.repo.list_courses()?)
    }
}
