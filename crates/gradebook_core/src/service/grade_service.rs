//! Grade use-case service.
//!
//! # Responsibility
//! - Validate grade values and the existence of referenced entities.
//! - Assign grades with upsert semantics on `(student, course)`.
//!
//! # Invariants
//! - Assignment never creates a second row for the same pair.
//! - Value validation runs before any existence lookup.

use crate::model::course::CourseId;
use crate::model::grade::{validate_grade_value, GradeId, GradeRecord};
use crate::model::student::StudentId;
use crate::repo::course_repo::CourseRepository;
use crate::repo::grade_repo::GradeRepository;
use crate::repo::student_repo::StudentRepository;
use crate::repo::EntityKey;
use crate::service::error::{ServiceError, ServiceResult};
use crate::service::student_service::parse_existing_id;

/// Grade service facade. Needs student and course access for existence
/// checks.
pub struct GradeService<S, C, G>
where
    S: StudentRepository,
    C: CourseRepository,
    G: GradeRepository,
{
    students: S,
    courses: C,
    grades: G,
}

impl<S, C, G> GradeService<S, C, G>
where
    S: StudentRepository,
    C: CourseRepository,
    G: GradeRepository,
{
    pub fn new(students: S, courses: C, grades: G) -> Self {
        Self {
            students,
            courses,
            grades,
        }
    }

    /// Assigns a grade, overwriting any existing grade for the pair.
    ///
    /// Returns the id of the created or overwritten grade.
    pub fn add_grade(
        &self,
        student_id: &str,
        course_id: CourseId,
        value: f64,
    ) -> ServiceResult<GradeId> {
        self.assign(student_id, course_id, value)
    }

    /// Sets the grade for a pair, creating it when absent.
    pub fn update_grade_by_student_course(
        &self,
        student_id: &str,
        course_id: CourseId,
        value: f64,
    ) -> ServiceResult<GradeId> {
        self.assign(student_id, course_id, value)
    }

    /// Changes the value of an existing grade by id.
    pub fn update_grade(&self, grade_id: GradeId, value: f64) -> ServiceResult<()> {
        let value = validate_grade_value(value)?;
        self.grades.update_grade_value(grade_id, value)?;
        Ok(())
    }

    pub fn delete_grade(&self, grade_id: GradeId) -> ServiceResult<()> {
        self.grades.delete_grade(grade_id)?;
        Ok(())
    }

    pub fn get_grade(&self, grade_id: GradeId) -> ServiceResult<Option<GradeRecord>> {
        Ok(self.grades.get_grade(grade_id)?)
    }

    pub fn find_grade(
        &self,
        student_id: &str,
        course_id: CourseId,
    ) -> ServiceResult<Option<GradeRecord>> {
        match StudentId::parse(student_id) {
            Ok(id) => Ok(self.grades.find_grade(&id, course_id)?),
            Err(_) => Ok(None),
        }
    }

    /// Lists every grade ordered by id.
    pub fn list_grades(&self) -> ServiceResult<Vec<GradeRecord>> {
        Ok(self.grades.list_grades()?)
    }

    /// Lists one student's grades ordered by course name.
    pub fn student_grades(&self, student_id: &str) -> ServiceResult<Vec<GradeRecord>> {
        match StudentId::parse(student_id) {
            Ok(id) => Ok(self.grades.list_student_grades(&id)?),
            Err(_) => Ok(Vec::new()),
        }
    }

    /// Lists one course's grades, best first.
    pub fn course_grades(&self, course_id: CourseId) -> ServiceResult<Vec<GradeRecord>> {
        Ok(self.grades.list_course_grades(course_id)?)
    }

    fn assign(&self, student_id: &str, course_id: CourseId, value: f64) -> ServiceResult<GradeId> {
        let value = validate_grade_value(value)?;

        let student_id = parse_existing_id(student_id)?;
        if self.students.get_student(&student_id)?.is_none() {
            return Err(ServiceError::NotFound(EntityKey::Student(
                student_id.to_string(),
            )));
        }
        if self.courses.get_course(course_id)?.is_none() {
            return Err(ServiceError::NotFound(EntityKey::Course(course_id)));
        }

        Ok(self.grades.upsert_grade(&student_id, course_id, value)?)
    }
}
