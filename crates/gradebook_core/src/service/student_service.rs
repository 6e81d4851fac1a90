//! Student use-case service.
//!
//! # Responsibility
//! - Validate student input and generate enrollment-based identifiers.
//! - Orchestrate create/rename/update/delete against the repository.
//!
//! # Invariants
//! - Id collisions on create are retried with a fresh random suffix, at most
//!   `MAX_STUDENT_ID_ATTEMPTS` times; email collisions are never retried.
//! - A rename and the field update happen in one repository write.
//! - Malformed ids on lookup paths behave as "not found".

use crate::model::student::{validate_email, validate_enrollment_code, Student, StudentId};
use crate::model::validation::ValidationError;
use crate::repo::student_repo::StudentRepository;
use crate::repo::{ConflictKey, EntityKey, RepoError};
use crate::service::error::{ServiceError, ServiceResult};
use log::debug;
use rand::Rng;

/// Upper bound on identifier draws per `add_student` call.
pub const MAX_STUDENT_ID_ATTEMPTS: usize = 32;

/// Student service facade over repository implementations.
pub struct StudentService<R: StudentRepository> {
    repo: R,
}

impl<R: StudentRepository> StudentService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers a student with a generated `<code>-NNNN` identifier.
    pub fn add_student(
        &self,
        name: &str,
        email: &str,
        enrollment_code: &str,
    ) -> ServiceResult<Student> {
        self.add_student_with_rng(&mut rand::thread_rng(), name, email, enrollment_code)
    }

    /// Same as [`Self::add_student`] with a caller-supplied random source.
    pub fn add_student_with_rng<G: Rng + ?Sized>(
        &self,
        rng: &mut G,
        name: &str,
        email: &str,
        enrollment_code: &str,
    ) -> ServiceResult<Student> {
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyStudentName.into());
        }
        let code = validate_enrollment_code(enrollment_code)?;
        validate_email(email)?;

        for attempt in 1..=MAX_STUDENT_ID_ATTEMPTS {
            let student = Student::from_input(StudentId::generate(code, rng)?, name, email)?;
            match self.repo.create_student(&student) {
                Ok(()) => return Ok(student),
                Err(RepoError::Conflict(ConflictKey::StudentId(taken))) => {
                    debug!(
                        "event=student_id_collision module=service status=retry student_id={taken} attempt={attempt}"
                    );
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(ServiceError::Conflict(ConflictKey::StudentIdsExhausted {
            enrollment_code: code.to_string(),
            attempts: MAX_STUDENT_ID_ATTEMPTS,
        }))
    }

    /// Updates name and email, optionally renaming the identifier.
    ///
    /// # Contract
    /// - `new_id` of `None`, blank, or equal to `old_id` keeps the id.
    /// - A different `new_id` must be `DDD-DDDD`; existing grades follow the
    ///   rename.
    pub fn update_student(
        &self,
        old_id: &str,
        new_id: Option<&str>,
        name: &str,
        email: &str,
    ) -> ServiceResult<Student> {
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyStudentName.into());
        }
        validate_email(email)?;

        let current = self.require_student(old_id)?;
        let target = match new_id.map(str::trim).filter(|value| !value.is_empty()) {
            Some(raw) if raw != current.as_str() => StudentId::parse(raw)?,
            _ => current.clone(),
        };

        let student = Student::from_input(target, name, email)?;
        self.repo.update_student(&current, &student)?;
        Ok(student)
    }

    /// Deletes a student and, by cascade, all of their grades.
    pub fn delete_student(&self, id: &str) -> ServiceResult<()> {
        let id = parse_existing_id(id)?;
        self.repo.delete_student(&id)?;
        Ok(())
    }

    pub fn get_student(&self, id: &str) -> ServiceResult<Option<Student>> {
        match StudentId::parse(id) {
            Ok(id) => Ok(self.repo.get_student(&id)?),
            Err(_) => Ok(None),
        }
    }

    /// Lists all students ordered by id.
    pub fn list_students(&self) -> ServiceResult<Vec<Student>> {
        Ok(self.repo.list_students()?)
    }

    fn require_student(&self, id: &str) -> ServiceResult<StudentId> {
        let id = parse_existing_id(id)?;
        match self.repo.get_student(&id)? {
            Some(student) => Ok(student.id),
            None => Err(ServiceError::NotFound(EntityKey::Student(id.to_string()))),
        }
    }
}

/// Parses an id that is expected to exist; malformed input cannot exist.
pub(crate) fn parse_existing_id(id: &str) -> ServiceResult<StudentId> {
    StudentId::parse(id)
        .map_err(|_| ServiceError::NotFound(EntityKey::Student(id.trim().to_string())))
}
