//! Use-case API for presentation collaborators.
//!
//! # Responsibility
//! - Expose every mutation as a uniform [`ActionResponse`].
//! - Expose reads and analytics as plain data that degrades to empty values.
//!
//! # Invariants
//! - No method returns `Err` or panics; every service failure becomes
//!   `ActionResponse::failure` with a human-readable message.
//! - Log lines carry ids and error kinds only, never names or emails.

use crate::analytics::{AnalyticsSnapshot, DEFAULT_TOP_STUDENTS};
use crate::db;
use crate::model::course::{Course, CourseId};
use crate::model::grade::{GradeId, GradeRecord};
use crate::model::student::Student;
use crate::repo::course_repo::SqliteCourseRepository;
use crate::repo::grade_repo::SqliteGradeRepository;
use crate::repo::student_repo::SqliteStudentRepository;
use crate::repo::RepoResult;
use crate::service::analytics_service::AnalyticsService;
use crate::service::course_service::CourseService;
use crate::service::error::{ServiceError, ServiceResult};
use crate::service::grade_service::GradeService;
use crate::service::seed_service::SeedService;
use crate::service::student_service::StudentService;
use log::{debug, warn};
use rand::Rng;
use rusqlite::Connection;
use serde::Serialize;

/// Outcome envelope for mutations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionResponse {
    /// Whether the operation succeeded.
    pub ok: bool,
    /// Human-readable message for display.
    pub message: String,
    /// Id of the created or updated entity, when there is one.
    pub entity_id: Option<String>,
}

impl ActionResponse {
    pub fn success(message: impl Into<String>, entity_id: Option<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
            entity_id,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
            entity_id: None,
        }
    }
}

type StudentRepo<'conn> = SqliteStudentRepository<'conn>;
type CourseRepo<'conn> = SqliteCourseRepository<'conn>;
type GradeRepo<'conn> = SqliteGradeRepository<'conn>;

/// Gradebook facade over one injected, migrated connection.
#[derive(Clone, Copy)]
pub struct Gradebook<'conn> {
    conn: &'conn Connection,
    students: StudentRepo<'conn>,
    courses: CourseRepo<'conn>,
    grades: GradeRepo<'conn>,
}

impl<'conn> Gradebook<'conn> {
    /// Binds the facade to a connection opened through `db::open_*`.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        Ok(Self {
            conn,
            students: SqliteStudentRepository::try_new(conn)?,
            courses: SqliteCourseRepository::try_new(conn)?,
            grades: SqliteGradeRepository::try_new(conn)?,
        })
    }

    fn student_service(&self) -> StudentService<StudentRepo<'conn>> {
        StudentService::new(self.students)
    }

    fn course_service(&self) -> CourseService<CourseRepo<'conn>> {
        CourseService::new(self.courses)
    }

    fn grade_service(
        &self,
    ) -> GradeService<StudentRepo<'conn>, CourseRepo<'conn>, GradeRepo<'conn>> {
        GradeService::new(self.students, self.courses, self.grades)
    }

    fn analytics_service(
        &self,
    ) -> AnalyticsService<StudentRepo<'conn>, CourseRepo<'conn>, GradeRepo<'conn>> {
        AnalyticsService::new(self.students, self.courses, self.grades)
    }

    // Students

    pub fn add_student(&self, name: &str, email: &str, enrollment_code: &str) -> ActionResponse {
        let outcome = self
            .student_service()
            .add_student(name, email, enrollment_code);
        finish("student_add", outcome, |student| {
            ActionResponse::success(
                format!("Student added successfully with ID: {}", student.id),
                Some(student.id.to_string()),
            )
        })
    }

    /// Updates a student; a different `new_id` renames it and its grades.
    pub fn update_student(
        &self,
        old_id: &str,
        new_id: Option<&str>,
        name: &str,
        email: &str,
    ) -> ActionResponse {
        let outcome = self
            .student_service()
            .update_student(old_id, new_id, name, email);
        finish("student_update", outcome, |student| {
            ActionResponse::success(
                "Student updated successfully",
                Some(student.id.to_string()),
            )
        })
    }

    pub fn delete_student(&self, id: &str) -> ActionResponse {
        let outcome = self.student_service().delete_student(id);
        finish("student_delete", outcome, |()| {
            ActionResponse::success("Student deleted successfully", None)
        })
    }

    pub fn get_student(&self, id: &str) -> Option<Student> {
        degrade("student_get", self.student_service().get_student(id))
    }

    pub fn list_students(&self) -> Vec<Student> {
        degrade("student_list", self.student_service().list_students())
    }

    // Courses

    pub fn add_course(&self, name: &str, code: &str, credits: i64) -> ActionResponse {
        let outcome = self.course_service().add_course(name, code, credits);
        finish("course_add", outcome, |course| {
            ActionResponse::success(
                format!("Course added successfully with ID: {}", course.id),
                Some(course.id.to_string()),
            )
        })
    }

    pub fn update_course(
        &self,
        id: CourseId,
        name: &str,
        code: &str,
        credits: i64,
    ) -> ActionResponse {
        let outcome = self.course_service().update_course(id, name, code, credits);
        finish("course_update", outcome, |course| {
            ActionResponse::success("Course updated successfully", Some(course.id.to_string()))
        })
    }

    pub fn delete_course(&self, id: CourseId) -> ActionResponse {
        let outcome = self.course_service().delete_course(id);
        finish("course_delete", outcome, |()| {
            ActionResponse::success("Course deleted successfully", None)
        })
    }

    pub fn get_course(&self, id: CourseId) -> Option<Course> {
        degrade("course_get", self.course_service().get_course(id))
    }

    pub fn find_course_by_code(&self, code: &str) -> Option<Course> {
        degrade("course_find", self.course_service().find_course_by_code(code))
    }

    pub fn list_courses(&self) -> Vec<Course> {
        degrade("course_list", self.course_service().list_courses())
    }

    // Grades

    /// Assigns a grade; an existing grade for the pair is overwritten.
    pub fn add_grade(&self, student_id: &str, course_id: CourseId, value: f64) -> ActionResponse {
        let outcome = self.grade_service().add_grade(student_id, course_id, value);
        finish("grade_add", outcome, |grade_id| {
            ActionResponse::success("Grade assigned successfully", Some(grade_id.to_string()))
        })
    }

    pub fn update_grade(&self, grade_id: GradeId, value: f64) -> ActionResponse {
        let outcome = self.grade_service().update_grade(grade_id, value);
        finish("grade_update", outcome, |()| {
            ActionResponse::success("Grade updated successfully", Some(grade_id.to_string()))
        })
    }

    pub fn update_grade_by_student_course(
        &self,
        student_id: &str,
        course_id: CourseId,
        value: f64,
    ) -> ActionResponse {
        let outcome = self
            .grade_service()
            .update_grade_by_student_course(student_id, course_id, value);
        finish("grade_update", outcome, |grade_id| {
            ActionResponse::success("Grade updated successfully", Some(grade_id.to_string()))
        })
    }

    pub fn delete_grade(&self, grade_id: GradeId) -> ActionResponse {
        let outcome = self.grade_service().delete_grade(grade_id);
        finish("grade_delete", outcome, |()| {
            ActionResponse::success("Grade deleted successfully", None)
        })
    }

    pub fn get_grade(&self, grade_id: GradeId) -> Option<GradeRecord> {
        degrade("grade_get", self.grade_service().get_grade(grade_id))
    }

    pub fn find_grade(&self, student_id: &str, course_id: CourseId) -> Option<GradeRecord> {
        degrade(
            "grade_find",
            self.grade_service().find_grade(student_id, course_id),
        )
    }

    pub fn list_grades(&self) -> Vec<GradeRecord> {
        degrade("grade_list", self.grade_service().list_grades())
    }

    pub fn student_grades(&self, student_id: &str) -> Vec<GradeRecord> {
        degrade(
            "student_grades",
            self.grade_service().student_grades(student_id),
        )
    }

    pub fn course_grades(&self, course_id: CourseId) -> Vec<GradeRecord> {
        degrade("course_grades", self.grade_service().course_grades(course_id))
    }

    // Analytics

    pub fn student_gpa(&self, student_id: &str) -> f64 {
        self.analytics_service().student_gpa(student_id)
    }

    pub fn analytics_snapshot(&self) -> AnalyticsSnapshot {
        self.analytics_snapshot_with_top(DEFAULT_TOP_STUDENTS)
    }

    pub fn analytics_snapshot_with_top(&self, top_n: usize) -> AnalyticsSnapshot {
        self.analytics_service().snapshot_with_top(top_n)
    }

    // Administration

    /// Deletes all students, courses and grades.
    pub fn reset_data(&self) -> ActionResponse {
        match db::reset_data(self.conn) {
            Ok(()) => ActionResponse::success("All data deleted successfully", None),
            Err(err) => {
                warn!("event=db_reset module=api status=error error={err}");
                ActionResponse::failure(format!("Error resetting data: {err}"))
            }
        }
    }

    /// Adds the sample cohort using `rng` for ids and grades.
    pub fn seed_sample_data<R: Rng + ?Sized>(&self, rng: &mut R) -> ActionResponse {
        let service = SeedService::new(self.students, self.courses, self.grades);
        match service.seed_sample_data(rng) {
            Ok(report) => ActionResponse::success(report.to_string(), None),
            Err(err) => {
                warn!(
                    "event=seed module=api status=error error_kind={}",
                    err.kind()
                );
                ActionResponse::failure(format!("Error seeding data: {err}"))
            }
        }
    }
}

fn finish<T>(
    event: &'static str,
    outcome: ServiceResult<T>,
    on_ok: impl FnOnce(T) -> ActionResponse,
) -> ActionResponse {
    match outcome {
        Ok(value) => {
            let response = on_ok(value);
            debug!(
                "event={event} module=api status=ok entity_id={}",
                response.entity_id.as_deref().unwrap_or("-")
            );
            response
        }
        Err(err) => {
            warn!(
                "event={event} module=api status=error error_kind={}",
                err.kind()
            );
            ActionResponse::failure(failure_message(&err))
        }
    }
}

fn failure_message(err: &ServiceError) -> String {
    match err {
        ServiceError::Store(inner) => format!("Database error: {inner}"),
        other => capitalize(&other.to_string()),
    }
}

fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn degrade<T: Default>(event: &'static str, outcome: ServiceResult<T>) -> T {
    outcome.unwrap_or_else(|err| {
        warn!(
            "event={event} module=api status=degraded error_kind={}",
            err.kind()
        );
        T::default()
    })
}
