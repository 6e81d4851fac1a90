//! Read-only analytics over the whole store.
//!
//! # Responsibility
//! - Compute per-student GPA and the dashboard snapshot from repository
//!   listings.
//!
//! # Invariants
//! - The non-`try` entry points never fail: storage errors are logged and
//!   degrade to `0.0` or an empty snapshot.

use crate::analytics::{AnalyticsSnapshot, DEFAULT_TOP_STUDENTS};
use crate::grading::weighted_gpa;
use crate::model::student::StudentId;
use crate::repo::course_repo::CourseRepository;
use crate::repo::grade_repo::GradeRepository;
use crate::repo::student_repo::StudentRepository;
use crate::service::error::ServiceResult;
use log::warn;

pub struct AnalyticsService<S, C, G>
where
    S: StudentRepository,
    C: CourseRepository,
    G: GradeRepository,
{
    students: S,
    courses: C,
    grades: G,
}

impl<S, C, G> AnalyticsService<S, C, G>
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

    /// Credit-weighted GPA for one student; `0.0` when the student has no
    /// grades, does not exist, or the store cannot be read.
    pub fn student_gpa(&self, student_id: &str) -> f64 {
        let Ok(id) = StudentId::parse(student_id) else {
            return 0.0;
        };
        match self.grades.list_student_grades(&id) {
            Ok(grades) => weighted_gpa(
                grades
                    .iter()
                    .map(|grade| (grade.value, grade.course_credits)),
            ),
            Err(err) => {
                warn!("event=student_gpa module=analytics status=degraded error={err}");
                0.0
            }
        }
    }

    /// Snapshot with the default top-N per course.
    pub fn snapshot(&self) -> AnalyticsSnapshot {
        self.snapshot_with_top(DEFAULT_TOP_STUDENTS)
    }

    /// Snapshot that degrades to an empty one when the store fails.
    pub fn snapshot_with_top(&self, top_n: usize) -> AnalyticsSnapshot {
        match self.try_snapshot(top_n) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(
                    "event=analytics_snapshot module=analytics status=degraded error_kind={} error={err}",
                    err.kind()
                );
                AnalyticsSnapshot::default()
            }
        }
    }

    /// Fallible variant surfacing storage errors to the caller.
    pub fn try_snapshot(&self, top_n: usize) -> ServiceResult<AnalyticsSnapshot> {
        let students = self.students.list_students()?;
        let courses = self.courses.list_courses()?;
        let grades = self.grades.list_grades()?;
        Ok(AnalyticsSnapshot::build(&students, &courses, &grades, top_n))
    }
}
