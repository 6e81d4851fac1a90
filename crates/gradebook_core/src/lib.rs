//! Core domain logic for the gradebook.
//! This crate is the single source of truth for grading rules and the
//! student/course/grade invariants.

pub mod analytics;
pub mod api;
pub mod config;
pub mod db;
pub mod grading;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use analytics::{AnalyticsSnapshot, CohortSummary, CourseSummary, StudentStanding};
pub use api::{ActionResponse, Gradebook};
pub use config::CoreConfig;
pub use grading::{has_failing_grade, to_gpa_point, to_letter, weighted_gpa, LetterGrade};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::course::{Course, CourseId};
pub use model::grade::{GradeId, GradeRecord};
pub use model::student::{Student, StudentId};
pub use model::validation::ValidationError;
pub use repo::{RepoError, RepoResult};
pub use service::error::{ServiceError, ServiceResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
