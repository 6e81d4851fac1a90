//! Read-only grade analytics.
//!
//! # Responsibility
//! - Turn student/course/grade listings into per-student standings,
//!   per-course summaries and a cohort summary.
//!
//! # Invariants
//! - Building a snapshot is pure; it never touches storage.
//! - Rankings are total orders, so equal inputs give equal snapshots.

mod snapshot;

pub use snapshot::{
    is_at_risk, AnalyticsSnapshot, CohortSummary, CourseSummary, RankedStudent, StudentStanding,
    DEFAULT_TOP_STUDENTS, HONOR_GPA, PASSING_GPA,
};
