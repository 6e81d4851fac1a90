//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts per entity.
//! - Isolate SQLite query details from service orchestration.
//! - Translate SQLite constraint failures into semantic errors.
//!
//! # Invariants
//! - Repository writes validate records before SQL mutations.
//! - Uniqueness violations surface as `RepoError::Conflict`, never as raw
//!   SQLite errors.
//! - Missing rows on update/delete surface as `RepoError::NotFound`.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::course::CourseId;
use crate::model::grade::GradeId;
use crate::model::validation::ValidationError;
use rusqlite::{ffi, Connection, ErrorCode};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod course_repo;
pub mod grade_repo;
pub mod student_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Identifies the entity a lookup or mutation targeted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityKey {
    Student(String),
    Course(CourseId),
    Grade(GradeId),
    /// Student or course referenced by a grade write.
    GradeParent {
        student_id: String,
        course_id: CourseId,
    },
}

impl Display for EntityKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Student(id) => write!(f, "student with ID {id}"),
            Self::Course(id) => write!(f, "course with ID {id}"),
            Self::Grade(id) => write!(f, "grade with ID {id}"),
            Self::GradeParent {
                student_id,
                course_id,
            } => write!(f, "student {student_id} or course {course_id}"),
        }
    }
}

/// Unique key that a write collided with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictKey {
    StudentId(String),
    StudentEmail(String),
    CourseCode(String),
    /// Every generated id for an enrollment code was already taken.
    StudentIdsExhausted {
        enrollment_code: String,
        attempts: usize,
    },
    /// Any other unique constraint, carrying SQLite's column list.
    Other(String),
}

impl Display for ConflictKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StudentId(id) => write!(f, "student with ID {id} already exists"),
            Self::StudentEmail(email) => {
                write!(f, "student with email {email} already exists")
            }
            Self::CourseCode(code) => write!(f, "course with code {code} already exists"),
            Self::StudentIdsExhausted {
                enrollment_code,
                attempts,
            } => write!(
                f,
                "no free student ID for enrollment code {enrollment_code} after {attempts} attempts"
            ),
            Self::Other(columns) => write!(f, "unique constraint failed on {columns}"),
        }
    }
}

/// Repository error for gradebook persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    NotFound(EntityKey),
    Conflict(ConflictKey),
    /// Connection schema is not at the migrated version this build expects.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(key) => write!(f, "{key} not found"),
            Self::Conflict(key) => write!(f, "{key}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_)
            | Self::Conflict(_)
            | Self::UninitializedConnection { .. }
            | Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Constraint family behind a failed write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConstraintFailure<'a> {
    /// Unique or primary key; carries `table.column[, ...]`.
    Unique(&'a str),
    ForeignKey,
}

/// Classifies a SQLite error as a constraint failure the repositories map
/// to semantic errors. Other errors return `None`.
pub(crate) fn classify_constraint(err: &rusqlite::Error) -> Option<ConstraintFailure<'_>> {
    let rusqlite::Error::SqliteFailure(inner, message) = err else {
        return None;
    };
    if inner.code != ErrorCode::ConstraintViolation {
        return None;
    }

    match inner.extended_code {
        ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
            let columns = message
                .as_deref()
                .and_then(|text| text.strip_prefix("UNIQUE constraint failed: "))
                .unwrap_or_default();
            Some(ConstraintFailure::Unique(columns))
        }
        ffi::SQLITE_CONSTRAINT_FOREIGNKEY => Some(ConstraintFailure::ForeignKey),
        _ => None,
    }
}

/// Rejects connections that were not bootstrapped through `db::open_*`.
pub(crate) fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let expected_version = latest_version();
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }
    Ok(())
}
