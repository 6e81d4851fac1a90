//! Course repository contract and SQLite implementation.
//!
//! # Invariants
//! - `courses.code` is unique; collisions surface as `ConflictKey::CourseCode`.
//! - Deleting a course cascades to its grades.

use crate::model::course::{Course, CourseDraft, CourseId};
use crate::repo::{
    classify_constraint, ensure_connection_ready, ConflictKey, ConstraintFailure, EntityKey,
    RepoError, RepoResult,
};
use rusqlite::{params, Connection, OptionalExtension, Row};

const COURSE_SELECT_SQL: &str = "SELECT id, name, code, credits FROM courses";

/// Repository interface for course CRUD operations.
pub trait CourseRepository {
    /// Inserts a course and returns its assigned id.
    fn create_course(&self, draft: &CourseDraft) -> RepoResult<CourseId>;
    fn update_course(&self, id: CourseId, draft: &CourseDraft) -> RepoResult<()>;
    fn get_course(&self, id: CourseId) -> RepoResult<Option<Course>>;
    fn find_course_by_code(&self, code: &str) -> RepoResult<Option<Course>>;
    /// Lists all courses ordered by id.
    fn list_courses(&self) -> RepoResult<Vec<Course>>;
    fn delete_course(&self, id: CourseId) -> RepoResult<()>;
}

impl<T: CourseRepository + ?Sized> CourseRepository for &T {
    fn create_course(&self, draft: &CourseDraft) -> RepoResult<CourseId> {
        (**self).create_course(draft)
    }

    fn update_course(&self, id: CourseId, draft: &CourseDraft) -> RepoResult<()> {
        (**self).update_course(id, draft)
    }

    fn get_course(&self, id: CourseId) -> RepoResult<Option<Course>> {
        (**self).get_course(id)
    }

    fn find_course_by_code(&self, code: &str) -> RepoResult<Option<Course>> {
        (**self).find_course_by_code(code)
    }

    fn list_courses(&self) -> RepoResult<Vec<Course>> {
        (**self).list_courses()
    }

    fn delete_course(&self, id: CourseId) -> RepoResult<()> {
        (**self).delete_course(id)
    }
}

/// SQLite-backed course repository.
#[derive(Clone, Copy)]
pub struct SqliteCourseRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCourseRepository<'conn> {
    /// Wraps a connection returned by `db::open_db*`.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl CourseRepository for SqliteCourseRepository<'_> {
    fn create_course(&self, draft: &CourseDraft) -> RepoResult<CourseId> {
        let id = self
            .conn
            .query_row(
                "INSERT INTO courses (name, code, credits)
                 VALUES (?1, ?2, ?3)
                 RETURNING id;",
                params![draft.name, draft.code, draft.credits],
                |row| row.get::<_, CourseId>(0),
            )
            .map_err(|err| map_write_error(err, draft))?;

        Ok(id)
    }

    fn update_course(&self, id: CourseId, draft: &CourseDraft) -> RepoResult<()> {
        let changed = self
            .conn
            .execute(
                "UPDATE courses SET name = ?1, code = ?2, credits = ?3 WHERE id = ?4;",
                params![draft.name, draft.code, draft.credits, id],
            )
            .map_err(|err| map_write_error(err, draft))?;

        if changed == 0 {
            return Err(RepoError::NotFound(EntityKey::Course(id)));
        }
        Ok(())
    }

    fn get_course(&self, id: CourseId) -> RepoResult<Option<Course>> {
        self.query_one(&format!("{COURSE_SELECT_SQL} WHERE id = ?1;"), id)
    }

    fn find_course_by_code(&self, code: &str) -> RepoResult<Option<Course>> {
        self.query_one(&format!("{COURSE_SELECT_SQL} WHERE code = ?1;"), code.trim())
    }

    fn list_courses(&self) -> RepoResult<Vec<Course>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{COURSE_SELECT_SQL} ORDER BY id ASC;"))?;
        let rows = stmt.query_map([], parse_course_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn delete_course(&self, id: CourseId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM courses WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(EntityKey::Course(id)));
        }
        Ok(())
    }
}

impl SqliteCourseRepository<'_> {
    fn query_one(&self, sql: &str, key: impl rusqlite::ToSql) -> RepoResult<Option<Course>> {
        Ok(self
            .conn
            .query_row(sql, [key], parse_course_row)
            .optional()?)
    }
}

fn parse_course_row(row: &Row<'_>) -> rusqlite::Result<Course> {
    Ok(Course {
        id: row.get("id")?,
        name: row.get("name")?,
        code: row.get("code")?,
        credits: row.get("credits")?,
    })
}

fn map_write_error(err: rusqlite::Error, draft: &CourseDraft) -> RepoError {
    match classify_constraint(&err) {
        Some(ConstraintFailure::Unique(columns)) if columns.contains("courses.code") => {
            RepoError::Conflict(ConflictKey::CourseCode(draft.code.clone()))
        }
        Some(ConstraintFailure::Unique(columns)) => {
            RepoError::Conflict(ConflictKey::Other(columns.to_string()))
        }
        _ => err.into(),
    }
}
