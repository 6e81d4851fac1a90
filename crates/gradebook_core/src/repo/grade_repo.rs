//! Grade repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist grades keyed by `(student_id, course_id)`.
//! - Serve joined read models carrying student/course names and credits.
//!
//! # Invariants
//! - Assignment is one `INSERT .. ON CONFLICT DO UPDATE` statement, so two
//!   concurrent writers for the same pair can never produce two rows.
//! - Course grade listing order: `grade DESC, student name ASC, id ASC`.

use crate::model::course::CourseId;
use crate::model::grade::{validate_grade_value, GradeId, GradeRecord};
use crate::model::student::StudentId;
use crate::repo::{
    classify_constraint, ensure_connection_ready, ConstraintFailure, EntityKey, RepoError,
    RepoResult,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const GRADE_SELECT_SQL: &str = "SELECT
    g.id AS id,
    g.student_id AS student_id,
    s.name AS student_name,
    g.course_id AS course_id,
    c.name AS course_name,
    c.credits AS course_credits,
    g.grade AS grade
FROM grades g
INNER JOIN students s ON s.student_id = g.student_id
INNER JOIN courses c ON c.id = g.course_id";

/// Repository interface for grade operations.
pub trait GradeRepository {
    /// Inserts or overwrites the grade for a `(student, course)` pair and
    /// returns the row id, which is stable across overwrites.
    fn upsert_grade(
        &self,
        student_id: &StudentId,
        course_id: CourseId,
        value: f64,
    ) -> RepoResult<GradeId>;
    fn update_grade_value(&self, id: GradeId, value: f64) -> RepoResult<()>;
    fn get_grade(&self, id: GradeId) -> RepoResult<Option<GradeRecord>>;
    fn find_grade(
        &self,
        student_id: &StudentId,
        course_id: CourseId,
    ) -> RepoResult<Option<GradeRecord>>;
    /// Lists every grade ordered by id.
    fn list_grades(&self) -> RepoResult<Vec<GradeRecord>>;
    /// Lists one student's grades ordered by course name.
    fn list_student_grades(&self, student_id: &StudentId) -> RepoResult<Vec<GradeRecord>>;
    /// Lists one course's grades, best first.
    fn list_course_grades(&self, course_id: CourseId) -> RepoResult<Vec<GradeRecord>>;
    fn delete_grade(&self, id: GradeId) -> RepoResult<()>;
}

impl<T: GradeRepository + ?Sized> GradeRepository for &T {
    fn upsert_grade(
        &self,
        student_id: &StudentId,
        course_id: CourseId,
        value: f64,
    ) -> RepoResult<GradeId> {
        (**self).upsert_grade(student_id, course_id, value)
    }

    fn update_grade_value(&self, id: GradeId, value: f64) -> RepoResult<()> {
        (**self).update_grade_value(id, value)
    }

    fn get_grade(&self, id: GradeId) -> RepoResult<Option<GradeRecord>> {
        (**self).get_grade(id)
    }

    fn find_grade(
        &self,
        student_id: &StudentId,
        course_id: CourseId,
    ) -> RepoResult<Option<GradeRecord>> {
        (**self).find_grade(student_id, course_id)
    }

    fn list_grades(&self) -> RepoResult<Vec<GradeRecord>> {
        (**self).list_grades()
    }

    fn list_student_grades(&self, student_id: &StudentId) -> RepoResult<Vec<GradeRecord>> {
        (**self).list_student_grades(student_id)
    }

    fn list_course_grades(&self, course_id: CourseId) -> RepoResult<Vec<GradeRecord>> {
        (**self).list_course_grades(course_id)
    }

    fn delete_grade(&self, id: GradeId) -> RepoResult<()> {
        (**self).delete_grade(id)
    }
}

/// SQLite-backed grade repository.
#[derive(Clone, Copy)]
pub struct SqliteGradeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteGradeRepository<'conn> {
    /// Wraps a connection returned by `db::open_db*`.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn query_grades(
        &self,
        filter_and_order: &str,
        binds: Vec<Value>,
    ) -> RepoResult<Vec<GradeRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{GRADE_SELECT_SQL} {filter_and_order};"))?;
        let mut rows = stmt.query(params_from_iter(binds))?;

        let mut grades = Vec::new();
        while let Some(row) = rows.next()? {
            grades.push(parse_grade_row(row)?);
        }
        Ok(grades)
    }
}

impl GradeRepository for SqliteGradeRepository<'_> {
    fn upsert_grade(
        &self,
        student_id: &StudentId,
        course_id: CourseId,
        value: f64,
    ) -> RepoResult<GradeId> {
        validate_grade_value(value)?;

        self.conn
            .query_row(
                "INSERT INTO grades (student_id, course_id, grade)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT (student_id, course_id)
                 DO UPDATE SET grade = excluded.grade
                 RETURNING id;",
                params![student_id.as_str(), course_id, value],
                |row| row.get::<_, GradeId>(0),
            )
            .map_err(|err| match classify_constraint(&err) {
                Some(ConstraintFailure::ForeignKey) => {
                    RepoError::NotFound(EntityKey::GradeParent {
                        student_id: student_id.to_string(),
                        course_id,
                    })
                }
                _ => err.into(),
            })
    }

    fn update_grade_value(&self, id: GradeId, value: f64) -> RepoResult<()> {
        validate_grade_value(value)?;

        let changed = self.conn.execute(
            "UPDATE grades SET grade = ?1 WHERE id = ?2;",
            params![value, id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(EntityKey::Grade(id)));
        }
        Ok(())
    }

    fn get_grade(&self, id: GradeId) -> RepoResult<Option<GradeRecord>> {
        let mut grades = self.query_grades("WHERE g.id = ?", vec![Value::Integer(id)])?;
        Ok(grades.pop())
    }

    fn find_grade(
        &self,
        student_id: &StudentId,
        course_id: CourseId,
    ) -> RepoResult<Option<GradeRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{GRADE_SELECT_SQL} WHERE g.student_id = ?1 AND g.course_id = ?2;"
        ))?;
        let mut rows = stmt.query(params![student_id.as_str(), course_id])?;
        rows.next()?.map(parse_grade_row).transpose()
    }

    fn list_grades(&self) -> RepoResult<Vec<GradeRecord>> {
        self.query_grades("ORDER BY g.id ASC", Vec::new())
    }

    fn list_student_grades(&self, student_id: &StudentId) -> RepoResult<Vec<GradeRecord>> {
        self.query_grades(
            "WHERE g.student_id = ? ORDER BY c.name ASC, g.course_id ASC",
            vec![Value::Text(student_id.to_string())],
        )
    }

    fn list_course_grades(&self, course_id: CourseId) -> RepoResult<Vec<GradeRecord>> {
        self.query_grades(
            "WHERE g.course_id = ? ORDER BY g.grade DESC, s.name ASC, g.student_id ASC",
            vec![Value::Integer(course_id)],
        )
    }

    fn delete_grade(&self, id: GradeId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM grades WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(EntityKey::Grade(id)));
        }
        Ok(())
    }
}

fn parse_grade_row(row: &Row<'_>) -> RepoResult<GradeRecord> {
    let student_text: String = row.get("student_id")?;
    let student_id = StudentId::parse(&student_text).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid student id `{student_text}` in grades.student_id"
        ))
    })?;

    let value: f64 = row.get("grade")?;
    let value = validate_grade_value(value).map_err(|_| {
        RepoError::InvalidData(format!("invalid grade value `{value}` in grades.grade"))
    })?;

    Ok(GradeRecord {
        id: row.get("id")?,
        student_id,
        student_name: row.get("student_name")?,
        course_id: row.get("course_id")?,
        course_name: row.get("course_name")?,
        course_credits: row.get("course_credits")?,
        value,
    })
}
