//! Student repository contract and SQLite implementation.
//!
//! # Invariants
//! - `students.student_id` and `students.email` are unique.
//! - Renaming a student cascades to `grades.student_id` through
//!   `ON UPDATE CASCADE`; deleting cascades through `ON DELETE CASCADE`.

use crate::model::student::{Student, StudentId};
use crate::repo::{
    classify_constraint, ensure_connection_ready, ConflictKey, ConstraintFailure, EntityKey,
    RepoError, RepoResult,
};
use rusqlite::{params, Connection, OptionalExtension, Row};

const STUDENT_SELECT_SQL: &str = "SELECT student_id, name, email FROM students";

/// Repository interface for student CRUD operations.
pub trait StudentRepository {
    /// Inserts a new student. Fails with `Conflict` on a taken id or email.
    fn create_student(&self, student: &Student) -> RepoResult<()>;
    /// Replaces id, name and email of the student currently at `current_id`
    /// in one statement.
    fn update_student(&self, current_id: &StudentId, student: &Student) -> RepoResult<()>;
    fn get_student(&self, id: &StudentId) -> RepoResult<Option<Student>>;
    /// Lists all students ordered by id.
    fn list_students(&self) -> RepoResult<Vec<Student>>;
    /// Deletes the student and, by cascade, all of their grades.
    fn delete_student(&self, id: &StudentId) -> RepoResult<()>;
}

impl<T: StudentRepository + ?Sized> StudentRepository for &T {
    fn create_student(&self, student: &Student) -> RepoResult<()> {
        (**self).create_student(student)
    }

    fn update_student(&self, current_id: &StudentId, student: &Student) -> RepoResult<()> {
        (**self).update_student(current_id, student)
    }

    fn get_student(&self, id: &StudentId) -> RepoResult<Option<Student>> {
        (**self).get_student(id)
    }

    fn list_students(&self) -> RepoResult<Vec<Student>> {
        (**self).list_students()
    }

    fn delete_student(&self, id: &StudentId) -> RepoResult<()> {
        (**self).delete_student(id)
    }
}

/// SQLite-backed student repository.
#[derive(Clone, Copy)]
pub struct SqliteStudentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStudentRepository<'conn> {
    /// Wraps a connection returned by `db::open_db*`.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl StudentRepository for SqliteStudentRepository<'_> {
    fn create_student(&self, student: &Student) -> RepoResult<()> {
        student.validate()?;

        self.conn
            .execute(
                "INSERT INTO students (student_id, name, email) VALUES (?1, ?2, ?3);",
                params![student.id.as_str(), student.name, student.email],
            )
            .map_err(|err| map_write_error(err, student))?;

        Ok(())
    }

    fn update_student(&self, current_id: &StudentId, student: &Student) -> RepoResult<()> {
        student.validate()?;

        let changed = self
            .conn
            .execute(
                "UPDATE students
                 SET student_id = ?1, name = ?2, email = ?3
                 WHERE student_id = ?4;",
                params![
                    student.id.as_str(),
                    student.name,
                    student.email,
                    current_id.as_str(),
                ],
            )
            .map_err(|err| map_write_error(err, student))?;

        if changed == 0 {
            return Err(RepoError::NotFound(EntityKey::Student(
                current_id.to_string(),
            )));
        }
        Ok(())
    }

    fn get_student(&self, id: &StudentId) -> RepoResult<Option<Student>> {
        let row = self
            .conn
            .query_row(
                &format!("{STUDENT_SELECT_SQL} WHERE student_id = ?1;"),
                [id.as_str()],
                read_student_columns,
            )
            .optional()?;

        row.map(parse_student).transpose()
    }

    fn list_students(&self) -> RepoResult<Vec<Student>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{STUDENT_SELECT_SQL} ORDER BY student_id ASC;"))?;
        let rows = stmt.query_map([], read_student_columns)?;

        let mut students = Vec::new();
        for row in rows {
            students.push(parse_student(row?)?);
        }
        Ok(students)
    }

    fn delete_student(&self, id: &StudentId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM students WHERE student_id = ?1;", [id.as_str()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(EntityKey::Student(id.to_string())));
        }
        Ok(())
    }
}

type StudentColumns = (String, String, String);

fn read_student_columns(row: &Row<'_>) -> rusqlite::Result<StudentColumns> {
    Ok((row.get("student_id")?, row.get("name")?, row.get("email")?))
}

fn parse_student((id, name, email): StudentColumns) -> RepoResult<Student> {
    let id = StudentId::parse(&id).map_err(|_| {
        RepoError::InvalidData(format!("invalid student id `{id}` in students.student_id"))
    })?;
    Ok(Student { id, name, email })
}

fn map_write_error(err: rusqlite::Error, student: &Student) -> RepoError {
    match classify_constraint(&err) {
        Some(ConstraintFailure::Unique(columns)) if columns.contains("students.email") => {
            RepoError::Conflict(ConflictKey::StudentEmail(student.email.clone()))
        }
        Some(ConstraintFailure::Unique(columns)) if columns.contains("students.student_id") => {
            RepoError::Conflict(ConflictKey::StudentId(student.id.to_string()))
        }
        Some(ConstraintFailure::Unique(columns)) => {
            RepoError::Conflict(ConflictKey::Other(columns.to_string()))
        }
        _ => err.into(),
    }
}
