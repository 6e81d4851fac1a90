use gradebook_core::db::open_db_in_memory;
use gradebook_core::repo::course_repo::SqliteCourseRepository;
use gradebook_core::repo::grade_repo::{GradeRepository, SqliteGradeRepository};
use gradebook_core::repo::student_repo::SqliteStudentRepository;
use gradebook_core::repo::{EntityKey, RepoError};
use gradebook_core::service::course_service::CourseService;
use gradebook_core::service::grade_service::GradeService;
use gradebook_core::service::student_service::StudentService;
use gradebook_core::{Gradebook, LetterGrade, ServiceError, StudentId, ValidationError};
use rusqlite::Connection;

fn grade_row_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM grades;", [], |row| row.get(0))
        .unwrap()
}

struct Fixture {
    student_id: String,
    physics: i64,
    history: i64,
}

fn seed_minimal(conn: &Connection) -> Fixture {
    let students = StudentService::new(SqliteStudentRepository::try_new(conn).unwrap());
    let courses = CourseService::new(SqliteCourseRepository::try_new(conn).unwrap());
    let student = students.add_student("Ann", "ann@x.com", "201").unwrap();
    let physics = courses.add_course("Physics", "PHYS101", 4).unwrap();
    let history = courses.add_course("History", "HIST101", 3).unwrap();
    Fixture {
        student_id: student.id.to_string(),
        physics: physics.id,
        history: history.id,
    }
}

type SqliteGradeService<'conn> = GradeService<
    SqliteStudentRepository<'conn>,
    SqliteCourseRepository<'conn>,
    SqliteGradeRepository<'conn>,
>;

fn grade_service(conn: &Connection) -> SqliteGradeService<'_> {
    GradeService::new(
        SqliteStudentRepository::try_new(conn).unwrap(),
        SqliteCourseRepository::try_new(conn).unwrap(),
        SqliteGradeRepository::try_new(conn).unwrap(),
    )
}

#[test]
fn add_grade_twice_for_same_pair_overwrites() {
    let conn = open_db_in_memory().unwrap();
    let fixture = seed_minimal(&conn);
    let service = grade_service(&conn);

    let first = service
        .add_grade(&fixture.student_id, fixture.physics, 72.0)
        .unwrap();
    let second = service
        .add_grade(&fixture.student_id, fixture.physics, 93.5)
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(grade_row_count(&conn), 1);
    let grade = service
        .find_grade(&fixture.student_id, fixture.physics)
        .unwrap()
        .unwrap();
    assert_eq!(grade.value, 93.5);
    assert_eq!(grade.letter(), LetterGrade::A);
    assert_eq!(grade.gpa_point(), 4.0);
    assert_eq!(grade.student_name, "Ann");
    assert_eq!(grade.course_name, "Physics");
    assert_eq!(grade.course_credits, 4);
}

#[test]
fn add_grade_validates_value_and_references() {
    let conn = open_db_in_memory().unwrap();
    let fixture = seed_minimal(&conn);
    let service = grade_service(&conn);

    for value in [-0.5, 100.01, f64::NAN, f64::INFINITY] {
        let err = service
            .add_grade(&fixture.student_id, fixture.physics, value)
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Validation(ValidationError::GradeOutOfRange(_))
        ));
    }

    let missing_student = service.add_grade("209-0000", fixture.physics, 80.0).unwrap_err();
    assert!(matches!(
        missing_student,
        ServiceError::NotFound(EntityKey::Student(_))
    ));
    let malformed_student = service.add_grade("nobody", fixture.physics, 80.0).unwrap_err();
    assert!(matches!(
        malformed_student,
        ServiceError::NotFound(EntityKey::Student(_))
    ));
    let missing_course = service
        .add_grade(&fixture.student_id, 404, 80.0)
        .unwrap_err();
    assert!(matches!(
        missing_course,
        ServiceError::NotFound(EntityKey::Course(404))
    ));

    assert_eq!(grade_row_count(&conn), 0);
}

#[test]
fn boundary_grades_are_accepted() {
    let conn = open_db_in_memory().unwrap();
    let fixture = seed_minimal(&conn);
    let service = grade_service(&conn);

    service
        .add_grade(&fixture.student_id, fixture.physics, 0.0)
        .unwrap();
    service
        .add_grade(&fixture.student_id, fixture.history, 100.0)
        .unwrap();
    assert_eq!(grade_row_count(&conn), 2);
}

#[test]
fn update_by_pair_creates_missing_grade_then_overwrites() {
    let conn = open_db_in_memory().unwrap();
    let fixture = seed_minimal(&conn);
    let service = grade_service(&conn);

    let created = service
        .update_grade_by_student_course(&fixture.student_id, fixture.history, 55.0)
        .unwrap();
    let overwritten = service
        .update_grade_by_student_course(&fixture.student_id, fixture.history, 61.0)
        .unwrap();

    assert_eq!(created, overwritten);
    let grade = service.get_grade(created).unwrap().unwrap();
    assert_eq!(grade.value, 61.0);
    assert_eq!(grade.letter(), LetterGrade::D);
}

#[test]
fn update_and_delete_by_id_require_existing_grade() {
    let conn = open_db_in_memory().unwrap();
    let fixture = seed_minimal(&conn);
    let service = grade_service(&conn);
    let id = service
        .add_grade(&fixture.student_id, fixture.physics, 70.0)
        .unwrap();

    service.update_grade(id, 82.0).unwrap();
    assert_eq!(service.get_grade(id).unwrap().unwrap().value, 82.0);
    assert!(matches!(
        service.update_grade(id, 101.0).unwrap_err(),
        ServiceError::Validation(_)
    ));
    assert!(matches!(
        service.update_grade(id + 1, 50.0).unwrap_err(),
        ServiceError::NotFound(EntityKey::Grade(_))
    ));

    service.delete_grade(id).unwrap();
    assert_eq!(service.get_grade(id).unwrap(), None);
    assert!(matches!(
        service.delete_grade(id).unwrap_err(),
        ServiceError::NotFound(EntityKey::Grade(_))
    ));
}

#[test]
fn listings_follow_documented_order() {
    let conn = open_db_in_memory().unwrap();
    let book = Gradebook::try_new(&conn).unwrap();
    let zed = book.add_student("Zed", "zed@x.com", "201").entity_id.unwrap();
    let amy = book.add_student("Amy", "amy@x.com", "202").entity_id.unwrap();
    book.add_course("Physics", "PHYS101", 4);
    book.add_course("Chemistry", "CHEM101", 3);

    assert!(book.add_grade(&zed, 1, 80.0).ok);
    assert!(book.add_grade(&amy, 1, 80.0).ok);
    assert!(book.add_grade(&amy, 2, 95.0).ok);

    let all_ids: Vec<i64> = book.list_grades().iter().map(|grade| grade.id).collect();
    assert_eq!(all_ids, vec![1, 2, 3]);

    let amy_courses: Vec<String> = book
        .student_grades(&amy)
        .into_iter()
        .map(|grade| grade.course_name)
        .collect();
    assert_eq!(amy_courses, vec!["Chemistry", "Physics"]);

    let physics_names: Vec<String> = book
        .course_grades(1)
        .into_iter()
        .map(|grade| grade.student_name)
        .collect();
    assert_eq!(physics_names, vec!["Amy", "Zed"]);

    assert!(book.student_grades("not-an-id").is_empty());
    assert!(book.find_grade(&zed, 2).is_none());
}

#[test]
fn repository_upsert_maps_missing_parent_to_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteGradeRepository::try_new(&conn).unwrap();
    let ghost = StudentId::parse("201-0001").unwrap();

    let err = repo.upsert_grade(&ghost, 1, 75.0).unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound(EntityKey::GradeParent { course_id: 1, .. })
    ));
}

#[test]
fn api_grade_responses_carry_messages() {
    let conn = open_db_in_memory().unwrap();
    let fixture = seed_minimal(&conn);
    let book = Gradebook::try_new(&conn).unwrap();

    let assigned = book.add_grade(&fixture.student_id, fixture.physics, 88.0);
    assert!(assigned.ok);
    assert_eq!(assigned.message, "Grade assigned successfully");
    let grade_id: i64 = assigned.entity_id.unwrap().parse().unwrap();

    let updated = book.update_grade(grade_id, 91.0);
    assert!(updated.ok);
    assert_eq!(updated.message, "Grade updated successfully");

    let rejected = book.update_grade(grade_id, 140.0);
    assert!(!rejected.ok);
    assert_eq!(rejected.message, "Grade must be between 0 and 100, got 140");

    let deleted = book.delete_grade(grade_id);
    assert!(deleted.ok);
    let missing = book.delete_grade(grade_id);
    assert!(!missing.ok);
    assert_eq!(missing.message, format!("Grade with ID {grade_id} not found"));
}
