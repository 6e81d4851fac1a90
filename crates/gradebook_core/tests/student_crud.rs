use gradebook_core::db::open_db_in_memory;
use gradebook_core::repo::student_repo::SqliteStudentRepository;
use gradebook_core::repo::{ConflictKey, EntityKey};
use gradebook_core::service::student_service::{StudentService, MAX_STUDENT_ID_ATTEMPTS};
use gradebook_core::{Gradebook, ServiceError, ValidationError};
use rand::rngs::mock::StepRng;
use rand::rngs::StdRng;
use rand::SeedableRng;
use regex::Regex;

#[test]
fn add_student_generates_enrollment_prefixed_id() {
    let conn = open_db_in_memory().unwrap();
    let service = StudentService::new(SqliteStudentRepository::try_new(&conn).unwrap());

    let student = service
        .add_student(" Jane ", "jane@x.com", "201")
        .unwrap();

    let pattern = Regex::new(r"^201-\d{4}$").unwrap();
    assert!(pattern.is_match(student.id.as_str()));
    assert_eq!(student.id.enrollment_code(), "201");
    assert_eq!(student.name, "Jane");
    assert_eq!(student.email, "jane@outlook.com");

    let loaded = service.get_student(student.id.as_str()).unwrap().unwrap();
    assert_eq!(loaded, student);
}

#[test]
fn add_student_rejects_invalid_fields_before_writing() {
    let conn = open_db_in_memory().unwrap();
    let service = StudentService::new(SqliteStudentRepository::try_new(&conn).unwrap());

    let cases = [
        ("  ", "a@x.com", "201"),
        ("Ann", "a@x.com", "21"),
        ("Ann", "a@x.com", "2a1"),
        ("Ann", "not-an-email", "201"),
    ];
    for (name, email, code) in cases {
        let err = service.add_student(name, email, code).unwrap_err();
        assert!(
            matches!(err, ServiceError::Validation(_)),
            "expected validation error for {name:?}/{email:?}/{code:?}, got {err}"
        );
    }
    assert!(service.list_students().unwrap().is_empty());
}

#[test]
fn add_student_with_taken_email_is_a_conflict() {
    let conn = open_db_in_memory().unwrap();
    let service = StudentService::new(SqliteStudentRepository::try_new(&conn).unwrap());

    service.add_student("Ann", "ann@x.com", "201").unwrap();
    let err = service
        .add_student("Ann Other", "ann@elsewhere.org", "202")
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "student with email ann@outlook.com already exists"
    );
    assert!(matches!(
        err,
        ServiceError::Conflict(ConflictKey::StudentEmail(_))
    ));
    assert_eq!(service.list_students().unwrap().len(), 1);
}

#[test]
fn id_collisions_retry_until_attempts_run_out() {
    let conn = open_db_in_memory().unwrap();
    let service = StudentService::new(SqliteStudentRepository::try_new(&conn).unwrap());
    let mut constant = StepRng::new(0, 0);

    let first = service
        .add_student_with_rng(&mut constant, "Ann", "ann@x.com", "201")
        .unwrap();
    let err = service
        .add_student_with_rng(&mut constant, "Bob", "bob@x.com", "201")
        .unwrap_err();

    match err {
        ServiceError::Conflict(ConflictKey::StudentIdsExhausted {
            enrollment_code,
            attempts,
        }) => {
            assert_eq!(enrollment_code, "201");
            assert_eq!(attempts, MAX_STUDENT_ID_ATTEMPTS);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(service.list_students().unwrap(), vec![first]);
}

#[test]
fn seeded_rng_gives_reproducible_ids() {
    let first_conn = open_db_in_memory().unwrap();
    let second_conn = open_db_in_memory().unwrap();
    let first = StudentService::new(SqliteStudentRepository::try_new(&first_conn).unwrap());
    let second = StudentService::new(SqliteStudentRepository::try_new(&second_conn).unwrap());

    let a = first
        .add_student_with_rng(&mut StdRng::seed_from_u64(42), "Ann", "ann@x.com", "203")
        .unwrap();
    let b = second
        .add_student_with_rng(&mut StdRng::seed_from_u64(42), "Ann", "ann@x.com", "203")
        .unwrap();
    assert_eq!(a.id, b.id);
}

#[test]
fn update_student_keeps_id_when_new_id_is_blank_or_same() {
    let conn = open_db_in_memory().unwrap();
    let service = StudentService::new(SqliteStudentRepository::try_new(&conn).unwrap());
    let student = service.add_student("Ann", "ann@x.com", "201").unwrap();
    let id = student.id.to_string();

    let updated = service
        .update_student(&id, Some("  "), "Ann Lee", "ann.lee@gmail.com")
        .unwrap();
    assert_eq!(updated.id, student.id);
    assert_eq!(updated.name, "Ann Lee");
    assert_eq!(updated.email, "ann.lee@outlook.com");

    let again = service
        .update_student(&id, Some(id.as_str()), "Ann Lee", "ann.lee@gmail.com")
        .unwrap();
    assert_eq!(again.id, student.id);
    assert_eq!(service.list_students().unwrap().len(), 1);
}

#[test]
fn update_student_rejects_missing_and_malformed_targets() {
    let conn = open_db_in_memory().unwrap();
    let service = StudentService::new(SqliteStudentRepository::try_new(&conn).unwrap());
    let student = service.add_student("Ann", "ann@x.com", "201").unwrap();

    let missing = service
        .update_student("999-9999", None, "Ann", "ann@x.com")
        .unwrap_err();
    assert!(matches!(
        missing,
        ServiceError::NotFound(EntityKey::Student(ref id)) if id == "999-9999"
    ));

    let malformed = service
        .update_student(student.id.as_str(), Some("12-345"), "Ann", "ann@x.com")
        .unwrap_err();
    assert!(matches!(
        malformed,
        ServiceError::Validation(ValidationError::InvalidStudentId(_))
    ));
}

#[test]
fn rename_to_taken_id_is_a_conflict() {
    let conn = open_db_in_memory().unwrap();
    let service = StudentService::new(SqliteStudentRepository::try_new(&conn).unwrap());
    let ann = service.add_student("Ann", "ann@x.com", "201").unwrap();
    let bob = service.add_student("Bob", "bob@x.com", "202").unwrap();

    let err = service
        .update_student(ann.id.as_str(), Some(bob.id.as_str()), "Ann", "ann@x.com")
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Conflict(ConflictKey::StudentId(_))
    ));
}

#[test]
fn rename_moves_existing_grades_to_new_id() {
    let conn = open_db_in_memory().unwrap();
    let book = Gradebook::try_new(&conn).unwrap();
    let old_id = book
        .add_student("Ann", "ann@x.com", "201")
        .entity_id
        .unwrap();
    book.add_course("Physics", "PHYS101", 4);
    book.add_course("History", "HIST101", 3);
    assert!(book.add_grade(&old_id, 1, 91.0).ok);
    assert!(book.add_grade(&old_id, 2, 72.0).ok);

    let response = book.update_student(&old_id, Some("305-0001"), "Ann", "ann@x.com");
    assert!(response.ok, "{}", response.message);
    assert_eq!(response.entity_id.as_deref(), Some("305-0001"));

    assert!(book.get_student(&old_id).is_none());
    assert!(book.student_grades(&old_id).is_empty());
    let moved = book.student_grades("305-0001");
    assert_eq!(moved.len(), 2);
    assert!(moved.iter().all(|grade| grade.student_id.as_str() == "305-0001"));
}

#[test]
fn delete_student_cascades_to_grades() {
    let conn = open_db_in_memory().unwrap();
    let book = Gradebook::try_new(&conn).unwrap();
    let id = book
        .add_student("Ann", "ann@x.com", "201")
        .entity_id
        .unwrap();
    book.add_course("Physics", "PHYS101", 4);
    assert!(book.add_grade(&id, 1, 91.0).ok);

    let response = book.delete_student(&id);
    assert!(response.ok);
    assert_eq!(response.message, "Student deleted successfully");
    assert!(book.student_grades(&id).is_empty());
    assert!(book.list_grades().is_empty());

    let again = book.delete_student(&id);
    assert!(!again.ok);
    assert_eq!(again.message, format!("Student with ID {id} not found"));
}

#[test]
fn lookups_with_malformed_ids_behave_as_missing() {
    let conn = open_db_in_memory().unwrap();
    let service = StudentService::new(SqliteStudentRepository::try_new(&conn).unwrap());

    assert_eq!(service.get_student("garbage").unwrap(), None);
    assert!(matches!(
        service.delete_student("garbage").unwrap_err(),
        ServiceError::NotFound(_)
    ));
}

#[test]
fn list_students_is_ordered_by_id() {
    let conn = open_db_in_memory().unwrap();
    let service = StudentService::new(SqliteStudentRepository::try_new(&conn).unwrap());
    service.add_student("Zed", "zed@x.com", "204").unwrap();
    service.add_student("Amy", "amy@x.com", "201").unwrap();
    service.add_student("Kai", "kai@x.com", "203").unwrap();

    let codes: Vec<String> = service
        .list_students()
        .unwrap()
        .iter()
        .map(|student| student.id.enrollment_code().to_string())
        .collect();
    assert_eq!(codes, vec!["201", "203", "204"]);
}
