use gradebook_core::db::open_db_in_memory;
use gradebook_core::{ActionResponse, Gradebook};
use regex::Regex;

#[test]
fn add_student_reports_generated_id() {
    let conn = open_db_in_memory().unwrap();
    let book = Gradebook::try_new(&conn).unwrap();

    let response = book.add_student("Jane", "jane@x.com", "201");

    assert!(response.ok);
    let id = response.entity_id.clone().unwrap();
    assert!(Regex::new(r"^201-\d{4}$").unwrap().is_match(&id));
    assert_eq!(
        response.message,
        format!("Student added successfully with ID: {id}")
    );
}

#[test]
fn validation_failures_become_failure_responses() {
    let conn = open_db_in_memory().unwrap();
    let book = Gradebook::try_new(&conn).unwrap();

    let cases = [
        (
            book.add_student("", "a@x.com", "201"),
            "Student name cannot be empty",
        ),
        (
            book.add_student("Ann", "a@x.com", "2010"),
            "Enrollment code must be a 3-digit number, got `2010`",
        ),
        (
            book.add_student("Ann", "a.x.com", "201"),
            "Invalid email format: `a.x.com`",
        ),
        (
            book.add_course("Art", "", 2),
            "Course code is required",
        ),
        (
            book.add_course("Art", "ART101", 0),
            "Credits must be a positive number, got 0",
        ),
    ];

    for (response, message) in cases {
        assert_eq!(response, ActionResponse::failure(message));
    }
    assert!(book.list_students().is_empty());
    assert!(book.list_courses().is_empty());
}

#[test]
fn missing_entities_fail_without_side_effects() {
    let conn = open_db_in_memory().unwrap();
    let book = Gradebook::try_new(&conn).unwrap();

    let update = book.update_student("201-0000", None, "Ghost", "ghost@x.com");
    assert!(!update.ok);
    assert_eq!(update.message, "Student with ID 201-0000 not found");

    let course = book.update_course(7, "Ghost", "GHO101", 3);
    assert_eq!(course.message, "Course with ID 7 not found");

    let grade = book.add_grade("201-0000", 1, 50.0);
    assert!(!grade.ok);
    assert_eq!(grade.message, "Student with ID 201-0000 not found");

    let by_pair = book.update_grade_by_student_course("201-0000", 1, 50.0);
    assert!(!by_pair.ok);
    assert!(book.list_grades().is_empty());
}

#[test]
fn update_responses_echo_entity_ids() {
    let conn = open_db_in_memory().unwrap();
    let book = Gradebook::try_new(&conn).unwrap();
    let id = book.add_student("Ann", "ann@x.com", "201").entity_id.unwrap();
    let course = book.add_course("Physics", "PHYS101", 4);
    assert_eq!(course.message, "Course added successfully with ID: 1");

    let student = book.update_student(&id, None, "Ann B", "ann.b@x.com");
    assert_eq!(
        student,
        ActionResponse::success("Student updated successfully", Some(id.clone()))
    );

    let course = book.update_course(1, "Physics I", "PHYS110", 4);
    assert_eq!(
        course,
        ActionResponse::success("Course updated successfully", Some("1".to_string()))
    );
    assert_eq!(book.find_course_by_code("PHYS110").unwrap().name, "Physics I");
    assert!(book.get_course(1).is_some());

    let grade = book.update_grade_by_student_course(&id, 1, 77.0);
    assert!(grade.ok);
    assert_eq!(grade.message, "Grade updated successfully");
    let stored = book.find_grade(&id, 1).unwrap();
    assert_eq!(Some(stored.id.to_string()), grade.entity_id);
    assert_eq!(book.get_grade(stored.id).unwrap().value, 77.0);
}

#[test]
fn reset_data_reports_success_and_empties_store() {
    let conn = open_db_in_memory().unwrap();
    let book = Gradebook::try_new(&conn).unwrap();
    book.add_student("Ann", "ann@x.com", "201");
    book.add_course("Physics", "PHYS101", 4);

    let response = book.reset_data();

    assert_eq!(
        response,
        ActionResponse::success("All data deleted successfully", None)
    );
    assert!(book.analytics_snapshot().is_empty());
}

#[test]
fn responses_serialize_for_presentation_layers() {
    let response = ActionResponse::success("Grade assigned successfully", Some("3".to_string()));

    let json = serde_json::to_value(&response).unwrap();

    assert_eq!(
        json,
        serde_json::json!({
            "ok": true,
            "message": "Grade assigned successfully",
            "entity_id": "3"
        })
    );
}
