//! Sample data population.
//!
//! # Responsibility
//! - Fill a store with a fixed cohort of students and courses and random
//!   grades for every pairing.
//!
//! # Invariants
//! - Rows are written through the regular services, so every domain rule
//!   (validation, email normalization, id retry, grade upsert) applies.
//! - Conflicting or invalid sample rows are skipped and counted; storage
//!   failures abort the run.

use crate::model::course::Course;
use crate::model::student::Student;
use crate::repo::course_repo::CourseRepository;
use crate::repo::grade_repo::GradeRepository;
use crate::repo::student_repo::StudentRepository;
use crate::service::course_service::CourseService;
use crate::service::error::{ServiceError, ServiceResult};
use crate::service::grade_service::GradeService;
use crate::service::student_service::StudentService;
use log::{debug, info};
use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt::{Display, Formatter};

const SAMPLE_ENROLLMENT_CODES: [&str; 4] = ["201", "202", "203", "204"];

const SAMPLE_STUDENTS: [(&str, &str); 22] = [
    ("Alice Johnson", "alice.johnson@example.com"),
    ("Bob Smith", "bob.smith@example.com"),
    ("Charlie Davis", "charlie.davis@example.com"),
    ("Diana Evans", "diana.evans@example.com"),
    ("Ethan Brown", "ethan.brown@example.com"),
    ("Fiona Clark", "fiona.clark@example.com"),
    ("George Miller", "george.miller@example.com"),
    ("Hannah Wilson", "hannah.wilson@example.com"),
    ("Ian Thompson", "ian.thompson@example.com"),
    ("Julia Robinson", "julia.robinson@example.com"),
    ("Kevin Walker", "kevin.walker@example.com"),
    ("Laura King", "laura.king@example.com"),
    ("Michael Scott", "michael.scott@example.com"),
    ("Nina Perez", "nina.perez@example.com"),
    ("Oliver Martinez", "oliver.martinez@example.com"),
    ("Ahmed Khalid", "ahmed.khalid@example.com"),
    ("Fatima Ali", "fatima.ali@example.com"),
    ("Omar Farouk", "omar.farouk@example.com"),
    ("Layla Hassan", "layla.hassan@example.com"),
    ("Yousef Ibrahim", "yousef.ibrahim@example.com"),
    ("Sara Nasser", "sara.nasser@example.com"),
    ("Zainab Mustafa", "zainab.mustafa@example.com"),
];

const SAMPLE_COURSES: [(&str, &str, i64); 5] = [
    ("Mathematics", "MATH101", 3),
    ("Physics", "PHYS101", 4),
    ("Chemistry", "CHEM101", 3),
    ("English Literature", "ENG101", 2),
    ("History", "HIST101", 3),
];

/// Share of sample grades drawn from the failing range.
const FAILING_SHARE: f64 = 0.2;

/// Counts produced by one seeding run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub students_added: usize,
    pub courses_added: usize,
    pub grades_added: usize,
    /// Sample rows rejected by validation or uniqueness rules.
    pub skipped: usize,
}

impl Display for SeedReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Sample data seeded successfully: {} students, {} courses, {} grades.",
            self.students_added, self.courses_added, self.grades_added
        )
    }
}

pub struct SeedService<S, C, G>
where
    S: StudentRepository,
    C: CourseRepository,
    G: GradeRepository,
{
    students: S,
    courses: C,
    grades: G,
}

impl<S, C, G> SeedService<S, C, G>
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

    /// Adds the sample cohort, then grades every stored student in every
    /// stored course.
    pub fn seed_sample_data<R: Rng + ?Sized>(&self, rng: &mut R) -> ServiceResult<SeedReport> {
        let mut report = SeedReport::default();

        let student_service = StudentService::new(&self.students);
        for (name, email) in SAMPLE_STUDENTS {
            let code = SAMPLE_ENROLLMENT_CODES
                .choose(rng)
                .copied()
                .unwrap_or(SAMPLE_ENROLLMENT_CODES[0]);
            let outcome = student_service.add_student_with_rng(rng, name, email, code);
            tally(&mut report, outcome.map(|_| ()), |report| {
                report.students_added += 1
            })?;
        }

        let course_service = CourseService::new(&self.courses);
        for (name, code, credits) in SAMPLE_COURSES {
            let outcome = course_service.add_course(name, code, credits);
            tally(&mut report, outcome.map(|_| ()), |report| {
                report.courses_added += 1
            })?;
        }

        let students: Vec<Student> = student_service.list_students()?;
        let courses: Vec<Course> = course_service.list_courses()?;
        let grade_service = GradeService::new(&self.students, &self.courses, &self.grades);
        for student in &students {
            for course in &courses {
                let value = sample_grade(rng);
                let outcome = grade_service.add_grade(student.id.as_str(), course.id, value);
                tally(&mut report, outcome.map(|_| ()), |report| {
                    report.grades_added += 1
                })?;
            }
        }

        info!(
            "event=seed module=service status=ok students_added={} courses_added={} grades_added={} skipped={}",
            report.students_added, report.courses_added, report.grades_added, report.skipped
        );
        Ok(report)
    }
}

/// Whole-number grade: 30..=49 with probability [`FAILING_SHARE`], otherwise
/// 50..=100.
fn sample_grade<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let raw: u8 = if rng.gen_bool(FAILING_SHARE) {
        rng.gen_range(30..=49)
    } else {
        rng.gen_range(50..=100)
    };
    f64::from(raw)
}

fn tally(
    report: &mut SeedReport,
    outcome: ServiceResult<()>,
    on_added: impl FnOnce(&mut SeedReport),
) -> ServiceResult<()> {
    match outcome {
        Ok(()) => {
            on_added(report);
            Ok(())
        }
        Err(err @ ServiceError::Store(_)) => Err(err),
        Err(err) => {
            debug!(
                "event=seed_row module=service status=skipped error_kind={}",
                err.kind()
            );
            report.skipped += 1;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::sample_grade;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn sample_grades_are_whole_numbers_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let value = sample_grade(&mut rng);
            assert_eq!(value.fract(), 0.0);
            assert!((30.0..=100.0).contains(&value));
        }
    }
}
