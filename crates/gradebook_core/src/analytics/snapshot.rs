//! Analytics snapshot model and builder.

use crate::grading::{has_failing_grade, round2, to_letter, weighted_gpa, LetterGrade};
use crate::model::course::{Course, CourseId};
use crate::model::grade::GradeRecord;
use crate::model::student::{Student, StudentId};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

/// Number of ranked students kept per course by default.
pub const DEFAULT_TOP_STUDENTS: usize = 3;
/// GPA at or above which a student is in good standing.
pub const PASSING_GPA: f64 = 2.0;
/// GPA at or above which a student is on the honor roll.
pub const HONOR_GPA: f64 = 3.5;

/// At-risk rule: any failing raw grade, or a GPA below [`PASSING_GPA`].
pub fn is_at_risk(gpa: f64, has_failing: bool) -> bool {
    has_failing || gpa < PASSING_GPA
}

/// One student's aggregated standing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentStanding {
    pub student_id: StudentId,
    pub name: String,
    pub email: String,
    /// Credit-weighted GPA, two decimals.
    pub gpa: f64,
    pub is_at_risk: bool,
}

/// Entry in a course's top-N ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedStudent {
    pub student_id: StudentId,
    pub name: String,
    pub grade: f64,
    pub letter: LetterGrade,
}

/// Per-course aggregate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseSummary {
    pub course_id: CourseId,
    pub code: String,
    pub credits: u32,
    pub grade_count: usize,
    /// Mean raw grade, two decimals; `0.0` without grades.
    pub average_grade: f64,
    /// Best grades first; ties by student name, then id.
    pub top_students: Vec<RankedStudent>,
}

/// Cohort-wide GPA statistics. Rates are percentages.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CohortSummary {
    pub student_count: usize,
    pub average_gpa: f64,
    pub passing_count: usize,
    pub pass_rate: f64,
    pub honor_count: usize,
    pub honor_rate: f64,
    pub at_risk_count: usize,
}

/// Full dashboard snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalyticsSnapshot {
    /// Ordered by student id.
    pub students: Vec<StudentStanding>,
    /// Keyed by course name. A repeated name is keyed `"<name> (<code>)"`,
    /// with ` #<id>` appended while that key is still taken.
    pub courses: BTreeMap<String, CourseSummary>,
    pub summary: CohortSummary,
}

impl AnalyticsSnapshot {
    /// Builds a snapshot from full listings.
    ///
    /// `students` and `courses` drive which rows appear; grades whose
    /// student or course is not listed are ignored.
    pub fn build(
        students: &[Student],
        courses: &[Course],
        grades: &[GradeRecord],
        top_n: usize,
    ) -> Self {
        let mut by_student: HashMap<&StudentId, Vec<&GradeRecord>> = HashMap::new();
        let mut by_course: HashMap<CourseId, Vec<&GradeRecord>> = HashMap::new();
        for grade in grades {
            by_student.entry(&grade.student_id).or_default().push(grade);
            by_course.entry(grade.course_id).or_default().push(grade);
        }

        let standings: Vec<StudentStanding> = students
            .iter()
            .map(|student| {
                let own = by_student
                    .get(&student.id)
                    .map(Vec::as_slice)
                    .unwrap_or_default();
                standing_for(student, own)
            })
            .collect();

        let mut course_map = BTreeMap::new();
        for course in courses {
            let own = by_course
                .get(&course.id)
                .map(Vec::as_slice)
                .unwrap_or_default();
            let key = unique_course_key(&course_map, course);
            course_map.insert(key, summarize_course(course, own, top_n));
        }

        let summary = CohortSummary::from_standings(&standings);
        Self {
            students: standings,
            courses: course_map,
            summary,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty() && self.courses.is_empty()
    }

    /// Students strictly below `threshold`, weakest first.
    pub fn students_below_gpa(&self, threshold: f64) -> Vec<&StudentStanding> {
        let mut selected: Vec<_> = self
            .students
            .iter()
            .filter(|standing| standing.gpa < threshold)
            .collect();
        selected.sort_by(|a, b| by_gpa(a, b));
        selected
    }

    /// Students at or above `threshold`, strongest first.
    pub fn students_at_or_above_gpa(&self, threshold: f64) -> Vec<&StudentStanding> {
        let mut selected: Vec<_> = self
            .students
            .iter()
            .filter(|standing| standing.gpa >= threshold)
            .collect();
        selected.sort_by(|a, b| by_gpa(b, a));
        selected
    }

    /// All students, strongest GPA first.
    pub fn students_by_gpa_desc(&self) -> Vec<&StudentStanding> {
        self.students_at_or_above_gpa(f64::NEG_INFINITY)
    }

    /// Case-insensitive substring match on name or id. A blank query
    /// returns everyone.
    pub fn search_students(&self, query: &str) -> Vec<&StudentStanding> {
        let needle = query.trim().to_lowercase();
        self.students
            .iter()
            .filter(|standing| {
                needle.is_empty()
                    || standing.name.to_lowercase().contains(&needle)
                    || standing.student_id.as_str().contains(&needle)
            })
            .collect()
    }
}

impl CohortSummary {
    fn from_standings(standings: &[StudentStanding]) -> Self {
        let student_count = standings.len();
        if student_count == 0 {
            return Self::default();
        }

        let total_gpa: f64 = standings.iter().map(|standing| standing.gpa).sum();
        let passing_count = standings
            .iter()
            .filter(|standing| standing.gpa >= PASSING_GPA)
            .count();
        let honor_count = standings
            .iter()
            .filter(|standing| standing.gpa >= HONOR_GPA)
            .count();
        let at_risk_count = standings
            .iter()
            .filter(|standing| standing.is_at_risk)
            .count();

        Self {
            student_count,
            average_gpa: round2(total_gpa / student_count as f64),
            passing_count,
            pass_rate: percentage(passing_count, student_count),
            honor_count,
            honor_rate: percentage(honor_count, student_count),
            at_risk_count,
        }
    }
}

fn standing_for(student: &Student, grades: &[&GradeRecord]) -> StudentStanding {
    let gpa = weighted_gpa(
        grades
            .iter()
            .map(|grade| (grade.value, grade.course_credits)),
    );
    let failing = has_failing_grade(grades.iter().map(|grade| grade.value));

    StudentStanding {
        student_id: student.id.clone(),
        name: student.name.clone(),
        email: student.email.clone(),
        gpa,
        is_at_risk: is_at_risk(gpa, failing),
    }
}

fn unique_course_key<V>(taken: &BTreeMap<String, V>, course: &Course) -> String {
    if !taken.contains_key(&course.name) {
        return course.name.clone();
    }
    let mut key = format!("{} ({})", course.name, course.code);
    while taken.contains_key(&key) {
        key = format!("{key} #{}", course.id);
    }
    key
}

fn summarize_course(course: &Course, grades: &[&GradeRecord], top_n: usize) -> CourseSummary {
    let average_grade = if grades.is_empty() {
        0.0
    } else {
        let total: f64 = grades.iter().map(|grade| grade.value).sum();
        round2(total / grades.len() as f64)
    };

    let mut ranked = grades.to_vec();
    ranked.sort_by(|a, b| rank_order(a, b));
    let top_students = ranked
        .into_iter()
        .take(top_n)
        .map(|grade| RankedStudent {
            student_id: grade.student_id.clone(),
            name: grade.student_name.clone(),
            grade: grade.value,
            letter: to_letter(grade.value),
        })
        .collect();

    CourseSummary {
        course_id: course.id,
        code: course.code.clone(),
        credits: course.credits,
        grade_count: grades.len(),
        average_grade,
        top_students,
    }
}

fn rank_order(a: &GradeRecord, b: &GradeRecord) -> Ordering {
    b.value
        .total_cmp(&a.value)
        .then_with(|| a.student_name.cmp(&b.student_name))
        .then_with(|| a.student_id.cmp(&b.student_id))
}

fn by_gpa(a: &StudentStanding, b: &StudentStanding) -> Ordering {
    a.gpa
        .total_cmp(&b.gpa)
        .then_with(|| a.student_id.cmp(&b.student_id))
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round2(part as f64 * 100.0 / whole as f64)
}
