//! Grade conversion and GPA aggregation.
//!
//! # Responsibility
//! - Map raw scores to letter grades and 4.0-scale points.
//! - Combine per-course results into credit-weighted GPAs.
//!
//! # Invariants
//! - All functions are pure and total; out-of-range input never panics.
//! - Letter and point conversion share the same band boundaries.

mod aggregate;
mod scale;

pub use aggregate::{has_failing_grade, round2, weighted_gpa};
pub use scale::{to_gpa_point, to_letter, LetterGrade, PASSING_GRADE};
