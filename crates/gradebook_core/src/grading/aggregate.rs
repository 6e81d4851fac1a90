//! Credit-weighted GPA aggregation.

use super::scale::{to_gpa_point, PASSING_GRADE};

/// Credit-weighted GPA over `(raw grade, credits)` pairs, rounded to two
/// decimals.
///
/// Returns `0.0` for an empty input or when total credits is zero. The
/// result does not depend on pair order.
pub fn weighted_gpa<I>(pairs: I) -> f64
where
    I: IntoIterator<Item = (f64, u32)>,
{
    let (total_points, total_credits) = pairs.into_iter().fold(
        (0.0_f64, 0_u64),
        |(points, credits), (raw, course_credits)| {
            (
                points + to_gpa_point(raw) * f64::from(course_credits),
                credits + u64::from(course_credits),
            )
        },
    );

    if total_credits == 0 {
        return 0.0;
    }
    round2(total_points / total_credits as f64)
}

/// True when any raw grade is below the passing mark.
pub fn has_failing_grade<I>(raw_grades: I) -> bool
where
    I: IntoIterator<Item = f64>,
{
    raw_grades.into_iter().any(|raw| raw < PASSING_GRADE)
}

/// Rounds half away from zero to two decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
