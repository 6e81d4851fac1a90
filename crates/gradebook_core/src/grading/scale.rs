//! Raw score bands.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Lowest raw score that still counts as passing (band `D`).
pub const PASSING_GRADE: f64 = 60.0;

/// Band lower bounds, highest first. Bounds are inclusive.
const BANDS: [(f64, LetterGrade); 4] = [
    (90.0, LetterGrade::A),
    (80.0, LetterGrade::B),
    (70.0, LetterGrade::C),
    (PASSING_GRADE, LetterGrade::D),
];

/// Letter grade on the A–F scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LetterGrade {
    A,
    B,
    C,
    D,
    F,
}

impl LetterGrade {
    /// Point value on the 4.0 scale.
    pub fn gpa_point(self) -> f64 {
        match self {
            Self::A => 4.0,
            Self::B => 3.0,
            Self::C => 2.0,
            Self::D => 1.0,
            Self::F => 0.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        }
    }
}

impl Display for LetterGrade {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps a raw score to its letter band. NaN and negatives fall to `F`.
pub fn to_letter(raw: f64) -> LetterGrade {
    BANDS
        .iter()
        .find(|(lower_bound, _)| raw >= *lower_bound)
        .map_or(LetterGrade::F, |(_, letter)| *letter)
}

/// Maps a raw score to its 4.0-scale point value.
pub fn to_gpa_point(raw: f64) -> f64 {
    to_letter(raw).gpa_point()
}
