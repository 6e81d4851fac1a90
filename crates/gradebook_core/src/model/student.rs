//! Student domain model.
//!
//! # Responsibility
//! - Define the student record and its identifier type.
//! - Validate enrollment codes, identifiers and emails.
//! - Normalize emails onto the institutional domain.
//!
//! # Invariants
//! - `StudentId` values are `<enrollment code>-<4 digits>`.
//! - Email normalization is lossy: only the local part survives.

use crate::model::validation::ValidationError;
use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Domain every stored student email is rewritten to.
pub const EMAIL_DOMAIN: &str = "outlook.com";

static STUDENT_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{3}-[0-9]{4}$").expect("valid student id regex"));
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

/// Student identifier in `DDD-DDDD` form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(String);

impl StudentId {
    /// Parses a caller-provided identifier, rejecting anything not `DDD-DDDD`.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let trimmed = value.trim();
        if STUDENT_ID_RE.is_match(trimmed) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(ValidationError::InvalidStudentId(value.to_string()))
        }
    }

    /// Builds a fresh identifier from an enrollment code and a random
    /// 4-digit suffix (`1000..=9999`).
    ///
    /// Uniqueness is not guaranteed; callers must handle collisions.
    pub fn generate<R: Rng + ?Sized>(
        enrollment_code: &str,
        rng: &mut R,
    ) -> Result<Self, ValidationError> {
        let code = validate_enrollment_code(enrollment_code)?;
        let suffix: u16 = rng.gen_range(1000..=9999);
        Ok(Self(format!("{code}-{suffix}")))
    }

    /// Returns the three-digit enrollment prefix.
    pub fn enrollment_code(&self) -> &str {
        &self.0[..3]
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for StudentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.pad(&self.0)
    }
}

/// Canonical student record as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    /// Always `<local part>@outlook.com` once persisted.
    pub email: String,
}

impl Student {
    /// Builds a student from raw form input.
    ///
    /// Trims the name, validates the email syntax and normalizes it onto
    /// [`EMAIL_DOMAIN`].
    pub fn from_input(id: StudentId, name: &str, email: &str) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyStudentName);
        }
        let email = validate_email(email)?;
        Ok(Self {
            id,
            name: name.to_string(),
            email: normalize_email(email),
        })
    }

    /// Checks invariants required before persistence.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyStudentName);
        }
        validate_email(&self.email)?;
        Ok(())
    }
}

/// Validates a three-digit enrollment code and returns it trimmed.
pub fn validate_enrollment_code(code: &str) -> Result<&str, ValidationError> {
    let trimmed = code.trim();
    if trimmed.len() == 3 && trimmed.bytes().all(|byte| byte.is_ascii_digit()) {
        Ok(trimmed)
    } else {
        Err(ValidationError::InvalidEnrollmentCode(code.to_string()))
    }
}

/// Validates basic `local@domain.tld` email syntax and returns it trimmed.
pub fn validate_email(email: &str) -> Result<&str, ValidationError> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyEmail);
    }
    if !EMAIL_RE.is_match(trimmed) {
        return Err(ValidationError::InvalidEmail(email.to_string()));
    }
    Ok(trimmed)
}

/// Rewrites an email onto [`EMAIL_DOMAIN`].
///
/// The local part is everything before the first `@`, or the whole input
/// when there is no `@`.
pub fn normalize_email(email: &str) -> String {
    let local_part = email.split('@').next().unwrap_or_default();
    format!("{local_part}@{EMAIL_DOMAIN}")
}
