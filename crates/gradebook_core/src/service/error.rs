//! Service error taxonomy.

use crate::model::validation::ValidationError;
use crate::repo::{ConflictKey, EntityKey, RepoError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failure of a service operation.
#[derive(Debug)]
pub enum ServiceError {
    /// Bad input shape or range; the caller can fix and retry.
    Validation(ValidationError),
    /// A referenced entity does not exist.
    NotFound(EntityKey),
    /// The write collided with a uniqueness rule.
    Conflict(ConflictKey),
    /// Underlying storage failure.
    Store(RepoError),
}

impl ServiceError {
    /// Stable short label used in log events.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NotFound(_) => "not_found",
            Self::Conflict(_) => "conflict",
            Self::Store(_) => "store",
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(key) => write!(f, "{key} not found"),
            Self::Conflict(key) => write!(f, "{key}"),
            Self::Store(err) => write!(f, "storage error: {err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::NotFound(_) | Self::Conflict(_) => None,
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::NotFound(key) => Self::NotFound(key),
            RepoError::Conflict(key) => Self::Conflict(key),
            other => Self::Store(other),
        }
    }
}
