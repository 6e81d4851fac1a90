//! Core use-case services.
//!
//! # Responsibility
//! - Validate caller input and enforce business rules above repositories.
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep presentation layers decoupled from storage details.
//!
//! # Invariants
//! - Services never bypass repository validation/persistence contracts.
//! - Services remain storage-agnostic; repositories are injected.

pub mod analytics_service;
pub mod course_service;
pub mod error;
pub mod grade_service;
pub mod seed_service;
pub mod student_service;
