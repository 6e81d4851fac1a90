//! Domain model for students, courses and grades.
//!
//! # Responsibility
//! - Define the canonical records shared by repositories and services.
//! - Own field-level validation and normalization rules.
//!
//! # Invariants
//! - A `StudentId` always has the `DDD-DDDD` shape.
//! - Persisted student emails always carry the institutional domain.
//! - Grade values are finite and within `[0, 100]`.

pub mod course;
pub mod grade;
pub mod student;
pub mod validation;
