//! `academia-core` — shared building blocks for the academic portal.
//!
//! This crate contains **pure** primitives (no transport, no storage).

pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use entity::Entity;
pub use error::DomainError;
pub use id::{CourseId, EnrollmentId, GradeId, GroupId, SeanceId, SpecialtyId, StudentId, TrainerId, UserId};
pub use value_object::ValueObject;
