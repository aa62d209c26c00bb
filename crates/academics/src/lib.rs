//! `academia-academics` — the academic domain model.
//!
//! Typed records for every entity the portal exchanges with the API, and the
//! pure rules the client enforces around them: the grading scale, GPA
//! aggregation, the schedule horizon, and trainer course scoping.
//!
//! Entities here are request-scoped snapshots. Nothing in this crate caches.

pub mod classification;
pub mod course;
pub mod enrollment;
pub mod error;
pub mod grade;
pub mod schedule;
pub mod student;
pub mod trainer;

mod serde_time;

pub use classification::{Specialty, StudentGroup};
pub use course::{Course, CourseAssignment, courses_taught_by};
pub use enrollment::{Enrollment, EnrollmentRequest, is_already_enrolled};
pub use error::AcademicError;
pub use grade::{
    GRADE_MAX, GRADE_MIN, Grade, GradeRequest, GradeValue, PASSING_GRADE, compute_gpa, gpa_progress,
};
pub use schedule::{ScheduledSession, upcoming_schedule, upcoming_schedule_at};
pub use student::{Matricule, Student};
pub use trainer::Trainer;
