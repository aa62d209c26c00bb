use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use academia_core::{CourseId, Entity, EnrollmentId, StudentId};

use crate::error::AcademicError;

/// A student's registration in a course.
///
/// At most one active enrollment exists per (student, course) pair. The API
/// enforces this; the client only surfaces the conflict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EnrollmentId>,
    pub enrollment_date: NaiveDate,
    pub student_id: StudentId,
    pub course_id: CourseId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_title: Option<String>,
}

impl Entity for Enrollment {
    type Id = EnrollmentId;

    fn id(&self) -> Option<&EnrollmentId> {
        self.id.as_ref()
    }
}

/// Body of `POST /api/enrollments`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentRequest {
    pub student_id: StudentId,
    pub course_id: CourseId,
}

impl EnrollmentRequest {
    /// Both references must be present before anything is dispatched.
    pub fn new(student_id: Option<StudentId>, course_id: Option<CourseId>) -> Result<Self, AcademicError> {
        Ok(Self {
            student_id: student_id.ok_or(AcademicError::MissingReference("studentId"))?,
            course_id: course_id.ok_or(AcademicError::MissingReference("courseId"))?,
        })
    }

    /// Build from raw form selections, where "nothing selected" is an empty string.
    pub fn from_selection(student: &str, course: &str) -> Result<Self, AcademicError> {
        let student = non_empty(student, "studentId")?.parse::<StudentId>()?;
        let course = non_empty(course, "courseId")?.parse::<CourseId>()?;
        Ok(Self {
            student_id: student,
            course_id: course,
        })
    }
}

fn non_empty<'a>(raw: &'a str, field: &'static str) -> Result<&'a str, AcademicError> {
    let raw = raw.trim();
    if raw.is_empty() {
        Err(AcademicError::MissingReference(field))
    } else {
        Ok(raw)
    }
}

/// Advisory check against enrollments already on screen.
///
/// A `false` here proves nothing; the API is the authority on duplicates.
pub fn is_already_enrolled(existing: &[Enrollment], request: &EnrollmentRequest) -> bool {
    existing
        .iter()
        .any(|e| e.student_id == request.student_id && e.course_id == request.course_id)
}
