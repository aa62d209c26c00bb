//! Grades on the fixed 0-20 scale.

use serde::{Deserialize, Serialize};

use academia_core::{CourseId, Entity, GradeId, StudentId, ValueObject};

use crate::error::AcademicError;

pub const GRADE_MIN: f64 = 0.0;
pub const GRADE_MAX: f64 = 20.0;
/// Lowest passing grade (inclusive).
pub const PASSING_GRADE: f64 = 10.0;

/// A grade value, guaranteed finite and within `[GRADE_MIN, GRADE_MAX]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct GradeValue(f64);

impl ValueObject for GradeValue {}

impl GradeValue {
    /// Both bounds are inclusive: `0` and `20` are valid grades.
    pub fn new(value: f64) -> Result<Self, AcademicError> {
        if value.is_finite() && (GRADE_MIN..=GRADE_MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(AcademicError::OutOfRange { value })
        }
    }

    pub fn get(&self) -> f64 {
        self.0
    }

    pub fn is_passing(&self) -> bool {
        self.0 >= PASSING_GRADE
    }
}

impl TryFrom<f64> for GradeValue {
    type Error = AcademicError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<GradeValue> for f64 {
    fn from(value: GradeValue) -> Self {
        value.0
    }
}

impl core::fmt::Display for GradeValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grade {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<GradeId>,
    pub value: GradeValue,
    pub student_id: StudentId,
    pub course_id: CourseId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_title: Option<String>,
}

impl Entity for Grade {
    type Id = GradeId;

    fn id(&self) -> Option<&GradeId> {
        self.id.as_ref()
    }
}

impl Grade {
    pub fn is_passing(&self) -> bool {
        self.value.is_passing()
    }
}

/// Body of `POST /api/grades`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeRequest {
    pub student_id: StudentId,
    pub course_id: CourseId,
    pub value: GradeValue,
}

impl GradeRequest {
    /// Validates the raw value; out-of-range input never becomes a request.
    pub fn new(student_id: StudentId, course_id: CourseId, value: f64) -> Result<Self, AcademicError> {
        Ok(Self {
            student_id,
            course_id,
            value: GradeValue::new(value)?,
        })
    }
}

/// Arithmetic mean of the grade values; `0.0` for no grades.
pub fn compute_gpa(grades: &[Grade]) -> f64 {
    if grades.is_empty() {
        return 0.0;
    }
    let sum: f64 = grades.iter().map(|g| g.value.get()).sum();
    sum / grades.len() as f64
}

/// GPA as a fraction of the scale, clamped to `[0, 1]` for progress indicators.
pub fn gpa_progress(gpa: f64) -> f64 {
    if !gpa.is_finite() {
        return 0.0;
    }
    (gpa / GRADE_MAX).clamp(0.0, 1.0)
}
